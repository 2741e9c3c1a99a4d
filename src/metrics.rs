//! Pure scoring functions over a typed string and its target.
//!
//! Lengths and positions count `char`s, not bytes.

/// Characters per conventional "word" when computing WPM
pub const CHARS_PER_WORD: f64 = 5.0;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Pending,
}

/// Rendering hint for one position of the target line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharMark {
    /// `None` for positions typed past the end of the target
    pub expected: Option<char>,
    pub outcome: Outcome,
    pub caret: bool,
}

/// True once `typed` (ignoring trailing whitespace) starts with the whole target.
pub fn is_complete(typed: &str, target: &str) -> bool {
    let typed = typed.trim_end();
    let target_len = target.chars().count();

    typed.chars().count() >= target_len && typed.chars().take(target_len).eq(target.chars())
}

/// Number of positions where `typed` matches `target`. Overflow past the
/// target is never counted.
pub fn correct_chars(typed: &str, target: &str) -> usize {
    typed
        .chars()
        .zip(target.chars())
        .filter(|(given, expected)| given == expected)
        .count()
}

pub fn total_chars(typed: &str) -> usize {
    typed.chars().count()
}

pub fn wpm(correct_chars: usize, elapsed_ms: f64) -> f64 {
    if elapsed_ms <= 0.0 {
        return 0.0;
    }
    let words = correct_chars as f64 / CHARS_PER_WORD;
    let minutes = elapsed_ms / MS_PER_MINUTE;

    words / minutes
}

/// Percentage of typed characters that were correct; 100 before anything is typed.
pub fn accuracy(correct_chars: usize, total_typed: usize) -> f64 {
    match total_typed {
        0 => 100.0,
        total => (correct_chars as f64 / total as f64) * 100.0,
    }
}

/// Classify every position of `max(target, typed)` for display.
pub fn char_marks(typed: &str, target: &str, complete: bool) -> Vec<CharMark> {
    let given: Vec<char> = typed.chars().collect();
    let expected: Vec<char> = target.chars().collect();
    let len = given.len().max(expected.len());

    (0..len)
        .map(|idx| {
            let expected = expected.get(idx).copied();
            let outcome = match given.get(idx) {
                None => Outcome::Pending,
                Some(c) if Some(*c) == expected => Outcome::Correct,
                Some(_) => Outcome::Incorrect,
            };

            CharMark {
                expected,
                outcome,
                caret: !complete && idx == given.len(),
            }
        })
        .collect()
}
