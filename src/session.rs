use crate::metrics;
use crate::timer::{ElapsedSampler, DEFAULT_TICK_RATE_MS};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// The sentence being typed, trimmed on construction
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetSentence(String);

impl TargetSentence {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for TargetSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetSentence {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Active,
    Complete,
}

/// Inputs to the session state machine
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// The whole typed text after an edit
    Edit(String),
    /// Periodic clock sample
    Tick,
    /// Start over on the same sentence
    Reset,
    /// Start over on a different sentence
    Replace(TargetSentence),
}

/// What `Session::apply` did with an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Updated,
    Started,
    Completed,
    Sampled,
    Reset,
    Rejected,
}

/// Snapshot of the numbers the stats panel shows
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionMetrics {
    pub correct_chars: usize,
    pub total_chars: usize,
    pub elapsed: Duration,
    pub wpm: f64,
    pub accuracy: f64,
}

/// One attempt at one target sentence.
///
/// All mutation goes through [`Session::apply`]. The clock is passed in so
/// callers (and tests) decide what "now" is.
#[derive(Debug, Clone)]
pub struct Session {
    target: TargetSentence,
    typed: String,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    complete: bool,
    sampler: Option<ElapsedSampler>,
    tick_rate: Duration,
}

impl Session {
    pub fn new(target: TargetSentence) -> Self {
        Self::with_tick_rate(target, Duration::from_millis(DEFAULT_TICK_RATE_MS))
    }

    pub fn with_tick_rate(target: TargetSentence, tick_rate: Duration) -> Self {
        Self {
            target,
            typed: String::new(),
            started_at: None,
            ended_at: None,
            complete: false,
            sampler: None,
            tick_rate,
        }
    }

    pub fn apply(&mut self, event: SessionEvent, now: Instant) -> Transition {
        match event {
            SessionEvent::Edit(typed) => self.on_edit(typed, now),
            SessionEvent::Tick => self.on_tick(now),
            SessionEvent::Reset => {
                self.clear();
                debug!(target_len = self.target.char_len(), "session reset");
                Transition::Reset
            }
            SessionEvent::Replace(target) => {
                self.clear();
                debug!(sentence = %target, "session replaced target");
                self.target = target;
                Transition::Reset
            }
        }
    }

    fn on_edit(&mut self, typed: String, now: Instant) -> Transition {
        if self.complete {
            trace!("edit rejected, session complete");
            return Transition::Rejected;
        }
        if typed == self.typed {
            return Transition::Unchanged;
        }
        self.typed = typed;

        let mut transition = Transition::Updated;
        if self.started_at.is_none() && !self.typed.is_empty() {
            self.started_at = Some(now);
            self.sampler = Some(ElapsedSampler::start(now, self.tick_rate));
            debug!("session started");
            transition = Transition::Started;
        }

        if self.started_at.is_some() && metrics::is_complete(&self.typed, self.target.as_str()) {
            self.complete = true;
            self.ended_at = Some(now);
            // stop the live clock
            self.sampler = None;

            let m = self.metrics();
            info!(
                elapsed_ms = m.elapsed.as_millis() as u64,
                wpm = m.wpm,
                accuracy = m.accuracy,
                "session complete"
            );
            transition = Transition::Completed;
        }

        transition
    }

    fn on_tick(&mut self, now: Instant) -> Transition {
        match self.sampler.as_mut().map(|sampler| sampler.on_tick(now)) {
            Some(true) => Transition::Sampled,
            _ => Transition::Unchanged,
        }
    }

    fn clear(&mut self) {
        self.typed.clear();
        self.started_at = None;
        self.ended_at = None;
        self.complete = false;
        self.sampler = None;
    }

    pub fn phase(&self) -> Phase {
        match (self.started_at.is_some(), self.complete) {
            (_, true) => Phase::Complete,
            (true, false) => Phase::Active,
            (false, false) => Phase::Idle,
        }
    }

    pub fn target(&self) -> &TargetSentence {
        &self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    /// True while a live clock is held (Active only)
    pub fn is_sampling(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.ended_at, &self.sampler) {
            (Some(start), Some(end), _) => end.saturating_duration_since(start),
            (Some(_), None, Some(sampler)) => sampler.sampled(),
            _ => Duration::ZERO,
        }
    }

    pub fn correct_chars(&self) -> usize {
        metrics::correct_chars(&self.typed, self.target.as_str())
    }

    pub fn metrics(&self) -> SessionMetrics {
        let correct_chars = self.correct_chars();
        let total_chars = metrics::total_chars(&self.typed);
        let elapsed = self.elapsed();

        SessionMetrics {
            correct_chars,
            total_chars,
            elapsed,
            wpm: metrics::wpm(correct_chars, elapsed.as_secs_f64() * 1000.0),
            accuracy: metrics::accuracy(correct_chars, total_chars),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn type_all(session: &mut Session, text: &str, start: Instant, step: Duration) -> Transition {
        let mut typed = String::new();
        let mut last = Transition::Unchanged;
        for (i, c) in text.chars().enumerate() {
            typed.push(c);
            last = session.apply(SessionEvent::Edit(typed.clone()), start + step * i as u32);
        }
        last
    }

    #[test]
    fn test_target_is_trimmed() {
        let target = TargetSentence::new("  hello world \n");
        assert_eq!(target.as_str(), "hello world");
        assert_eq!(target.char_len(), 11);
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new("hello".into());

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.typed(), "");
        assert!(!session.has_started());
        assert!(!session.is_complete());
        assert!(!session.is_sampling());
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert_eq!(session.metrics().wpm, 0.0);
        assert_eq!(session.metrics().accuracy, 100.0);
    }

    #[test]
    fn test_first_keystroke_starts() {
        let t0 = Instant::now();
        let mut session = Session::new("hello".into());

        assert_eq!(session.apply(SessionEvent::Edit("h".into()), t0), Transition::Started);
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.started_at(), Some(t0));
        assert!(session.is_sampling());
    }

    #[test]
    fn test_empty_edit_does_not_start() {
        let t0 = Instant::now();
        let mut session = Session::new("hello".into());

        assert_eq!(session.apply(SessionEvent::Edit(String::new()), t0), Transition::Unchanged);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.apply(SessionEvent::Tick, t0 + ms(500)), Transition::Unchanged);
        assert_eq!(session.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_start_is_set_once() {
        let t0 = Instant::now();
        let mut session = Session::new("hello".into());

        session.apply(SessionEvent::Edit("h".into()), t0);
        session.apply(SessionEvent::Edit(String::new()), t0 + ms(100));
        assert_eq!(session.phase(), Phase::Active);
        session.apply(SessionEvent::Edit("h".into()), t0 + ms(200));

        assert_eq!(session.started_at(), Some(t0));
    }

    #[test]
    fn test_ticks_drive_live_elapsed() {
        let t0 = Instant::now();
        let mut session = Session::new("hello".into());
        session.apply(SessionEvent::Edit("h".into()), t0);

        assert_eq!(session.apply(SessionEvent::Tick, t0 + ms(50)), Transition::Unchanged);
        assert_eq!(session.elapsed(), Duration::ZERO);

        assert_eq!(session.apply(SessionEvent::Tick, t0 + ms(340)), Transition::Sampled);
        assert_eq!(session.elapsed(), ms(300));
    }

    #[test]
    fn test_tick_reports_sampled_only_when_clock_moves() {
        let t0 = Instant::now();
        let mut session = Session::new("hello".into());
        session.apply(SessionEvent::Edit("he".into()), t0);

        assert_eq!(session.apply(SessionEvent::Tick, t0 + ms(120)), Transition::Sampled);
        assert_eq!(session.apply(SessionEvent::Tick, t0 + ms(180)), Transition::Unchanged);
        assert_eq!(session.apply(SessionEvent::Tick, t0 + ms(200)), Transition::Sampled);
        assert_eq!(session.elapsed(), ms(200));
    }

    #[test]
    fn test_completion_fixes_elapsed_to_wall_clock() {
        let t0 = Instant::now();
        let mut session = Session::new("hi".into());

        session.apply(SessionEvent::Edit("h".into()), t0);
        session.apply(SessionEvent::Tick, t0 + ms(100));
        let transition = session.apply(SessionEvent::Edit("hi".into()), t0 + ms(1_234));

        assert_eq!(transition, Transition::Completed);
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.ended_at(), Some(t0 + ms(1_234)));
        assert_eq!(session.elapsed(), ms(1_234));
        assert!(!session.is_sampling());

        // later ticks have nothing to drive
        assert_eq!(session.apply(SessionEvent::Tick, t0 + ms(5_000)), Transition::Unchanged);
        assert_eq!(session.elapsed(), ms(1_234));
    }

    #[test]
    fn test_completion_with_trailing_space() {
        let t0 = Instant::now();
        let mut session = Session::new("hi".into());
        session.apply(SessionEvent::Edit("h".into()), t0);
        session.apply(SessionEvent::Edit("hx".into()), t0 + ms(10));
        assert!(!session.is_complete());
        session.apply(SessionEvent::Edit("h".into()), t0 + ms(20));
        session.apply(SessionEvent::Edit("hi ".into()), t0 + ms(30));
        assert!(session.is_complete());
    }

    #[test]
    fn test_edits_rejected_once_complete() {
        let t0 = Instant::now();
        let mut session = Session::new("hi".into());
        type_all(&mut session, "hi", t0, ms(100));

        assert_eq!(session.apply(SessionEvent::Edit("h".into()), t0 + ms(500)), Transition::Rejected);
        assert_eq!(session.typed(), "hi");
        assert!(session.is_complete());
        assert_eq!(session.ended_at(), Some(t0 + ms(100)));
    }

    #[test]
    fn test_reset_keeps_target() {
        let t0 = Instant::now();
        let mut session = Session::new("hi".into());
        type_all(&mut session, "hi", t0, ms(100));

        assert_eq!(session.apply(SessionEvent::Reset, t0 + ms(300)), Transition::Reset);
        assert_eq!(session.typed(), "");
        assert!(!session.has_started());
        assert!(!session.is_complete());
        assert!(!session.is_sampling());
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert_eq!(session.target().as_str(), "hi");
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_while_active_drops_clock() {
        let t0 = Instant::now();
        let mut session = Session::new("hello".into());
        session.apply(SessionEvent::Edit("he".into()), t0);
        assert!(session.is_sampling());

        session.apply(SessionEvent::Reset, t0 + ms(10));
        assert!(!session.is_sampling());
        assert_eq!(session.apply(SessionEvent::Tick, t0 + ms(900)), Transition::Unchanged);
        assert_eq!(session.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_replace_swaps_target_and_resets() {
        let t0 = Instant::now();
        let mut session = Session::new("hi".into());
        session.apply(SessionEvent::Edit("h".into()), t0);

        session.apply(SessionEvent::Replace("other".into()), t0 + ms(10));
        assert_eq!(session.target().as_str(), "other");
        assert_eq!(session.typed(), "");
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_knowledge_is_power_scenario() {
        let t0 = Instant::now();
        let target = "Knowledge is power.";
        let mut session = Session::new(target.into());

        let last = type_all(&mut session, target, t0, ms(100));
        assert_eq!(last, Transition::Completed);

        let m = session.metrics();
        assert_eq!(m.correct_chars, target.chars().count());
        assert_eq!(m.total_chars, target.chars().count());
        assert_eq!(m.accuracy, 100.0);
        assert_eq!(m.elapsed, ms(100) * (target.chars().count() as u32 - 1));
    }

    #[test]
    fn test_overflow_lowers_accuracy_only() {
        let t0 = Instant::now();
        let mut session = Session::new("abc".into());
        session.apply(SessionEvent::Edit("abxd".into()), t0);

        assert!(!session.is_complete());
        let m = session.metrics();
        assert_eq!(m.correct_chars, 2);
        assert_eq!(m.total_chars, 4);
        assert_eq!(m.accuracy, 50.0);
    }

    #[test]
    fn test_wpm_from_final_elapsed() {
        let t0 = Instant::now();
        let mut session = Session::new("hello world".into());
        session.apply(SessionEvent::Edit("h".into()), t0);
        session.apply(SessionEvent::Edit("hello world".into()), t0 + ms(6_000));

        // 11 correct chars over 0.1 minutes
        let wpm = session.metrics().wpm;
        assert!((wpm - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Idle.to_string(), "Idle");
        assert_eq!(Phase::Complete.to_string(), "Complete");
    }
}
