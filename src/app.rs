use crate::config::Config;
use crate::error::Result;
use crate::pool::{FixedSentence, SentencePool, SentenceSource};
use crate::session::{Session, SessionEvent, TargetSentence, Transition};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::info;

/// The running trainer: one session plus where its sentences come from.
pub struct App {
    pub session: Session,
    source: Box<dyn SentenceSource>,
    pub should_quit: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .field("should_quit", &self.should_quit)
            .finish()
    }
}

impl App {
    pub fn new(mut source: Box<dyn SentenceSource>, tick_rate: Duration) -> Self {
        let target = source.draw();
        Self {
            session: Session::with_tick_rate(target, tick_rate),
            source,
            should_quit: false,
        }
    }

    /// Pick the sentence source: a fixed prompt, a custom file, or an embedded pool.
    pub fn from_config(cfg: &Config, prompt: Option<String>) -> Result<Self> {
        let source: Box<dyn SentenceSource> = match (prompt, &cfg.sentences_file) {
            (Some(prompt), _) => Box::new(FixedSentence(TargetSentence::new(prompt))),
            (None, Some(path)) => Box::new(SentencePool::from_file(path)?),
            (None, None) => Box::new(SentencePool::embedded(&cfg.pool)?),
        };
        Ok(Self::new(source, Duration::from_millis(cfg.tick_rate_ms)))
    }

    pub fn edit(&mut self, typed: String, now: Instant) -> Transition {
        self.session.apply(SessionEvent::Edit(typed), now)
    }

    pub fn on_tick(&mut self, now: Instant) -> Transition {
        self.session.apply(SessionEvent::Tick, now)
    }

    /// Start over on the same sentence
    pub fn reset(&mut self, now: Instant) -> Transition {
        self.session.apply(SessionEvent::Reset, now)
    }

    /// Start over on a freshly drawn sentence
    pub fn try_another(&mut self, now: Instant) -> Transition {
        let target = self.source.draw();
        info!(sentence = %target, "new sentence");
        self.session.apply(SessionEvent::Replace(target), now)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Transition {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Char('c') if ctrl => self.quit(),
            KeyCode::Left => self.reset(now),
            KeyCode::Right => self.try_another(now),
            KeyCode::Char('r') if self.session.is_complete() => self.reset(now),
            KeyCode::Char('n') if self.session.is_complete() => self.try_another(now),
            KeyCode::Char('w') | KeyCode::Backspace if ctrl => {
                let typed = delete_last_word(self.session.typed());
                self.edit(typed, now)
            }
            KeyCode::Backspace => {
                let mut typed = self.session.typed().to_string();
                typed.pop();
                self.edit(typed, now)
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                let mut typed = self.session.typed().to_string();
                typed.push(c);
                self.edit(typed, now)
            }
            _ => Transition::Unchanged,
        }
    }

    fn quit(&mut self) -> Transition {
        self.should_quit = true;
        Transition::Unchanged
    }
}

/// Drop the trailing word along with any whitespace after it.
fn delete_last_word(typed: &str) -> String {
    let trimmed = typed.trim_end();
    let cut = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(idx, c)| idx + c.len_utf8())
        .unwrap_or(0);

    trimmed[..cut].to_string()
}
