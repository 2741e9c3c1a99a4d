// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pool;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod ui;

pub use app::App;
pub use error::{Error, Result};
pub use session::{Phase, Session, SessionEvent, TargetSentence, Transition};
