//! Logging setup and run timing.

mod logging;
mod timing;

pub use logging::{init_logging, LogFormat};
pub use timing::RunTimer;
