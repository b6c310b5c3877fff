//! Observability
//!
//! - Structured logging (JSON lines)
//! - Typed domain events
//! - Operation timing
//!
//! Logging is read-only and synchronous; a failed write is ignored and never
//! affects validation or persistence.
//!
//! ```ignore
//! use docfields::observability::{Event, Logger, Severity, Timer};
//!
//! Logger::set_min_severity(Severity::Info);
//! let timer = Timer::new();
//! Event::DocumentInsert.log(&[("collection", "users"), ("duration_ms", &timer.elapsed_ms())]);
//! ```

mod events;
mod logger;
mod timer;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use timer::Timer;
