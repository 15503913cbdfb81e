//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Warn about incomplete HMRC settings
//!
//! Shutdown (shutdown.rs):
//!     Trigger → all subscribers stop
//!
//! Signals (signals.rs):
//!     Ctrl+C or shutdown broadcast → graceful server stop
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
