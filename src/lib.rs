pub mod cli;
pub mod config;
pub mod fileio;
pub mod sync;

pub use config::Config;
pub use fileio::{write_lines, AtomicFileWriter, WriteError, WriteOptions, WriteOutcome};
pub use sync::{ErrorCategory, SyncError};
