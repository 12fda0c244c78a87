pub mod errors;

pub use errors::{catches, classify, definitions, CategoryDef, ErrorCategory, SyncError};
