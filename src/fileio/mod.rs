pub mod atomic;
pub mod error;

pub use atomic::{
    temp_path_for, write_lines, AtomicFile, AtomicFileWriter, WriteOptions, WriteOutcome,
    DEFAULT_TMP_TAG,
};
pub use error::WriteError;
