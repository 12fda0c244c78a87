use std::path::PathBuf;

/// Failure of an atomic write.
///
/// Whatever the variant, the destination still holds its previous content
/// (or is still absent). A temporary file created before the failure is
/// removed on a best-effort basis; a failed removal is only logged.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("invalid destination path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("temporary file tag '{0}' must not contain path separators")]
    InvalidTag(String),

    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create temporary file {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write temporary file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace {}", .path.display())]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "refusing to replace {}: size changed from {old} to {new} bytes (limit {limit}%)",
        .path.display()
    )]
    SizeChange {
        path: PathBuf,
        old: u64,
        new: u64,
        limit: u32,
    },
}

impl WriteError {
    /// The underlying I/O error, if the failure came from the filesystem.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            Self::CreateDir { source, .. }
            | Self::Create { source, .. }
            | Self::Write { source, .. }
            | Self::Commit { source, .. } => Some(source),
            Self::InvalidPath(_) | Self::InvalidTag(_) | Self::SizeChange { .. } => None,
        }
    }
}
