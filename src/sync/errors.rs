//! Failure categories for synchronization and export jobs.
//!
//! Categories form a small DAG rooted at [`ErrorCategory::Sync`] and
//! [`ErrorCategory::Programming`]. A handler scoped to a category also
//! matches every category below it, so code catching `SyncError` sees
//! `LoginError` too. The taxonomy only names failures; retry or abort
//! decisions stay at the catch site.

use serde::{Serialize, Serializer};
use std::fmt;

use ErrorCategory as C;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Sync,
    Server,
    Login,
    NotSupported,
    NotPosix,
    WrongMode,
    Programming,
}

/// Static definition of one category.
#[derive(Debug, Serialize)]
pub struct CategoryDef {
    #[serde(skip)]
    pub category: ErrorCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub parents: &'static [ErrorCategory],
    /// Every category this one is-a, itself included.
    #[serde(skip)]
    ancestors: &'static [ErrorCategory],
}

static DEFINITIONS: [CategoryDef; 7] = [
    CategoryDef {
        category: C::Sync,
        name: "SyncError",
        description: "Generic error raised by a synchronization operation.",
        parents: &[],
        ancestors: &[C::Sync],
    },
    CategoryDef {
        category: C::Server,
        name: "ServerError",
        description: "The remote server reported an error.",
        parents: &[C::Sync],
        ancestors: &[C::Server, C::Sync],
    },
    CategoryDef {
        category: C::Login,
        name: "LoginError",
        description: "Could not log in to the remote server.",
        parents: &[C::Server],
        ancestors: &[C::Login, C::Server, C::Sync],
    },
    CategoryDef {
        category: C::NotSupported,
        name: "NotSupportedError",
        description: "The object is not supported by the target system.",
        parents: &[C::Sync],
        ancestors: &[C::NotSupported, C::Sync],
    },
    CategoryDef {
        category: C::NotPosix,
        name: "NotPosixError",
        description: "The object has no POSIX data and cannot be exported.",
        parents: &[C::NotSupported],
        ancestors: &[C::NotPosix, C::NotSupported, C::Sync],
    },
    CategoryDef {
        category: C::WrongMode,
        name: "WrongModeError",
        description: "The operation is not allowed in the current sync mode.",
        parents: &[C::Sync, C::Programming],
        ancestors: &[C::WrongMode, C::Sync, C::Programming],
    },
    CategoryDef {
        category: C::Programming,
        name: "ProgrammingError",
        description: "The caller used the API incorrectly.",
        parents: &[],
        ancestors: &[C::Programming],
    },
];

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 7] = [
        C::Sync,
        C::Server,
        C::Login,
        C::NotSupported,
        C::NotPosix,
        C::WrongMode,
        C::Programming,
    ];

    pub fn definition(self) -> &'static CategoryDef {
        // DEFINITIONS is declared in the same order as ALL.
        &DEFINITIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn description(self) -> &'static str {
        self.definition().description
    }

    pub fn parents(self) -> &'static [ErrorCategory] {
        self.definition().parents
    }

    pub fn ancestors(self) -> &'static [ErrorCategory] {
        self.definition().ancestors
    }

    /// True if `self` is `ancestor` or descends from it.
    pub fn is_a(self, ancestor: ErrorCategory) -> bool {
        self.ancestors().contains(&ancestor)
    }

    /// Look up a category by its stable name, e.g. `"LoginError"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ErrorCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// An error tagged with a category, optionally with extra detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncError {
    category: ErrorCategory,
    detail: Option<String>,
}

impl SyncError {
    pub fn new(category: ErrorCategory) -> Self {
        Self {
            category,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn sync() -> Self {
        Self::new(C::Sync)
    }

    pub fn server() -> Self {
        Self::new(C::Server)
    }

    pub fn login() -> Self {
        Self::new(C::Login)
    }

    pub fn not_supported() -> Self {
        Self::new(C::NotSupported)
    }

    pub fn not_posix() -> Self {
        Self::new(C::NotPosix)
    }

    pub fn wrong_mode() -> Self {
        Self::new(C::WrongMode)
    }

    pub fn programming() -> Self {
        Self::new(C::Programming)
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn description(&self) -> &'static str {
        self.category.description()
    }

    /// True if a handler scoped to `ancestor` should catch this error.
    pub fn is(&self, ancestor: ErrorCategory) -> bool {
        self.category.is_a(ancestor)
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.detail.as_deref().unwrap_or(self.description());
        write!(f, "{}: {}", self.category.name(), message)
    }
}

impl std::error::Error for SyncError {}

impl From<ErrorCategory> for SyncError {
    fn from(category: ErrorCategory) -> Self {
        Self::new(category)
    }
}

/// Category of the first [`SyncError`] in `err`'s source chain.
pub fn classify(err: &anyhow::Error) -> Option<ErrorCategory> {
    err.chain()
        .find_map(|e| e.downcast_ref::<SyncError>())
        .map(SyncError::category)
}

/// True if a handler scoped to `ancestor` would catch `err`.
pub fn catches(err: &anyhow::Error, ancestor: ErrorCategory) -> bool {
    classify(err).is_some_and(|c| c.is_a(ancestor))
}

pub fn definitions() -> &'static [CategoryDef] {
    &DEFINITIONS
}
