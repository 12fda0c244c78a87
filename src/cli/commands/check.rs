use crate::cli::Output;
use crate::sync::{ErrorCategory, SyncError};
use anyhow::Result;
use std::process::ExitCode;

pub fn run(category: &str, ancestor: &str) -> Result<ExitCode> {
    if is_descendant(category, ancestor)? {
        Output::success(&format!("{category} is a {ancestor}"));
        Ok(ExitCode::SUCCESS)
    } else {
        Output::warning(&format!("{category} is not a {ancestor}"));
        Ok(ExitCode::FAILURE)
    }
}

fn is_descendant(category: &str, ancestor: &str) -> Result<bool> {
    Ok(lookup(category)?.is_a(lookup(ancestor)?))
}

fn lookup(name: &str) -> Result<ErrorCategory> {
    ErrorCategory::from_name(name).ok_or_else(|| {
        SyncError::programming()
            .with_detail(format!("unknown error category '{name}'"))
            .into()
    })
}
