use crate::cli::Output;
use crate::config::Config;
use crate::fileio::{AtomicFileWriter, WriteOptions, WriteOutcome};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Command-line flags layered over the `[writer]` config section.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub max_change: Option<u32>,
    pub no_sync: bool,
    pub skip_equal: bool,
    pub create_dirs: bool,
}

impl Overrides {
    fn apply(self, mut options: WriteOptions) -> WriteOptions {
        if self.max_change.is_some() {
            options.max_change_percent = self.max_change;
        }
        if self.no_sync {
            options.sync_data = false;
        }
        if self.skip_equal {
            options.replace_equal = false;
        }
        if self.create_dirs {
            options.create_dirs = true;
        }
        options
    }
}

pub fn run(path: &Path, input: Option<&Path>, overrides: Overrides) -> Result<()> {
    let config = Config::load()?;
    let options = overrides.apply(config.writer.to_options());

    let content = read_input(input)?;
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    let writer = AtomicFileWriter::new(options);
    let outcome = writer
        .write_lines(path, &lines)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    match outcome {
        WriteOutcome::Replaced => Output::success(&format!(
            "Wrote {} line(s) to {}",
            lines.len(),
            path.display()
        )),
        WriteOutcome::Unchanged => {
            Output::info(&format!("{} unchanged", path.display()));
        }
    }
    if let Some(limit) = writer.options().max_change_percent {
        Output::detail("size guard", &format!("{limit}%"));
    }
    if !writer.options().sync_data {
        Output::detail("durability sync", "skipped");
    }
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(file) => std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_leave_config_when_unset() {
        let base = WriteOptions {
            max_change_percent: Some(30),
            ..Default::default()
        };
        assert_eq!(Overrides::default().apply(base.clone()), base);
    }

    #[test]
    fn test_overrides_win_over_config() {
        let options = Overrides {
            max_change: Some(5),
            no_sync: true,
            skip_equal: true,
            create_dirs: true,
        }
        .apply(WriteOptions::default());

        assert_eq!(options.max_change_percent, Some(5));
        assert!(!options.sync_data);
        assert!(!options.replace_equal);
        assert!(options.create_dirs);
    }
}
