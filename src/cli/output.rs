use owo_colors::OwoColorize;

/// Status lines for the CLI. Failures go to stderr so stdout stays pipeable.
pub struct Output;

impl Output {
    pub fn success(message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue().bold(), message.bright_blue());
    }

    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Secondary detail under a status line.
    pub fn detail(label: &str, value: &str) {
        println!("  {} {}", format!("{label}:").bright_black(), value);
    }
}
