//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Lexis CLI.

use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the Lexis banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}\n   {}\n",
                "LEXIS".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed(),
                "Legal document analysis".bright_white()
            );
        } else {
            println!(
                "\n   LEXIS v{}\n   Legal document analysis\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "›".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print a table sized to its widest cell per column.
    pub fn table(&self, columns: &[&str], rows: &[Vec<String>]) {
        let widths = column_widths(columns, rows);
        let header = render_row(columns, &widths);
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(rule_len).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(rule_len));
        }

        for row in rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            println!("    {}", render_row(&cells, &widths));
        }
    }

    /// Print an empty-state line for a list with no entries
    pub fn empty(&self, what: &str) {
        if self.colored {
            println!("    {}", format!("No {} found", what).dimmed());
        } else {
            println!("    No {} found", what);
        }
    }

    /// Risk score colored by band: below 40 low, below 70 medium, else high
    pub fn risk(&self, score: Option<&str>) -> String {
        let Some(raw) = score else {
            return "N/A".to_string();
        };
        if !self.colored {
            return raw.to_string();
        }
        match raw.trim().parse::<f64>() {
            Ok(value) if value < 40.0 => raw.green().to_string(),
            Ok(value) if value < 70.0 => raw.yellow().to_string(),
            Ok(_) => raw.red().bold().to_string(),
            Err(_) => raw.to_string(),
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn column_widths(columns: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_new() {
        let output = Output::new();
        assert!(output.colored);
    }

    #[test]
    fn test_output_no_color() {
        let output = Output::no_color();
        assert!(!output.colored);
    }

    #[test]
    fn test_column_widths_follow_widest_cell() {
        let rows = vec![
            vec!["1".to_string(), "Master Services Agreement".to_string()],
            vec!["12".to_string(), "NDA".to_string()],
        ];
        assert_eq!(column_widths(&["ID", "Title"], &rows), vec![2, 25]);
        assert_eq!(column_widths(&["ID", "Title"], &[]), vec![2, 5]);
    }

    #[test]
    fn test_risk_plain_when_uncolored() {
        let output = Output::no_color();
        assert_eq!(output.risk(Some("72.5")), "72.5");
        assert_eq!(output.risk(None), "N/A");
    }

    #[test]
    fn test_output_methods_no_panic() {
        let output = Output::no_color();

        output.banner();
        output.success("test success");
        output.info("test info");
        output.warning("test warning");
        output.error("test error");
        output.created("file", "lexis.toml");
        output.skipped("lexis.toml", "already exists");
        output.header("Documents");
        output.subheader("Comments");
        output.kv("key", "value");
        output.list_item("item");
        output.hint("hint message");
        output.command("lexis login");
        output.table(&["ID", "Title"], &[vec!["1".to_string()]]);
        output.empty("documents");
        output.newline();
    }
}
