use colored::Colorize;
use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}";
const PROGRESS_CHARS: &str = "#>-";

/// Display utilities for the CLI interface
pub struct DisplayHelper {
    pub use_color: bool,
    pub terminal: Term,
}

impl DisplayHelper {
    /// Create a new DisplayHelper
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            terminal: Term::stderr(),
        }
    }

    /// Colour only when requested and stdout is a terminal
    pub fn detect(no_color: bool) -> Self {
        Self::new(!no_color && Term::stdout().is_term())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "✓".green().bold(), message);
        } else {
            println!("[SUCCESS] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "⚠".yellow().bold(), message);
        } else {
            eprintln!("[WARNING] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "::".blue().bold(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Format a file path with appropriate styling
    pub fn format_path(&self, path: &str) -> String {
        if self.use_color {
            path.cyan().to_string()
        } else {
            format!("'{}'", path)
        }
    }

    /// Format a repository name with appropriate styling
    pub fn format_repo(&self, repo: &str) -> String {
        if self.use_color {
            repo.cyan().bold().to_string()
        } else {
            repo.to_string()
        }
    }

    /// Progress bar on stderr; hidden unless stderr is an interactive terminal
    pub fn create_progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        if !(self.use_color && self.terminal.is_term()) {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }

        let pb = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            pb.set_style(style.progress_chars(PROGRESS_CHARS));
        }
        pb.set_message(message.to_string());
        pb
    }

    /// Print a table-like structure
    pub fn print_table(&self, headers: &[&str], rows: &[Vec<String>]) {
        print!("{}", self.format_table(headers, rows));
    }

    /// Lay out `rows` under `headers` in aligned columns
    pub fn format_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let mut col_widths = headers.iter().map(|h| h.len()).collect::<Vec<_>>();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < col_widths.len() {
                    col_widths[i] = col_widths[i].max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        let header_cells: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let cell = format!("{:<width$}", header, width = col_widths[i]);
                if self.use_color {
                    cell.bold().to_string()
                } else {
                    cell
                }
            })
            .collect();
        out.push_str(header_cells.join("  ").trim_end());
        out.push('\n');

        let rule = if self.use_color { "─" } else { "-" };
        let separators: Vec<String> = col_widths.iter().map(|&w| rule.repeat(w)).collect();
        out.push_str(&separators.join("  "));
        out.push('\n');

        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let width = col_widths.get(i).copied().unwrap_or(0);
                    format!("{:<width$}", cell, width = width)
                })
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}
