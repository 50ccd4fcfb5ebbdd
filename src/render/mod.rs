//! Report rendering: markdown tables and colored console sections.
//!
//! Consumes the collector's structured output only; nothing in here feeds
//! back into classification or resolution.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::collect::CollectReport;

/// A width-aligned markdown table.
#[derive(Debug, Default)]
pub struct MarkdownTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header cells.
    pub fn with_header(mut self, header: &[&str]) -> Self {
        self.header = header.iter().map(|h| h.to_string()).collect();
        self
    }

    /// Appends a row.
    pub fn with_row(mut self, row: &[&str]) -> Self {
        self.rows.push(row.iter().map(|c| c.to_string()).collect());
        self
    }

    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    fn column_width(&self, index: usize) -> usize {
        let header_width = self.header.get(index).map_or(1, String::len);
        self.rows
            .iter()
            .map(|row| row.get(index).map_or(0, String::len))
            .chain(std::iter::once(header_width))
            .max()
            .unwrap_or(1)
            .max(1)
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, row: &[String]) -> fmt::Result {
        let cols = self.column_count();
        write!(f, " ")?;
        for (i, width) in (0..cols).map(|i| (i, self.column_width(i))) {
            let empty = String::new();
            let cell = row.get(i).unwrap_or(&empty);
            write!(f, "{cell:<width$}")?;
            if i + 1 < cols {
                write!(f, " | ")?;
            }
        }
        writeln!(f, " ")
    }
}

impl fmt::Display for MarkdownTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.column_count();
        if cols == 0 {
            return Ok(());
        }

        if !self.header.is_empty() {
            self.write_row(f, &self.header)?;
        }

        // Separator line, dashes spanning each padded column.
        write!(f, " ")?;
        for i in 0..cols {
            let width = self.column_width(i);
            write!(f, "{}", "-".repeat(width))?;
            if i + 1 < cols {
                write!(f, "-|-")?;
            }
        }
        writeln!(f, " ")?;

        for row in &self.rows {
            self.write_row(f, row)?;
        }

        Ok(())
    }
}

/// Prints the three report sections (included, skipped, diagnostics) to
/// stdout, colored when the stream supports it.
pub fn print_report(report: &CollectReport) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    let mut included = MarkdownTable::new().with_header(&[
        "PR",
        "Author/Approvers",
        "Comments",
        "Validation status",
    ]);
    for commit in &report.included {
        let link = format!("[{}]({})", commit.title, commit.url);
        let mut people = commit.author.clone();
        if !commit.approvers.is_empty() {
            people.push_str(" / ");
            people.push_str(&commit.approvers.join(", "));
        }
        included = included.with_row(&[link.as_str(), people.as_str(), "", ""]);
    }

    write_colored(&mut stdout, Color::Yellow, "-----")?;
    writeln!(&mut stdout)?;
    write_colored(&mut stdout, Color::Green, &included.to_string())?;
    writeln!(&mut stdout)?;
    write_colored(&mut stdout, Color::Yellow, "-----")?;
    writeln!(&mut stdout)?;

    let mut skipped = MarkdownTable::new().with_header(&["Reason", "Title"]);
    for commit in &report.skipped {
        skipped = skipped.with_row(&[commit.reason.as_str(), commit.title.as_str()]);
    }

    write_colored(&mut stdout, Color::Red, "Commits that were skipped:")?;
    write_colored(&mut stdout, Color::Red, &skipped.to_string())?;

    if !report.diagnostics.is_empty() {
        writeln!(&mut stdout)?;
        write_colored(&mut stdout, Color::Yellow, "Diagnostics:")?;
        for diagnostic in &report.diagnostics {
            write_colored(&mut stdout, Color::Yellow, &format!("  {diagnostic}"))?;
        }
    }

    Ok(())
}

fn write_colored(stream: &mut StandardStream, color: Color, message: &str) -> Result<()> {
    stream.set_color(ColorSpec::new().set_fg(Some(color)))?;
    writeln!(stream, "{message}")?;
    stream.reset()?;
    Ok(())
}
