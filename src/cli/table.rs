//! Table formatting utilities for CLI list commands
//!
//! Every list command builds [`TableRow`]s of typed [`CellValue`]s and hands
//! them to a [`TableFormatter`], which renders a styled table for humans or
//! plain tab-separated lines for piping.

use chrono::{DateTime, Local, NaiveDate, Utc};
use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::core::entity::Priority;
use crate::core::sla::SlaStatus;

/// Widest a text cell gets in table output
const MAX_TEXT_WIDTH: usize = 40;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Positional short reference (e.g. "TKT@1")
    ShortId(String),
    /// Plain text, truncated in tables
    Text(String),
    /// Workflow status; colour picked from the status name
    Status(String),
    /// Priority with color coding
    Priority(Priority),
    /// SLA standing with color coding
    Sla(SlaStatus),
    /// Calendar date
    Date(Option<NaiveDate>),
    /// Timestamp displayed in local time
    DateTime(DateTime<Utc>),
    /// Currency amount
    Money(f64),
    Number(i64),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Plain value with no styling, for TSV output
    pub fn raw(&self) -> String {
        match self {
            CellValue::ShortId(s) | CellValue::Text(s) | CellValue::Status(s) => s.clone(),
            CellValue::Priority(p) => p.to_string(),
            CellValue::Sla(s) => s.to_string(),
            CellValue::Date(d) => d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                local.format("%Y-%m-%dT%H:%M:%S").to_string()
            }
            CellValue::Money(m) => format!("{:.2}", m),
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Styled value for the human-readable table
    pub fn display(&self) -> String {
        match self {
            CellValue::ShortId(s) => style(s).cyan().to_string(),
            CellValue::Text(s) => truncate_str(s, MAX_TEXT_WIDTH),
            CellValue::Status(s) => {
                let styled = match s.as_str() {
                    "open" | "draft" | "pending" => style(s).white(),
                    "in_progress" | "scheduled" | "sent" | "submitted" | "quoted" => {
                        style(s).yellow()
                    }
                    "on_hold" | "pending_approval" | "maintenance" => style(s).magenta(),
                    "resolved" | "completed" | "approved" | "awarded" | "accepted"
                    | "received" | "operational" => style(s).green(),
                    "cancelled" | "rejected" | "offline" | "decommissioned" => style(s).red(),
                    _ => style(s).dim(),
                };
                styled.to_string()
            }
            CellValue::Priority(p) => {
                let s = p.to_string();
                let styled = match p {
                    Priority::Low => style(s).dim(),
                    Priority::Medium => style(s).white(),
                    Priority::High => style(s).yellow(),
                    Priority::Critical => style(s).red().bold(),
                };
                styled.to_string()
            }
            CellValue::Sla(s) => {
                let styled = match s {
                    SlaStatus::Ok => style(s.to_string()).green(),
                    SlaStatus::Warning => style(s.to_string()).yellow(),
                    SlaStatus::Overdue => style(s.to_string()).red().bold(),
                };
                styled.to_string()
            }
            CellValue::Date(None) | CellValue::Empty => style("-").dim().to_string(),
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                local.format("%Y-%m-%d %H:%M").to_string()
            }
            CellValue::Money(m) => format!("${:.2}", m),
            CellValue::Date(Some(_)) | CellValue::Number(_) => self.raw(),
        }
    }
}

/// Column definition with lookup key and header label
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str) -> Self {
        Self { key, header }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    pub short_id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(short_id: String) -> Self {
        Self {
            short_id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    entity_prefix: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(
        columns: &'a [ColumnDef],
        entity_name: &'static str,
        entity_prefix: &'static str,
    ) -> Self {
        Self {
            columns,
            entity_name,
            entity_prefix,
            show_summary: true,
        }
    }

    /// Suppress the "N thing(s) found" line
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.show_summary = !quiet;
        self
    }

    /// Output rows in the specified format. JSON is handled by the caller,
    /// which serializes the entities themselves.
    pub fn output<I>(&self, rows: I, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();
        match format {
            OutputFormat::Tsv => print!("{}", self.render_tsv(&rows)),
            _ => self.output_table(&rows),
        }
    }

    fn output_table(&self, rows: &[TableRow]) {
        if rows.is_empty() {
            println!("No {}s found.", self.entity_name);
            return;
        }

        println!("{}", self.render_table(rows));

        if self.show_summary {
            println!();
            println!(
                "{} {}(s) found. Use {} to reference by short ID.",
                style(rows.len()).cyan(),
                self.entity_name,
                style(format!("{}@N", self.entity_prefix)).cyan()
            );
        }
    }

    fn render_table(&self, rows: &[TableRow]) -> String {
        let mut builder = Builder::default();

        let mut header = vec![style("SHORT").bold().dim().to_string()];
        header.extend(self.columns.iter().map(|c| style(c.header).bold().to_string()));
        builder.push_record(header);

        for row in rows {
            let mut record = vec![style(&row.short_id).cyan().to_string()];
            record.extend(self.columns.iter().map(|c| {
                row.get(c.key)
                    .map_or_else(|| CellValue::Empty.display(), CellValue::display)
            }));
            builder.push_record(record);
        }

        builder.build().with(Style::sharp()).to_string()
    }

    /// Header line then one line per row, tab-separated, no styling
    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let mut header = vec!["short"];
        header.extend(self.columns.iter().map(|c| c.key));
        out.push_str(&header.join("\t"));
        out.push('\n');

        for row in rows {
            let mut fields = vec![row.short_id.clone()];
            fields.extend(
                self.columns
                    .iter()
                    .map(|c| row.get(c.key).map(CellValue::raw).unwrap_or_default()),
            );
            out.push_str(&fields.join("\t"));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("title", "TITLE"),
        ColumnDef::new("due", "DUE"),
    ];

    #[test]
    fn test_tsv_is_plain_and_ordered() {
        let rows = vec![
            TableRow::new("TKT@1".to_string())
                .cell("title", CellValue::Text("Leak".to_string()))
                .cell("due", CellValue::Date(NaiveDate::from_ymd_opt(2024, 5, 1))),
            TableRow::new("TKT@2".to_string()).cell("title", CellValue::Text("Badge".to_string())),
        ];
        let out = TableFormatter::new(COLUMNS, "ticket", "TKT").render_tsv(&rows);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "short\ttitle\tdue");
        assert_eq!(lines[1], "TKT@1\tLeak\t2024-05-01");
        assert_eq!(lines[2], "TKT@2\tBadge\t");
    }

    #[test]
    fn test_raw_values() {
        assert_eq!(CellValue::Money(12.5).raw(), "12.50");
        assert_eq!(CellValue::Priority(Priority::High).raw(), "high");
        assert_eq!(CellValue::Sla(SlaStatus::Overdue).raw(), "overdue");
        assert_eq!(CellValue::Date(None).raw(), "");
    }
}
