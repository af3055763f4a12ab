use std::io::Write;

use consign::{PageNumber, PageResult, Resource};
use serde_json::Value;

use crate::error::AdminError;

/// Write one page of records as TSV, header first.
pub fn write_page<R: Resource, W: Write>(
    page: &PageResult<R>,
    writer: &mut W,
) -> Result<(), AdminError> {
    let mut buf = String::new();
    let header: Vec<&str> = R::columns().iter().map(|c| c.key).collect();
    buf.push_str(&header.join("\t"));
    buf.push('\n');
    writer.write_all(buf.as_bytes())?;

    for item in &page.items {
        buf.clear();
        for (i, cell) in item.cells().iter().enumerate() {
            if i > 0 {
                buf.push('\t');
            }
            push_field(&mut buf, cell);
        }
        buf.push('\n');
        writer.write_all(buf.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write raw server records as JSON lines.
pub fn write_json_lines<W: Write>(records: &[Value], writer: &mut W) -> Result<(), AdminError> {
    let mut buf = String::new();
    for record in records {
        buf.clear();
        buf.push_str(&serde_json::to_string(record)?);
        buf.push('\n');
        writer.write_all(buf.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a single record as aligned `label  value` lines.
pub fn write_detail<R: Resource, W: Write>(record: &R, writer: &mut W) -> Result<(), AdminError> {
    let fields = record.detail();
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in fields {
        writeln!(writer, "{label:<width$}  {value}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a raw server record as pretty JSON.
pub fn write_json<W: Write>(record: &Value, writer: &mut W) -> Result<(), AdminError> {
    serde_json::to_writer_pretty(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// `page 2/3 (25 total)`
pub fn page_summary<T>(current: PageNumber, page: &PageResult<T>) -> String {
    format!(
        "page {}/{} ({} total)",
        current,
        page.total_pages.max(1),
        page.total_count
    )
}

/// Tabs and newlines would break the row structure.
fn push_field(buf: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\t' | '\n' | '\r' => buf.push(' '),
            _ => buf.push(ch),
        }
    }
}
