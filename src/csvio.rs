//! Minimal CSV reading/writing for the intermediate files.
//!
//! Quote-aware (RFC 4180 style double-quote escapes, CRLF tolerant) and
//! std-only; the intermediate format is plain comma-separated text with a
//! header row. Writes used for checkpoint state go through
//! [`write_rows_atomic`] so a crash mid-write never leaves a truncated file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::mem::take;
use std::path::Path;

/// Parse CSV text into rows of fields.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row: Vec<String> = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row without a final newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Serialize a header row plus data rows into a single CSV string.
pub fn rows_to_string(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let _ = write_row(&mut buf, headers);
    for r in rows {
        let _ = write_row(&mut buf, r);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Read a CSV file into (headers, rows).
pub fn read_file(path: &Path) -> io::Result<(Vec<String>, Vec<Vec<String>>)> {
    let text = fs::read_to_string(path)?;
    let mut rows = parse_rows(&text);
    if rows.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }
    let headers = rows.remove(0);
    Ok((headers, rows))
}

/// Write a CSV file and make the result durable before returning.
pub fn write_file(path: &Path, headers: &[String], rows: &[Vec<String>]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(rows_to_string(headers, rows).as_bytes())?;
    file.sync_all()?;
    Ok(())
}

/// Atomically replace `path` with new content: write a sibling temp file,
/// fsync it, then rename over the original. Checkpoint flushes rely on this
/// so a crash can never leave a half-written game log.
pub fn write_rows_atomic(path: &Path, headers: &[String], rows: &[Vec<String>]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("csv.tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(rows_to_string(headers, rows).as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
