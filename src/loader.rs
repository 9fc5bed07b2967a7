use anyhow::{Context, Result};
use memchr::memchr_iter;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Raw table straight off disk: source header names plus string fields.
/// Empty fields are already mapped to `None`.
#[derive(Debug, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Read a delimited text file into memory. The first non-empty line is the
/// header row. A missing or unreadable file is fatal.
pub fn load(path: &Path) -> Result<RawTable> {
    let file = File::open(path)
        .with_context(|| format!("cannot open input file {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file)? };
    let text = std::str::from_utf8(&mmap)
        .with_context(|| format!("input file {} is not valid UTF-8", path.display()))?;
    Ok(parse_table(text))
}

fn parse_table(text: &str) -> RawTable {
    let bytes = text.as_bytes();
    let mut table = RawTable::default();
    let mut saw_header = false;
    let mut start = 0;
    for nl in memchr_iter(b'\n', bytes) {
        consume_line(&text[start..nl], &mut table, &mut saw_header);
        start = nl + 1;
    }
    if start < text.len() {
        consume_line(&text[start..], &mut table, &mut saw_header);
    }
    table
}

fn consume_line(line: &str, table: &mut RawTable, saw_header: &mut bool) {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        return;
    }
    if *saw_header {
        table.rows.push(split_fields(line));
    } else {
        table.headers = split_fields(line)
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        *saw_header = true;
    }
}

/// Comma split with RFC 4180 double-quote escaping. The inverse of the
/// writer's `escape_csv_field`.
fn split_fields(line: &str) -> Vec<Option<String>> {
    let mut fields = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    buf.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(take_field(&mut buf)),
            _ => buf.push(c),
        }
    }
    fields.push(take_field(&mut buf));
    fields
}

fn take_field(buf: &mut String) -> Option<String> {
    let field = std::mem::take(buf);
    if field.is_empty() { None } else { Some(field) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_fields() {
        assert_eq!(
            split_fields("a,b,c"),
            vec![
                Some("a".to_string()),
                Some("b".to_string()),
                Some("c".to_string())
            ]
        );
    }

    #[test]
    fn empty_fields_become_none() {
        assert_eq!(
            split_fields("a,,c,"),
            vec![Some("a".to_string()), None, Some("c".to_string()), None]
        );
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        assert_eq!(
            split_fields(r#""Seattle, USA","say ""hi""",x"#),
            vec![
                Some("Seattle, USA".to_string()),
                Some(r#"say "hi""#.to_string()),
                Some("x".to_string())
            ]
        );
    }

    #[test]
    fn parses_header_and_rows() {
        let table = parse_table("user_id,ip_address\r\nalice,10.0.0.1\nbob,\n");
        assert_eq!(table.headers, vec!["user_id", "ip_address"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0].as_deref(), Some("alice"));
        assert_eq!(table.rows[1][1], None);
    }

    #[test]
    fn handles_missing_trailing_newline() {
        let table = parse_table("user_id\nalice");
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let table = parse_table("");
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }
}
