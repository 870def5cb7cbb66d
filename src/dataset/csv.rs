use std::collections::HashMap;

use log::debug;

use crate::model::Member;

use super::DatasetError;

/// Splits delimited text into records. Handles quoted fields with embedded
/// commas, doubled quotes and line breaks; blank lines are skipped.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if record.iter().all(|f| f.trim().is_empty()) {
        return;
    }
    records.push(record);
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reads a member table with a header row. Columns are matched by name;
/// the `name` and `color1_name` columns are required, though their cells may
/// be blank. Without an `id` column the name doubles as the id.
pub fn parse_members(source: &str, text: &str) -> Result<Vec<Member>, DatasetError> {
    let csv_err = |line: usize, message: String| DatasetError::Csv {
        source_name: source.to_string(),
        line,
        message,
    };
    let mut records = parse_records(text)
        .map_err(|message| csv_err(0, message))?
        .into_iter();
    let header = match records.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };
    let columns: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_string(), i))
        .collect();
    for required in ["name", "color1_name"] {
        if !columns.contains_key(required) {
            return Err(csv_err(1, format!("missing required column '{required}'")));
        }
    }

    let mut out = Vec::new();
    for (idx, row) in records.enumerate() {
        let line = idx + 2;
        let cell = |name: &str| columns.get(name).and_then(|i| row.get(*i));
        // Blank cells are kept; an empty color renders as the placeholder.
        let name = non_empty(cell("name")).unwrap_or_default();
        let color1_name = non_empty(cell("color1_name")).unwrap_or_default();
        if name.is_empty() || color1_name.is_empty() {
            debug!("event=csv_blank_cell module=dataset source={source} line={line}");
        }
        out.push(Member {
            id: non_empty(cell("id")).unwrap_or_else(|| name.clone()),
            name,
            gen: non_empty(cell("gen")),
            color1_name,
            color2_name: non_empty(cell("color2_name")),
            icon: non_empty(cell("icon")),
            profile_url: non_empty(cell("profile_url")),
            active: cell("active").map(|v| parse_flag(v)),
        });
    }
    Ok(out)
}
