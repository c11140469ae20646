use crate::models::ExportRow;

pub const HEADER: [&str; 4] = ["index", "timestamp_seconds", "role", "pgy_year"];

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_row(row: &ExportRow) -> String {
    let fields = [
        row.index.to_string(),
        row.formatted_timestamp(),
        row.role.as_str().to_string(),
        row.pgy_year.map(|y| y.to_string()).unwrap_or_default(),
    ];
    fields
        .iter()
        .map(|field| csv_escape(field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders the header plus one line per mark, each terminated by `\n`.
pub fn render(rows: &[ExportRow]) -> String {
    let mut out = String::with_capacity(32 * (rows.len() + 1));
    out.push_str(&HEADER.join(","));
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}
