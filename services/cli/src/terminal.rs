use scholar_portal::dashboard::ApplicantTable;
use scholar_portal::status::{StatusSink, StatusTone};

/// Prints status lines to stdout. Empty status lines are skipped.
#[derive(Debug, Default)]
pub(crate) struct TerminalStatusSink;

impl StatusSink for TerminalStatusSink {
    fn status(&self, message: &str, tone: StatusTone) {
        if message.is_empty() {
            return;
        }
        match tone {
            StatusTone::Error => println!("error: {message}"),
            StatusTone::Success | StatusTone::Plain => println!("{message}"),
        }
    }

    fn field_error(&self, field: &str, message: Option<&str>) {
        if let Some(message) = message {
            println!("  {field}: {message}");
        }
    }

    fn submit_enabled(&self, _enabled: bool) {}
}

pub(crate) fn render_table(table: &ApplicantTable) -> String {
    let headers = table.headers();
    let rows: Vec<Vec<&str>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.id.as_str(),
                row.first_name.as_str(),
                row.last_name.as_str(),
                row.latest_education.as_str(),
                row.status.as_str(),
                row.created.as_str(),
            ];
            if let Some(owner) = &row.owner {
                cells.push(owner.as_str());
            }
            cells
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![format_line(&headers, &widths)];
    lines.extend(rows.iter().map(|row| format_line(row, &widths)));
    lines.join("\n")
}

fn format_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
