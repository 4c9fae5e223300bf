// Plain-text rendering.
// Turns a view model into lines for the one-shot CLI commands.

use super::{ViewBody, ViewModel};

/// Render a view as plain lines. Hidden slots produce no output.
pub fn to_lines(view: &ViewModel) -> Vec<String> {
    let mut lines = vec![view.title.to_string()];

    match &view.body {
        ViewBody::Empty { message } => lines.push(message.clone()),
        ViewBody::Error { message } => lines.push(format!("Error: {}", message)),
        ViewBody::Rows(rows) => {
            let width = rows.iter().map(|r| r.rank_text.len()).max().unwrap_or(1);
            lines.extend(
                rows.iter()
                    .map(|row| format!("{:>width$}  {}", row.rank_text, row.keyword)),
            );
        }
    }

    if let Some(label) = &view.updated_label {
        lines.push(format!("Updated: {}", label));
    }

    lines
}
