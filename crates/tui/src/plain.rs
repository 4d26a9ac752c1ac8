//! Plain-text rendering of a waiting step payload for non-interactive output.

use chrono::{DateTime, Utc};
use peerwait_types::WaitingStepDetails;
use peerwait_util::Translator;
use unicode_width::UnicodeWidthStr;

use crate::ui::components::waiting_step_list::display_cells;
use crate::ui::labels;

const COLUMN_GAP: &str = "  ";

/// Render the step summary followed by an aligned learner table.
///
/// Column widths follow the widest cell (by display width) in each column;
/// an empty list renders the "no learners" notice instead of a body.
pub fn render_plain_table(details: &WaitingStepDetails, translator: &dyn Translator, now: DateTime<Utc>) -> String {
    let headers: Vec<String> = labels::COLUMNS.iter().map(|key| translator.translate(key)).collect();
    let rows: Vec<[String; 6]> = details.student_data.iter().map(|row| display_cells(row, now)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|header| header.width()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    if !details.display_name.is_empty() {
        out.push_str(&details.display_name);
        out.push('\n');
    }
    out.push_str(&format!(
        "{}: {}   {}: {}\n\n",
        translator.translate(labels::MUST_GRADE),
        details.must_grade,
        translator.translate(labels::MUST_BE_GRADED_BY),
        details.must_be_graded_by,
    ));

    push_line(&mut out, headers.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);

    if rows.is_empty() {
        out.push_str(&translator.translate(labels::NO_LEARNERS));
        out.push('\n');
    }
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (index, (cell, width)) in cells.zip(widths).enumerate() {
        if index > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
