//! Table rendering data
//!
//! Turns the current page into header labels and formatted rows. Widths
//! are measured with `unicode-width` so CJK titles truncate correctly.

use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::record::{Field, Record, RecordId};
use crate::selection::Selection;
use crate::sort::SortState;
use crate::store::RecordStore;

/// One column header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Column
    pub field: Field,
    /// Header text including the sort glyph when active
    pub label: String,
    /// Sort glyph, when this is the active sort column
    pub indicator: Option<char>,
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Record behind the row (the click target)
    pub id: RecordId,
    /// Cell text in column order
    pub cells: Vec<String>,
    /// Whether the row is the focused record
    pub selected: bool,
}

/// Column headers with the active sort glyph appended
pub fn headers(sort: &SortState) -> Vec<Header> {
    Field::ALL
        .iter()
        .map(|&field| {
            let indicator = sort.indicator(field);
            let label = match indicator {
                Some(glyph) => format!("{} {glyph}", field.header()),
                None => field.header().to_string(),
            };
            Header {
                field,
                label,
                indicator,
            }
        })
        .collect()
}

/// Format rows for a page of handles
///
/// Handles that do not resolve in `store` are skipped.
pub fn rows(
    store: &RecordStore,
    ids: &[RecordId],
    selection: &Selection,
    cell_width: usize,
) -> Vec<TableRow> {
    ids.iter()
        .filter_map(|&id| {
            let record = store.get(id)?;
            Some(TableRow {
                id,
                cells: format_row(record, cell_width),
                selected: selection.is_selected(id),
            })
        })
        .collect()
}

/// Format every column of a record
pub fn format_row(record: &Record, cell_width: usize) -> Vec<String> {
    Field::ALL
        .iter()
        .map(|&field| format_cell(record, field, cell_width))
        .collect()
}

/// Format one cell; missing numbers render as an empty cell
pub fn format_cell(record: &Record, field: Field, cell_width: usize) -> String {
    truncate_cell(&record.value(field).to_string(), cell_width)
}

/// Display width of a string in terminal columns
#[inline]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to at most `max_width` columns, marking the cut with `..`
pub fn truncate_cell(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width < 3 {
        return take_width(s, max_width);
    }
    let mut result = take_width(s, max_width - 2);
    result.push_str("..");
    result
}

fn take_width(s: &str, budget: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= budget
        })
        .collect()
}
