//! Fixed column layout of a driver tab.
//!
//! Row 1 holds [`HEADER`]. Morning and evening checks fill `A:E`, refuelings fill `G:I`,
//! and `F` stays blank between the two regions.

use chrono::NaiveDate;

use crate::domain::sheets::{
    cell_range::{CellRange, ColumnRange},
    column::Column,
    row::Row,
};

pub const HEADER: [&str; 9] = [
    "Дата",
    "Одометр",
    "Время отметки медика",
    "Время карты вставил-вытащил",
    "Гос номер автобуса",
    "",
    "Дата",
    "Одометр",
    "Литры",
];

pub const SHEET_DATE_FORMAT: &str = "%d.%m.%Y";

const COLUMN_A: Column = Column::from_index(0);
const COLUMN_E: Column = Column::from_index(4);
const COLUMN_G: Column = Column::from_index(6);
const COLUMN_I: Column = Column::from_index(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRegion {
    /// Columns `A:E`.
    DailyCheck,
    /// Columns `G:I`.
    Refueling,
}

impl EntryRegion {
    pub fn columns(&self) -> (Column, Column) {
        match self {
            EntryRegion::DailyCheck => (COLUMN_A, COLUMN_E),
            EntryRegion::Refueling => (COLUMN_G, COLUMN_I),
        }
    }

    pub fn range(&self, tab: &str, row: Row) -> CellRange {
        let (first, last) = self.columns();
        CellRange::row_span(first, last, row).with_sheet_title(tab)
    }
}

pub fn header_range(tab: &str) -> CellRange {
    CellRange::row_span(COLUMN_A, COLUMN_I, Row::from_row(1)).with_sheet_title(tab)
}

pub fn header_values() -> Vec<String> {
    HEADER.iter().map(|cell| cell.to_string()).collect()
}

/// Every column that carries data, used to locate the last occupied row.
pub fn occupied_columns(tab: &str) -> ColumnRange {
    ColumnRange::new(COLUMN_A, COLUMN_I).with_sheet_title(tab)
}

/// Row just below the last row holding any non-blank cell; row 1 for an empty tab.
///
/// Gaps above the last occupied row are never reused, so a row written only in `G:I`
/// is not picked again for a later entry.
pub fn next_free_row(rows: &[Vec<String>]) -> Row {
    rows.iter()
        .rposition(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map_or(Row::from_index(0), |last| Row::from_index(last as u32 + 1))
}

/// Whether the first row read from `occupied_columns` is blank, so the header still has to be
/// written.
pub fn header_missing(rows: &[Vec<String>]) -> bool {
    rows.first()
        .map_or(true, |row| row.iter().all(|cell| cell.trim().is_empty()))
}

/// Sheets refuses a new tab whose title differs from an existing one only by letter case.
pub fn same_tab(title: &str, tab: &str) -> bool {
    title.to_lowercase() == tab.to_lowercase()
}

pub fn format_sheet_date(date: NaiveDate) -> String {
    date.format(SHEET_DATE_FORMAT).to_string()
}
