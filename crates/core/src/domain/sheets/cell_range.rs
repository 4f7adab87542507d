use super::{
    a1_notation::{with_sheet_prefix, A1Notation, ToA1Notation},
    cell_position::CellPosition,
    column::Column,
    row::Row,
};

/// Rectangular range of cells, optionally bound to a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellPosition,
    pub end: CellPosition,
    pub sheet_title: Option<String>,
}

impl CellRange {
    /// Single-row range `first..=last` on `row`.
    pub fn row_span(first: Column, last: Column, row: Row) -> Self {
        Self {
            start: CellPosition::new(first, row),
            end: CellPosition::new(last, row),
            sheet_title: None,
        }
    }

    pub fn with_sheet_title(self, sheet_title: impl Into<String>) -> Self {
        Self {
            sheet_title: Some(sheet_title.into()),
            ..self
        }
    }

    pub fn row_count(&self) -> u32 {
        self.end.row.index() - self.start.row.index() + 1
    }

    pub fn column_count(&self) -> u32 {
        self.end.col.index() - self.start.col.index() + 1
    }
}

impl ToA1Notation for CellRange {
    fn to_a1_notation(&self) -> A1Notation {
        with_sheet_prefix(
            self.sheet_title.as_deref(),
            format!("{}:{}", self.start.a1(), self.end.a1()),
        )
    }
}

/// Whole-column span without row bounds, e.g. `'Ivanov'!A:I`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRange {
    pub first: Column,
    pub last: Column,
    pub sheet_title: Option<String>,
}

impl ColumnRange {
    pub fn new(first: Column, last: Column) -> Self {
        Self {
            first,
            last,
            sheet_title: None,
        }
    }

    pub fn with_sheet_title(self, sheet_title: impl Into<String>) -> Self {
        Self {
            sheet_title: Some(sheet_title.into()),
            ..self
        }
    }
}

impl ToA1Notation for ColumnRange {
    fn to_a1_notation(&self) -> A1Notation {
        with_sheet_prefix(
            self.sheet_title.as_deref(),
            format!("{}:{}", self.first, self.last),
        )
    }
}
