use thiserror::Error;

use crate::domain::sheets::cell_range::{CellRange, ColumnRange};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetError {
    #[error("Spreadsheet credentials are missing or were rejected")]
    Unauthorized,
    #[error("Failed to fetch sheet list")]
    FailedToFetchSheets,
    #[error("Failed to add sheet")]
    FailedToAddSheet,
    #[error("Failed to fetch range")]
    FailedToFetchRange,
    #[error("Failed to write range")]
    FailedToWriteRange,
}

/// Remote primitives the driver log needs from the shared spreadsheet.
#[async_trait::async_trait]
pub trait SpreadsheetGateway: Send + Sync {
    async fn sheet_titles(&self) -> error_stack::Result<Vec<String>, SpreadsheetError>;

    async fn add_sheet(&self, title: &str) -> error_stack::Result<(), SpreadsheetError>;

    /// Reads the span top to bottom. Rows past the last non-empty one are not returned and
    /// each row may be shorter than the span when its trailing cells are empty.
    async fn read_columns(
        &self,
        range: &ColumnRange,
    ) -> error_stack::Result<Vec<Vec<String>>, SpreadsheetError>;

    /// Overwrites a single-row range. `values` must have one entry per column.
    async fn write_row(
        &self,
        range: &CellRange,
        values: &[String],
    ) -> error_stack::Result<(), SpreadsheetError>;
}
