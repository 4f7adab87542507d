use error_stack::{report, ResultExt};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::domain::driver::layout::same_tab;
use crate::domain::sheets::{
    a1_notation::ToA1Notation,
    cell_range::{CellRange, ColumnRange},
};
use crate::ports::spreadsheet_gateway::{SpreadsheetError, SpreadsheetGateway};

#[derive(Debug, Clone, Default)]
struct Tab {
    title: String,
    cells: Vec<Vec<String>>,
}

impl Tab {
    fn cell(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }
}

/// Process-local spreadsheet with the same read and write semantics as the Google backend.
///
/// Backs the `memory` sheets backend and the test suites. A fault can be armed to make
/// every subsequent call fail with a chosen error.
#[derive(Debug, Default)]
pub struct InMemorySpreadsheet {
    tabs: RwLock<Vec<Tab>>,
    fault: RwLock<Option<SpreadsheetError>>,
}

impl InMemorySpreadsheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following gateway call fail with `error`, or clears the fault.
    pub async fn set_fault(&self, error: Option<SpreadsheetError>) {
        *self.fault.write().await = error;
    }

    async fn check_fault(&self) -> error_stack::Result<(), SpreadsheetError> {
        match *self.fault.read().await {
            Some(error) => Err(report!(error)).attach_printable("Injected spreadsheet fault"),
            None => Ok(()),
        }
    }

    /// Cells of `row` (1-based) on `title`, padded with blanks to `width` columns.
    pub async fn row(&self, title: &str, row: u32, width: usize) -> Option<Vec<String>> {
        let tabs = self.tabs.read().await;
        let tab = tabs.iter().find(|tab| tab.title == title)?;
        let index = row.checked_sub(1)? as usize;
        Some((0..width).map(|col| tab.cell(index, col).to_owned()).collect())
    }

    pub async fn tab_count(&self, title: &str) -> usize {
        self.tabs
            .read()
            .await
            .iter()
            .filter(|tab| tab.title == title)
            .count()
    }
}

#[async_trait::async_trait]
impl SpreadsheetGateway for InMemorySpreadsheet {
    async fn sheet_titles(&self) -> error_stack::Result<Vec<String>, SpreadsheetError> {
        self.check_fault().await?;
        Ok(self
            .tabs
            .read()
            .await
            .iter()
            .map(|tab| tab.title.clone())
            .collect())
    }

    #[instrument(skip(self))]
    async fn add_sheet(&self, title: &str) -> error_stack::Result<(), SpreadsheetError> {
        self.check_fault().await?;
        let mut tabs = self.tabs.write().await;
        if tabs.iter().any(|tab| same_tab(&tab.title, title)) {
            return Err(report!(SpreadsheetError::FailedToAddSheet))
                .attach_printable_lazy(|| format!("A sheet named '{title}' already exists"));
        }

        tabs.push(Tab {
            title: title.to_owned(),
            cells: Vec::new(),
        });
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read_columns(
        &self,
        range: &ColumnRange,
    ) -> error_stack::Result<Vec<Vec<String>>, SpreadsheetError> {
        self.check_fault().await?;
        let tabs = self.tabs.read().await;
        let tab = tabs
            .iter()
            .find(|tab| Some(tab.title.as_str()) == range.sheet_title.as_deref())
            .ok_or(report!(SpreadsheetError::FailedToFetchRange))
            .attach_printable_lazy(|| {
                format!("Unable to parse range: {}", range.to_a1_notation())
            })?;

        let first = range.first.index() as usize;
        let last = range.last.index() as usize;
        let mut rows: Vec<Vec<String>> = (0..tab.cells.len())
            .map(|row| {
                let mut cells: Vec<String> = (first..=last)
                    .map(|col| tab.cell(row, col).to_owned())
                    .collect();
                while cells.last().is_some_and(|cell| cell.is_empty()) {
                    cells.pop();
                }
                cells
            })
            .collect();

        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn write_row(
        &self,
        range: &CellRange,
        values: &[String],
    ) -> error_stack::Result<(), SpreadsheetError> {
        self.check_fault().await?;
        if range.row_count() != 1 || range.column_count() as usize != values.len() {
            return Err(report!(SpreadsheetError::FailedToWriteRange)).attach_printable_lazy(|| {
                format!(
                    "Range {} does not fit a single row of {} values",
                    range.to_a1_notation(),
                    values.len()
                )
            });
        }

        let mut tabs = self.tabs.write().await;
        let tab = tabs
            .iter_mut()
            .find(|tab| Some(tab.title.as_str()) == range.sheet_title.as_deref())
            .ok_or(report!(SpreadsheetError::FailedToWriteRange))
            .attach_printable_lazy(|| {
                format!("Unable to parse range: {}", range.to_a1_notation())
            })?;

        let row = range.start.row.index() as usize;
        let first = range.start.col.index() as usize;
        if tab.cells.len() <= row {
            tab.cells.resize(row + 1, Vec::new());
        }
        let cells = &mut tab.cells[row];
        if cells.len() < first + values.len() {
            cells.resize(first + values.len(), String::new());
        }
        cells[first..first + values.len()].clone_from_slice(values);

        Ok(())
    }
}
