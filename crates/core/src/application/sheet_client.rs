use std::collections::HashMap;
use std::sync::Arc;

use error_stack::{Report, ResultExt};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::driver::{
    entry::EntryRecord,
    layout::{
        header_missing, header_range, header_values, next_free_row, occupied_columns, same_tab,
    },
    session::DriverSession,
};
use crate::domain::sheets::{a1_notation::ToA1Notation, row::Row};
use crate::ports::spreadsheet_gateway::{SpreadsheetError, SpreadsheetGateway};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetClientError {
    #[error("Spreadsheet credentials are missing or invalid")]
    Auth,
    #[error("Failed to write to the spreadsheet")]
    Write,
}

impl From<&SpreadsheetError> for SheetClientError {
    fn from(error: &SpreadsheetError) -> Self {
        match error {
            SpreadsheetError::Unauthorized => SheetClientError::Auth,
            _ => SheetClientError::Write,
        }
    }
}

fn lift(report: Report<SpreadsheetError>) -> Report<SheetClientError> {
    let context = SheetClientError::from(report.current_context());
    report.change_context(context)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStatus {
    Created,
    AlreadyExists,
}

/// Writes driver entries into per-driver tabs of the shared spreadsheet.
///
/// Calls touching the same tab are serialized, so the free-row lookup and the write that
/// follows it never interleave with another submission for that tab. Distinct tabs run in
/// parallel.
pub struct SheetClient {
    gateway: Arc<dyn SpreadsheetGateway>,
    tab_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for SheetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetClient").finish_non_exhaustive()
    }
}

impl SheetClient {
    pub fn new(gateway: Arc<dyn SpreadsheetGateway>) -> Self {
        Self {
            gateway,
            tab_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn tab_lock(&self, tab: &str) -> Arc<Mutex<()>> {
        // Keyed like Sheets matches titles, so "Ivanov" and "ivanov" share one lock.
        let mut locks = self.tab_locks.lock().await;
        locks.entry(tab.to_lowercase()).or_default().clone()
    }

    /// Creates the tab with its header row unless a tab with that title already exists.
    /// An existing tab with a blank first row gets its header written.
    #[instrument(skip(self))]
    pub async fn ensure_tab(
        &self,
        driver_name: &str,
    ) -> error_stack::Result<TabStatus, SheetClientError> {
        let lock = self.tab_lock(driver_name).await;
        let _guard = lock.lock().await;
        let (_, status) = self.ensure_tab_locked(driver_name).await?;
        Ok(status)
    }

    /// Writes `record` on the row below the last occupied one and returns that row.
    #[instrument(skip(self, record), fields(entry_type = %record.entry_type()))]
    pub async fn append_entry(
        &self,
        tab_name: &str,
        record: &EntryRecord,
    ) -> error_stack::Result<Row, SheetClientError> {
        let lock = self.tab_lock(tab_name).await;
        let _guard = lock.lock().await;
        self.append_entry_locked(tab_name, record).await
    }

    /// Ensures the driver's tab and appends the record under a single lock acquisition.
    ///
    /// A tab whose title differs from the driver name only by case is reused as is.
    #[instrument(
        skip(self, session, record),
        fields(driver = session.name(), entry_type = %record.entry_type())
    )]
    pub async fn submit(
        &self,
        session: &DriverSession,
        record: &EntryRecord,
    ) -> error_stack::Result<Row, SheetClientError> {
        let tab = session.tab_name();
        let lock = self.tab_lock(tab).await;
        let _guard = lock.lock().await;

        let (title, _) = self.ensure_tab_locked(tab).await?;
        self.append_entry_locked(&title, record).await
    }

    /// Returns the title the tab actually carries in the spreadsheet, with its status.
    async fn ensure_tab_locked(
        &self,
        tab: &str,
    ) -> error_stack::Result<(String, TabStatus), SheetClientError> {
        let titles = self
            .gateway
            .sheet_titles()
            .await
            .map_err(lift)
            .attach_printable_lazy(|| format!("Could not list tabs while looking for '{tab}'"))?;

        if let Some(title) = titles.into_iter().find(|title| same_tab(title, tab)) {
            self.restore_header(&title).await?;
            return Ok((title, TabStatus::AlreadyExists));
        }

        self.gateway
            .add_sheet(tab)
            .await
            .map_err(lift)
            .attach_printable_lazy(|| format!("Could not create tab '{tab}'"))?;

        self.write_header(tab).await?;

        info!(tab, "Created driver tab");
        Ok((tab.to_owned(), TabStatus::Created))
    }

    /// Writes the header into an existing tab whose first row is blank, as left behind when
    /// the tab was added but its header write failed.
    async fn restore_header(&self, tab: &str) -> error_stack::Result<(), SheetClientError> {
        let occupied = occupied_columns(tab);
        let rows = self
            .gateway
            .read_columns(&occupied)
            .await
            .map_err(lift)
            .attach_printable_lazy(|| format!("Could not read {}", occupied.to_a1_notation()))?;

        if header_missing(&rows) {
            self.write_header(tab).await?;
            warn!(tab, "Restored missing header row");
        }
        Ok(())
    }

    async fn write_header(&self, tab: &str) -> error_stack::Result<(), SheetClientError> {
        let range = header_range(tab);
        self.gateway
            .write_row(&range, &header_values())
            .await
            .map_err(lift)
            .attach_printable_lazy(|| {
                format!("Could not write header to {}", range.to_a1_notation())
            })
    }

    async fn append_entry_locked(
        &self,
        tab: &str,
        record: &EntryRecord,
    ) -> error_stack::Result<Row, SheetClientError> {
        let occupied = occupied_columns(tab);
        let rows = self
            .gateway
            .read_columns(&occupied)
            .await
            .map_err(lift)
            .attach_printable_lazy(|| format!("Could not read {}", occupied.to_a1_notation()))?;

        let row = next_free_row(&rows);
        let range = record.region().range(tab, row);
        self.gateway
            .write_row(&range, &record.row_values())
            .await
            .map_err(lift)
            .attach_printable_lazy(|| {
                format!("Could not write entry to {}", range.to_a1_notation())
            })?;

        info!(tab, %row, "Entry written");
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use std::sync::atomic::{AtomicBool, Ordering};

    use error_stack::report;

    use super::*;
    use crate::adapters::sheets::in_memory_spreadsheet::InMemorySpreadsheet;
    use crate::domain::sheets::cell_range::{CellRange, ColumnRange};
    use crate::domain::driver::{
        entry::{EveningEntry, MorningEntry, RefuelingEntry},
        layout::HEADER,
    };

    fn client() -> (Arc<InMemorySpreadsheet>, SheetClient) {
        let spreadsheet = Arc::new(InMemorySpreadsheet::new());
        let client = SheetClient::new(spreadsheet.clone());
        (spreadsheet, client)
    }

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn morning(mileage: &str) -> EntryRecord {
        EntryRecord::Morning(MorningEntry {
            date: may_first(),
            mileage: mileage.into(),
            medic_mark_time: "08:10".into(),
            tachograph_time: "08:15".into(),
            vehicle_id: "A123BC".into(),
        })
    }

    fn refueling() -> EntryRecord {
        EntryRecord::Refueling(RefuelingEntry {
            date: may_first(),
            mileage: "12400".into(),
            fuel_liters: "40".into(),
        })
    }

    fn ivanov() -> DriverSession {
        DriverSession::new("Ivanov", "A123BC").unwrap()
    }

    #[tokio::test]
    async fn test_ensure_tab_creates_tab_with_header() {
        let (spreadsheet, client) = client();

        let status = client.ensure_tab("Ivanov").await.unwrap();

        assert_eq!(status, TabStatus::Created);
        assert_eq!(spreadsheet.tab_count("Ivanov").await, 1);
        assert_eq!(spreadsheet.row("Ivanov", 1, 9).await.unwrap(), HEADER);
        assert_eq!(spreadsheet.row("Ivanov", 2, 9).await.unwrap(), vec![""; 9]);
    }

    #[tokio::test]
    async fn test_ensure_tab_is_idempotent() {
        let (spreadsheet, client) = client();
        client.ensure_tab("Ivanov").await.unwrap();
        client.append_entry("Ivanov", &morning("12345")).await.unwrap();

        let status = client.ensure_tab("Ivanov").await.unwrap();

        assert_eq!(status, TabStatus::AlreadyExists);
        assert_eq!(spreadsheet.tab_count("Ivanov").await, 1);
        assert_eq!(spreadsheet.row("Ivanov", 1, 9).await.unwrap(), HEADER);
        assert_eq!(
            spreadsheet.row("Ivanov", 2, 5).await.unwrap(),
            vec!["01.05.2024", "12345", "08:10", "08:15", "A123BC"]
        );
    }

    #[tokio::test]
    async fn test_morning_entry_lands_below_header() {
        let (spreadsheet, client) = client();

        let row = client.submit(&ivanov(), &morning("12345")).await.unwrap();

        assert_eq!(row, Row::from_row(2));
        assert_eq!(
            spreadsheet.row("Ivanov", 2, 9).await.unwrap(),
            vec!["01.05.2024", "12345", "08:10", "08:15", "A123BC", "", "", "", ""]
        );
    }

    #[tokio::test]
    async fn test_refueling_writes_only_its_region_on_next_row() {
        let (spreadsheet, client) = client();
        client.submit(&ivanov(), &morning("12345")).await.unwrap();

        let row = client.submit(&ivanov(), &refueling()).await.unwrap();

        assert_eq!(row, Row::from_row(3));
        assert_eq!(
            spreadsheet.row("Ivanov", 3, 9).await.unwrap(),
            vec!["", "", "", "", "", "", "01.05.2024", "12400", "40"]
        );
    }

    #[tokio::test]
    async fn test_entry_after_refueling_does_not_overwrite_it() {
        let (spreadsheet, client) = client();
        client.submit(&ivanov(), &refueling()).await.unwrap();

        let evening = EntryRecord::Evening(EveningEntry {
            date: may_first(),
            mileage: "12590".into(),
            tachograph_time: "19:40".into(),
            vehicle_id: "A123BC".into(),
        });
        let row = client.submit(&ivanov(), &evening).await.unwrap();

        assert_eq!(row, Row::from_row(3));
        assert_eq!(
            spreadsheet.row("Ivanov", 2, 9).await.unwrap(),
            vec!["", "", "", "", "", "", "01.05.2024", "12400", "40"]
        );
        assert_eq!(
            spreadsheet.row("Ivanov", 3, 9).await.unwrap(),
            vec!["01.05.2024", "12590", "", "19:40", "A123BC", "", "", "", ""]
        );
    }

    #[tokio::test]
    async fn test_append_uses_row_after_n_filled_rows() {
        let (spreadsheet, client) = client();
        for mileage in ["100", "200", "300"] {
            client.submit(&ivanov(), &morning(mileage)).await.unwrap();
        }

        let row = client.append_entry("Ivanov", &morning("400")).await.unwrap();

        assert_eq!(row, Row::from_row(5));
        assert_eq!(spreadsheet.row("Ivanov", 5, 2).await.unwrap()[1], "400");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_land_on_distinct_rows() {
        let (spreadsheet, client) = client();
        let client = Arc::new(client);

        let mut tasks = tokio::task::JoinSet::new();
        for index in 0..16 {
            let client = client.clone();
            tasks.spawn(async move {
                client
                    .submit(&ivanov(), &morning(&index.to_string()))
                    .await
                    .unwrap()
            });
        }

        let mut rows = Vec::new();
        while let Some(row) = tasks.join_next().await {
            rows.push(row.unwrap().number());
        }
        rows.sort_unstable();

        assert_eq!(rows, (2..18).collect::<Vec<u32>>());
        assert_eq!(spreadsheet.tab_count("Ivanov").await, 1);
    }

    #[tokio::test]
    async fn test_distinct_drivers_get_distinct_tabs() {
        let (spreadsheet, client) = client();
        let petrov = DriverSession::new("Petrov", "B456CD").unwrap();

        client.submit(&ivanov(), &morning("1")).await.unwrap();
        let row = client.submit(&petrov, &refueling()).await.unwrap();

        assert_eq!(row, Row::from_row(2));
        assert_eq!(
            spreadsheet.sheet_titles().await.unwrap(),
            vec!["Ivanov", "Petrov"]
        );
    }

    #[tokio::test]
    async fn test_unauthorized_gateway_maps_to_auth() {
        let (spreadsheet, client) = client();
        spreadsheet
            .set_fault(Some(SpreadsheetError::Unauthorized))
            .await;

        let report = client.submit(&ivanov(), &morning("1")).await.unwrap_err();

        assert_eq!(report.current_context(), &SheetClientError::Auth);
    }

    #[tokio::test]
    async fn test_remote_failure_maps_to_write() {
        let (spreadsheet, client) = client();
        client.ensure_tab("Ivanov").await.unwrap();
        spreadsheet
            .set_fault(Some(SpreadsheetError::FailedToFetchRange))
            .await;

        let report = client
            .append_entry("Ivanov", &morning("1"))
            .await
            .unwrap_err();

        assert_eq!(report.current_context(), &SheetClientError::Write);
    }

    #[tokio::test]
    async fn test_retry_after_failed_tab_creation_rechecks_everything() {
        let (spreadsheet, client) = client();
        spreadsheet
            .set_fault(Some(SpreadsheetError::FailedToAddSheet))
            .await;
        assert!(client.submit(&ivanov(), &morning("1")).await.is_err());
        assert_eq!(spreadsheet.tab_count("Ivanov").await, 0);

        spreadsheet.set_fault(None).await;
        let row = client.submit(&ivanov(), &morning("1")).await.unwrap();

        assert_eq!(row, Row::from_row(2));
        assert_eq!(spreadsheet.row("Ivanov", 1, 9).await.unwrap(), HEADER);
    }

    /// Spreadsheet whose first `write_row` call fails and whose other calls go through.
    struct FirstWriteFails {
        inner: Arc<InMemorySpreadsheet>,
        failed: AtomicBool,
    }

    #[async_trait::async_trait]
    impl SpreadsheetGateway for FirstWriteFails {
        async fn sheet_titles(&self) -> error_stack::Result<Vec<String>, SpreadsheetError> {
            self.inner.sheet_titles().await
        }

        async fn add_sheet(&self, title: &str) -> error_stack::Result<(), SpreadsheetError> {
            self.inner.add_sheet(title).await
        }

        async fn read_columns(
            &self,
            range: &ColumnRange,
        ) -> error_stack::Result<Vec<Vec<String>>, SpreadsheetError> {
            self.inner.read_columns(range).await
        }

        async fn write_row(
            &self,
            range: &CellRange,
            values: &[String],
        ) -> error_stack::Result<(), SpreadsheetError> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(report!(SpreadsheetError::FailedToWriteRange));
            }
            self.inner.write_row(range, values).await
        }
    }

    #[tokio::test]
    async fn test_retry_after_failed_header_write_restores_header() {
        let spreadsheet = Arc::new(InMemorySpreadsheet::new());
        let client = SheetClient::new(Arc::new(FirstWriteFails {
            inner: spreadsheet.clone(),
            failed: AtomicBool::new(false),
        }));

        let report = client.submit(&ivanov(), &morning("1")).await.unwrap_err();
        assert_eq!(report.current_context(), &SheetClientError::Write);
        assert_eq!(spreadsheet.tab_count("Ivanov").await, 1);

        let row = client.submit(&ivanov(), &morning("1")).await.unwrap();

        assert_eq!(row, Row::from_row(2));
        assert_eq!(spreadsheet.row("Ivanov", 1, 9).await.unwrap(), HEADER);
        assert_eq!(spreadsheet.row("Ivanov", 2, 2).await.unwrap()[1], "1");
    }

    #[tokio::test]
    async fn test_ensure_tab_leaves_existing_header_alone() {
        let (spreadsheet, client) = client();
        client.submit(&ivanov(), &morning("1")).await.unwrap();

        client.ensure_tab("Ivanov").await.unwrap();
        let row = client.submit(&ivanov(), &morning("2")).await.unwrap();

        assert_eq!(row, Row::from_row(3));
        assert_eq!(spreadsheet.row("Ivanov", 1, 9).await.unwrap(), HEADER);
    }

    #[tokio::test]
    async fn test_driver_name_in_other_case_reuses_tab() {
        let (spreadsheet, client) = client();
        client.submit(&ivanov(), &morning("1")).await.unwrap();
        let lowercase = DriverSession::new("ivanov", "A123BC").unwrap();

        assert_eq!(
            client.ensure_tab("IVANOV").await.unwrap(),
            TabStatus::AlreadyExists
        );
        let row = client.submit(&lowercase, &morning("2")).await.unwrap();

        assert_eq!(row, Row::from_row(3));
        assert_eq!(spreadsheet.sheet_titles().await.unwrap(), vec!["Ivanov"]);
        assert_eq!(spreadsheet.row("Ivanov", 3, 2).await.unwrap()[1], "2");
    }
}
