use error_stack::{report, Report, ResultExt};
use google_sheets4::{
    api::{
        AddSheetRequest, BatchUpdateSpreadsheetRequest, Request, SheetProperties, ValueRange,
    },
    Sheets,
};
use std::fmt::Debug;
use tracing::instrument;

use super::{
    auth,
    http_client::{self, HttpsConnector},
    value_range_factory::{value_range_rows, ValueRangeFactory},
};
use crate::adapters::config::sheets_config::SpreadsheetConfig;
use crate::domain::sheets::{
    a1_notation::ToA1Notation,
    cell_range::{CellRange, ColumnRange},
};
use crate::ports::spreadsheet_gateway::{SpreadsheetError, SpreadsheetGateway};

/// Google Sheets backed gateway for the shared spreadsheet.
pub struct SpreadsheetManager {
    pub config: SpreadsheetConfig,
    hub: Sheets<HttpsConnector>,
}

impl Debug for SpreadsheetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SpreadsheetManager {{ spreadsheet_id: {} }}",
            self.config.spreadsheet_id
        )
    }
}

/// Token failures surface as `MissingToken`; everything else keeps the caller's context.
fn remote_failure(
    error: google_sheets4::Error,
    context: SpreadsheetError,
) -> Report<SpreadsheetError> {
    let context = match &error {
        google_sheets4::Error::MissingToken(_) => SpreadsheetError::Unauthorized,
        _ => context,
    };
    Report::new(error).change_context(context)
}

impl SpreadsheetManager {
    /// Loads and checks the service-account credential. No request is sent until the first
    /// gateway call.
    #[instrument(name = "SpreadsheetManager::new", skip(config))]
    pub async fn new(config: SpreadsheetConfig) -> error_stack::Result<Self, SpreadsheetError> {
        let client = http_client::http_client()?;
        let auth = auth::auth(&config, client.clone()).await?;
        let hub = Sheets::new(client, auth);

        Ok(SpreadsheetManager { config, hub })
    }
}

#[async_trait::async_trait]
impl SpreadsheetGateway for SpreadsheetManager {
    #[instrument]
    async fn sheet_titles(&self) -> error_stack::Result<Vec<String>, SpreadsheetError> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(&self.config.spreadsheet_id)
            .doit()
            .await
            .map_err(|error| remote_failure(error, SpreadsheetError::FailedToFetchSheets))?;

        let sheets = spreadsheet
            .sheets
            .ok_or(report!(SpreadsheetError::FailedToFetchSheets))
            .attach_printable("Sheets not present in spreadsheet response")?;

        Ok(sheets
            .into_iter()
            .filter_map(|sheet| sheet.properties.and_then(|properties| properties.title))
            .collect())
    }

    #[instrument]
    async fn add_sheet(&self, title: &str) -> error_stack::Result<(), SpreadsheetError> {
        let request = BatchUpdateSpreadsheetRequest {
            requests: Some(vec![Request {
                add_sheet: Some(AddSheetRequest {
                    properties: Some(SheetProperties {
                        title: Some(title.to_owned()),
                        ..Default::default()
                    }),
                }),
                ..Default::default()
            }]),
            ..Default::default()
        };

        self.hub
            .spreadsheets()
            .batch_update(request, &self.config.spreadsheet_id)
            .doit()
            .await
            .map(|_| ())
            .map_err(|error| remote_failure(error, SpreadsheetError::FailedToAddSheet))
            .attach_printable_lazy(|| format!("Failed to add sheet '{title}'"))
    }

    #[instrument]
    async fn read_columns(
        &self,
        range: &ColumnRange,
    ) -> error_stack::Result<Vec<Vec<String>>, SpreadsheetError> {
        let a1_notation = range.to_a1_notation();
        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(&self.config.spreadsheet_id, a1_notation.as_ref())
            .doit()
            .await
            .map_err(|error| remote_failure(error, SpreadsheetError::FailedToFetchRange))
            .attach_printable_lazy(|| format!("Failed to fetch range {a1_notation}"))?;

        Ok(value_range_rows(value_range))
    }

    #[instrument]
    async fn write_row(
        &self,
        range: &CellRange,
        values: &[String],
    ) -> error_stack::Result<(), SpreadsheetError> {
        let a1_notation = range.to_a1_notation();
        if range.row_count() != 1 || range.column_count() as usize != values.len() {
            return Err(report!(SpreadsheetError::FailedToWriteRange)).attach_printable_lazy(|| {
                format!(
                    "Range {a1_notation} does not fit a single row of {} values",
                    values.len()
                )
            });
        }

        self.hub
            .spreadsheets()
            .values_update(
                ValueRange::from_row(values),
                &self.config.spreadsheet_id,
                a1_notation.as_ref(),
            )
            .value_input_option("USER_ENTERED")
            .doit()
            .await
            .map(|_| ())
            .map_err(|error| remote_failure(error, SpreadsheetError::FailedToWriteRange))
            .attach_printable_lazy(|| format!("Failed to write to range {a1_notation}"))
    }
}
