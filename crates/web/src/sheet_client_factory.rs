use driver_log_core::{
    adapters::{
        config::sheets_config::{SheetsBackend, SpreadsheetConfig},
        sheets::{
            in_memory_spreadsheet::InMemorySpreadsheet, spreadsheet_manager::SpreadsheetManager,
        },
    },
    application::sheet_client::{SheetClient, SheetClientError},
    ports::spreadsheet_gateway::SpreadsheetGateway,
};
use error_stack::ResultExt;
use std::sync::Arc;
use tracing::{info, warn};

pub struct SheetClientFactory;

impl SheetClientFactory {
    /// Builds the client over the configured backend. The Google backend checks its
    /// credential here, before the server accepts any request.
    pub async fn create(
        config: &SpreadsheetConfig,
    ) -> error_stack::Result<Arc<SheetClient>, SheetClientError> {
        let gateway = Self::create_gateway(config).await?;
        Ok(Arc::new(SheetClient::new(gateway)))
    }

    async fn create_gateway(
        config: &SpreadsheetConfig,
    ) -> error_stack::Result<Arc<dyn SpreadsheetGateway>, SheetClientError> {
        match config.backend {
            SheetsBackend::Google => {
                let manager = SpreadsheetManager::new(config.clone())
                    .await
                    .change_context(SheetClientError::Auth)?;
                info!(spreadsheet_id = %config.spreadsheet_id, "Using Google Sheets backend");
                Ok(Arc::new(manager))
            }
            SheetsBackend::Memory => {
                warn!("Using in-memory sheets backend, entries are lost on restart");
                Ok(Arc::new(InMemorySpreadsheet::new()))
            }
        }
    }
}
