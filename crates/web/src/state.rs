use chrono::{Local, NaiveDate};
use driver_log_core::application::sheet_client::SheetClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub sheet_client: Arc<SheetClient>,
    /// Local calendar day used by the date rules.
    pub today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl AppState {
    pub fn new(sheet_client: Arc<SheetClient>) -> Self {
        Self {
            sheet_client,
            today: local_today,
        }
    }
}
