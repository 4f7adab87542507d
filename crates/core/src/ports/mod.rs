pub mod spreadsheet_gateway;

pub use spreadsheet_gateway::{SpreadsheetError, SpreadsheetGateway};
