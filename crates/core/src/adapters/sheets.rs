pub mod auth;
pub mod http_client;
pub mod in_memory_spreadsheet;
pub mod spreadsheet_manager;
pub mod value_range_factory;
