pub mod notice;
pub mod pages;
pub mod prettyprint;
pub mod router;
pub mod sheet_client_factory;
pub mod state;
pub mod telemetry;
