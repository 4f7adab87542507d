use error_stack::ResultExt;
use google_sheets4::{hyper, hyper_rustls};

use crate::ports::spreadsheet_gateway::SpreadsheetError;

pub type HttpsConnector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;

/// HTTPS client trusting the platform's root certificates.
pub fn http_client() -> error_stack::Result<hyper::Client<HttpsConnector>, SpreadsheetError> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .change_context(SpreadsheetError::Unauthorized)
        .attach_printable("Could not load the native root certificates")?
        .https_or_http()
        .enable_http1()
        .build();

    Ok(hyper::Client::builder().build(connector))
}
