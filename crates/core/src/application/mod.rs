pub mod entry_form;
pub mod sheet_client;

pub use entry_form::{EntryFormInput, FieldError, FormErrors, FormField};
pub use sheet_client::{SheetClient, SheetClientError, TabStatus};
