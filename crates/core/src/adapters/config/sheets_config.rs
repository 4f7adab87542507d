use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SheetsBackend {
    #[default]
    Google,
    /// Keeps everything in process memory. Nothing is persisted.
    Memory,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpreadsheetConfig {
    /// Path to the service-account JSON key.
    #[serde(default)]
    pub priv_key: Box<str>,
    #[serde(default)]
    pub spreadsheet_id: Box<str>,
    #[serde(default)]
    pub backend: SheetsBackend,
}
