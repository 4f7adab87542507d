use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Plain-text copy of the log stream.
    pub log_file: Option<String>,
    /// OTLP gRPC collector, e.g. `http://localhost:4317`.
    pub otlp_endpoint: Option<String>,
}
