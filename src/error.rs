// Custom error types for the lookup pipeline
#[derive(Debug)]
pub enum LookupError {
    NotFound(String),
    Network(String),
    Parse(String),
    DataShape(String),
    Config(String),
    Storage(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NotFound(name) => write!(f, "No entry found for: {}", name),
            LookupError::Network(msg) => write!(f, "Network error: {}", msg),
            LookupError::Parse(msg) => write!(f, "Parse error: {}", msg),
            LookupError::DataShape(msg) => write!(f, "Unexpected data shape: {}", msg),
            LookupError::Config(msg) => write!(f, "Configuration error: {}", msg),
            LookupError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Parse(err.to_string())
        } else {
            LookupError::Network(err.to_string())
        }
    }
}

impl From<toml::de::Error> for LookupError {
    fn from(err: toml::de::Error) -> Self {
        LookupError::Config(err.to_string())
    }
}
