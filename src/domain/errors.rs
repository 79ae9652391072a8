/// Error taxonomy for the chart widget. Kept flat: every failure here is
/// either logged and swallowed or handed to the host as a message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Removing an annotation the chart already disposed
    StaleHandle(String),
    /// The charting library threw or is missing
    Backend(String),
    Configuration(String),
    Decode(String),
    Network(String),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::StaleHandle(msg) => write!(f, "Stale Handle: {}", msg),
            ChartError::Backend(msg) => write!(f, "Chart Backend Error: {}", msg),
            ChartError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
            ChartError::Decode(msg) => write!(f, "Decode Error: {}", msg),
            ChartError::Network(msg) => write!(f, "Network Error: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}

impl From<serde_json::Error> for ChartError {
    fn from(error: serde_json::Error) -> Self {
        ChartError::Decode(error.to_string())
    }
}

impl From<strum::ParseError> for ChartError {
    fn from(error: strum::ParseError) -> Self {
        ChartError::Configuration(error.to_string())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
