use std::fmt;

#[derive(Debug, Clone)]
pub enum ExporterError {
    CommandFailed(String),
    CommandTimeout(String),
    OutputParse(String),
    MetricRegistration(String),
    ConfigLoad(String),
    Validation(String),
}

impl ExporterError {
    /// Stable error code for log grepping
    pub fn code(&self) -> &'static str {
        match self {
            ExporterError::CommandFailed(_) => "E001",
            ExporterError::CommandTimeout(_) => "E002",
            ExporterError::OutputParse(_) => "E003",
            ExporterError::MetricRegistration(_) => "E004",
            ExporterError::ConfigLoad(_) => "E005",
            ExporterError::Validation(_) => "E006",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ExporterError::CommandFailed(_) => "Command Execution Error",
            ExporterError::CommandTimeout(_) => "Command Timeout",
            ExporterError::OutputParse(_) => "Output Parse Error",
            ExporterError::MetricRegistration(_) => "Metric Registration Error",
            ExporterError::ConfigLoad(_) => "Configuration Load Error",
            ExporterError::Validation(_) => "Validation Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ExporterError::CommandFailed(msg)
            | ExporterError::CommandTimeout(msg)
            | ExporterError::OutputParse(msg)
            | ExporterError::MetricRegistration(msg)
            | ExporterError::ConfigLoad(msg)
            | ExporterError::Validation(msg) => msg,
        }
    }
}

impl fmt::Display for ExporterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for ExporterError {}

// Convenience constructors
impl ExporterError {
    pub fn command_failed<T: Into<String>>(msg: T) -> Self {
        ExporterError::CommandFailed(msg.into())
    }

    pub fn command_timeout<T: Into<String>>(msg: T) -> Self {
        ExporterError::CommandTimeout(msg.into())
    }

    pub fn output_parse<T: Into<String>>(msg: T) -> Self {
        ExporterError::OutputParse(msg.into())
    }

    pub fn metric_registration<T: Into<String>>(msg: T) -> Self {
        ExporterError::MetricRegistration(msg.into())
    }

    pub fn config_load<T: Into<String>>(msg: T) -> Self {
        ExporterError::ConfigLoad(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ExporterError::Validation(msg.into())
    }
}

impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::CommandFailed(err.to_string())
    }
}

impl From<prometheus::Error> for ExporterError {
    fn from(err: prometheus::Error) -> Self {
        ExporterError::MetricRegistration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
