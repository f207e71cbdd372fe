use std::fmt;

/// Failures that end a digest run or a note update. Each carries a
/// human-readable message; [`AppError::code`] gives the stable tag shown
/// on the `ERROR:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Bad command-line or override input.
    InvalidInput(String),
    /// Config, snapshot or upstream payloads that are present but unusable.
    InvalidData(String),
    /// Local file or process I/O.
    Io(String),
    /// The hosted agent API could not be reached or answered badly.
    Upstream(String),
    /// The note sink refused the report.
    Sink(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::Upstream(_) => "upstream_error",
            Self::Sink(_) => "sink_error",
        }
    }

    pub fn message(&self) -> &str {
        let (Self::InvalidInput(message)
        | Self::InvalidData(message)
        | Self::Io(message)
        | Self::Upstream(message)
        | Self::Sink(message)) = self;
        message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}
