use thiserror::Error;

/// Result type alias using VsError
pub type Result<T> = std::result::Result<T, VsError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VsErrorKind {
    // Configuration/lookup
    InvalidConfig,
    NotFound,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Recorder
    /// The recorder's queue was closed before the submission could be made
    QueueClosed,

    // Internal
    Internal,
}

impl VsErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            VsErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            VsErrorKind::NotFound => "ERR_NOT_FOUND",
            VsErrorKind::Io => "ERR_IO",
            VsErrorKind::Serialization => "ERR_SERIALIZATION",
            VsErrorKind::Persistence => "ERR_PERSISTENCE",
            VsErrorKind::QueueClosed => "ERR_QUEUE_CLOSED",
            VsErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus free-form context
/// for debugging.
#[derive(Debug, Clone)]
pub struct VsError {
    kind: VsErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<VsError>>,
}

impl VsError {
    /// Create a new error with the specified kind
    pub fn new(kind: VsErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (session id, record id, variable name, config key)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: VsError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> VsErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&VsError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for VsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for VsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for varscope operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VarscopeError {
    /// Configuration text could not be parsed
    #[error("Invalid configuration: {reason}")]
    ConfigParse { reason: String },

    /// A configuration key holds an unusable value
    #[error("Invalid value for configuration key {key}: {reason}")]
    ConfigValue { key: String, reason: String },

    /// Configuration file could not be read
    #[error("Cannot read configuration file {path}: {reason}")]
    ConfigUnreadable { path: String, reason: String },

    /// A session id did not resolve to a stored session
    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: i64 },

    /// The recorder's writer thread is gone
    #[error("Recorder queue is closed")]
    QueueClosed,

    /// The recorder's writer thread panicked
    #[error("Recorder writer thread panicked")]
    WriterPanicked,

    /// JSON encoding or decoding failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<VarscopeError> for VsError {
    fn from(err: VarscopeError) -> Self {
        match err {
            VarscopeError::ConfigParse { reason } => VsError::new(VsErrorKind::InvalidConfig)
                .with_message(format!("Invalid configuration: {}", reason)),

            VarscopeError::ConfigValue { key, reason } => {
                VsError::new(VsErrorKind::InvalidConfig)
                    .with_entity_id(key)
                    .with_message(reason)
            }

            VarscopeError::ConfigUnreadable { path, reason } => VsError::new(VsErrorKind::Io)
                .with_op("config_load")
                .with_entity_id(path)
                .with_message(reason),

            VarscopeError::SessionNotFound { session_id } => VsError::new(VsErrorKind::NotFound)
                .with_entity_id(session_id.to_string())
                .with_message("Session not found"),

            VarscopeError::QueueClosed => VsError::new(VsErrorKind::QueueClosed)
                .with_op("recorder_submit")
                .with_message("Recorder queue is closed"),

            VarscopeError::WriterPanicked => VsError::new(VsErrorKind::Internal)
                .with_op("recorder_drain")
                .with_message("Recorder writer thread panicked"),

            VarscopeError::Serialization { message } => {
                VsError::new(VsErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to VarscopeError
impl From<serde_json::Error> for VarscopeError {
    fn from(err: serde_json::Error) -> Self {
        VarscopeError::Serialization {
            message: err.to_string(),
        }
    }
}
