use cardnotify_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using NotifyError
pub type Result<T> = std::result::Result<T, NotifyError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Rendering
    TemplateCompile,
    TemplateExecution,

    // Structural/Validation
    InvalidInput,
    InvalidConfig,
    NotFound,

    // Persistence
    ChecksumMismatch,
    Persistence,
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::TemplateCompile => "ERR_TEMPLATE_COMPILE",
            ExErrorKind::TemplateExecution => "ERR_TEMPLATE_EXECUTION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ChecksumMismatch => "ERR_CHECKSUM_MISMATCH",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context
/// (operation, entity, request) needed to find the failure in the logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (card, document or block id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
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
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== Batch Aggregate ==========

/// Aggregate of every per-diff failure in one batch conversion
///
/// A batch never aborts on a single bad diff; failures are pushed here in
/// the order they occurred and handed back next to whatever attachments
/// did render.
#[derive(Debug, Clone, Default)]
pub struct BatchError {
    errors: Vec<ExError>,
}

impl BatchError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure
    pub fn push(&mut self, err: impl Into<ExError>) {
        self.errors.push(err.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Individual failures in encounter order
    pub fn errors(&self) -> &[ExError] {
        &self.errors
    }

    /// `Ok(())` when nothing failed, otherwise the aggregate itself
    pub fn into_result(self) -> std::result::Result<(), BatchError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.len() {
            0 => write!(f, "no errors"),
            1 => write!(f, "1 error occurred:\n\t* {}", self.errors[0]),
            n => {
                write!(f, "{} errors occurred:", n)?;
                for err in &self.errors {
                    write!(f, "\n\t* {}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for BatchError {}

// ========== End Error Facility ==========

/// Domain failures raised by the rendering engine and the document model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    /// Template source could not be compiled; never cached
    #[error("cannot parse markdown template '{key}' for notifications: {reason}")]
    TemplateCompile { key: String, reason: String },

    /// A compiled template failed against the supplied diff
    #[error("cannot execute template '{key}': {reason}")]
    TemplateExecution { key: String, reason: String },

    /// Rendering the pretext for a specific card failed
    #[error("cannot write notification for card {card_id}: {source}")]
    CardNotification {
        card_id: String,
        source: Box<NotifyError>,
    },

    /// Card document lookup missed
    #[error("card document not found: {card_id}")]
    DocumentNotFound { card_id: String },

    /// Card document failed validation
    #[error("invalid card document: {reason}")]
    InvalidDocument { reason: String },

    /// Configuration could not be parsed or is inconsistent
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// JSON/TOML (de)serialization failed
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<NotifyError> for ExError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::TemplateCompile { key, reason } => {
                ExError::new(ExErrorKind::TemplateCompile)
                    .with_op("get_template")
                    .with_entity_id(key)
                    .with_message(reason)
            }
            NotifyError::TemplateExecution { key, reason } => {
                ExError::new(ExErrorKind::TemplateExecution)
                    .with_op("execute_template")
                    .with_entity_id(key)
                    .with_message(reason)
            }
            NotifyError::CardNotification { card_id, source } => {
                let source = ExError::from(*source);
                ExError::new(source.kind())
                    .with_op("card_diff_to_attachment")
                    .with_entity_id(card_id)
                    .with_message("cannot write notification for card")
                    .with_source(source)
            }
            NotifyError::DocumentNotFound { card_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(card_id)
                .with_message("Card document not found"),
            NotifyError::InvalidDocument { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }
            NotifyError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }
            NotifyError::Serialization { reason } => {
                ExError::new(ExErrorKind::Serialization).with_message(reason)
            }
        }
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        NotifyError::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for NotifyError {
    fn from(err: toml::de::Error) -> Self {
        NotifyError::InvalidConfig {
            reason: err.to_string(),
        }
    }
}
