//! Error types for the mapping library.

use thiserror::Error;

/// Failure payload carried by a mapping rule.
///
/// Reflective rules fail with a [`ConvertError`]; delegate rules may fail
/// with any error the caller's closure produces. Both are preserved as the
/// source of [`MapError::Member`] so callers can inspect the original cause.
pub type RuleError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for mapping operations.
#[derive(Error, Debug)]
pub enum MapError {
    /// Configuration error (invalid YAML, empty member names, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument passed to a public call (empty member name, empty
    /// strategy order, etc.). Raised synchronously, never wrapped.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A rule failed while mapping one member pair.
    ///
    /// Carries enough identifying fields to diagnose the failing pair
    /// without inspecting backtraces; the original failure is the source.
    #[error("Mapping {source_type} -> {target_type} failed for member {source_member} -> {target_member}: {cause}")]
    Member {
        source_type: &'static str,
        target_type: &'static str,
        source_member: String,
        target_member: String,
        #[source]
        cause: RuleError,
    },

    /// A dynamically dispatched mapper received an object of the wrong type.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Background mapping task failed to complete.
    #[error("Background mapping task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// IO error (configuration file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MapError {
    /// Create a Member error with full pair context.
    pub fn member(
        source_type: &'static str,
        target_type: &'static str,
        source_member: impl Into<String>,
        target_member: impl Into<String>,
        cause: RuleError,
    ) -> Self {
        MapError::Member {
            source_type,
            target_type,
            source_member: source_member.into(),
            target_member: target_member.into(),
            cause,
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MapError>;

/// Value-level conversion failure.
///
/// Raised by the value and member converters; wrapped into
/// [`MapError::Member`] by the enclosing strategy when a rule fails.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Null value converted into a non-nullable kind.
    #[error("cannot convert null into {to}")]
    NullValue { to: String },

    /// No conversion rule applies to the type pair.
    #[error("no conversion from {from} to {to}")]
    Unsupported { from: String, to: String },

    /// Textual value failed to parse as the target numeric kind.
    #[error("cannot parse '{value}' as {to}")]
    Parse { value: String, to: String },

    /// Numeric value does not fit the target width.
    #[error("value {value} out of range for {to}")]
    Overflow { value: i64, to: &'static str },

    /// Strict member conversion found no direct or flattened match.
    #[error("no member match for {source_member} -> {target_member}")]
    NoMatch {
        source_member: String,
        target_member: String,
    },

    /// Member name does not exist on the type.
    #[error("type {type_name} has no member named {member}")]
    UnknownMember { type_name: String, member: String },

    /// Runtime value shape did not match the declared member kind.
    #[error("expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    /// A nested mapper failed while converting an object-valued member.
    #[error(transparent)]
    Nested(Box<MapError>),
}
