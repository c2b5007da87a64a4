use thiserror::Error;

/// Errors raised while reading application configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Failures of the durable key-value store backing the cart and the session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for key \"{key}\": {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for key \"{key}\" is not valid JSON: {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid storage key \"{0}\"")]
    InvalidKey(String),
}

/// Domain errors produced before any network call is made.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more form fields failed validation. Each entry is `(field, message)`.
    #[error("validation failed: {}", format_fields(.0))]
    Validation(Vec<(String, String)>),

    /// A client-side business limit (categories, products) would be exceeded.
    #[error("limit reached: at most {max} {what} may exist")]
    LimitReached { what: &'static str, max: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CoreError {
    /// Returns the validation message recorded for `field`, if any.
    #[must_use]
    pub fn field_message(&self, field: &str) -> Option<&str> {
        match self {
            Self::Validation(fields) => fields
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, msg)| msg.as_str()),
            _ => None,
        }
    }
}

fn format_fields(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join("; ")
}
