use thiserror::Error;

/// Fallback shown when neither the server nor the transport gave a message.
pub const GENERIC_ERROR_MESSAGE: &str = "Error de red o del servidor";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The server answered 401 or 403. The session has already been cleared.
    #[error("not authorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A server record could not be mapped to the client schema.
    #[error("normalization error for {entity}: {reason}")]
    Normalization { entity: &'static str, reason: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// The login endpoint answered successfully but returned no token.
    #[error("login response did not include a token")]
    MissingToken,

    #[error("could not read upload \"{path}\": {source}")]
    Upload {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] bazar_core::CoreError),

    #[error(transparent)]
    Storage(#[from] bazar_core::StorageError),
}

impl ClientError {
    /// The single human-readable message surfaced to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Unauthorized { message, .. } => message.clone(),
            Self::Http(_) => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
