use thiserror::Error;

/// Failures assembling the HTTP host from its modules.
#[derive(Debug, Error)]
pub enum IngressError {
    #[error("module '{module}' has invalid base path '{path}': {reason}")]
    InvalidBasePath {
        module: String,
        path: String,
        reason: &'static str,
    },

    #[error("modules '{first}' and '{second}' are both mounted at '{path}'")]
    DuplicateBasePath {
        first: String,
        second: String,
        path: String,
    },

    #[error("invalid bind address '{addr}': {source}")]
    InvalidBindAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}
