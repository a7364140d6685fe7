use reqwest::StatusCode;
use thiserror::Error;

/// Failure surface of both service clients. Everything here is fatal to the
/// running stage; the one recoverable outcome (a corresponding list missing on
/// the tracker) is not an error at all, see `ListFetch::NotFound`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{operation}: request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} on {target}: unexpected status {status}")]
    UnexpectedStatus {
        operation: &'static str,
        target: String,
        status: StatusCode,
    },

    #[error("{operation}: catalog credentials required but not configured")]
    MissingCredentials { operation: &'static str },

    #[error("parsing catalog export {target}: {source}")]
    Export {
        target: String,
        #[source]
        source: csv::Error,
    },

    #[error("parsing catalog export {target}: {message}")]
    ExportShape { target: String, message: String },
}

impl ClientError {
    pub fn transport(operation: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Transport { operation, source }
    }
}
