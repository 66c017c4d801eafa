use thiserror::Error;

/// Fatal errors that abort a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),
    #[error("gzip decompression failed: {0}")]
    Gzip(#[source] std::io::Error),
    #[error("HTTP error fetching archive: {0}")]
    Http(#[from] reqwest::Error),
    #[error("archive server returned status {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single record that could not be used for threading.
///
/// These never abort a run; they are collected and reported to the caller.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record {position} has no Message-ID")]
    MissingMessageId { position: usize },
    #[error("record {position} is not a valid message: {source}")]
    MimeParse {
        position: usize,
        #[source]
        source: mailparse::MailParseError,
    },
    #[error("missing Date header for message {message_id}")]
    MissingDate { message_id: String },
    #[error("invalid Date header `{raw}` for message {message_id}: {error}")]
    InvalidDate {
        message_id: String,
        raw: String,
        error: String,
    },
}
