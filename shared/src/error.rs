#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid storage locator {locator:?}: {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("failed to presign s3://{bucket}/{key}: {reason}")]
    Presign {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("failed to read s3://{bucket}/{key}: {reason}")]
    ObjectRead {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("event is not a {kind} event: {source}")]
    MalformedEvent {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataObject.video is not a video descriptor: {0}")]
    MalformedVideo(#[source] serde_json::Error),

    #[error("malformed consolidation payload: {0}")]
    MalformedPayload(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
