use thiserror::Error;

/// Failures that stop an update before or after talking to Cloudflare.
///
/// Transport and decode failures are not listed here; they travel as
/// `anyhow` errors with context attached at the call site.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("{0} must be provided")]
    MissingArgument(&'static str),

    #[error("cloudflare API token not provided (use --api-token or set CF_API_TOKEN)")]
    MissingToken,

    #[error("invalid A record content {0:?}: expected an IPv4 address")]
    InvalidContent(String),

    #[error("zone not found for {0}")]
    ZoneNotFound(String),

    #[error("the A record not found for {0}")]
    RecordNotFound(String),

    #[error("Cloudflare rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}
