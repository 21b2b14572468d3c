use thiserror::Error;

/// Failures of a single page fetch. The crawler consumes these inside the
/// traversal loop; none of them abort a crawl.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("http status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("not an html response: {url} ({content_type})")]
    NotHtml { url: String, content_type: String },
}

impl FetchError {
    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(url.to_string())
        } else {
            FetchError::Request(err)
        }
    }
}
