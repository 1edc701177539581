use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to reach {url}: {message}")]
    Transport { url: String, message: String },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid url '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} does not point to an album page")]
    InvalidAlbumLink(String),

    #[error("invalid css selector '{0}'")]
    Selector(String),
}
