use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when fetching or parsing RSS feeds
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("could not get {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode feed: {0}")]
    ParseFailed(#[from] rss::Error),

    #[error("invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("feed contains no episodes")]
    EmptyFeed,
}

/// Errors from parsing an episode range token
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("{input} is an invalid range (expected n or n-m)")]
    Invalid { input: String },
}

/// Errors from the OAuth2 authorization flow
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("could not open {path}: {source}")]
    SecretsReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse client secrets in {path}: {source}")]
    SecretsParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("client secrets contain an invalid endpoint URL: {0}")]
    BadEndpoint(#[from] oauth2::url::ParseError),

    #[error("could not read authorization code: {0}")]
    CodeReadFailed(#[source] std::io::Error),

    #[error("authorization code exchange failed: {0}")]
    ExchangeFailed(String),
}

/// Error from parsing a hex-encoded color flag
#[derive(Error, Debug)]
#[error("invalid hex color {input} (expected rrggbb)")]
pub struct ColorParseError {
    pub input: String,
}

/// Errors from rendering or persisting the title slide
#[derive(Error, Debug)]
pub enum SlideError {
    #[error("could not load font {path}: {reason}")]
    FontLoadFailed { path: PathBuf, reason: String },

    #[error("could not load logo {path}: {source}")]
    LogoLoadFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not encode slide PNG: {0}")]
    EncodeFailed(#[from] image::ImageError),

    #[error("could not write slide to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from invoking the external encoder
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    ExitStatus {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Errors from rendering the video title template
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("unknown template field {{{field}}}")]
    UnknownField { field: String },

    #[error("unclosed {{ in template at byte {position}")]
    Unclosed { position: usize },
}

/// Errors that can occur while downloading episode audio
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("episode '{title}' has no audio enclosure")]
    MissingEnclosure { title: String },

    #[error("HTTP request failed for {url}: {source}")]
    HttpFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("could not create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors from the video upload call
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("could not open video file {path}: {source}")]
    FileOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("upload request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("upload rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("upload session response carried no Location header")]
    MissingSession,
}

/// Per-episode pipeline errors, each wrapping the failing step
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("could not generate image: {0}")]
    Slide(#[from] SlideError),

    #[error("could not download audio: {0}")]
    Audio(#[from] DownloadError),

    #[error("could not create video: {0}")]
    Encode(#[from] EncodeError),

    #[error("could not create video title from template: {0}")]
    Title(#[from] TemplateError),

    #[error("could not upload video: {0}")]
    Upload(#[from] UploadError),
}
