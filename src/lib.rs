pub mod auth;
pub mod config;
pub mod encode;
pub mod error;
pub mod feed;
pub mod http;
pub mod metadata;
pub mod process;
pub mod select;
pub mod slide;
pub mod upload;

// Re-export main types for convenience
pub use auth::{AccessToken, CLIENT_SECRETS_PATH, ClientSecrets, authorize};
pub use config::{Config, split_tags};
pub use encode::{Encoder, FfmpegEncoder};
pub use error::{
    AuthError, ColorParseError, DownloadError, EncodeError, FeedError, ProcessError, RangeError,
    SlideError, TemplateError, UploadError,
};
pub use feed::{Episode, Feed, fetch_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient, download_to_file};
pub use metadata::{VideoMetadata, build_metadata, render_title, sanitize_description};
pub use process::process_episode;
pub use select::{EpisodeRange, select_episodes};
pub use slide::{ImageSlideRenderer, Rgb, SlideRenderer, SlideSpec, write_png};
pub use upload::{UploadedVideo, VideoUploader, YouTubeUploader};
