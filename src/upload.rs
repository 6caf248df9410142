// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use tokio::fs::File;

use crate::auth::AccessToken;
use crate::error::UploadError;
use crate::metadata::VideoMetadata;

/// YouTube's resumable upload endpoint for the videos collection
const UPLOAD_ENDPOINT: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

/// Identifiers assigned by the platform, returned unmodified
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedVideo {
    pub id: String,
}

/// Upload seam so the pipeline can be tested without touching the network
#[async_trait]
pub trait VideoUploader: Send + Sync {
    async fn upload(
        &self,
        metadata: &VideoMetadata,
        video: &Path,
    ) -> Result<UploadedVideo, UploadError>;
}

/// Uploader performing a two-step resumable insert: POST the metadata to
/// open an upload session, then PUT the video file to the session URI.
pub struct YouTubeUploader {
    http: reqwest::Client,
    token: AccessToken,
    endpoint: String,
}

impl YouTubeUploader {
    pub fn new(token: AccessToken) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            endpoint: UPLOAD_ENDPOINT.to_string(),
        }
    }
}

#[async_trait]
impl VideoUploader for YouTubeUploader {
    async fn upload(
        &self,
        metadata: &VideoMetadata,
        video: &Path,
    ) -> Result<UploadedVideo, UploadError> {
        let file = File::open(video)
            .await
            .map_err(|e| UploadError::FileOpenFailed {
                path: video.to_path_buf(),
                source: e,
            })?;
        let content_length = file
            .metadata()
            .await
            .map_err(|e| UploadError::FileOpenFailed {
                path: video.to_path_buf(),
                source: e,
            })?
            .len();

        let session = self
            .http
            .post(&self.endpoint)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(self.token.secret())
            .header("X-Upload-Content-Type", "video/mp4")
            .json(metadata)
            .send()
            .await?;

        if !session.status().is_success() {
            let status = session.status().as_u16();
            let body = session.text().await.unwrap_or_default();
            return Err(UploadError::Rejected { status, body });
        }

        let session_uri = session
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or(UploadError::MissingSession)?;

        let response = self
            .http
            .put(&session_uri)
            .bearer_auth(self.token.secret())
            .header(header::CONTENT_LENGTH, content_length)
            .header(header::CONTENT_TYPE, "video/mp4")
            .body(reqwest::Body::from(file))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected { status, body });
        }

        let uploaded: UploadedVideo = response.json().await?;
        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_video_file_fails_before_any_request() {
        let uploader = YouTubeUploader::new(AccessToken::new("token".to_string()));

        let metadata = VideoMetadata {
            snippet: crate::metadata::VideoSnippet {
                title: "t".to_string(),
                description: "d".to_string(),
                tags: vec![],
            },
            status: crate::metadata::VideoStatus {
                privacy_status: "unlisted".to_string(),
            },
        };

        let result = uploader
            .upload(&metadata, Path::new("no-such-video.mp4"))
            .await;

        assert!(matches!(result, Err(UploadError::FileOpenFailed { .. })));
    }

    #[test]
    fn upload_response_decodes_platform_id() {
        let uploaded: UploadedVideo =
            serde_json::from_str(r#"{"id":"dQw4w9WgXcQ","kind":"youtube#video"}"#).unwrap();
        assert_eq!(uploaded.id, "dQw4w9WgXcQ");
    }
}
