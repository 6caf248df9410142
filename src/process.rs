// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::config::Config;
use crate::encode::Encoder;
use crate::error::{DownloadError, ProcessError};
use crate::feed::Episode;
use crate::http::{HttpClient, download_to_file};
use crate::metadata::{build_metadata, render_title};
use crate::slide::{SlideRenderer, SlideSpec, write_png};
use crate::upload::{UploadedVideo, VideoUploader};

/// Pick the staged audio filename from the enclosure URL's extension,
/// falling back to mp3 when the URL carries none
fn audio_filename(url: &url::Url) -> String {
    let extension = Path::new(url.path())
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("mp3");
    format!("audio.{extension}")
}

/// Run the full pipeline for one selected episode inside `workdir`:
/// render the slide, stage the audio, encode the video, build metadata,
/// upload. The caller owns `workdir` and its cleanup.
pub async fn process_episode<C, R, E, U>(
    http: &C,
    renderer: &R,
    encoder: &E,
    uploader: &U,
    config: &Config,
    episode: &Episode,
    workdir: &Path,
) -> Result<UploadedVideo, ProcessError>
where
    C: HttpClient,
    R: SlideRenderer,
    E: Encoder,
    U: VideoUploader,
{
    // Selection guarantees a number; 0 only appears if called directly
    // with an unnumbered episode.
    let number = episode.number.unwrap_or_default();

    let spec = SlideSpec {
        logo: config.logo.clone(),
        text: format!("{number}: {}", episode.title),
        font: config.font.clone(),
        foreground: config.foreground,
        background: config.background,
        width: config.width,
        height: config.height,
    };
    let image = renderer.render(&spec)?;

    let slide_path = workdir.join("slide.png");
    write_png(&slide_path, &image)?;

    let audio_url = episode
        .audio_url
        .as_ref()
        .ok_or_else(|| DownloadError::MissingEnclosure {
            title: episode.title.clone(),
        })?;
    let audio_path = workdir.join(audio_filename(audio_url));
    download_to_file(http, audio_url.as_str(), &audio_path).await?;

    let video_path = workdir.join("vid.mp4");
    encoder.encode(&slide_path, &audio_path, &video_path).await?;

    let title = render_title(&config.title_template, &episode.title, number)?;
    let metadata = build_metadata(episode, title, &config.extra_tags);

    let uploaded = uploader.upload(&metadata, &video_path).await?;
    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use image::RgbaImage;
    use tempfile::tempdir;
    use url::Url;

    use crate::error::{EncodeError, SlideError, UploadError};
    use crate::http::{ByteStream, HttpResponse};
    use crate::metadata::VideoMetadata;
    use crate::slide::Rgb;

    struct MockHttpClient {
        audio_data: Vec<u8>,
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get_bytes(&self, _url: &str) -> Result<Bytes, reqwest::Error> {
            Ok(Bytes::from(self.audio_data.clone()))
        }

        async fn get_stream(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            let data = self.audio_data.clone();
            let len = data.len() as u64;

            let stream: ByteStream =
                Box::pin(futures::stream::once(async move { Ok(Bytes::from(data)) }));

            Ok(HttpResponse {
                status: 200,
                content_length: Some(len),
                body: stream,
            })
        }
    }

    struct FakeRenderer {
        specs: Mutex<Vec<SlideSpec>>,
    }

    impl SlideRenderer for FakeRenderer {
        fn render(&self, spec: &SlideSpec) -> Result<RgbaImage, SlideError> {
            self.specs.lock().unwrap().push(spec.clone());
            Ok(RgbaImage::new(spec.width, spec.height))
        }
    }

    struct FakeEncoder {
        calls: Mutex<Vec<(PathBuf, PathBuf, PathBuf)>>,
    }

    #[async_trait]
    impl Encoder for FakeEncoder {
        async fn encode(
            &self,
            slide: &Path,
            audio: &Path,
            output: &Path,
        ) -> Result<(), EncodeError> {
            self.calls.lock().unwrap().push((
                slide.to_path_buf(),
                audio.to_path_buf(),
                output.to_path_buf(),
            ));
            std::fs::write(output, b"fake video").unwrap();
            Ok(())
        }
    }

    struct FakeUploader {
        received: Mutex<Vec<VideoMetadata>>,
    }

    #[async_trait]
    impl VideoUploader for FakeUploader {
        async fn upload(
            &self,
            metadata: &VideoMetadata,
            video: &Path,
        ) -> Result<UploadedVideo, UploadError> {
            assert!(video.exists(), "upload called before video was encoded");
            self.received.lock().unwrap().push(metadata.clone());
            Ok(UploadedVideo {
                id: "video-123".to_string(),
            })
        }
    }

    fn config() -> Config {
        Config {
            feed_url: "https://example.com/feed.xml".to_string(),
            logo: PathBuf::from("resources/logo.png"),
            font: PathBuf::from("resources/Roboto-Light.ttf"),
            title_template: "{title}: GCPPodcast {number}".to_string(),
            foreground: Rgb::new(255, 255, 255),
            background: Rgb::new(0, 150, 136),
            width: 64,
            height: 36,
            extra_tags: vec!["podcast".to_string(), "gcppodcast".to_string()],
        }
    }

    fn episode() -> Episode {
        Episode {
            title: "Big Data".to_string(),
            number: Some(7),
            link: "https://example.com/post/7".to_string(),
            description: "All about <b>big</b> data\nand more".to_string(),
            audio_url: Some(Url::parse("https://example.com/ep7.mp3").unwrap()),
            tags: vec!["data".to_string()],
        }
    }

    #[tokio::test]
    async fn pipeline_stages_encodes_and_uploads() {
        let dir = tempdir().unwrap();

        let http = MockHttpClient {
            audio_data: b"fake audio".to_vec(),
        };
        let renderer = FakeRenderer {
            specs: Mutex::new(vec![]),
        };
        let encoder = FakeEncoder {
            calls: Mutex::new(vec![]),
        };
        let uploader = FakeUploader {
            received: Mutex::new(vec![]),
        };

        let uploaded = process_episode(
            &http,
            &renderer,
            &encoder,
            &uploader,
            &config(),
            &episode(),
            dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(uploaded.id, "video-123");

        // Slide text is "{number}: {title}" with the configured look
        let specs = renderer.specs.lock().unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].text, "7: Big Data");
        assert_eq!(specs[0].background, Rgb::new(0, 150, 136));

        // Audio is staged next to the slide before encoding
        let audio = std::fs::read(dir.path().join("audio.mp3")).unwrap();
        assert_eq!(audio, b"fake audio");

        let calls = encoder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, dir.path().join("slide.png"));
        assert_eq!(calls[0].1, dir.path().join("audio.mp3"));
        assert_eq!(calls[0].2, dir.path().join("vid.mp4"));

        let received = uploader.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let meta = &received[0];
        assert_eq!(meta.snippet.title, "Big Data: GCPPodcast 7");
        assert_eq!(
            meta.snippet.description,
            "Original post: https://example.com/post/7\n\nAll about big data and more"
        );
        assert_eq!(
            meta.snippet.tags,
            vec!["data", "podcast", "gcppodcast"]
        );
        assert_eq!(meta.status.privacy_status, "unlisted");
    }

    #[tokio::test]
    async fn encoder_failure_stops_before_upload() {
        struct FailingEncoder;

        #[async_trait]
        impl Encoder for FailingEncoder {
            async fn encode(
                &self,
                _slide: &Path,
                _audio: &Path,
                _output: &Path,
            ) -> Result<(), EncodeError> {
                Err(EncodeError::Spawn {
                    program: "ffmpeg".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                })
            }
        }

        struct PanicUploader;

        #[async_trait]
        impl VideoUploader for PanicUploader {
            async fn upload(
                &self,
                _metadata: &VideoMetadata,
                _video: &Path,
            ) -> Result<UploadedVideo, UploadError> {
                panic!("upload must not run after a failed encode");
            }
        }

        let dir = tempdir().unwrap();
        let http = MockHttpClient {
            audio_data: b"fake audio".to_vec(),
        };
        let renderer = FakeRenderer {
            specs: Mutex::new(vec![]),
        };

        let result = process_episode(
            &http,
            &renderer,
            &FailingEncoder,
            &PanicUploader,
            &config(),
            &episode(),
            dir.path(),
        )
        .await;

        assert!(matches!(result, Err(ProcessError::Encode(_))));
    }

    #[tokio::test]
    async fn missing_enclosure_fails_at_audio_staging() {
        let dir = tempdir().unwrap();
        let http = MockHttpClient { audio_data: vec![] };
        let renderer = FakeRenderer {
            specs: Mutex::new(vec![]),
        };
        let encoder = FakeEncoder {
            calls: Mutex::new(vec![]),
        };
        let uploader = FakeUploader {
            received: Mutex::new(vec![]),
        };

        let mut episode = episode();
        episode.audio_url = None;

        let result = process_episode(
            &http, &renderer, &encoder, &uploader, &config(), &episode,
            dir.path(),
        )
        .await;

        match result.unwrap_err() {
            ProcessError::Audio(DownloadError::MissingEnclosure { title }) => {
                assert_eq!(title, "Big Data")
            }
            other => panic!("expected MissingEnclosure, got {other:?}"),
        }
        assert!(encoder.calls.lock().unwrap().is_empty());
        assert!(uploader.received.lock().unwrap().is_empty());
    }

    #[test]
    fn audio_filename_follows_enclosure_extension() {
        let mp3 = Url::parse("https://example.com/show/ep.mp3").unwrap();
        assert_eq!(audio_filename(&mp3), "audio.mp3");

        let m4a = Url::parse("https://example.com/show/ep.m4a?x=1").unwrap();
        assert_eq!(audio_filename(&m4a), "audio.m4a");

        let bare = Url::parse("https://example.com/stream").unwrap();
        assert_eq!(audio_filename(&bare), "audio.mp3");
    }
}
