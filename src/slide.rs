// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ab_glyph::{FontVec, PxScale};
use image::{ImageFormat, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::error::{ColorParseError, SlideError};

/// An opaque RGB color, parsed from a hex flag like `ffffff` or `#009688`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorParseError {
            input: s.to_string(),
        };

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Everything needed to rasterize one title slide
#[derive(Debug, Clone)]
pub struct SlideSpec {
    pub logo: PathBuf,
    pub text: String,
    pub font: PathBuf,
    pub foreground: Rgb,
    pub background: Rgb,
    pub width: u32,
    pub height: u32,
}

/// Slide rasterizer abstraction so the pipeline can be tested without
/// real font and logo assets
pub trait SlideRenderer: Send + Sync {
    fn render(&self, spec: &SlideSpec) -> Result<RgbaImage, SlideError>;
}

/// Default renderer: solid background, logo in the upper half, episode
/// text centered below it
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageSlideRenderer;

impl SlideRenderer for ImageSlideRenderer {
    fn render(&self, spec: &SlideSpec) -> Result<RgbaImage, SlideError> {
        let font_bytes =
            std::fs::read(&spec.font).map_err(|e| SlideError::FontLoadFailed {
                path: spec.font.clone(),
                reason: e.to_string(),
            })?;
        let font = FontVec::try_from_vec(font_bytes).map_err(|_| SlideError::FontLoadFailed {
            path: spec.font.clone(),
            reason: "not a valid font file".to_string(),
        })?;

        let logo = image::open(&spec.logo)
            .map_err(|e| SlideError::LogoLoadFailed {
                path: spec.logo.clone(),
                source: e,
            })?
            .resize(
                spec.width / 2,
                spec.height / 2,
                imageops::FilterType::Lanczos3,
            )
            .to_rgba8();

        let mut canvas = RgbaImage::from_pixel(spec.width, spec.height, spec.background.to_rgba());

        let logo_x = (i64::from(spec.width) - i64::from(logo.width())) / 2;
        let logo_y = i64::from(spec.height) / 8;
        imageops::overlay(&mut canvas, &logo, logo_x.max(0), logo_y);

        let scale = PxScale::from(spec.height as f32 / 10.0);
        let (text_width, _) = text_size(scale, &font, &spec.text);
        let text_x = ((i64::from(spec.width) - i64::from(text_width)) / 2).max(0);
        let text_y = i64::from(spec.height) * 7 / 10;
        draw_text_mut(
            &mut canvas,
            spec.foreground.to_rgba(),
            text_x as i32,
            text_y as i32,
            scale,
            &font,
            &spec.text,
        );

        Ok(canvas)
    }
}

/// Encode the rendered slide as a PNG file at the given path
pub fn write_png(path: &Path, image: &RgbaImage) -> Result<(), SlideError> {
    let file = File::create(path).map_err(|e| SlideError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    image.write_to(&mut writer, ImageFormat::Png)?;
    Ok(())
}
