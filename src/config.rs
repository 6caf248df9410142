use std::path::PathBuf;

use crate::slide::Rgb;

/// Immutable run configuration, built once from the CLI and passed
/// explicitly into each component
#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: String,
    pub logo: PathBuf,
    pub font: PathBuf,
    pub title_template: String,
    pub foreground: Rgb,
    pub background: Rgb,
    pub width: u32,
    pub height: u32,
    /// Fixed tags appended after each episode's feed tags
    pub extra_tags: Vec<String>,
}

/// Split a comma-separated tag flag into individual tags, dropping empty
/// segments so a trailing comma doesn't upload an empty tag
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
