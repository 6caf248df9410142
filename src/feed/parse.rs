// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

use crate::error::FeedError;

/// A parsed podcast feed
#[derive(Debug, Clone)]
pub struct Feed {
    pub title: String,
    pub episodes: Vec<Episode>,
}

/// One entry from the podcast feed
#[derive(Debug, Clone)]
pub struct Episode {
    pub title: String,
    /// Ordering and selection key. `None` when the feed item carries no
    /// numeric order field; such episodes can never match a range.
    pub number: Option<u32>,
    /// Link to the original post, shown in the video description
    pub link: String,
    /// Raw description, possibly containing markup
    pub description: String,
    /// `None` when the item has no usable audio enclosure; processing
    /// such an episode fails at the audio-staging step
    pub audio_url: Option<Url>,
    pub tags: Vec<String>,
}

/// Parse RSS feed XML bytes into a Feed.
///
/// Every item comes back in document order, including items without an
/// audio enclosure.
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Feed, FeedError> {
    let channel = rss::Channel::read_from(xml_bytes)?;

    let episodes: Vec<Episode> = channel.items().iter().map(parse_episode).collect();

    if episodes.is_empty() {
        return Err(FeedError::EmptyFeed);
    }

    Ok(Feed {
        title: channel.title().to_string(),
        episodes,
    })
}

fn parse_episode(item: &rss::Item) -> Episode {
    let audio_url = item
        .enclosure()
        .and_then(|enclosure| Url::parse(enclosure.url()).ok());

    let title = item
        .title()
        .map(String::from)
        .unwrap_or_else(|| "Untitled Episode".to_string());

    let itunes = item.itunes_ext();

    // Feeds carry the episode number either as itunes:order or
    // itunes:episode; order wins when both are present.
    let number = itunes
        .and_then(|ext| ext.order().and_then(|o| o.parse().ok()))
        .or_else(|| itunes.and_then(|ext| ext.episode().and_then(|e| e.parse().ok())));

    let link = item
        .guid()
        .map(|g| g.value().to_string())
        .or_else(|| item.link().map(String::from))
        .unwrap_or_default();

    let description = itunes
        .and_then(|ext| ext.summary().map(String::from))
        .or_else(|| item.description().map(String::from))
        .unwrap_or_default();

    let tags = item
        .categories()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    Episode {
        title,
        number,
        link,
        description,
        audio_url,
        tags,
    }
}
