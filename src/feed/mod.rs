mod fetch;
mod parse;

pub use fetch::fetch_feed;
pub use parse::{Episode, Feed, parse_feed};
