//! Google News RSS source
//!
//! Searches the Google News RSS endpoint and joins the first few items'
//! titles and descriptions into one block of text.

use super::traits::*;
use crate::config::SourceSettings;
use crate::error::SourceError;
use crate::network::{accept_feed, FetchRequest};
use quick_xml::events::Event;
use quick_xml::Reader;
use scraper::Html;
use std::time::Duration;

const DEFAULT_URL: &str = "https://news.google.com/rss/search";

/// One `<item>` of the feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
}

impl FeedItem {
    /// Title plus description, skipping a description that only repeats the title
    fn to_text(&self) -> String {
        let title = terminate_sentence(&self.title);
        let description = squash_whitespace(&self.description);
        let headline = self.title.trim();
        // Google News titles end with " - Publisher"
        let core = headline
            .rsplit_once(" - ")
            .map(|(h, _)| h)
            .unwrap_or(headline);

        if description.is_empty()
            || (!core.is_empty() && description.starts_with(core))
            || headline.starts_with(description.as_str())
        {
            return title;
        }
        if title.is_empty() {
            return terminate_sentence(&description);
        }
        format!("{} {}", title, terminate_sentence(&description))
    }
}

/// News-feed source
pub struct GoogleNews {
    url: String,
    max_items: usize,
    lang: String,
    timeout: Option<Duration>,
}

impl GoogleNews {
    pub fn new() -> Self {
        Self::with_settings(&SourceSettings {
            max_items: 3,
            ..Default::default()
        })
    }

    pub fn with_settings(settings: &SourceSettings) -> Self {
        Self {
            url: settings
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_URL.to_string()),
            max_items: settings.max_items.max(1),
            lang: settings.lang.clone(),
            timeout: settings.timeout.map(Duration::from_secs_f64),
        }
    }

    /// Google News locale parameters (`hl`, `gl`, `ceid`) from a tag like `en-US`
    fn locale(&self) -> (String, String, String) {
        let mut parts = self.lang.split(&['-', '_'][..]);
        let language = parts
            .next()
            .filter(|l| !l.is_empty())
            .unwrap_or("en")
            .to_ascii_lowercase();
        let region = parts
            .next()
            .filter(|r| !r.is_empty())
            .unwrap_or("US")
            .to_ascii_uppercase();
        let hl = format!("{}-{}", language, region);
        let ceid = format!("{}:{}", region, language);
        (hl, region, ceid)
    }

    /// Parse an RSS document into its items
    pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, SourceError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut items = Vec::new();
        let mut current: Option<FeedItem> = None;
        let mut field: Option<&'static str> = None;
        let mut text = String::new();
        let mut saw_feed = false;

        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"rss" | b"channel" | b"feed" => saw_feed = true,
                    b"item" | b"entry" => {
                        current = Some(FeedItem::default());
                        field = None;
                    }
                    b"title" if current.is_some() => {
                        field = Some("title");
                        text.clear();
                    }
                    b"description" | b"summary" if current.is_some() => {
                        field = Some("description");
                        text.clear();
                    }
                    _ => {}
                },
                Ok(Event::Text(t)) => {
                    if field.is_some() {
                        let decoded = t
                            .unescape()
                            .map(|c| c.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                        text.push_str(&decoded);
                    }
                }
                Ok(Event::CData(c)) => {
                    if field.is_some() {
                        text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"item" | b"entry" => {
                        if let Some(item) = current.take() {
                            if !item.title.is_empty() || !item.description.is_empty() {
                                items.push(item);
                            }
                        }
                        field = None;
                    }
                    b"title" | b"description" | b"summary" => {
                        if let (Some(item), Some(name)) = (current.as_mut(), field.take()) {
                            let value = strip_markup(&text);
                            match name {
                                "title" => item.title = value,
                                _ => item.description = value,
                            }
                        }
                        text.clear();
                    }
                    _ => {}
                },
                Ok(_) => {}
                Err(e) => {
                    return Err(SourceError::Parse(format!(
                        "malformed feed at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
            }
        }

        if !saw_feed {
            return Err(SourceError::Parse("response is not an RSS feed".into()));
        }

        Ok(items)
    }
}

impl Default for GoogleNews {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for GoogleNews {
    fn name(&self) -> &str {
        "google_news"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::NewsFeed
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn request(&self, query: &str) -> Result<FetchRequest, SourceError> {
        let (hl, gl, ceid) = self.locale();
        Ok(FetchRequest::get(&self.url)
            .header("Accept", accept_feed())
            .param("q", query)
            .param("hl", hl)
            .param("gl", gl)
            .param("ceid", ceid))
    }

    fn parse(&self, body: &str) -> Result<Option<String>, SourceError> {
        let items = Self::parse_feed(body)?;
        let text = items
            .iter()
            .take(self.max_items)
            .map(FeedItem::to_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok((!text.is_empty()).then_some(text))
    }
}

/// Feed descriptions carry escaped HTML; keep only the visible text
fn strip_markup(text: &str) -> String {
    if !text.contains('<') {
        return squash_whitespace(text);
    }
    let fragment = Html::parse_fragment(text);
    let visible = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    squash_whitespace(&visible)
}
