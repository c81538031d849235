//! RSS 2.0 feed assembly.
//!
//! Records are ordered newest first and written with `quick-xml`. The sort is
//! stable, so articles sharing a timestamp keep the order they were
//! discovered in.
//!
//! # Output Shape
//!
//! ```text
//! <rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom"
//!      xmlns:dc="http://purl.org/dc/elements/1.1/">
//!   <channel>
//!     <title/> <link/> <description/> <atom:link rel="self"/> ...
//!     <item>
//!       <title/> <link/> <description/> <guid/> <category/> <pubDate/>
//!     </item>
//!   </channel>
//! </rss>
//! ```

use crate::config::ChannelConfig;
use crate::errors::AssemblyError;
use crate::models::ArticleRecord;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use tracing::{info, instrument};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
const RSS_DOCS: &str = "http://www.rssboard.org/rss-specification";
const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// One `<item>` of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub category: String,
    /// Always the article link.
    pub guid: String,
}

impl From<&ArticleRecord> for FeedItem {
    fn from(record: &ArticleRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            link: record.link.clone(),
            published_at: record.published_at,
            category: record.category.clone(),
            guid: record.link.clone(),
        }
    }
}

/// A finished feed, ready to hand to a [`FeedSink`](super::sink::FeedSink).
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub self_link: String,
    pub built_at: DateTime<Utc>,
    /// Newest first.
    pub items: Vec<FeedItem>,
    /// Serialized RSS.
    pub xml: String,
}

/// Sort `records` newest first and serialize them into a feed.
///
/// # Errors
///
/// Returns an [`AssemblyError`] if the XML cannot be written.
#[instrument(level = "info", skip(records, channel), fields(records = records.len()))]
pub fn assemble_feed(
    records: &[ArticleRecord],
    feed_name: &str,
    channel: &ChannelConfig,
) -> Result<FeedDocument, AssemblyError> {
    let items: Vec<FeedItem> = records
        .iter()
        .sorted_by(|a, b| b.published_at.cmp(&a.published_at))
        .map(FeedItem::from)
        .collect();

    let self_link = channel.self_link(feed_name);
    let built_at = Utc::now();
    let xml = render(channel, &self_link, built_at, &items)?;

    info!(items = items.len(), bytes = xml.len(), "Successfully generated RSS feed");
    Ok(FeedDocument {
        self_link,
        built_at,
        items,
        xml,
    })
}

fn render(
    channel: &ChannelConfig,
    self_link: &str,
    built_at: DateTime<Utc>,
    items: &[FeedItem],
) -> Result<String, AssemblyError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", ATOM_NS));
    rss.push_attribute(("xmlns:dc", DC_NS));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    write_text_element(&mut writer, "description", &channel.description)?;

    let mut atom_link = BytesStart::new("atom:link");
    atom_link.push_attribute(("href", self_link));
    atom_link.push_attribute(("rel", "self"));
    atom_link.push_attribute(("type", "application/rss+xml"));
    writer.write_event(Event::Empty(atom_link))?;

    write_text_element(&mut writer, "atom:subtitle", &channel.subtitle)?;
    write_text_element(&mut writer, "docs", RSS_DOCS)?;
    write_text_element(&mut writer, "generator", GENERATOR)?;

    writer.write_event(Event::Start(BytesStart::new("image")))?;
    write_text_element(&mut writer, "url", &channel.logo)?;
    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    writer.write_event(Event::End(BytesEnd::new("image")))?;

    write_text_element(&mut writer, "language", &channel.language)?;
    write_text_element(&mut writer, "lastBuildDate", &built_at.to_rfc2822())?;
    // `managingEditor` must be an email address, so the author name goes in Dublin Core.
    write_text_element(&mut writer, "dc:creator", &channel.author)?;

    for item in items {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &item.title)?;
        write_text_element(&mut writer, "link", &item.link)?;
        write_text_element(&mut writer, "description", &item.description)?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "false"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(&sanitize_text(&item.guid))))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        write_text_element(&mut writer, "category", &item.category)?;
        write_text_element(&mut writer, "pubDate", &item.published_at.to_rfc2822())?;
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut out = writer.into_inner();
    out.write_all(b"\n")?;
    Ok(String::from_utf8(out)?)
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), AssemblyError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(&sanitize_text(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn sanitize_text(input: &str) -> String {
    input.chars().filter(|&c| is_xml_char(c)).collect()
}

// XML 1.0 forbids control characters other than tab, LF and CR, and the
// noncharacters U+FFFE and U+FFFF.
fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{FFFE}' | '\u{FFFF}' => false,
        c => !c.is_control(),
    }
}
