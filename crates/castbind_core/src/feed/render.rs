//! RSS 2.0 + iTunes feed rendering with quick-xml.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::episodes::format_pub_date;
use super::types::{ChannelInfo, EpisodeItem, FeedError, FeedResult};

pub const ITUNES_NS: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Render the complete feed document.
pub fn render_feed(channel: &ChannelInfo, items: &[EpisodeItem]) -> FeedResult<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(FeedError::xml)?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:itunes", ITUNES_NS));
    rss.push_attribute(("xmlns:atom", ATOM_NS));
    rss.push_attribute(("xmlns:content", CONTENT_NS));
    rss.push_attribute(("xmlns:dc", DC_NS));
    writer.write_event(Event::Start(rss)).map_err(FeedError::xml)?;
    start(&mut writer, "channel")?;

    write_channel(&mut writer, channel)?;
    for item in items {
        write_item(&mut writer, item)?;
    }

    end(&mut writer, "channel")?;
    end(&mut writer, "rss")?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(FeedError::xml)
}

fn write_channel<W: Write>(writer: &mut Writer<W>, channel: &ChannelInfo) -> FeedResult<()> {
    text_element(writer, "title", &channel.title)?;
    text_element(writer, "link", &channel.link)?;
    cdata_element(writer, "description", &channel.description)?;
    text_element(writer, "language", &channel.language)?;

    if let Some(ref feed_url) = channel.feed_url {
        empty_element(
            writer,
            "atom:link",
            &[
                ("href", feed_url.as_str()),
                ("rel", "self"),
                ("type", "application/rss+xml"),
            ],
        )?;
    }

    if !channel.author.is_empty() {
        text_element(writer, "itunes:author", &channel.author)?;
    }
    cdata_element(writer, "itunes:summary", &channel.description)?;

    if let Some(ref image_url) = channel.image_url {
        start(writer, "image")?;
        text_element(writer, "url", image_url)?;
        text_element(writer, "title", &channel.title)?;
        text_element(writer, "link", &channel.link)?;
        end(writer, "image")?;
        empty_element(writer, "itunes:image", &[("href", image_url.as_str())])?;
    }

    if let Some(ref category) = channel.category {
        empty_element(writer, "itunes:category", &[("text", category.as_str())])?;
    }
    text_element(writer, "itunes:explicit", explicit_flag(channel.explicit))?;

    Ok(())
}

fn write_item<W: Write>(writer: &mut Writer<W>, item: &EpisodeItem) -> FeedResult<()> {
    start(writer, "item")?;

    cdata_element(writer, "title", &item.title)?;
    cdata_element(writer, "description", &item.description)?;
    text_element(writer, "pubDate", &format_pub_date(&item.pub_date))?;
    text_element(writer, "link", &item.link)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute((
        "isPermaLink",
        if item.guid_is_permalink { "true" } else { "false" },
    ));
    writer.write_event(Event::Start(guid)).map_err(FeedError::xml)?;
    writer
        .write_event(Event::Text(BytesText::new(&item.guid)))
        .map_err(FeedError::xml)?;
    end(writer, "guid")?;

    let length = item.enclosure_length_bytes.to_string();
    empty_element(
        writer,
        "enclosure",
        &[
            ("url", item.enclosure_url.as_str()),
            ("type", item.enclosure_mime.as_str()),
            ("length", length.as_str()),
        ],
    )?;

    text_element(writer, "itunes:duration", &item.duration_formatted)?;
    text_element(writer, "itunes:explicit", explicit_flag(item.explicit))?;
    text_element(writer, "itunes:episode", &item.episode_number.to_string())?;
    text_element(writer, "itunes:season", &item.season.to_string())?;

    end(writer, "item")
}

fn explicit_flag(explicit: bool) -> &'static str {
    if explicit {
        "true"
    } else {
        "false"
    }
}

fn start<W: Write>(writer: &mut Writer<W>, name: &str) -> FeedResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(FeedError::xml)
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> FeedResult<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(FeedError::xml)
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> FeedResult<()> {
    start(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(FeedError::xml)?;
    end(writer, name)
}

/// Element with CDATA content; text that would terminate CDATA is escaped instead.
fn cdata_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> FeedResult<()> {
    if text.contains("]]>") {
        return text_element(writer, name, text);
    }
    start(writer, name)?;
    writer
        .write_event(Event::CData(BytesCData::new(text)))
        .map_err(FeedError::xml)?;
    end(writer, name)
}

fn empty_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> FeedResult<()> {
    let mut element = BytesStart::new(name);
    for attr in attributes {
        element.push_attribute(*attr);
    }
    writer
        .write_event(Event::Empty(element))
        .map_err(FeedError::xml)
}
