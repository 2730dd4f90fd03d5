//! Mini DIDL-Lite parser for metadata embedded in action results and events
//!
//! DIDL-Lite format example:
//! ```xml
//! <DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/"
//!            xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/">
//!   <container id="1$4" parentID="1" restricted="1">
//!     <dc:title>Albums</dc:title>
//!     <upnp:class>object.container</upnp:class>
//!   </container>
//!   <item id="1$4$12" parentID="1$4">
//!     <dc:title>Song Title</dc:title>
//!     <dc:creator>Artist Name</dc:creator>
//!     <upnp:album>Album Name</upnp:album>
//!     <res duration="0:03:58" protocolInfo="http-get:*:audio/flac:*">http://host/12.flac</res>
//!   </item>
//! </DIDL-Lite>
//! ```
//!
//! Entries are parsed one at a time; a broken entry is skipped without
//! affecting its siblings.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::duration::parse_duration;
use crate::{ApiError, Result};

/// Whether a DIDL entry is a container or an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Container,
    Item,
}

/// A `<res>` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirResource {
    /// The resource URI (element text)
    pub uri: String,
    /// All attributes (`protocolInfo`, `duration`, `size`, ...)
    pub attributes: BTreeMap<String, String>,
}

impl DirResource {
    pub fn protocol_info(&self) -> Option<&str> {
        self.attributes.get("protocolInfo").map(String::as_str)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.attributes.get("duration").map(|d| parse_duration(d))
    }
}

/// One container or item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirObject {
    pub id: String,
    pub parent_id: String,
    pub kind: ObjectKind,
    pub title: String,
    /// `upnp:class`, e.g. `object.item.audioItem.musicTrack`
    pub class: String,
    pub restricted: bool,
    /// Other metadata elements keyed by qualified name (`dc:creator`,
    /// `upnp:album`, ...); repeated elements keep the first value
    pub properties: BTreeMap<String, String>,
    pub resources: Vec<DirResource>,
}

impl DirObject {
    /// Metadata value by qualified name, e.g. `dc:creator`
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn artist(&self) -> Option<&str> {
        self.property("upnp:artist").or_else(|| self.property("dc:creator"))
    }

    pub fn album(&self) -> Option<&str> {
        self.property("upnp:album")
    }

    /// Duration of the first resource that declares one
    pub fn duration(&self) -> Option<Duration> {
        self.resources.iter().find_map(DirResource::duration)
    }
}

impl fmt::Display for DirObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ObjectKind::Container => "container",
            ObjectKind::Item => "item",
        };
        writeln!(
            f,
            "{} id [{}] pid [{}] title [{}] class [{}]",
            kind, self.id, self.parent_id, self.title, self.class
        )?;
        for (name, value) in &self.properties {
            writeln!(f, "    {} [{}]", name, value)?;
        }
        for res in &self.resources {
            writeln!(f, "    res [{}]", res.uri)?;
            for (name, value) in &res.attributes {
                writeln!(f, "        {} [{}]", name, value)?;
            }
        }
        Ok(())
    }
}

/// Containers and items parsed from one DIDL-Lite fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirContent {
    pub containers: Vec<DirObject>,
    pub items: Vec<DirObject>,
}

impl DirContent {
    /// Parse a DIDL-Lite document
    ///
    /// Fails only when the document itself is unusable; entries without an
    /// `id` are dropped individually.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml.trim());
        let mut builder = DidlBuilder::default();
        let mut depth = 0usize;

        loop {
            match reader.read_event().map_err(bad_document)? {
                Event::Start(start) => {
                    depth += 1;
                    builder.open(&start, depth)?;
                }
                Event::Empty(start) => {
                    builder.open(&start, depth + 1)?;
                    builder.close(depth + 1);
                }
                Event::End(_) => {
                    builder.close(depth);
                    depth = depth.saturating_sub(1);
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned());
                    builder.text(&text);
                }
                Event::CData(data) => builder.text(&String::from_utf8_lossy(&data)),
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 || !builder.seen_root {
            return Err(ApiError::ParseError(
                "bad DIDL-Lite document: unexpected end".to_string(),
            ));
        }
        Ok(builder.content)
    }

    /// Parse metadata that is allowed to be empty or broken
    ///
    /// An empty string yields empty content silently; a broken document is
    /// logged and also yields empty content.
    pub fn parse_lenient(xml: &str) -> Self {
        if xml.trim().is_empty() {
            return Self::default();
        }
        Self::parse(xml).unwrap_or_else(|e| {
            error!(error = %e, metadata = xml, "bad metadata");
            Self::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.items.is_empty()
    }

    pub fn first_item(&self) -> Option<&DirObject> {
        self.items.first()
    }
}

fn bad_document(e: impl fmt::Display) -> ApiError {
    ApiError::ParseError(format!("bad DIDL-Lite document: {}", e))
}

fn attributes(start: &BytesStart<'_>) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(bad_document)?;
        let value = attr.unescape_value().map_err(bad_document)?.into_owned();
        out.insert(
            String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
            value,
        );
    }
    Ok(out)
}

/// A `<container>` or `<item>` still being read
struct PendingEntry {
    kind: ObjectKind,
    attributes: BTreeMap<String, String>,
    fields: Vec<PendingField>,
}

/// A direct child of an entry; nested text is folded into it
struct PendingField {
    qualified: String,
    local: String,
    attributes: BTreeMap<String, String>,
    text: String,
}

impl PendingEntry {
    fn finish(self) -> Option<DirObject> {
        let PendingEntry { kind, mut attributes, fields } = self;
        let Some(id) = attributes.remove("id") else {
            warn!(?kind, "DIDL entry without id, skipping");
            return None;
        };

        let mut object = DirObject {
            id,
            parent_id: attributes.remove("parentID").unwrap_or_default(),
            kind,
            title: String::new(),
            class: String::new(),
            restricted: matches!(
                attributes.get("restricted").map(String::as_str),
                Some("1") | Some("true")
            ),
            properties: BTreeMap::new(),
            resources: Vec::new(),
        };

        for field in fields {
            let text = field.text.trim().to_string();
            match field.local.as_str() {
                "title" => object.title = text,
                "class" => object.class = text,
                "res" => object.resources.push(DirResource {
                    uri: text,
                    attributes: field.attributes,
                }),
                _ => {
                    object.properties.entry(field.qualified).or_insert(text);
                }
            }
        }

        Some(object)
    }
}

/// Event-driven DIDL-Lite reader
///
/// Elements are matched by local name and prefixes are kept verbatim, so
/// fragments that use `dc:`/`upnp:` without declaring them still parse.
/// Depth 1 is the root, 2 an entry, 3 an entry field.
#[derive(Default)]
struct DidlBuilder {
    content: DirContent,
    seen_root: bool,
    entry: Option<PendingEntry>,
    field: Option<PendingField>,
}

impl DidlBuilder {
    fn open(&mut self, start: &BytesStart<'_>, depth: usize) -> Result<()> {
        let qualified = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        match depth {
            1 => {
                if local != "DIDL-Lite" {
                    return Err(ApiError::ParseError(format!(
                        "expected DIDL-Lite, found {}",
                        qualified
                    )));
                }
                self.seen_root = true;
            }
            2 => {
                self.entry = match local.as_str() {
                    "container" => Some(ObjectKind::Container),
                    "item" => Some(ObjectKind::Item),
                    _ => {
                        warn!(element = %qualified, "unexpected DIDL-Lite element");
                        None
                    }
                }
                .map(|kind| -> Result<PendingEntry> {
                    Ok(PendingEntry {
                        kind,
                        attributes: attributes(start)?,
                        fields: Vec::new(),
                    })
                })
                .transpose()?;
            }
            3 if self.entry.is_some() => {
                self.field = Some(PendingField {
                    qualified,
                    local,
                    attributes: attributes(start)?,
                    text: String::new(),
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, depth: usize) {
        match depth {
            2 => {
                if let Some(object) = self.entry.take().and_then(PendingEntry::finish) {
                    match object.kind {
                        ObjectKind::Container => self.content.containers.push(object),
                        ObjectKind::Item => self.content.items.push(object),
                    }
                }
            }
            3 => {
                if let (Some(field), Some(entry)) = (self.field.take(), self.entry.as_mut()) {
                    entry.fields.push(field);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(field) = self.field.as_mut() {
            field.text.push_str(text);
        }
    }
}
