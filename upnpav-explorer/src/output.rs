//! Text and JSON rendering of explorer results

use std::collections::BTreeSet;
use std::fmt::Write;

use upnpav_api::DirContent;

/// Summary line followed by one dump per container, then per item
pub fn render_content(label: &str, content: &DirContent) -> String {
    let mut out = format!(
        "{}: got {} containers and {} items\n",
        label,
        content.containers.len(),
        content.items.len()
    );
    for object in content.containers.iter().chain(&content.items) {
        // Writing to a String cannot fail
        let _ = write!(out, "{}", object);
    }
    out
}

pub fn render_capabilities(caps: &BTreeSet<String>) -> String {
    if caps.is_empty() {
        return "No search capabilities".to_string();
    }
    caps.iter().map(|cap| format!("[{}]", cap)).collect()
}

pub fn content_json(content: &DirContent) -> serde_json::Result<String> {
    serde_json::to_string_pretty(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIDL: &str = r#"<DIDL-Lite>
        <container id="1" parentID="0"><title>Music</title><class>object.container</class></container>
        <item id="2" parentID="0"><title>Song</title><class>object.item.audioItem</class></item>
    </DIDL-Lite>"#;

    #[test]
    fn test_render_content() {
        let content = DirContent::parse(DIDL).unwrap();
        let text = render_content("Browse", &content);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Browse: got 1 containers and 1 items");
        assert_eq!(
            lines[1],
            "container id [1] pid [0] title [Music] class [object.container]"
        );
        assert!(lines[2].starts_with("item id [2]"));
    }

    #[test]
    fn test_render_capabilities() {
        assert_eq!(render_capabilities(&BTreeSet::new()), "No search capabilities");
        let caps: BTreeSet<String> = ["upnp:class", "dc:title"].iter().map(|s| s.to_string()).collect();
        assert_eq!(render_capabilities(&caps), "[dc:title][upnp:class]");
    }

    #[test]
    fn test_content_json() {
        let content = DirContent::parse(DIDL).unwrap();
        let json = content_json(&content).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["items"][0]["title"], "Song");
    }
}
