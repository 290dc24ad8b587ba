/// Conversation export model.
///
/// Mirrors the thread export layout: a roster of participants and a flat list of
/// messages, each optionally carrying text, a share payload and reactions.
use serde::Deserialize;
use std::path::Path;

use crate::error::ReportError;

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationExport {
    pub participants: Vec<Participant>,
    pub messages: Vec<MessageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    pub sender_name: String,
    pub timestamp_ms: i64,
    #[serde(default)]
    pub content: Option<String>,
    /// Any non-null value marks the message as a shared item.
    #[serde(default)]
    pub share: Option<serde_json::Value>,
    #[serde(default)]
    pub reactions: Option<Vec<ReactionEvent>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReactionEvent {
    pub actor: String,
}

impl MessageRecord {
    pub fn is_share(&self) -> bool {
        self.share.is_some()
    }

    /// Content, treating an empty string the same as no content.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }

    pub fn reactions(&self) -> &[ReactionEvent] {
        self.reactions.as_deref().unwrap_or_default()
    }
}

impl ConversationExport {
    /// Reads an export from disk.
    ///
    /// The bytes are decoded as ISO-8859-1, one char per byte, before JSON parsing.
    pub fn load_from_file(path: &Path) -> Result<Self, ReportError> {
        if !path.exists() {
            return Err(ReportError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let content = decode_latin1(&bytes);

        serde_json::from_str(&content).map_err(|source| ReportError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn roster(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }
}

/// Maps every byte to the code point with the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_latin1_keeps_bytes() {
        // UTF-8 "é" is two bytes, so it decodes to two chars
        let decoded = decode_latin1("é".as_bytes());
        assert_eq!(decoded, "\u{00c3}\u{00a9}");
        assert_eq!(decode_latin1(b"plain"), "plain");
    }

    #[test]
    fn test_parse_optional_fields() {
        let value = json!({
            "participants": [{"name": "Alice"}, {"name": "Bob", "extra": 1}],
            "messages": [
                {"sender_name": "Alice", "timestamp_ms": 10},
                {"sender_name": "Bob", "timestamp_ms": 20, "content": "", "share": null, "reactions": null},
                {
                    "sender_name": "Bob",
                    "timestamp_ms": 30,
                    "content": "hi",
                    "share": {"link": "https://example.org"},
                    "reactions": [{"reaction": "x", "actor": "Alice"}]
                }
            ]
        });

        let export: ConversationExport = serde_json::from_value(value).unwrap();
        assert_eq!(export.roster(), vec!["Alice", "Bob"]);

        let first = &export.messages[0];
        assert!(first.text().is_none());
        assert!(!first.is_share());
        assert!(first.reactions().is_empty());

        let second = &export.messages[1];
        assert!(second.text().is_none(), "empty content counts as none");
        assert!(!second.is_share(), "null share is absent");

        let third = &export.messages[2];
        assert_eq!(third.text(), Some("hi"));
        assert!(third.is_share());
        assert_eq!(third.reactions()[0].actor, "Alice");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = ConversationExport::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ReportError::MissingFile { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ConversationExport::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ReportError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
