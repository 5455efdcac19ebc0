//! # Recorder Classifier Module
//!
//! Labels the device category that produced a media file from
//! vendor-specific tags. Classification is tag-presence-based and
//! best-effort: absent or malformed tags never fail, they fall through
//! to `Unknown`.

use crate::prober::ProbeDocument;
use std::fmt;

/// Coarse classification of the recording device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorder {
    Android,
    GoPro,
    Unknown,
}

impl fmt::Display for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recorder::Android => write!(f, "Android"),
            Recorder::GoPro => write!(f, "GoPro"),
            Recorder::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Classify the recording device for a probed file.
///
/// Android phones stamp a `com.android.version` container tag; GoPro
/// cameras leave their name in the first stream's handler tag.
pub fn classify(doc: &ProbeDocument) -> Recorder {
    if doc.format_tag("com.android.version").is_some() {
        return Recorder::Android;
    }

    let handler_name = doc
        .streams()
        .and_then(|streams| streams.first())
        .and_then(|stream| stream["tags"]["handler_name"].as_str());

    match handler_name {
        Some(handler) if handler.contains("GoPro") => Recorder::GoPro,
        _ => Recorder::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_android_tag_wins_regardless_of_streams() {
        let doc = ProbeDocument::new(json!({
            "format": {"tags": {"com.android.version": "11"}},
            "streams": [{"tags": {"handler_name": "GoPro AVC"}}]
        }));
        assert_eq!(classify(&doc), Recorder::Android);
    }

    #[test]
    fn test_gopro_handler_name() {
        let doc = ProbeDocument::new(json!({
            "format": {"tags": {}},
            "streams": [{"tags": {"handler_name": "\u{10}GoPro AVC"}}]
        }));
        assert_eq!(classify(&doc), Recorder::GoPro);
    }

    #[test]
    fn test_no_streams_is_unknown() {
        let doc = ProbeDocument::new(json!({"format": {"tags": {}}}));
        assert_eq!(classify(&doc), Recorder::Unknown);
    }

    #[test]
    fn test_missing_handler_tag_is_unknown() {
        let doc = ProbeDocument::new(json!({
            "format": {"tags": {}},
            "streams": [{"tags": {}}]
        }));
        assert_eq!(classify(&doc), Recorder::Unknown);
    }

    #[test]
    fn test_other_handler_is_unknown() {
        let doc = ProbeDocument::new(json!({
            "format": {"tags": {}},
            "streams": [{"tags": {"handler_name": "Core Media Video"}}]
        }));
        assert_eq!(classify(&doc), Recorder::Unknown);
    }
}
