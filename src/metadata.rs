//! # Metadata Normalizer Module
//!
//! Maps a raw probe document into the fixed metadata schema used for
//! display and filename templating.
//!
//! ## Schema:
//! - `location`: nearest named place, or "Unknown location"
//! - `recorder`: Android / GoPro / Unknown
//! - `duration`: stream duration in seconds
//! - `date`: canonical sortable timestamp, `YYYY-MM-DDTHH-mm-ss`
//! - `year`/`month`/`day`/`hour`/`minute`/`second`: zero-padded components
//!
//! ## Policies:
//! - A document without a stream list is unrecognized input (`Schema`)
//! - Last stream wins: multi-stream files report only the final stream's
//!   duration and creation time
//! - A missing or unparsable creation time on the winning stream fails
//!   with `InvalidTimestamp` instead of leaking bad dates downstream
//!
//! A record is always fully populated or construction fails outright;
//! no partial records are produced.

use crate::classifier::{self, Recorder};
use crate::error::RenameError;
use crate::location::{self, PlaceIndex};
use crate::prober::ProbeDocument;
use chrono::{DateTime, NaiveDateTime};
use tracing::debug;

/// Canonical sortable timestamp format
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Template fields, in display order
pub const FIELD_NAMES: &[&str] = &[
    "location", "recorder", "duration", "date", "year", "month", "day", "hour", "minute",
    "second",
];

/// Fixed-schema metadata derived from one probe document
#[derive(Debug, Clone)]
pub struct NormalizedMetadata {
    pub location: String,
    pub recorder: Recorder,
    pub duration: f64,
    pub date: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
}

impl NormalizedMetadata {
    /// String representation of a field, or `None` for unknown names
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "location" => Some(self.location.clone()),
            "recorder" => Some(self.recorder.to_string()),
            "duration" => Some(self.duration.to_string()),
            "date" => Some(self.date.clone()),
            "year" => Some(self.year.clone()),
            "month" => Some(self.month.clone()),
            "day" => Some(self.day.clone()),
            "hour" => Some(self.hour.clone()),
            "minute" => Some(self.minute.clone()),
            "second" => Some(self.second.clone()),
            _ => None,
        }
    }

    /// All fields with their values, in display order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        FIELD_NAMES
            .iter()
            .filter_map(|name| self.field(name).map(|value| (*name, value)))
            .collect()
    }
}

/// Normalize a probe document into the fixed schema
pub fn normalize(
    doc: &ProbeDocument,
    places: &PlaceIndex,
) -> Result<NormalizedMetadata, RenameError> {
    let streams = doc
        .streams()
        .ok_or_else(|| RenameError::Schema("probe output has no stream list".to_string()))?;

    if streams.is_empty() {
        return Err(RenameError::Schema(
            "probe output has an empty stream list".to_string(),
        ));
    }

    let location = location::resolve(doc, places);
    let recorder = classifier::classify(doc);

    // Last stream wins: every stream overwrites duration and creation
    // time, so multi-stream files report only the final stream's timing.
    let mut duration = 0.0;
    let mut creation_time: Option<&str> = None;
    for stream in streams {
        duration = stream_duration(stream);
        creation_time = stream["tags"]["creation_time"].as_str();
    }

    let raw_creation_time = creation_time.ok_or_else(|| {
        RenameError::InvalidTimestamp("no creation_time tag on the winning stream".to_string())
    })?;
    let timestamp = parse_creation_time(raw_creation_time)?;
    debug!("Normalized timestamp {} from {:?}", timestamp, raw_creation_time);

    Ok(NormalizedMetadata {
        location,
        recorder,
        duration,
        date: timestamp.format(DATE_FORMAT).to_string(),
        year: timestamp.format("%Y").to_string(),
        month: timestamp.format("%m").to_string(),
        day: timestamp.format("%d").to_string(),
        hour: timestamp.format("%H").to_string(),
        minute: timestamp.format("%M").to_string(),
        second: timestamp.format("%S").to_string(),
    })
}

/// ffprobe reports stream durations as decimal strings
fn stream_duration(stream: &serde_json::Value) -> f64 {
    stream["duration"]
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .or_else(|| stream["duration"].as_f64())
        .unwrap_or(0.0)
}

/// Parse an ffprobe creation time, usually RFC 3339 with a Z suffix
fn parse_creation_time(raw: &str) -> Result<NaiveDateTime, RenameError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.naive_utc());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| RenameError::InvalidTimestamp(raw.to_string()))
}
