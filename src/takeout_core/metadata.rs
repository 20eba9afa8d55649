use crate::takeout_core::error::{Result, TakeoutError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Date format used by embedded-metadata tags.
pub const TAG_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Longest description shown by `Display` before it is cut off.
const DESCRIPTION_PREVIEW_CHARS: usize = 50;

/// A validated GPS position. Hemisphere references are derived from sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsCoordinate {
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
}

impl GpsCoordinate {
    /// Build a coordinate, rejecting latitudes outside [-90, 90] and
    /// longitudes outside [-180, 180] (NaN included).
    pub fn new(latitude: f64, longitude: f64, altitude: Option<f64>) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(TakeoutError::InvalidCoordinate(format!(
                "latitude must be between -90 and 90, got {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(TakeoutError::InvalidCoordinate(format!(
                "longitude must be between -180 and 180, got {longitude}"
            )));
        }
        Ok(GpsCoordinate {
            latitude,
            longitude,
            altitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    /// `'N'` for latitudes >= 0, `'S'` otherwise.
    pub fn latitude_ref(&self) -> char {
        if self.latitude >= 0.0 { 'N' } else { 'S' }
    }

    /// `'E'` for longitudes >= 0, `'W'` otherwise.
    pub fn longitude_ref(&self) -> char {
        if self.longitude >= 0.0 { 'E' } else { 'W' }
    }
}

impl fmt::Display for GpsCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}°{}, {:.6}°{}",
            self.latitude.abs(),
            self.latitude_ref(),
            self.longitude.abs(),
            self.longitude_ref()
        )
    }
}

/// Normalized capture metadata. Every field is optional.
///
/// Records are built with the `with_*` methods and are read-only afterwards;
/// combining two records goes through [`Metadata::merge`], which returns a
/// new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    #[serde(with = "time::serde::rfc3339::option")]
    taken_at: Option<OffsetDateTime>,
    gps: Option<GpsCoordinate>,
    description: Option<String>,
    title: Option<String>,
    camera_make: Option<String>,
    camera_model: Option<String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capture time. The instant is stored in UTC.
    pub fn with_taken_at(mut self, taken_at: OffsetDateTime) -> Self {
        self.taken_at = Some(taken_at.to_offset(UtcOffset::UTC));
        self
    }

    pub fn with_gps(mut self, gps: GpsCoordinate) -> Self {
        self.gps = Some(gps);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_camera_make(mut self, make: impl Into<String>) -> Self {
        self.camera_make = Some(make.into());
        self
    }

    pub fn with_camera_model(mut self, model: impl Into<String>) -> Self {
        self.camera_model = Some(model.into());
        self
    }

    pub fn taken_at(&self) -> Option<OffsetDateTime> {
        self.taken_at
    }

    pub fn gps(&self) -> Option<&GpsCoordinate> {
        self.gps.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn camera_make(&self) -> Option<&str> {
        self.camera_make.as_deref()
    }

    pub fn camera_model(&self) -> Option<&str> {
        self.camera_model.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.taken_at.is_none()
            && self.gps.is_none()
            && self.description.is_none()
            && self.title.is_none()
            && self.camera_make.is_none()
            && self.camera_model.is_none()
    }

    /// A record is worth attaching to a media entry when it carries anything at all.
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
    }

    pub fn has_timestamp(&self) -> bool {
        self.taken_at.is_some()
    }

    pub fn has_gps(&self) -> bool {
        self.gps.is_some()
    }

    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    /// Field-level union of two records.
    ///
    /// Each field resolves to the preferred side's value when that side has
    /// one, otherwise to whichever side has a value. An absent field never
    /// overrides a present one. Neither input is modified.
    pub fn merge(&self, other: &Metadata, prefer_other: bool) -> Metadata {
        fn pick<T: Clone>(base: &Option<T>, other: &Option<T>, prefer_other: bool) -> Option<T> {
            if prefer_other {
                other.clone().or_else(|| base.clone())
            } else {
                base.clone().or_else(|| other.clone())
            }
        }

        Metadata {
            taken_at: pick(&self.taken_at, &other.taken_at, prefer_other),
            gps: pick(&self.gps, &other.gps, prefer_other),
            description: pick(&self.description, &other.description, prefer_other),
            title: pick(&self.title, &other.title, prefer_other),
            camera_make: pick(&self.camera_make, &other.camera_make, prefer_other),
            camera_model: pick(&self.camera_model, &other.camera_model, prefer_other),
        }
    }

    /// Flatten into embedded-metadata tag names, for a downstream tag writer.
    /// Only fields with a value appear; empty text is treated as no value.
    pub fn to_tags(&self) -> BTreeMap<&'static str, TagValue> {
        let mut tags = BTreeMap::new();

        if let Some(taken_at) = self.taken_at {
            if let Ok(formatted) = taken_at.format(TAG_DATE_FORMAT) {
                for key in ["DateTimeOriginal", "CreateDate", "ModifyDate"] {
                    tags.insert(key, TagValue::Text(formatted.clone()));
                }
            }
        }

        if let Some(gps) = &self.gps {
            tags.insert("GPSLatitude", TagValue::Number(gps.latitude.abs()));
            tags.insert("GPSLongitude", TagValue::Number(gps.longitude.abs()));
            tags.insert("GPSLatitudeRef", TagValue::Text(gps.latitude_ref().to_string()));
            tags.insert("GPSLongitudeRef", TagValue::Text(gps.longitude_ref().to_string()));
            if let Some(altitude) = gps.altitude {
                tags.insert("GPSAltitude", TagValue::Number(altitude));
            }
        }

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            for key in ["ImageDescription", "Caption-Abstract", "UserComment"] {
                tags.insert(key, TagValue::Text(description.to_string()));
            }
        }

        let text_fields = [
            ("Title", &self.title),
            ("Make", &self.camera_make),
            ("Model", &self.camera_model),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                tags.insert(key, TagValue::Text(value.to_string()));
            }
        }

        tags
    }
}

/// Free-function form of [`Metadata::merge`].
pub fn merge(base: &Metadata, other: &Metadata, prefer_other: bool) -> Metadata {
    base.merge(other, prefer_other)
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(taken_at) = self.taken_at {
            if let Ok(date) = taken_at.format(DISPLAY_DATE_FORMAT) {
                parts.push(format!("Date: {date}"));
            }
        }
        if let Some(gps) = &self.gps {
            parts.push(format!("GPS: {gps}"));
        }
        if let Some(description) = &self.description {
            let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
            if description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
                parts.push(format!("Description: {preview}..."));
            } else {
                parts.push(format!("Description: {preview}"));
            }
        }
        if let Some(title) = &self.title {
            parts.push(format!("Title: {title}"));
        }

        if parts.is_empty() {
            write!(f, "Metadata(empty)")
        } else {
            write!(f, "Metadata({})", parts.join(", "))
        }
    }
}

/// A single tag value handed to a tag writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(s) => write!(f, "{s}"),
            TagValue::Number(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_hemisphere_refs() {
        let gps = GpsCoordinate::new(45.5, -122.6, None).unwrap();
        assert_eq!(gps.latitude_ref(), 'N');
        assert_eq!(gps.longitude_ref(), 'W');

        let gps = GpsCoordinate::new(-33.9, 151.2, Some(12.0)).unwrap();
        assert_eq!(gps.latitude_ref(), 'S');
        assert_eq!(gps.longitude_ref(), 'E');
    }

    #[test]
    fn test_zero_is_north_and_east() {
        let gps = GpsCoordinate::new(0.0, 0.0, None).unwrap();
        assert_eq!(gps.latitude_ref(), 'N');
        assert_eq!(gps.longitude_ref(), 'E');
    }

    #[test]
    fn test_out_of_range_coordinates() {
        assert!(GpsCoordinate::new(91.0, 0.0, None).is_err());
        assert!(GpsCoordinate::new(0.0, -181.0, None).is_err());
        assert!(GpsCoordinate::new(f64::NAN, 0.0, None).is_err());
        assert!(GpsCoordinate::new(90.0, -180.0, None).is_ok());
    }

    #[test]
    fn test_gps_display() {
        let gps = GpsCoordinate::new(12.3456789, -98.7654321, None).unwrap();
        assert_eq!(gps.to_string(), "12.345679°N, 98.765432°W");
    }

    #[test]
    fn test_taken_at_is_normalized_to_utc() {
        let md = Metadata::new().with_taken_at(datetime!(2023-06-15 16:30:00 +02:00));
        let taken_at = md.taken_at().unwrap();
        assert_eq!(taken_at.offset(), UtcOffset::UTC);
        assert_eq!(taken_at, datetime!(2023-06-15 14:30:00 UTC));
    }

    #[test]
    fn test_empty_and_valid() {
        let md = Metadata::new();
        assert!(md.is_empty());
        assert!(!md.is_valid());
        assert!(Metadata::new().with_camera_make("Canon").is_valid());
    }

    #[test]
    fn test_has_description_ignores_blank() {
        assert!(!Metadata::new().with_description("   ").has_description());
        assert!(Metadata::new().with_description("Sunset").has_description());
    }

    #[test]
    fn test_merge_prefers_present_values() {
        let base = Metadata::new().with_title("Base").with_description("kept");
        let other = Metadata::new().with_title("Other");

        let merged = base.merge(&other, false);
        assert_eq!(merged.title(), Some("Base"));
        assert_eq!(merged.description(), Some("kept"));

        let merged = base.merge(&other, true);
        assert_eq!(merged.title(), Some("Other"));
        // Absent in the preferred side never overrides.
        assert_eq!(merged.description(), Some("kept"));
    }

    #[test]
    fn test_merge_is_field_level() {
        let a = Metadata::new().with_title("Beach");
        let b = Metadata::new().with_taken_at(datetime!(2023-06-15 14:30:00 UTC));
        let merged = merge(&a, &b, false);
        assert_eq!(merged.title(), Some("Beach"));
        assert!(merged.has_timestamp());
        // Inputs are untouched.
        assert!(!a.has_timestamp());
        assert!(b.title().is_none());
    }

    #[test]
    fn test_merge_disjoint_is_commutative() {
        let a = Metadata::new()
            .with_title("Beach")
            .with_gps(GpsCoordinate::new(1.0, 2.0, None).unwrap());
        let b = Metadata::new()
            .with_description("Sunset")
            .with_camera_model("Pixel 7");
        assert_eq!(merge(&a, &b, false), merge(&b, &a, true));
    }

    #[test]
    fn test_to_tags() {
        let md = Metadata::new()
            .with_taken_at(datetime!(2023-06-15 14:30:00 UTC))
            .with_gps(GpsCoordinate::new(-33.5, 151.25, Some(40.0)).unwrap())
            .with_description("Sunset")
            .with_title("Beach");
        let tags = md.to_tags();

        assert_eq!(
            tags["DateTimeOriginal"],
            TagValue::Text("2023:06:15 14:30:00".into())
        );
        assert_eq!(tags["ModifyDate"], tags["CreateDate"]);
        assert_eq!(tags["GPSLatitude"], TagValue::Number(33.5));
        assert_eq!(tags["GPSLatitudeRef"], TagValue::Text("S".into()));
        assert_eq!(tags["GPSLongitudeRef"], TagValue::Text("E".into()));
        assert_eq!(tags["GPSAltitude"], TagValue::Number(40.0));
        assert_eq!(tags["UserComment"], TagValue::Text("Sunset".into()));
        assert_eq!(tags["Title"], TagValue::Text("Beach".into()));
        assert!(!tags.contains_key("Make"));
        assert!(!tags.contains_key("Model"));
    }

    #[test]
    fn test_to_tags_skips_empty_text() {
        let md = Metadata::new().with_description("").with_title("");
        assert!(md.to_tags().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Metadata::new().to_string(), "Metadata(empty)");

        let md = Metadata::new()
            .with_taken_at(datetime!(2023-06-15 14:30:00 UTC))
            .with_title("Beach");
        assert_eq!(
            md.to_string(),
            "Metadata(Date: 2023-06-15 14:30:00, Title: Beach)"
        );

        let long = "x".repeat(60);
        let md = Metadata::new().with_description(long);
        assert_eq!(
            md.to_string(),
            format!("Metadata(Description: {}...)", "x".repeat(50))
        );
    }

    #[test]
    fn test_serialize_timestamp_as_rfc3339() {
        let md = Metadata::new().with_taken_at(datetime!(2023-06-15 14:30:00 UTC));
        let json = serde_json::to_value(&md).unwrap();
        assert_eq!(json["taken_at"], "2023-06-15T14:30:00Z");
        assert!(json["gps"].is_null());
    }
}
