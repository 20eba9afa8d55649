//! Decoding of the JSON sidecars written next to exported media.

use crate::takeout_core::error::{Result, TakeoutError};
use crate::takeout_core::metadata::{GpsCoordinate, Metadata};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use time::OffsetDateTime;

/// The subset of the sidecar schema we read. Anything else is ignored.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawSidecar {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    photo_taken_time: Option<RawTimestamp>,
    #[serde(default)]
    geo_data: Option<RawGeoData>,
}

#[derive(Deserialize, Debug, Default)]
struct RawTimestamp {
    #[serde(default)]
    timestamp: Option<Value>, // Usually a string "1686839400", sometimes a number
}

#[derive(Deserialize, Debug, Default)]
struct RawGeoData {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    altitude: Option<f64>,
}

/// Epoch seconds from a string or integer value. `Ok(None)` means absent.
fn value_to_epoch(v: &Value) -> std::result::Result<Option<i64>, String> {
    match v {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| format!("timestamp {n} is not an integer")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("timestamp '{s}' is not a number")),
        other => Err(format!("unexpected timestamp value {other}")),
    }
}

fn normalize(raw: RawSidecar) -> std::result::Result<Metadata, String> {
    let mut metadata = Metadata::new();

    if let Some(epoch) = raw
        .photo_taken_time
        .and_then(|t| t.timestamp)
        .map(|v| value_to_epoch(&v))
        .transpose()?
        .flatten()
    {
        let taken_at = OffsetDateTime::from_unix_timestamp(epoch)
            .map_err(|e| format!("timestamp {epoch} out of range: {e}"))?;
        metadata = metadata.with_taken_at(taken_at);
    }

    if let Some(geo) = raw.geo_data {
        match (geo.latitude, geo.longitude) {
            // The exporter writes 0/0 when there is no location.
            (Some(lat), Some(lon)) if lat == 0.0 && lon == 0.0 => {}
            (Some(lat), Some(lon)) => {
                let gps = GpsCoordinate::new(lat, lon, geo.altitude).map_err(|e| e.to_string())?;
                metadata = metadata.with_gps(gps);
            }
            _ => {}
        }
    }

    if let Some(description) = raw.description {
        metadata = metadata.with_description(description);
    }
    if let Some(title) = raw.title {
        metadata = metadata.with_title(title);
    }

    Ok(metadata)
}

/// Normalize sidecar JSON text. `path` is only used for error reporting.
pub fn parse_sidecar(path: &Path, json: &str) -> Result<Metadata> {
    let parse_failure = |reason: String| TakeoutError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let raw: RawSidecar = serde_json::from_str(json).map_err(|e| parse_failure(e.to_string()))?;
    normalize(raw).map_err(parse_failure)
}

/// Read and normalize a sidecar file.
///
/// Missing, unreadable or malformed files all come back as
/// [`TakeoutError::Parse`]; the caller decides whether that matters.
pub fn read_sidecar(path: &Path) -> Result<Metadata> {
    let json = fs::read_to_string(path).map_err(|e| TakeoutError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let metadata = parse_sidecar(path, &json)?;
    log::debug!("Parsed sidecar {}: {}", path.display(), metadata);
    Ok(metadata)
}
