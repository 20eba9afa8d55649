use crate::takeout_core::error::{Result, TakeoutError};
use crate::takeout_core::metadata::Metadata;
use crate::takeout_core::takeout_json::read_sidecar;
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Photo file extensions (lowercase).
pub const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "heic", "heif", "webp", "bmp", "tiff", "tif",
];

/// Video file extensions (lowercase).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v", "3gp", "wmv"];

const BYTES_PER_MB: f64 = 1_048_576.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photo,
    Video,
    Unknown,
}

impl MediaKind {
    /// Classify a path by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> MediaKind {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return MediaKind::Unknown;
        };
        let ext = ext.to_lowercase();

        if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Photo
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Unknown => "unknown",
        }
    }

    pub fn is_supported(&self) -> bool {
        *self != MediaKind::Unknown
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One exported media file, its sidecar (if found) and its metadata (once loaded).
///
/// Two entries are equal when their media paths are equal. The sidecar path and
/// the metadata record are one-time slots: set them once, combine later sources
/// with [`MediaEntry::merge_metadata`].
#[derive(Debug, Clone)]
pub struct MediaEntry {
    path: PathBuf,
    sidecar: Option<PathBuf>,
    metadata: Option<Metadata>,
}

impl MediaEntry {
    /// Wrap an existing regular file with a photo or video extension.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Err(TakeoutError::PathNotFound(path));
        }
        if !path.is_file() {
            return Err(TakeoutError::NotAFile(path));
        }
        if !MediaKind::from_path(&path).is_supported() {
            return Err(TakeoutError::UnsupportedType(path));
        }

        Ok(MediaEntry {
            path,
            sidecar: None,
            metadata: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sidecar(&self) -> Option<&Path> {
        self.sidecar.as_deref()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Record the sidecar for this entry. The file must exist.
    pub fn set_sidecar(&mut self, sidecar: impl Into<PathBuf>) -> Result<()> {
        let sidecar = sidecar.into();
        if self.sidecar.is_some() {
            return Err(TakeoutError::AlreadySet {
                what: "sidecar",
                path: self.path.clone(),
            });
        }
        if !sidecar.exists() {
            return Err(TakeoutError::PathNotFound(sidecar));
        }
        self.sidecar = Some(sidecar);
        Ok(())
    }

    /// Attach a metadata record. Empty records are refused.
    pub fn attach_metadata(&mut self, metadata: Metadata) -> Result<()> {
        if self.metadata.is_some() {
            return Err(TakeoutError::AlreadySet {
                what: "metadata",
                path: self.path.clone(),
            });
        }
        if metadata.is_empty() {
            return Err(TakeoutError::EmptyMetadata(self.path.clone()));
        }
        self.metadata = Some(metadata);
        Ok(())
    }

    /// Fold another source into the attached record (or attach it if none is).
    pub fn merge_metadata(&mut self, other: &Metadata, prefer_other: bool) -> Result<()> {
        match &self.metadata {
            Some(current) => {
                self.metadata = Some(current.merge(other, prefer_other));
                Ok(())
            }
            None => self.attach_metadata(other.clone()),
        }
    }

    /// Normalize the sidecar and attach the result.
    ///
    /// Returns `Ok(false)` when there is no sidecar or it holds nothing usable.
    pub fn load_sidecar_metadata(&mut self) -> Result<bool> {
        let Some(sidecar) = &self.sidecar else {
            return Ok(false);
        };
        let metadata = read_sidecar(sidecar)?;
        if metadata.is_empty() {
            log::debug!("Sidecar {} carries no metadata", sidecar.display());
            return Ok(false);
        }
        self.merge_metadata(&metadata, false)?;
        Ok(true)
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Lowercase extension without the leading dot.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .unwrap_or_default()
            .to_string_lossy()
            .to_lowercase()
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_path(&self.path)
    }

    pub fn is_photo(&self) -> bool {
        self.kind() == MediaKind::Photo
    }

    pub fn is_video(&self) -> bool {
        self.kind() == MediaKind::Video
    }

    pub fn file_size(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    pub fn size_mb(&self) -> Result<f64> {
        Ok(self.file_size()? as f64 / BYTES_PER_MB)
    }

    pub fn modified_at(&self) -> Result<OffsetDateTime> {
        Ok(OffsetDateTime::from(fs::metadata(&self.path)?.modified()?))
    }

    /// Filesystem creation time. Not every platform records one.
    pub fn created_at(&self) -> Result<OffsetDateTime> {
        Ok(OffsetDateTime::from(fs::metadata(&self.path)?.created()?))
    }

    /// Whether a sidecar was recorded and is still on disk.
    pub fn has_sidecar(&self) -> bool {
        self.sidecar.as_deref().is_some_and(Path::exists)
    }

    pub fn has_metadata(&self) -> bool {
        self.metadata.as_ref().is_some_and(Metadata::is_valid)
    }

    /// Capture time from metadata when attached, otherwise the file's modification time.
    pub fn effective_timestamp(&self) -> Result<OffsetDateTime> {
        if let Some(taken_at) = self.metadata.as_ref().and_then(Metadata::taken_at) {
            return Ok(taken_at);
        }
        self.modified_at()
    }

    /// Chronological order by effective timestamp. An entry whose timestamp
    /// cannot be read orders before every other entry.
    pub fn cmp_by_date(&self, other: &MediaEntry) -> Ordering {
        self.effective_timestamp()
            .ok()
            .cmp(&other.effective_timestamp().ok())
    }

    pub fn year(&self) -> Result<i32> {
        Ok(self.effective_timestamp()?.year())
    }

    pub fn month(&self) -> Result<u8> {
        Ok(u8::from(self.effective_timestamp()?.month()))
    }

    /// Effective timestamp as `YYYY/MM`.
    pub fn year_month(&self) -> Result<String> {
        let ts = self.effective_timestamp()?;
        Ok(format!("{}/{:02}", ts.year(), u8::from(ts.month())))
    }
}

impl PartialEq for MediaEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for MediaEntry {}

impl Hash for MediaEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for MediaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File: {} | Type: {}", self.filename(), self.kind())?;
        if let Ok(size) = self.size_mb() {
            write!(f, " | Size: {size:.2} MB")?;
        }
        if self.has_sidecar() {
            write!(f, " | Has JSON")?;
        }
        if let Some(metadata) = self.metadata.as_ref().filter(|m| m.is_valid()) {
            write!(f, " | {metadata}")?;
        }
        Ok(())
    }
}
