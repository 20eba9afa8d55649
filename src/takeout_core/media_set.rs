use crate::takeout_core::error::Result;
use crate::takeout_core::media::{MediaEntry, MediaKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Counts of entries per media kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub photos: usize,
    pub videos: usize,
    pub total: usize,
}

/// Outcome of normalizing every sidecar in a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetadataLoadReport {
    /// Entries that received a metadata record.
    pub loaded: usize,
    /// Sidecars that parsed but carried no usable field.
    pub empty: usize,
    /// Sidecars that could not be read or parsed.
    pub failed: usize,
    /// Entries without a sidecar.
    pub no_sidecar: usize,
}

/// An ordered collection of media entries.
///
/// Insertion order is kept until one of the `sort_*` methods is called.
/// Path uniqueness is not enforced here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaSet {
    entries: Vec<MediaEntry>,
}

impl MediaSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: MediaEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, MediaEntry> {
        self.entries.iter_mut()
    }

    pub fn of_kind(&self, kind: MediaKind) -> Vec<&MediaEntry> {
        self.entries.iter().filter(|e| e.kind() == kind).collect()
    }

    pub fn photos(&self) -> Vec<&MediaEntry> {
        self.of_kind(MediaKind::Photo)
    }

    pub fn videos(&self) -> Vec<&MediaEntry> {
        self.of_kind(MediaKind::Video)
    }

    pub fn with_metadata(&self) -> Vec<&MediaEntry> {
        self.entries.iter().filter(|e| e.has_metadata()).collect()
    }

    pub fn without_metadata(&self) -> Vec<&MediaEntry> {
        self.entries.iter().filter(|e| !e.has_metadata()).collect()
    }

    pub fn with_sidecar(&self) -> Vec<&MediaEntry> {
        self.entries.iter().filter(|e| e.has_sidecar()).collect()
    }

    pub fn without_sidecar(&self) -> Vec<&MediaEntry> {
        self.entries.iter().filter(|e| !e.has_sidecar()).collect()
    }

    pub fn count_by_kind(&self) -> KindCounts {
        let mut counts = KindCounts {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.kind() {
                MediaKind::Photo => counts.photos += 1,
                MediaKind::Video => counts.videos += 1,
                MediaKind::Unknown => {}
            }
        }
        counts
    }

    /// Entries per year of their effective timestamp, ordered by year.
    pub fn count_by_year(&self) -> Result<BTreeMap<i32, usize>> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.year()?).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Total size in bytes.
    pub fn total_size(&self) -> Result<u64> {
        self.entries.iter().map(MediaEntry::file_size).sum()
    }

    pub fn total_size_mb(&self) -> Result<f64> {
        Ok(self.total_size()? as f64 / BYTES_PER_MB)
    }

    /// Sort by effective timestamp, oldest first unless `reverse`.
    /// Same order as [`MediaEntry::cmp_by_date`], reading each timestamp once.
    pub fn sort_by_date(&mut self, reverse: bool) {
        self.entries.sort_by_cached_key(|e| e.effective_timestamp().ok());
        if reverse {
            self.entries.reverse();
        }
    }

    /// Sort by file size, smallest first unless `reverse`.
    pub fn sort_by_size(&mut self, reverse: bool) {
        self.entries.sort_by_cached_key(|e| e.file_size().unwrap_or(0));
        if reverse {
            self.entries.reverse();
        }
    }

    /// Normalize the sidecar of every entry and attach the results.
    ///
    /// Failures are logged and counted; they never stop the loop.
    pub fn load_metadata(&mut self) -> MetadataLoadReport {
        self.load_metadata_with(|_, _| {})
    }

    /// Like [`MediaSet::load_metadata`], calling `progress(done, total)` after each entry.
    pub fn load_metadata_with(
        &mut self,
        mut progress: impl FnMut(usize, usize),
    ) -> MetadataLoadReport {
        let mut report = MetadataLoadReport::default();
        let total = self.entries.len();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            progress(i + 1, total);
            if entry.sidecar().is_none() {
                report.no_sidecar += 1;
                continue;
            }
            match entry.load_sidecar_metadata() {
                Ok(true) => report.loaded += 1,
                Ok(false) => report.empty += 1,
                Err(e) => {
                    log::warn!("No metadata for {}: {}", entry.path().display(), e);
                    report.failed += 1;
                }
            }
        }
        log::info!(
            "Metadata loaded for {} files ({} empty, {} failed, {} without sidecar)",
            report.loaded,
            report.empty,
            report.failed,
            report.no_sidecar
        );
        report
    }
}

impl Extend<MediaEntry> for MediaSet {
    fn extend<I: IntoIterator<Item = MediaEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<MediaEntry> for MediaSet {
    fn from_iter<I: IntoIterator<Item = MediaEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MediaSet {
    type Item = MediaEntry;
    type IntoIter = std::vec::IntoIter<MediaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a MediaSet {
    type Item = &'a MediaEntry;
    type IntoIter = std::slice::Iter<'a, MediaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for MediaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self.count_by_kind();
        write!(
            f,
            "MediaSet: {} files ({} photos, {} videos)",
            counts.total, counts.photos, counts.videos
        )?;
        if let Ok(size) = self.total_size_mb() {
            write!(f, ", Total size: {size:.2} MB")?;
        }
        Ok(())
    }
}
