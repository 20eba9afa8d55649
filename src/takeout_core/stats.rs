use crate::takeout_core::album::AlbumScan;
use serde::Serialize;
use std::fmt;

/// Per-album counts, derived from one album scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlbumStats {
    pub name: String,
    pub total_files: usize,
    pub photos: usize,
    pub videos: usize,
    pub with_sidecar: usize,
    pub without_sidecar: usize,
    pub sidecar_files: usize,
    pub skipped: usize,
}

impl AlbumStats {
    pub fn from_scan(scan: &AlbumScan) -> Self {
        let counts = scan.media.count_by_kind();
        let with_sidecar = scan.media.with_sidecar().len();
        AlbumStats {
            name: scan.name.clone(),
            total_files: counts.total,
            photos: counts.photos,
            videos: counts.videos,
            with_sidecar,
            without_sidecar: counts.total - with_sidecar,
            sidecar_files: scan.sidecar_files,
            skipped: scan.skipped.len(),
        }
    }
}

/// Totals for a whole export, plus the per-album breakdown in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub albums_scanned: usize,
    pub total_files: usize,
    pub photos: usize,
    pub videos: usize,
    pub with_sidecar: usize,
    pub without_sidecar: usize,
    pub skipped: usize,
    pub failed_albums: Vec<String>,
    pub albums: Vec<AlbumStats>,
}

impl ScanStats {
    /// Build totals from album scans. Nothing else feeds these numbers.
    pub fn from_scans<'a>(
        scans: impl IntoIterator<Item = &'a AlbumScan>,
        failed_albums: Vec<String>,
    ) -> Self {
        let mut stats = ScanStats {
            failed_albums,
            ..Default::default()
        };

        for scan in scans {
            let album = AlbumStats::from_scan(scan);
            stats.albums_scanned += 1;
            stats.total_files += album.total_files;
            stats.photos += album.photos;
            stats.videos += album.videos;
            stats.with_sidecar += album.with_sidecar;
            stats.without_sidecar += album.without_sidecar;
            stats.skipped += album.skipped;
            stats.albums.push(album);
        }

        stats
    }

    pub fn album(&self, name: &str) -> Option<&AlbumStats> {
        self.albums.iter().find(|a| a.name == name)
    }
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Albums scanned:  {:>8}", self.albums_scanned)?;
        writeln!(f, "─────────────────────────────────")?;
        writeln!(f, "Total files:     {:>8}", self.total_files)?;
        writeln!(f, "  Photos:        {:>8}", self.photos)?;
        writeln!(f, "  Videos:        {:>8}", self.videos)?;
        writeln!(f, "  With JSON:     {:>8}", self.with_sidecar)?;
        writeln!(f, "  Without JSON:  {:>8}", self.without_sidecar)?;
        writeln!(f, "  Skipped:       {:>8}", self.skipped)?;
        if !self.failed_albums.is_empty() {
            writeln!(f, "Failed albums:   {}", self.failed_albums.join(", "))?;
        }
        writeln!(f, "─────────────────────────────────")?;
        for album in &self.albums {
            writeln!(
                f,
                "{}: {} files ({} photos, {} videos), {} with JSON, {} without, {} skipped",
                album.name,
                album.total_files,
                album.photos,
                album.videos,
                album.with_sidecar,
                album.without_sidecar,
                album.skipped
            )?;
        }
        Ok(())
    }
}
