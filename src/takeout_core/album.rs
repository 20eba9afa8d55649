use crate::takeout_core::error::{Result, TakeoutError};
use crate::takeout_core::media::MediaEntry;
use crate::takeout_core::media_set::MediaSet;
use crate::takeout_core::sidecar::SidecarResolver;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Album-level files written by the exporter that never describe a single photo.
pub const IGNORED_FILES: &[&str] = &[
    "metadata.json",
    "Metadata.json",
    "print-subscriptions.json",
    "shared_album_comments.json",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Album metadata or sharing files.
    AlbumMetadata,
    /// Extension is neither a photo nor a video.
    Unsupported,
    /// Nested folder; albums are expected to be flat.
    Directory,
    /// Could not be read or validated.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Everything found in one album directory.
#[derive(Debug, Clone)]
pub struct AlbumScan {
    pub name: String,
    pub path: PathBuf,
    pub media: MediaSet,
    /// Sidecar files seen while listing the album (matched or not).
    pub sidecar_files: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Scans a single, flat album directory.
#[derive(Debug, Clone)]
pub struct AlbumScanner {
    resolver: SidecarResolver,
    ignored_files: Vec<String>,
}

impl Default for AlbumScanner {
    fn default() -> Self {
        Self {
            resolver: SidecarResolver::default(),
            ignored_files: IGNORED_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AlbumScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(mut self, resolver: SidecarResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the list of exact filenames that are skipped as album metadata.
    pub fn with_ignored_files(mut self, ignored_files: Vec<String>) -> Self {
        self.ignored_files = ignored_files;
        self
    }

    pub fn resolver(&self) -> &SidecarResolver {
        &self.resolver
    }

    /// List the direct children of `album_dir`, build media entries and attach sidecars.
    ///
    /// Only an unreadable album directory is an error; problems with single
    /// files are recorded in [`AlbumScan::skipped`].
    pub fn scan(&self, album_dir: &Path) -> Result<AlbumScan> {
        if !album_dir.is_dir() {
            return Err(TakeoutError::NotADirectory(album_dir.to_path_buf()));
        }

        let name = album_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        log::info!("Scanning album: {}", name);

        let mut scan = AlbumScan {
            name,
            path: album_dir.to_path_buf(),
            media: MediaSet::new(),
            sidecar_files: 0,
            skipped: Vec::new(),
        };

        let walker = WalkDir::new(album_dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1);
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    log::warn!("Unreadable entry in album {}: {}", scan.name, e);
                    scan.skipped.push(SkippedFile {
                        path: e.path().map(Path::to_path_buf).unwrap_or_default(),
                        reason: SkipReason::Unreadable(e.to_string()),
                    });
                    continue;
                }
            };

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy();

            if entry.file_type().is_dir() {
                log::debug!("  Skipping nested folder: {}", file_name);
                scan.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: SkipReason::Directory,
                });
                continue;
            }

            if self.ignored_files.iter().any(|f| *f == file_name) {
                log::debug!("  Skipping album metadata: {}", file_name);
                scan.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: SkipReason::AlbumMetadata,
                });
                continue;
            }

            // Sidecars are picked up through their media file.
            if self.resolver.is_sidecar_name(&file_name) {
                scan.sidecar_files += 1;
                continue;
            }

            let mut media = match MediaEntry::new(path) {
                Ok(media) => media,
                Err(e) => {
                    let reason = match e {
                        TakeoutError::UnsupportedType(_) => SkipReason::Unsupported,
                        _ => SkipReason::Unreadable(e.to_string()),
                    };
                    if e.is_per_file() {
                        log::debug!("  Skipping {}: {}", file_name, e);
                    } else {
                        log::warn!("  Skipping {}: {}", file_name, e);
                    }
                    scan.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        reason,
                    });
                    continue;
                }
            };

            match self.resolver.resolve(path) {
                Some(sidecar) => {
                    if let Err(e) = media.set_sidecar(sidecar) {
                        log::warn!("  Could not attach sidecar for {}: {}", file_name, e);
                    } else {
                        log::debug!("  {} (has JSON)", file_name);
                    }
                }
                None => log::debug!("  {} (no JSON)", file_name),
            }

            scan.media.push(media);
        }

        log::info!(
            "  Found {} files ({} with JSON, {} skipped)",
            scan.media.len(),
            scan.media.with_sidecar().len(),
            scan.skipped.len()
        );

        Ok(scan)
    }
}
