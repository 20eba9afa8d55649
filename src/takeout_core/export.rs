use crate::takeout_core::album::{AlbumScan, AlbumScanner};
use crate::takeout_core::error::{Result, TakeoutError};
use crate::takeout_core::media_set::MediaSet;
use crate::takeout_core::stats::ScanStats;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Names the exporter gives the photos folder, tried in order.
pub const PHOTOS_DIR_NAMES: &[&str] = &[
    "Google Photos",
    "Google Fotos", // DE, ES, PT
    "Google Foto",  // IT, NL
    "Photos",
];

/// Result of scanning a whole export.
#[derive(Debug, Clone)]
pub struct ExportScan {
    /// Every media entry, album by album in discovery order.
    pub media: MediaSet,
    pub albums: Vec<AlbumScan>,
    pub stats: ScanStats,
}

/// Locates the photos folder of an export and scans each album in it.
#[derive(Debug, Clone)]
pub struct ExportScanner {
    root: PathBuf,
    photos_dir: PathBuf,
    album_scanner: AlbumScanner,
    parallel: bool,
}

impl ExportScanner {
    /// Open an export root using the default photos folder names.
    pub fn open(root: &Path) -> Result<Self> {
        Self::open_with_names(root, PHOTOS_DIR_NAMES)
    }

    /// Open an export root, looking for the photos folder under `names` in order.
    pub fn open_with_names(root: &Path, names: &[&str]) -> Result<Self> {
        if !root.exists() {
            return Err(TakeoutError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(TakeoutError::NotADirectory(root.to_path_buf()));
        }

        let photos_dir = find_photos_dir(root, names)?;
        log::info!("Export root: {}", root.display());
        log::info!("Photos directory: {}", photos_dir.display());

        Ok(ExportScanner {
            root: root.to_path_buf(),
            photos_dir,
            album_scanner: AlbumScanner::default(),
            parallel: false,
        })
    }

    pub fn with_album_scanner(mut self, album_scanner: AlbumScanner) -> Self {
        self.album_scanner = album_scanner;
        self
    }

    /// Scan albums on the rayon pool. Results are merged in discovery order.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn photos_dir(&self) -> &Path {
        &self.photos_dir
    }

    /// Direct subdirectories of the photos folder, in filesystem order.
    ///
    /// Symlinked albums are followed. A link that cannot be resolved is still
    /// returned so that scanning it fails and lands in the failed albums.
    pub fn album_dirs(&self) -> Result<Vec<PathBuf>> {
        let mut albums = Vec::new();
        let walker = WalkDir::new(&self.photos_dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1);
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => albums.push(entry.into_path()),
                Ok(_) => {}
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    log::warn!("Unreadable entry in {}: {}", self.photos_dir.display(), e);
                    if let Some(path) = e.path() {
                        albums.push(path.to_path_buf());
                    }
                }
            }
        }
        log::info!("Found {} album folders", albums.len());
        Ok(albums)
    }

    /// Scan every album and aggregate the results.
    ///
    /// An album that cannot be listed is logged and reported in
    /// [`ScanStats::failed_albums`]; it does not stop the other albums.
    pub fn scan(&self) -> Result<ExportScan> {
        log::info!("Starting export scan...");
        let album_dirs = self.album_dirs()?;

        let results: Vec<(PathBuf, Result<AlbumScan>)> = if self.parallel {
            album_dirs
                .par_iter()
                .map(|dir| (dir.clone(), self.album_scanner.scan(dir)))
                .collect()
        } else {
            album_dirs
                .iter()
                .map(|dir| (dir.clone(), self.album_scanner.scan(dir)))
                .collect()
        };

        let mut albums = Vec::with_capacity(results.len());
        let mut failed_albums = Vec::new();
        for (dir, result) in results {
            match result {
                Ok(album) => albums.push(album),
                Err(e) => {
                    log::warn!("Failed to scan album {}: {}", dir.display(), e);
                    failed_albums.push(
                        dir.file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .to_string(),
                    );
                }
            }
        }

        let stats = ScanStats::from_scans(&albums, failed_albums);
        let media: MediaSet = albums
            .iter()
            .flat_map(|album| album.media.iter().cloned())
            .collect();

        log::info!(
            "Scan complete: {} albums, {} files ({} with JSON, {} without, {} skipped)",
            stats.albums_scanned,
            stats.total_files,
            stats.with_sidecar,
            stats.without_sidecar,
            stats.skipped
        );

        Ok(ExportScan {
            media,
            albums,
            stats,
        })
    }

    /// Human-readable overview of the albums and their file counts.
    pub fn summary(&self) -> Result<String> {
        let album_dirs = self.album_dirs()?;
        let mut out = format!(
            "Export directory: {}\nPhotos directory: {}\n\nAlbums found ({}):\n",
            self.root.display(),
            self.photos_dir.display(),
            album_dirs.len()
        );

        for dir in &album_dirs {
            match self.album_scanner.scan(dir) {
                Ok(album) => out.push_str(&format!(
                    "  {}\n     Media files: {}\n     JSON files: {}\n",
                    album.name,
                    album.media.len(),
                    album.sidecar_files
                )),
                Err(e) => out.push_str(&format!("  {} (unreadable: {})\n", dir.display(), e)),
            }
        }

        Ok(out)
    }
}

fn find_photos_dir(root: &Path, names: &[&str]) -> Result<PathBuf> {
    for name in names {
        let candidate = root.join(name);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    let mut available: Vec<String> = WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    available.sort();

    Err(TakeoutError::Structure {
        root: root.to_path_buf(),
        available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_open_finds_localized_dir() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("Google Fotos/Urlaub").create_dir_all().unwrap();

        let scanner = ExportScanner::open(temp.path()).unwrap();
        assert_eq!(scanner.photos_dir(), temp.path().join("Google Fotos"));
    }

    #[test]
    fn test_open_prefers_earlier_names() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("Photos").create_dir_all().unwrap();
        temp.child("Google Photos").create_dir_all().unwrap();

        let scanner = ExportScanner::open(temp.path()).unwrap();
        assert_eq!(scanner.photos_dir(), temp.path().join("Google Photos"));
    }

    #[test]
    fn test_open_structure_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("Drive").create_dir_all().unwrap();
        temp.child("Mail").create_dir_all().unwrap();
        temp.child("archive_browser.html").touch().unwrap();

        match ExportScanner::open(temp.path()) {
            Err(TakeoutError::Structure { available, .. }) => {
                assert_eq!(available, vec!["Drive", "Mail"]);
            }
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_structure_error_lists_linked_dirs() {
        let temp = assert_fs::TempDir::new().unwrap();
        let export = temp.child("export");
        export.child("Drive").create_dir_all().unwrap();
        temp.child("mail-archive").create_dir_all().unwrap();
        std::os::unix::fs::symlink(temp.path().join("mail-archive"), export.path().join("Mail"))
            .unwrap();

        match ExportScanner::open(export.path()) {
            Err(TakeoutError::Structure { available, .. }) => {
                assert_eq!(available, vec!["Drive", "Mail"]);
            }
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[test]
    fn test_open_missing_root() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = ExportScanner::open(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, TakeoutError::PathNotFound(_)));
    }

    #[test]
    fn test_custom_names() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("Fotos de Google").create_dir_all().unwrap();

        assert!(ExportScanner::open(temp.path()).is_err());
        let scanner = ExportScanner::open_with_names(temp.path(), &["Fotos de Google"]).unwrap();
        assert!(scanner.album_dirs().unwrap().is_empty());
    }

    #[test]
    fn test_album_dirs_ignores_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("Google Photos/A").create_dir_all().unwrap();
        temp.child("Google Photos/B").create_dir_all().unwrap();
        temp.child("Google Photos/stray.jpg").touch().unwrap();

        let scanner = ExportScanner::open(temp.path()).unwrap();
        let mut names: Vec<String> = scanner
            .album_dirs()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_summary() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("Google Photos/Trip/a.jpg").touch().unwrap();
        temp.child("Google Photos/Trip/a.jpg.json").write_str("{}").unwrap();

        let summary = ExportScanner::open(temp.path()).unwrap().summary().unwrap();
        assert!(summary.contains("Albums found (1):"));
        assert!(summary.contains("Media files: 1"));
        assert!(summary.contains("JSON files: 1"));
    }
}
