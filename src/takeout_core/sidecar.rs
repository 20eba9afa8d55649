use std::path::{Path, PathBuf};

/// Sidecar suffixes appended to the full media filename, most specific first
/// after the plain form. The exporter truncates long names, so the
/// "supplemental-metadata" marker shows up cut at almost any length.
pub const SIDECAR_SUFFIXES: &[&str] = &[
    ".json",
    ".supplemental-metadata.json",
    ".jpg.json",
    ".png.json",
    ".mp4.json",
    ".supplemental-metadat.json",
    ".supplemental-metada.json",
    ".supplemental-metad.json",
    ".supplemental-meta.json",
    ".supplemental-met.json",
    ".supplemental-me.json",
    ".supplemental-m.json",
    ".supplemental-.json",
    ".supplemental.json",
    ".supplementa.json",
    ".supplement.json",
    ".supplemen.json",
    ".suppleme.json",
    ".supplem.json",
    ".supple.json",
    ".suppl.json",
    ".supp.json",
];

/// One way of deriving a sidecar filename from a media path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidecarPattern {
    /// Full media filename followed by a suffix: `IMG_1.jpg` + `.json`.
    Suffix(String),
    /// Media extension replaced by `.json`: `IMG_1.jpg` -> `IMG_1.json`.
    ReplaceExtension,
    /// Media stem followed by `.json`.
    Stem,
}

impl SidecarPattern {
    /// The candidate sidecar path for `media_path`, if the pattern applies.
    pub fn candidate(&self, media_path: &Path) -> Option<PathBuf> {
        let parent = media_path.parent()?;
        match self {
            SidecarPattern::Suffix(suffix) => {
                let name = media_path.file_name()?.to_str()?;
                Some(parent.join(format!("{name}{suffix}")))
            }
            SidecarPattern::ReplaceExtension => Some(media_path.with_extension("json")),
            SidecarPattern::Stem => {
                let stem = media_path.file_stem()?.to_str()?;
                Some(parent.join(format!("{stem}.json")))
            }
        }
    }
}

/// The default resolution order: every suffix, then extension replacement, then stem.
pub fn default_patterns() -> Vec<SidecarPattern> {
    SIDECAR_SUFFIXES
        .iter()
        .map(|s| SidecarPattern::Suffix(s.to_string()))
        .chain([SidecarPattern::ReplaceExtension, SidecarPattern::Stem])
        .collect()
}

/// Finds the JSON sidecar for a media file by trying patterns in order.
///
/// Matching is exact; a sidecar renamed beyond every pattern is reported as
/// missing rather than guessed. Nothing is cached.
#[derive(Debug, Clone)]
pub struct SidecarResolver {
    patterns: Vec<SidecarPattern>,
}

impl Default for SidecarResolver {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
        }
    }
}

impl SidecarResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom pattern list, tried in the given order.
    pub fn with_patterns(patterns: Vec<SidecarPattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[SidecarPattern] {
        &self.patterns
    }

    /// Every candidate path in priority order, without touching the filesystem.
    pub fn candidates(&self, media_path: &Path) -> Vec<PathBuf> {
        self.patterns
            .iter()
            .filter_map(|p| p.candidate(media_path))
            .collect()
    }

    /// The first candidate that exists as a file.
    pub fn resolve(&self, media_path: &Path) -> Option<PathBuf> {
        self.patterns
            .iter()
            .filter_map(|p| p.candidate(media_path))
            .find(|candidate| candidate.is_file())
    }

    /// Whether a filename looks like a sidecar under any suffix pattern.
    pub fn is_sidecar_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| match p {
            SidecarPattern::Suffix(suffix) => name.ends_with(suffix.as_str()),
            SidecarPattern::ReplaceExtension | SidecarPattern::Stem => false,
        })
    }
}
