pub mod album;
pub mod cli;
pub mod error;
pub mod export;
pub mod media;
pub mod media_set;
pub mod metadata;
pub mod sidecar;
pub mod stats;
pub mod takeout_json;

pub use album::{AlbumScan, AlbumScanner, SkipReason, SkippedFile};
pub use cli::{Cli, Commands};
pub use error::{Result, TakeoutError};
pub use export::{ExportScan, ExportScanner};
pub use media::{MediaEntry, MediaKind};
pub use media_set::{KindCounts, MediaSet, MetadataLoadReport};
pub use metadata::{GpsCoordinate, Metadata, TagValue, merge};
pub use sidecar::{SidecarPattern, SidecarResolver};
pub use stats::{AlbumStats, ScanStats};
pub use takeout_json::{parse_sidecar, read_sidecar};
