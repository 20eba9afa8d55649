#![allow(dead_code)]

use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

pub const BEACH_SIDECAR: &str = r#"{"title":"Beach","photoTakenTime":{"timestamp":"1686839400"}}"#;

/// An export root with a single `Trip2023` album: `a.jpg` with a sidecar and
/// `b.mp4` without one.
pub fn setup_trip_export(temp_dir: &TempDir) -> ChildPath {
    let export = temp_dir.child("Takeout");
    let album = export.child("Google Photos").child("Trip2023");
    album.child("a.jpg").write_binary(b"jpeg data").unwrap();
    album.child("a.jpg.json").write_str(BEACH_SIDECAR).unwrap();
    album.child("b.mp4").write_binary(b"mp4 data").unwrap();
    export
}

/// An export root with no recognizable photos directory.
pub fn setup_bad_export(temp_dir: &TempDir) -> ChildPath {
    let export = temp_dir.child("Takeout");
    export.child("Drive").create_dir_all().unwrap();
    export.child("YouTube").create_dir_all().unwrap();
    export
}
