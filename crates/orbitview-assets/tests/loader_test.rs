//! Background loading tests.

use std::time::{Duration, Instant};

use orbitview_assets::{AssetLoader, LoadError, LoadHandle};
use orbitview_core::Model;

const TETRAHEDRON: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

/// Polls until the handle yields its event (or a generous timeout passes).
fn poll(handle: &mut LoadHandle) -> Result<Model, LoadError> {
    let deadline = Instant::now() + Duration::from_secs(30);
    loop {
        if let Some(event) = handle.try_complete() {
            return event;
        }
        assert!(Instant::now() < deadline, "loader never completed");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_load_reports_exactly_once() {
    let dir = std::env::temp_dir().join("orbitview_loader_once");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("tetra.obj"), TETRAHEDRON).unwrap();

    let loader = AssetLoader::new(&dir);
    let mut handle = loader.load("tetra.obj");
    assert_eq!(handle.path(), dir.join("tetra.obj"));

    let model = poll(&mut handle).unwrap();
    assert_eq!(model.name(), "tetra");
    assert_eq!(model.triangle_count(), 4);

    assert!(handle.is_finished());
    assert!(handle.try_complete().is_none());
    assert!(handle.try_complete().is_none());
}

#[test]
fn test_wait_blocks_until_done() {
    let dir = std::env::temp_dir().join("orbitview_loader_wait");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("tetra.obj"), TETRAHEDRON).unwrap();

    let model = AssetLoader::new(&dir).load("tetra.obj").wait().unwrap();
    let bounds = model.bounding_box().unwrap();
    assert_eq!(bounds.size(), glam::Vec3::ONE);
}

#[test]
fn test_missing_file_is_an_error_event() {
    let loader = AssetLoader::new(std::env::temp_dir().join("orbitview_no_such_dir"));
    let mut handle = loader.load("final1.glb");
    let err = poll(&mut handle).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "unexpected error: {err}");
    assert!(handle.try_complete().is_none());
}

#[test]
fn test_unsupported_extension_is_an_error_event() {
    let err = AssetLoader::default().load("scene.fbx").wait().unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat(_)));
}
