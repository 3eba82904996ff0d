use nalgebra::{Point3, Vector3};
use objmesh::io::config::Config;
use objmesh::io::error::{AssetError, ObjError};
use objmesh::scene::assets::load_assets;
use objmesh::scene::utils::compute_bounding_box;
use std::fs;

const EPS: f32 = 1e-5;

fn manifest_dir() -> &'static str {
    env!("CARGO_MANIFEST_DIR")
}

#[test]
fn bundled_manifest_loads() {
    // Mesh paths in the manifest are relative to the manifest itself.
    let config = Config::load(format!("{}/assets.toml", manifest_dir())).unwrap();

    let assets = load_assets(&config).unwrap();
    assert_eq!(assets.len(), 2);

    let cube = &assets[0];
    assert_eq!(cube.name, "crate");
    let original = cube.bounds.unwrap();
    assert_eq!(original.min, Point3::new(-1.0, -1.0, -1.0));
    assert_eq!(original.extents(), Vector3::new(2.0, 2.0, 2.0));
    let normalized = compute_bounding_box(&cube.mesh.vertices).unwrap();
    assert!((normalized.max_extent() - 1.0).abs() < EPS);
    assert!(normalized.center().coords.norm() < EPS);
    let frames = cube.tangents.as_ref().unwrap();
    assert_eq!(frames.tangents.len(), cube.mesh.vertex_count());
    assert_eq!(frames.bitangents.len(), cube.mesh.vertex_count());

    let grid = &assets[1];
    assert_eq!(grid.name, "grid");
    assert!(grid.tangents.is_none());
    // Not normalized: still in file coordinates.
    let bounds = compute_bounding_box(&grid.mesh.vertices).unwrap();
    assert_eq!(bounds.max, Point3::new(2.0, 2.0, 0.0));
    assert_eq!(grid.bounds, Some(bounds));
}

#[test]
fn first_broken_asset_aborts_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.obj");
    let bad = dir.path().join("bad.obj");
    fs::write(&good, "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n").unwrap();
    fs::write(&bad, "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n").unwrap();

    let manifest = dir.path().join("assets.toml");
    fs::write(
        &manifest,
        format!(
            "[loader]\nparse_mode = \"strict\"\n\n[[meshes]]\npath = \"good.obj\"\n\n[[meshes]]\nname = \"broken\"\npath = {:?}\n",
            bad.display().to_string()
        ),
    )
    .unwrap();

    let config = Config::load(&manifest).unwrap();
    let err = load_assets(&config).unwrap_err();
    match err {
        AssetError::Load { name, source } => {
            assert_eq!(name, "broken");
            assert!(matches!(
                source,
                ObjError::IndexOutOfRange {
                    line: 4,
                    index: 2,
                    len: 1,
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_manifest_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("assets.toml");
    fs::write(&manifest, "[[meshes]]\nnormalize = true\n").unwrap();

    let err = Config::load(&manifest).unwrap_err();
    assert!(matches!(err, objmesh::io::error::ConfigError::Parse { .. }));
}
