use crate::io::config::{Config, MeshConfig};
use crate::io::error::AssetError;
use crate::io::obj_loader::{LoadOptions, load_obj};
use crate::scene::mesh::Mesh;
use crate::scene::tangents::{TangentFrames, compute_tangent_frames};
use crate::scene::utils::{BoundingBox, compute_bounding_box, normalize_to_unit_box};
use log::info;

/// A mesh loaded from the manifest together with its derived data.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub name: String,
    pub mesh: Mesh,
    /// Bounding box in file coordinates, before any normalization.
    pub bounds: Option<BoundingBox>,
    pub tangents: Option<TangentFrames>,
}

/// Loads one manifest entry, then normalizes and builds tangents as configured.
pub fn load_asset(entry: &MeshConfig, options: &LoadOptions) -> Result<LoadedAsset, AssetError> {
    let name = entry.display_name();

    let mut mesh = match load_obj(&entry.path, options) {
        Ok(mesh) => mesh,
        Err(source) => return Err(AssetError::Load { name, source }),
    };

    let bounds = if entry.normalize {
        normalize_to_unit_box(&mut mesh.vertices)
    } else {
        compute_bounding_box(&mesh.vertices)
    };

    let tangents = if entry.tangents {
        match compute_tangent_frames(&mesh) {
            Ok(frames) => Some(frames),
            Err(source) => return Err(AssetError::Mesh { name, source }),
        }
    } else {
        None
    };

    Ok(LoadedAsset {
        name,
        mesh,
        bounds,
        tangents,
    })
}

/// Loads every mesh in the manifest, in order. Stops at the first failure.
pub fn load_assets(config: &Config) -> Result<Vec<LoadedAsset>, AssetError> {
    let options = config.loader.load_options();
    let assets = config
        .meshes
        .iter()
        .map(|entry| load_asset(entry, &options))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} mesh assets.", assets.len());
    Ok(assets)
}
