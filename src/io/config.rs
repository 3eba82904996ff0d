use crate::io::error::ConfigError;
use crate::io::obj_loader::{LoadOptions, ParseMode};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Asset manifest: loader settings plus the list of meshes to load.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub parse_mode: ParseMode,
}

impl LoaderConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            parse_mode: self.parse_mode,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshConfig {
    /// Display name; defaults to the file stem of `path`.
    pub name: Option<String>,
    /// OBJ file. `Config::load` resolves relative paths against the manifest's
    /// directory; `from_str` and `from_files` keep them as given.
    pub path: PathBuf,

    // --- Post-processing ---
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default = "default_false")]
    pub tangents: bool,
}

fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}

impl MeshConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            name: None,
            path: path.into(),
            normalize: default_true(),
            tangents: default_false(),
        }
    }

    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = content.parse().map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for mesh in &mut self.meshes {
            if mesh.path.is_relative() {
                mesh.path = base.join(&mesh.path);
            }
        }
    }

    /// Builds a manifest for loose files given on the command line.
    pub fn from_files<I, P>(files: I, parse_mode: ParseMode, normalize: bool, tangents: bool) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            loader: LoaderConfig { parse_mode },
            meshes: files
                .into_iter()
                .map(|path| MeshConfig {
                    normalize,
                    tangents,
                    ..MeshConfig::new(path)
                })
                .collect(),
        }
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_manifest() {
        let config: Config = r#"
            [loader]
            parse_mode = "strict"

            [[meshes]]
            name = "planet"
            path = "resources/object/planet.obj"
            tangents = true

            [[meshes]]
            path = "resources/object/rock.obj"
            normalize = false
        "#
        .parse()
        .unwrap();

        assert_eq!(config.loader.parse_mode, ParseMode::Strict);
        assert_eq!(config.meshes.len(), 2);

        let planet = &config.meshes[0];
        assert_eq!(planet.display_name(), "planet");
        assert!(planet.normalize);
        assert!(planet.tangents);

        let rock = &config.meshes[1];
        assert_eq!(rock.display_name(), "rock");
        assert!(!rock.normalize);
        assert!(!rock.tangents);
    }

    #[test]
    fn empty_manifest_uses_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config.loader.load_options(), LoadOptions::lenient());
        assert!(config.meshes.is_empty());
    }

    #[test]
    fn unknown_parse_mode_is_rejected() {
        assert!("[loader]\nparse_mode = \"sloppy\"\n".parse::<Config>().is_err());
    }

    #[test]
    fn from_files_applies_flags_to_every_mesh() {
        let config = Config::from_files(["a.obj", "b/c.obj"], ParseMode::Strict, false, true);
        assert_eq!(config.loader.load_options(), LoadOptions::strict());
        assert_eq!(config.meshes.len(), 2);
        assert_eq!(config.meshes[1].display_name(), "c");
        assert!(config.meshes.iter().all(|m| !m.normalize && m.tangents));
    }

    #[test]
    fn relative_mesh_paths_follow_the_manifest_directory() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("assets.toml");
        let absolute = dir.path().join("elsewhere").join("ufo.obj");
        fs::write(
            &manifest,
            format!(
                "[[meshes]]\npath = \"object/planet.obj\"\n\n[[meshes]]\npath = {:?}\n",
                absolute.display().to_string()
            ),
        )
        .unwrap();

        let config = Config::load(&manifest).unwrap();
        assert_eq!(config.meshes[0].path, dir.path().join("object/planet.obj"));
        assert_eq!(config.meshes[1].path, absolute);
    }

    #[test]
    fn parsed_text_keeps_paths_as_written() {
        let config: Config = "[[meshes]]\npath = \"object/rock.obj\"\n".parse().unwrap();
        assert_eq!(config.meshes[0].path, PathBuf::from("object/rock.obj"));
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = Config::load("no/such/assets.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
