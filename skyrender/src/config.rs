//! File-backed render configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::SkyParams;
use crate::render::{PsfProfile, RenderOptions};
use crate::service::CatalogImageService;

/// Everything needed to render one image from the catalog.
///
/// ```yaml
/// width: 1280
/// height: 960
/// ra: 83.82
/// dec: -5.39
/// scale: 2.5
/// rotation: 0.0
/// profile: moffat
/// use_color: true
/// catalog_path: data/tycho2.parquet
/// star_limit: 20000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Degrees, [0, 360).
    pub ra: f64,
    /// Degrees, [-90, 90].
    pub dec: f64,
    /// Arcseconds per pixel.
    pub scale: f64,
    /// Camera rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub profile: PsfProfile,
    #[serde(default = "default_use_color")]
    pub use_color: bool,
    pub catalog_path: PathBuf,
    /// Maximum number of stars to paint.
    #[serde(default)]
    pub star_limit: Option<usize>,
}

fn default_use_color() -> bool {
    true
}

impl RenderConfig {
    /// Loads a YAML or JSON config, chosen by file extension, and validates it.
    ///
    /// A relative `catalog_path` is resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: Self = common::load_from_file(path)?;
        if config.catalog_path.is_relative()
            && let Some(dir) = path.parent()
        {
            config.catalog_path = dir.join(&config.catalog_path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.params().validate()?;
        if self.catalog_path.as_os_str().is_empty() {
            return Err(Error::InvalidParams(
                "catalog_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn params(&self) -> SkyParams {
        SkyParams::new(
            self.ra,
            self.dec,
            self.scale,
            self.width,
            self.height,
            self.rotation,
        )
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            profile: self.profile,
            use_color: self.use_color,
        }
    }

    pub fn image_service(&self) -> CatalogImageService {
        CatalogImageService::new(self.params(), &self.catalog_path)
            .with_options(self.render_options())
            .with_star_limit(self.star_limit)
    }
}

#[cfg(test)]
mod tests {
    use common::test_utils::test_output_path;

    use super::*;

    const MINIMAL: &str = "
width: 640
height: 480
ra: 10.5
dec: 41.2
scale: 3.0
catalog_path: /data/stars.parquet
";

    #[test]
    fn test_defaults() {
        let config: RenderConfig = serde_yml::from_str(MINIMAL).unwrap();
        assert_eq!(config.rotation, 0.0);
        assert_eq!(config.profile, PsfProfile::Moffat);
        assert!(config.use_color);
        assert_eq!(config.star_limit, None);
        assert_eq!(config.render_options(), RenderOptions::default());
        assert_eq!(
            config.params(),
            SkyParams::new(10.5, 41.2, 3.0, 640, 480, 0.0)
        );
    }

    #[test]
    fn test_full_yaml() {
        let text = "
width: 100
height: 50
ra: 359.5
dec: -89.0
scale: 12.5
rotation: -30.0
profile: disc
use_color: false
catalog_path: stars.parquet
star_limit: 500
";
        let config: RenderConfig = serde_yml::from_str(text).unwrap();
        assert_eq!(config.profile, PsfProfile::Disc);
        assert!(!config.use_color);
        assert_eq!(config.star_limit, Some(500));
        assert_eq!(config.rotation, -30.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let good: RenderConfig = serde_yml::from_str(MINIMAL).unwrap();
        let bad = [
            RenderConfig {
                width: 0,
                ..good.clone()
            },
            RenderConfig {
                scale: 0.0,
                ..good.clone()
            },
            RenderConfig {
                scale: f64::NAN,
                ..good.clone()
            },
            RenderConfig {
                ra: 360.0,
                ..good.clone()
            },
            RenderConfig {
                dec: 90.5,
                ..good.clone()
            },
            RenderConfig {
                rotation: f64::INFINITY,
                ..good.clone()
            },
            RenderConfig {
                catalog_path: PathBuf::new(),
                ..good.clone()
            },
        ];

        for config in bad {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, Error::InvalidParams(_)), "got {:?}", err);
        }
    }

    #[test]
    fn test_load_yaml_resolves_relative_catalog() {
        let path = test_output_path("render_config.yaml");
        std::fs::write(&path, MINIMAL.replace("/data/stars.parquet", "stars.parquet")).unwrap();

        let config = RenderConfig::load(&path).unwrap();
        assert_eq!(config.catalog_path, path.parent().unwrap().join("stars.parquet"));
    }

    #[test]
    fn test_load_json() {
        let path = test_output_path("render_config.json");
        let config: RenderConfig = serde_yml::from_str(MINIMAL).unwrap();
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        assert_eq!(RenderConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let path = test_output_path("render_config_invalid.yaml");
        std::fs::write(&path, MINIMAL.replace("scale: 3.0", "scale: -1.0")).unwrap();

        let err = RenderConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)), "got {:?}", err);
    }

    #[test]
    fn test_load_unknown_extension() {
        let path = test_output_path("render_config.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let err = RenderConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    }
}
