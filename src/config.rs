//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [crop]
//! aspect_ratio = [4, 3]     # width:height of every normalized image
//! quality = 90              # JPEG quality (1-100)
//!
//! [camera]
//! facing = "user"           # "user" (front) or "environment" (rear)
//! width = 1280              # Ideal capture width
//! height = 960              # Ideal capture height
//!
//! [slider]
//! initial_position = 50.0   # Divider start, percent from the left
//! before_label = "Before"
//! after_label = "After"
//!
//! [stages]
//! steps = [
//!     { name = "Analyzing facial features", duration_ms = 3000, filter = "brightness(1.05)" },
//!     # ...
//! ]
//!
//! [service]
//! storage_url = "http://localhost:9000/gallery"  # Base for stored image paths
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Square crops, everything else stock
//! [crop]
//! aspect_ratio = [1, 1]
//! ```
//!
//! Tables merge key by key; arrays (such as `stages.steps`) replace the stock
//! value wholesale. Unknown keys are rejected to catch typos early.

use crate::capture::{Facing, StreamConstraints};
use crate::compare::Labels;
use crate::imaging::{CropConfig, Quality};
use crate::response;
use crate::stages::{Stage, default_stages};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Aspect ratio and encoding of normalized images.
    pub crop: CropSection,
    /// What to ask the camera for.
    pub camera: CameraSection,
    /// Compare slider start position and labels.
    pub slider: SliderSection,
    /// Progress stages shown while a request is in flight.
    pub stages: StagesSection,
    /// Where stored images live.
    pub service: ServiceSection,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crop.quality == 0 || self.crop.quality > 100 {
            return Err(ConfigError::Validation(
                "crop.quality must be 1-100".into(),
            ));
        }
        if self.crop.aspect_ratio[0] == 0 || self.crop.aspect_ratio[1] == 0 {
            return Err(ConfigError::Validation(
                "crop.aspect_ratio values must be non-zero".into(),
            ));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(ConfigError::Validation(
                "camera.width and camera.height must be non-zero".into(),
            ));
        }
        let p = self.slider.initial_position;
        if !(0.0..=100.0).contains(&p) {
            return Err(ConfigError::Validation(
                "slider.initial_position must be 0-100".into(),
            ));
        }
        if let Some(i) = self.stages.steps.iter().position(|s| s.name.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "stages.steps[{i}].name must not be empty"
            )));
        }
        let url = &self.service.storage_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "service.storage_url must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }

    /// Resolve an image reference from the service against `service.storage_url`.
    pub fn resolve_image_url(&self, url: &str) -> String {
        response::resolve_image_url(url, &self.service.storage_url)
    }

    pub fn crop_config(&self) -> CropConfig {
        let [w, h] = self.crop.aspect_ratio;
        CropConfig {
            aspect: f64::from(w) / f64::from(h),
            quality: Quality::new(self.crop.quality),
        }
    }

    pub fn stream_constraints(&self) -> StreamConstraints {
        StreamConstraints {
            facing: self.camera.facing,
            width: self.camera.width,
            height: self.camera.height,
        }
    }

    pub fn labels(&self) -> Labels {
        Labels {
            before: self.slider.before_label.clone(),
            after: self.slider.after_label.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropSection {
    /// Aspect ratio as `[width, height]`.
    pub aspect_ratio: [u32; 2],
    /// JPEG quality (1-100).
    pub quality: u32,
}

impl Default for CropSection {
    fn default() -> Self {
        Self {
            aspect_ratio: [4, 3],
            quality: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSection {
    pub facing: Facing,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraSection {
    fn default() -> Self {
        let c = StreamConstraints::default();
        Self {
            facing: c.facing,
            width: c.width,
            height: c.height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SliderSection {
    pub initial_position: f64,
    pub before_label: String,
    pub after_label: String,
}

impl Default for SliderSection {
    fn default() -> Self {
        let labels = Labels::default();
        Self {
            initial_position: 50.0,
            before_label: labels.before,
            after_label: labels.after,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StagesSection {
    pub steps: Vec<Stage>,
}

impl Default for StagesSection {
    fn default() -> Self {
        Self {
            steps: default_stages(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceSection {
    /// Base URL that relative stored-image paths are joined onto.
    pub storage_url: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            storage_url: "http://localhost:9000/gallery".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`, falling back to stock defaults when
/// it does not exist.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_some() {
        log::debug!("loaded config overrides from {}", path.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# capture-compare configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Cropping
# ---------------------------------------------------------------------------
[crop]
# Aspect ratio as [width, height]. Every selected file and camera capture
# is center-cropped to this shape before upload.
aspect_ratio = [4, 3]

# JPEG quality of the cropped image (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Camera
# ---------------------------------------------------------------------------
[camera]
# Preferred camera: "user" (front-facing) or "environment" (rear).
facing = "user"

# Ideal capture resolution. The device may deliver something else.
width = 1280
height = 960

# ---------------------------------------------------------------------------
# Compare slider
# ---------------------------------------------------------------------------
[slider]
# Where the divider starts, in percent of the width from the left.
initial_position = 50.0

# Corner labels. "Before" hides at or below 15%, "After" at or above 85%.
before_label = "Before"
after_label = "After"

# ---------------------------------------------------------------------------
# Progress stages
# ---------------------------------------------------------------------------
[stages]
# Shown one after another while the transformation runs. Purely cosmetic:
# they play to the end whether or not the request finished.
# `filter` is optional: a CSS-style filter for the preview during that stage.
steps = [
    { name = "Analyzing facial features", duration_ms = 3000, filter = "brightness(1.05)" },
    { name = "Smoothing skin texture", duration_ms = 3500, filter = "brightness(1.1) contrast(0.95)" },
    { name = "Enhancing natural glow", duration_ms = 3000, filter = "brightness(1.15) saturate(1.1)" },
    { name = "Perfecting complexion", duration_ms = 2500, filter = "brightness(1.2) saturate(1.15) contrast(0.9)" },
    { name = "Applying radiance boost", duration_ms = 2000, filter = "brightness(1.25) saturate(1.2) contrast(0.85) hue-rotate(5deg)" },
    { name = "Finalizing your glow up", duration_ms = 4000, filter = "brightness(1.3) saturate(1.25) contrast(0.8) hue-rotate(10deg)" },
]

# ---------------------------------------------------------------------------
# Service
# ---------------------------------------------------------------------------
[service]
# Base URL for stored images. Relative paths are joined onto it;
# http(s) URLs and data: URIs are used as-is.
storage_url = "http://localhost:9000/gallery"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(tmp: &TempDir, content: &str) -> std::path::PathBuf {
        let path = tmp.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.crop.aspect_ratio, [4, 3]);
        assert_eq!(config.crop.quality, 90);
        assert_eq!(config.camera.facing, Facing::User);
        assert_eq!((config.camera.width, config.camera.height), (1280, 960));
        assert_eq!(config.slider.initial_position, 50.0);
        assert_eq!(config.stages.steps.len(), 6);
        assert_eq!(config.service.storage_url, "http://localhost:9000/gallery");
    }

    #[test]
    fn derived_runtime_settings() {
        let config = AppConfig::default();
        let crop = config.crop_config();
        assert_eq!(crop.aspect, 4.0 / 3.0);
        assert_eq!(crop.quality.value(), 90);
        assert_eq!(config.stream_constraints(), StreamConstraints::default());
        assert_eq!(config.labels(), Labels::default());
    }

    #[test]
    fn parse_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
[camera]
facing = "environment"
"#,
        )
        .unwrap();
        assert_eq!(config.camera.facing, Facing::Environment);
        assert_eq!(config.camera.width, 1280);
        assert_eq!(config.crop.aspect_ratio, [4, 3]);
    }

    #[test]
    fn parse_custom_stages() {
        let config: AppConfig = toml::from_str(
            r#"
[stages]
steps = [{ name = "Uploading", duration_ms = 500 }]
"#,
        )
        .unwrap();
        assert_eq!(config.stages.steps, vec![Stage::new("Uploading", 500)]);
    }

    #[test]
    fn parse_stage_filter() {
        let toml = r#"
[stages]
steps = [{ name = "Glow", duration_ms = 800, filter = "saturate(1.2)" }]
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.stages.steps,
            vec![Stage::new("Glow", 800).with_filter("saturate(1.2)")]
        );
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.crop.quality, 90);
        assert_eq!(config.slider.before_label, "Before");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[crop]
aspect_ratio = [1, 1]

[slider]
before_label = "Original"
after_label = "Shrekified"
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.crop.aspect_ratio, [1, 1]);
        assert_eq!(config.crop.quality, 90);
        assert_eq!(config.labels().before, "Original");
        assert_eq!(config.labels().after, "Shrekified");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "this is not valid toml [[[");
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[crop]
quality = 200
"#,
        );
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[crop]
qualty = 90
"#,
        );
        let err = load_config(&path).unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[crop]
aspect_ratio = [4, 3]
quality = 90
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[crop]
quality = 70
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let crop = merged.get("crop").unwrap();
        assert_eq!(crop.get("quality").unwrap().as_integer(), Some(70));
        assert_eq!(crop.get("aspect_ratio").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[stages]
steps = [{ name = "Only", duration_ms = 1 }]
"#,
        )
        .unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.stages.steps.len(), 1);
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("a = 10").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Unknown key rejection
    // =========================================================================

    #[test]
    fn unknown_section_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[cropping]\nquality = 90");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_stage_key_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
[stages]
steps = [{ name = "A", duration_ms = 1, colour = "blue" }]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn invalid_facing_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[camera]\nfacing = \"left\"");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = AppConfig::default();
        config.crop.quality = 100;
        assert!(config.validate().is_ok());
        config.crop.quality = 0;
        assert!(config.validate().unwrap_err().to_string().contains("quality"));
    }

    #[test]
    fn validate_aspect_ratio_zero() {
        let mut config = AppConfig::default();
        config.crop.aspect_ratio = [0, 3];
        assert!(config.validate().is_err());
        config.crop.aspect_ratio = [4, 0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_slider_position() {
        let mut config = AppConfig::default();
        config.slider.initial_position = 100.5;
        assert!(config.validate().is_err());
        config.slider.initial_position = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_stage_names() {
        let mut config = AppConfig::default();
        config.stages.steps.push(Stage::new("  ", 100));
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("stages.steps[6]"));
    }

    #[test]
    fn resolve_image_url_uses_configured_storage() {
        let mut config = AppConfig::default();
        config.service.storage_url = "https://cdn.example.com/photos/".into();
        assert_eq!(
            config.resolve_image_url("/results/a.jpg"),
            "https://cdn.example.com/photos/results/a.jpg"
        );
        assert_eq!(
            config.resolve_image_url("https://elsewhere.test/b.jpg"),
            "https://elsewhere.test/b.jpg"
        );
        assert_eq!(
            config.resolve_image_url("data:image/jpeg;base64,AAAA"),
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[test]
    fn validate_storage_url() {
        let mut config = AppConfig::default();
        config.service.storage_url = "ftp://files".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_camera_size() {
        let mut config = AppConfig::default();
        config.camera.height = 0;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // stock_config_toml
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.crop.aspect_ratio, defaults.crop.aspect_ratio);
        assert_eq!(config.crop.quality, defaults.crop.quality);
        assert_eq!(config.camera.facing, defaults.camera.facing);
        assert_eq!(config.slider.after_label, defaults.slider.after_label);
        assert_eq!(config.stages.steps, defaults.stages.steps);
        assert_eq!(config.service.storage_url, defaults.service.storage_url);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[crop]", "[camera]", "[slider]", "[stages]", "[service]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.is_table());
        for key in ["crop", "camera", "slider", "stages", "service"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
