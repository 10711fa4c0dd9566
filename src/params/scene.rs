//! Scene variant records: one config describes one revision of the island scene.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};
use std::path::Path;

use super::audio::AudioConfig;
use super::camera::OrbitParams;
use super::color::Rgb;
use super::render::RenderConfig;
use super::water::{RadialWaveConfig, WaterMeshConfig, WaterMeshShape, WaterPreset};
use crate::error::{Error, Result};

/// One sphere of the procedural cloud mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudPuff {
    /// Offset from the cloud origin (meters)
    pub offset: [f32; 3],

    /// Sphere radius (meters)
    pub radius_m: f32,
}

/// Wandering cloud: drift path, bobbing and shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Position at scene load; x is also the resting x (meters)
    pub start_position: [f32; 3],

    /// X advance per tick while drifting (meters)
    pub step_per_tick_m: f32,

    /// Drifting forward past this x wraps the cloud to `reset_x_m`
    pub forward_limit_x_m: f32,

    /// X the cloud re-enters from after wrapping
    pub reset_x_m: f32,

    /// Drifting back past this x ends the trip
    pub home_x_m: f32,

    /// Yaw while idle (radians)
    pub rest_rotation_y: f32,

    /// Yaw while drifting (radians)
    pub facing_rotation_y: f32,

    /// Vertical bobbing amplitude (meters) and angular speed (rad/s)
    pub bob_amplitude_m: f32,
    pub bob_speed: f32,

    /// Breathing scale: base + cos(t * speed) * amplitude
    pub base_scale: f32,
    pub breathe_amplitude: f32,
    pub breathe_speed: f32,

    /// Hide the cloud (and disable picking) at night
    pub hide_at_night: bool,

    pub color: Rgb,

    pub puffs: Vec<CloudPuff>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            start_position: [-2.0, 6.0, -6.0],
            step_per_tick_m: 0.5,
            forward_limit_x_m: 100.0,
            reset_x_m: -100.0,
            home_x_m: -2.0,
            rest_rotation_y: FRAC_PI_6,
            facing_rotation_y: FRAC_PI_2,
            bob_amplitude_m: 0.3,
            bob_speed: 1.0,
            base_scale: 1.0,
            breathe_amplitude: 0.05,
            breathe_speed: 0.8,
            hide_at_night: true,
            color: Rgb::from_u32(0xf4f7fb),
            puffs: vec![
                CloudPuff {
                    offset: [0.0, 0.0, 0.0],
                    radius_m: 1.2,
                },
                CloudPuff {
                    offset: [1.3, -0.2, 0.1],
                    radius_m: 0.9,
                },
                CloudPuff {
                    offset: [-1.3, -0.25, -0.1],
                    radius_m: 0.85,
                },
                CloudPuff {
                    offset: [0.5, 0.6, -0.2],
                    radius_m: 0.8,
                },
                CloudPuff {
                    offset: [-0.4, 0.5, 0.3],
                    radius_m: 0.7,
                },
            ],
        }
    }
}

impl CloudConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.step_per_tick_m > 0.0) {
            return Err(Error::Config(format!(
                "cloud step_per_tick_m must be > 0, got {}",
                self.step_per_tick_m
            )));
        }
        if !(self.reset_x_m < self.home_x_m && self.home_x_m < self.forward_limit_x_m) {
            return Err(Error::Config(format!(
                "cloud path needs reset_x < home_x < forward_limit_x, got {} / {} / {}",
                self.reset_x_m, self.home_x_m, self.forward_limit_x_m
            )));
        }
        if self.puffs.is_empty() || self.puffs.iter().any(|p| !(p.radius_m > 0.0)) {
            return Err(Error::Config(
                "cloud needs at least one puff with positive radius".to_string(),
            ));
        }
        Ok(())
    }
}

/// Colours remapped together on a day/night toggle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Water colour at mix factor 0
    pub near: Rgb,

    /// Water colour at mix factor 1
    pub far: Rgb,

    /// Background / clear colour
    pub sky: Rgb,
}

/// Day/night theme setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub day: Palette,
    pub night: Palette,

    /// Baked island texture used by day / by night (asset paths)
    pub day_texture: String,
    pub night_texture: String,

    /// Show the starfield at night
    pub starfield: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let water = RadialWaveConfig::default();
        Self {
            day: Palette {
                near: water.color_near,
                far: water.color_far,
                sky: Rgb::from_u32(0x8fd0f0),
            },
            night: Palette {
                near: Rgb::from_u32(0x1b3c78),
                far: Rgb::from_u32(0x050c24),
                sky: Rgb::from_u32(0x0a0f2c),
            },
            day_texture: "baked.jpg".to_string(),
            night_texture: "baked-night.jpg".to_string(),
            starfield: true,
        }
    }
}

/// Everything that differs between revisions of the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneVariantConfig {
    pub name: String,

    pub water: WaterPreset,

    #[serde(default)]
    pub mesh: WaterMeshConfig,

    /// Scene has no cloud when absent
    #[serde(default)]
    pub cloud: Option<CloudConfig>,

    /// Day/night toggle is a no-op when absent
    #[serde(default)]
    pub theme: Option<ThemeConfig>,

    /// Scene is silent when absent
    #[serde(default)]
    pub audio: Option<AudioConfig>,

    #[serde(default)]
    pub camera: OrbitParams,

    #[serde(default)]
    pub render: RenderConfig,
}

impl SceneVariantConfig {
    /// Plane of multi-octave waves with no cloud, theme or audio
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            water: WaterPreset::default(),
            mesh: WaterMeshConfig::default(),
            cloud: None,
            theme: None,
            audio: None,
            camera: OrbitParams::default(),
            render: RenderConfig::default(),
        }
    }

    /// Full island revision: radial rings, cloud, day/night and ambient audio
    pub fn island() -> Self {
        Self {
            name: "island".to_string(),
            water: WaterPreset::Radial(RadialWaveConfig::default()),
            mesh: WaterMeshConfig {
                shape: WaterMeshShape::Disc {
                    radius_m: 50.0,
                    segments: 256,
                    rings: 96,
                },
                surface_height_m: 0.0,
            },
            cloud: Some(CloudConfig::default()),
            theme: Some(ThemeConfig::default()),
            audio: Some(AudioConfig::default()),
            camera: OrbitParams {
                min_distance_m: 8.0,
                max_distance_m: 30.0,
                ..OrbitParams::default()
            },
            render: RenderConfig::default(),
        }
    }

    /// Look up a built-in variant
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "classic" => Some(Self::classic()),
            "island" => Some(Self::island()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.water.validate()?;
        self.mesh.validate()?;
        self.camera.validate()?;
        if let Some(cloud) = &self.cloud {
            cloud.validate()?;
        }
        Ok(())
    }

    /// Load and validate a JSON scene description
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_variants_validate() {
        assert!(SceneVariantConfig::classic().validate().is_ok());
        assert!(SceneVariantConfig::island().validate().is_ok());
        assert!(SceneVariantConfig::by_name("ISLAND").is_some());
        assert!(SceneVariantConfig::by_name("volcano").is_none());
    }

    #[test]
    fn test_cloud_path_must_be_ordered() {
        let cloud = CloudConfig {
            home_x_m: 150.0,
            ..CloudConfig::default()
        };
        assert!(cloud.validate().is_err());

        let cloud = CloudConfig {
            step_per_tick_m: 0.0,
            ..CloudConfig::default()
        };
        assert!(cloud.validate().is_err());
    }

    #[test]
    fn test_json_file_round_trip() {
        let island = SceneVariantConfig::island();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(island.to_json_pretty().unwrap().as_bytes())
            .unwrap();

        let loaded = SceneVariantConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded.name, "island");
        assert!(loaded.cloud.is_some());
        assert!(matches!(loaded.water, WaterPreset::Radial(_)));
    }

    #[test]
    fn test_json_file_with_bad_iterations_rejected() {
        let json = r#"{
            "name": "broken",
            "water": { "kind": "octave", "small_waves_iterations": 99 }
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let err = SceneVariantConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
