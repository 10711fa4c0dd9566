//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::ocean::snapshot::SnapshotRegion;
use crate::params::SceneVariantConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Islewave")]
#[command(about = "Procedural water scene with a drifting cloud", long_about = None)]
pub struct Args {
    /// Built-in scene variant: island (default), classic
    #[arg(long, value_name = "VARIANT", default_value = "island")]
    pub variant: String,

    /// JSON scene description (overrides --variant)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start in night mode
    #[arg(long)]
    pub night: bool,

    /// Start with audio muted
    #[arg(long)]
    pub muted: bool,

    /// Write a top-down PNG of the water colour field and exit
    #[arg(long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Water time for the snapshot (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "0")]
    pub snapshot_time: f32,

    /// Snapshot width and height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "512")]
    pub snapshot_size: u32,

    /// Side length of the snapshot area (meters)
    #[arg(long, value_name = "METERS", default_value = "20")]
    pub snapshot_extent: f32,

    /// Start with a wave uniform set, e.g. `--tweak uWaveSpeed=2` (repeatable)
    #[arg(long, value_name = "NAME=VALUE", value_parser = parse_tweak)]
    pub tweak: Vec<(String, f32)>,
}

/// Split `NAME=VALUE` into a uniform name and a number
fn parse_tweak(arg: &str) -> std::result::Result<(String, f32), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing uniform name in '{}'", arg));
    }
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("bad value for {}: {}", name, e))?;
    Ok((name.to_string(), value))
}

impl Args {
    /// Resolve the scene configuration from `--config` or `--variant`
    pub fn scene_config(&self) -> Result<SceneVariantConfig> {
        if let Some(path) = &self.config {
            let config = SceneVariantConfig::from_json_file(path)?;
            log::info!("Scene: {} (from {})", config.name, path.display());
            return Ok(config);
        }

        let config = SceneVariantConfig::by_name(&self.variant).unwrap_or_else(|| {
            log::warn!("Unknown scene variant '{}', using island", self.variant);
            SceneVariantConfig::island()
        });
        log::info!("Scene: {}", config.name);
        Ok(config)
    }

    /// Snapshot area when `--snapshot` was given
    pub fn snapshot_region(&self) -> Option<SnapshotRegion> {
        self.snapshot.as_ref().map(|_| SnapshotRegion {
            extent_m: self.snapshot_extent,
            size_px: self.snapshot_size.max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["islewave"]);
        assert_eq!(args.variant, "island");
        assert!(!args.night);
        assert!(args.snapshot_region().is_none());
        assert_eq!(args.scene_config().unwrap().name, "island");
    }

    #[test]
    fn test_unknown_variant_falls_back_to_island() {
        let args = Args::parse_from(["islewave", "--variant", "volcano"]);
        assert_eq!(args.scene_config().unwrap().name, "island");
    }

    #[test]
    fn test_config_file_overrides_variant() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = SceneVariantConfig::classic().to_json_pretty().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let path = file.path().to_str().unwrap();
        let args = Args::parse_from(["islewave", "--variant", "island", "--config", path]);
        assert_eq!(args.scene_config().unwrap().name, "classic");
    }

    #[test]
    fn test_snapshot_flags() {
        let args = Args::parse_from([
            "islewave",
            "--snapshot",
            "out.png",
            "--snapshot-time",
            "1.5",
            "--snapshot-size",
            "64",
        ]);
        let region = args.snapshot_region().unwrap();
        assert_eq!(region.size_px, 64);
        assert_eq!(args.snapshot_time, 1.5);
    }

    #[test]
    fn test_tweak_flags() {
        let args = Args::parse_from([
            "islewave",
            "--tweak",
            "uWaveSpeed=2",
            "--tweak",
            " uTextureSize = 4.5 ",
        ]);
        assert_eq!(
            args.tweak,
            vec![
                ("uWaveSpeed".to_string(), 2.0),
                ("uTextureSize".to_string(), 4.5)
            ]
        );
        assert!(Args::parse_from(["islewave"]).tweak.is_empty());
    }

    #[test]
    fn test_malformed_tweak_is_rejected() {
        for bad in ["uWaveSpeed", "=1", "uWaveSpeed=fast"] {
            assert!(Args::try_parse_from(["islewave", "--tweak", bad]).is_err());
        }
    }
}
