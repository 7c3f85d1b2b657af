// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `parallax-viewer`: opens a window and renders a parallax-mapped brick wall.
//!
//! Controls: arrow keys or left-drag rotate the view vector, `M` cycles the
//! parallax mode, `+`/`-` (or the wheel) change the height scale, `[`/`]`
//! change the layer budget, `R` resets the view and `Esc` quits.

use anyhow::{Context, Result};
use clap::Parser;
use parallax_core::math::Vec3;
use parallax_core::renderer::ParallaxMode;
use parallax_core::AppConfig;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "parallax.toml";

/// The configuration used without `--config`: `parallax.toml` in the current
/// directory, else the one shipped next to this crate's manifest.
fn default_config_path() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join(CONFIG_FILE_NAME)
}

#[derive(Parser, Debug)]
#[command(name = "parallax-viewer", version, about = "Interactive parallax mapping viewer")]
struct Cli {
    /// Configuration file (TOML). Defaults to `./parallax.toml`, then the bundled `sandbox/parallax.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parallax mode: flat, offset, steep or occlusion.
    #[arg(long)]
    mode: Option<ParallaxMode>,

    /// Depth of the height field in texture units.
    #[arg(long)]
    height_scale: Option<f32>,

    /// Initial window width in logical pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height in logical pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Initial view vector as `x,y,z` (tangent space, +z is the surface normal).
    #[arg(long, value_parser = parse_view_vector, allow_hyphen_values = true)]
    view: Option<Vec3>,

    /// Present without waiting for vertical sync.
    #[arg(long)]
    no_vsync: bool,
}

fn parse_view_vector(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid component in '{s}': {e}"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected three comma-separated numbers, got '{s}'")),
    }
}

impl Cli {
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::load_or_default(default_config_path())?,
        };

        if let Some(mode) = self.mode {
            config.parallax.mode = mode;
        }
        if let Some(scale) = self.height_scale {
            config.parallax.height_scale = scale;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(view) = self.view {
            config.view_vector = view;
        }
        if self.no_vsync {
            config.graphics.vsync = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config().context("Failed to load configuration")?;
    parallax_sdk::run(config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn view_vector_parses() {
        assert_eq!(
            parse_view_vector("0, -0.5, 1"),
            Ok(Vec3::new(0.0, -0.5, 1.0))
        );
        assert!(parse_view_vector("1,2").is_err());
        assert!(parse_view_vector("a,b,c").is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_the_file() {
        let cli = Cli::parse_from([
            "parallax-viewer",
            "--config",
            concat!(env!("CARGO_MANIFEST_DIR"), "/parallax.toml"),
            "--mode",
            "steep",
            "--view",
            "0.1,-0.2,0.9",
            "--no-vsync",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.parallax.mode, ParallaxMode::Steep);
        assert_eq!(config.view_vector, Vec3::new(0.1, -0.2, 0.9));
        assert!(!config.graphics.vsync);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_config_does_not_depend_on_the_working_directory() {
        let path = default_config_path();
        assert!(path.exists(), "{} should exist", path.display());
        let config = Cli::parse_from(["parallax-viewer"]).load_config().unwrap();
        assert_eq!(config, AppConfig::load(&path).unwrap());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let cli = Cli::parse_from(["parallax-viewer", "--config", "/no/such/parallax.toml"]);
        assert!(cli.load_config().is_err());
    }
}
