//! Command line flags. Each flag overrides the config file for one run.

use std::path::PathBuf;

use clap::Parser;
use starfall_config::Config;
use starfall_core::{LayerSet, Motion, Preset};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "starfall")]
#[command(version, about = "A portfolio-style starfield backdrop for the terminal")]
pub struct Cli {
    /// Read and write this config file instead of the default one.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Target frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Fixed random seed for a reproducible sky.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render a static frame: nothing drifts and no meteors fall.
    #[arg(long, default_value_t = false)]
    pub reduced_motion: bool,

    /// Layers to show: all, starfield, nebula or tech-lines.
    #[arg(long)]
    pub layers: Option<LayerSet>,

    /// Parameter preset: portfolio or component.
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Hide the key help line.
    #[arg(long, default_value_t = false)]
    pub no_help: bool,
}

impl Cli {
    /// Layer the flags over a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(preset) = self.preset {
            config.apply_preset(preset);
        }
        if let Some(fps) = self.fps {
            config.display.fps = fps;
        }
        if let Some(seed) = self.seed {
            config.display.seed = Some(seed);
        }
        if self.reduced_motion {
            config.display.motion = Motion::Reduced;
        }
        if let Some(layers) = self.layers {
            config.display.layers = layers;
        }
        if self.no_help {
            config.display.show_help = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "starfall",
            "--seed",
            "5",
            "--layers",
            "nebula",
            "--reduced-motion",
            "--fps",
            "60",
            "--no-help",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.display.seed, Some(5));
        assert_eq!(config.display.layers, LayerSet::Nebula);
        assert_eq!(config.display.motion, Motion::Reduced);
        assert_eq!(config.display.fps, 60);
        assert!(!config.display.show_help);
    }

    #[test]
    fn no_flags_leave_config_alone() {
        let cli = Cli::try_parse_from(["starfall"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn preset_flag_replaces_layer_params() {
        let cli = Cli::try_parse_from(["starfall", "--preset", "component"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.display.preset, Preset::Component);
        assert_eq!(config.nebula.blobs, 6);
    }

    #[test]
    fn unknown_layer_is_rejected() {
        assert!(Cli::try_parse_from(["starfall", "--layers", "clouds"]).is_err());
    }
}
