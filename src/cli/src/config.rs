use std::{
    fs, io,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{WrapErr, eyre};
use log::{debug, info};
use serde::Deserialize;
use twisty_core::{LetterScheme, Metric, SkewbNotation, check_cube_size};

/// The contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cube_size: usize,
    pub metric: String,
    pub skewb_notation: String,
    pub letter_scheme: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cube_size: 3,
            metric: Metric::Htm.name().to_owned(),
            skewb_notation: SkewbNotation::SARAH.name().to_owned(),
            letter_scheme: LetterScheme::BERNHARD.name().to_owned(),
        }
    }
}

/// What the commands run with after the flags have been applied on top of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub size: usize,
    pub metric: Metric,
    pub notation: SkewbNotation,
    pub letter_scheme: LetterScheme,
}

/// Values given on the command line. They win over the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub size: Option<usize>,
    pub metric: Option<Metric>,
    pub notation: Option<SkewbNotation>,
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("twisty").join("config.toml"))
}

impl Config {
    /// Reads the configuration from `path`, or from the user config directory if no path is
    /// given. Only a missing default file falls back to the defaults.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Config> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match default_path() {
                Some(path) => (path, false),
                None => {
                    debug!("No config directory on this platform; using the defaults");
                    return Ok(Config::default());
                }
            },
        };

        match fs::read_to_string(&path) {
            Ok(text) => {
                info!("Reading the configuration from {}", path.display());
                Config::parse(&text).wrap_err_with(|| format!("Invalid configuration in {}", path.display()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => {
                debug!("{} doesn't exist; using the defaults", path.display());
                Ok(Config::default())
            }
            Err(e) => Err(e).wrap_err_with(|| format!("Could not read {}", path.display())),
        }
    }

    pub fn parse(text: &str) -> color_eyre::Result<Config> {
        Ok(toml::from_str(text)?)
    }

    pub fn settings(&self, overrides: Overrides) -> color_eyre::Result<Settings> {
        let size = overrides.size.unwrap_or(self.cube_size);
        check_cube_size(size)?;

        let metric = match overrides.metric {
            Some(metric) => metric,
            None => self.metric.parse()?,
        };

        let notation = match overrides.notation {
            Some(notation) => notation,
            None => self
                .skewb_notation
                .parse()
                .map_err(|_| eyre!("Unknown Skewb notation `{}`", self.skewb_notation))?,
        };

        let letter_scheme = self.letter_scheme.parse()?;

        Ok(Settings {
            size,
            metric,
            notation,
            letter_scheme,
        })
    }
}
