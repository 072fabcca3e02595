use std::{
    fs::{create_dir_all, File},
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

use home::home_dir;
use serde::{Deserialize, Serialize};

use crate::layout::constants::{
    DURATION_WIDTH_MULTIPLIER, LINE_GAP, PAGE_HEIGHT, PAGE_MARGIN, PAGE_WIDTH,
};
use crate::LayoutError;

/// How the lines of a part are arranged.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Lines packed into A4 pages stacked vertically.
    #[default]
    Normal,
    /// Lines stacked in a single continuous flow, no page boundaries.
    Compact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub page_margin: f64,
    /// Vertical space between two lines of a page.
    pub line_gap: f64,
    /// Scales the width reserved per unit of duration.
    pub duration_width_multiplier: f64,
    pub mode: LayoutMode,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            page_margin: PAGE_MARGIN,
            line_gap: LINE_GAP,
            duration_width_multiplier: DURATION_WIDTH_MULTIPLIER,
            mode: LayoutMode::Normal,
        }
    }
}

impl LayoutConfig {
    // folder placed in $HOME directory
    const FOLDER: &'static str = ".tablayout";

    /// Width available to the lines of a page.
    pub fn content_width(&self) -> f64 {
        (self.page_width - 2.0 * self.page_margin).max(0.0)
    }

    /// Height available to the lines of a page.
    pub fn content_height(&self) -> f64 {
        (self.page_height - 2.0 * self.page_margin).max(0.0)
    }

    fn get_base_path() -> Result<PathBuf, LayoutError> {
        let home = home_dir()
            .ok_or_else(|| LayoutError::ConfigError("Could not find home directory".to_string()))?;
        let path = home.join(Self::FOLDER);
        Ok(path)
    }

    fn get_path() -> Result<PathBuf, LayoutError> {
        let base = Self::get_base_path()?;
        Ok(base.join("config.json"))
    }

    /// Reads the given file, or the config in the home folder which is
    /// created if it does not exist
    pub fn read_config(path: Option<&Path>) -> Result<Self, LayoutError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let base_path = Self::get_base_path()?;
                if !base_path.exists() {
                    create_dir_all(base_path)?;
                }
                let config_path = Self::get_path()?;
                if !config_path.exists() {
                    // create default config
                    LayoutConfig::default().save_config(&config_path)?;
                }
                config_path
            }
        };
        log::debug!("Reading layout configuration {config_path:?}");
        let file = File::open(config_path)?;
        let reader = BufReader::new(file);
        let config: LayoutConfig = serde_json::from_reader(reader).map_err(|err| {
            LayoutError::ConfigError(format!("Could not read layout configuration {err:}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Assumes the parent folder exists
    pub fn save_config(&self, config_path: &Path) -> Result<(), LayoutError> {
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            LayoutError::ConfigError(format!("Could not save layout configuration {err:}"))
        })?;
        let mut file = File::create(config_path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(LayoutError::ConfigError(format!(
                "page {}x{} leaves no room inside a margin of {}",
                self.page_width, self.page_height, self.page_margin
            )));
        }
        if self.duration_width_multiplier <= 0.0 {
            return Err(LayoutError::ConfigError(
                "duration width multiplier must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
