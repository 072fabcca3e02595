use crate::AppError::ConfigError;
use clap::Parser;
use std::fs;
use std::io;
use std::path::PathBuf;
use tablayout::{hit_test, layout, parse_score_json, LayoutConfig, LayoutError, LayoutMode};

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("tablayout=info"))
        .init();

    // args
    let args = CliArgs::parse();
    let score_path = PathBuf::from(&args.score_file);
    if !score_path.exists() {
        return Err(ConfigError(format!("Score file not found {score_path:?}")));
    }

    // explicit config file or the one in the home folder
    let config_path = args.config.as_ref().map(PathBuf::from);
    if let Some(config_path) = &config_path {
        if !config_path.exists() {
            return Err(ConfigError(format!("Config file not found {config_path:?}")));
        }
    }
    let mut config = LayoutConfig::read_config(config_path.as_deref())?;
    if args.compact {
        config.mode = LayoutMode::Compact;
    }

    let hit_point = args.hit_test.as_deref().map(parse_point).transpose()?;

    log::info!("Laying out {score_path:?}");
    let data = fs::read_to_string(&score_path)?;
    let score = parse_score_json(&data)?;
    let root = layout(&score, &config)?;

    if let Some((x, y)) = hit_point {
        // hit test in the first part
        let first_part = root.children.first().ok_or_else(|| {
            AppError::OtherError("Score has no part to hit test".to_string())
        })?;
        match hit_test(x, y, first_part) {
            Some(hit) => log::info!(
                "Hit {:?} at path {:?}, bounds {:?}",
                hit.element.element_type(),
                hit.path,
                hit.element.bounds
            ),
            None => log::info!("Nothing at ({x}, {y})"),
        }
    }

    let json = serde_json::to_string_pretty(&root)
        .map_err(|err| AppError::OtherError(format!("Could not serialize layout {err}")))?;
    match &args.output {
        Some(output) => {
            fs::write(output, json)?;
            log::info!("Layout written to {output}");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Parses `x,y` in millimeters.
fn parse_point(value: &str) -> Result<(f64, f64), AppError> {
    let invalid = || AppError::ParsingError(format!("Invalid point '{value}', expected x,y"));
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok((x, y))
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the score in JSON.
    score_file: String,
    /// Optional output file, the layout tree is printed otherwise.
    #[arg(long)]
    output: Option<String>,
    /// Stack the lines in a single flow instead of pages.
    #[arg(long, default_value_t = false)]
    compact: bool,
    /// Optional path to a layout config file.
    #[arg(long)]
    config: Option<String>,
    /// Report the element under the point `x,y` of the first part.
    #[arg(long)]
    hit_test: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("layout error: {0}")]
    LayoutError(String),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("parsing error: {0}")]
    ParsingError(String),
    #[error("other error: {0}")]
    OtherError(String),
}

impl From<LayoutError> for AppError {
    fn from(error: LayoutError) -> Self {
        match error {
            LayoutError::InvalidConstraint(s) => Self::LayoutError(s),
            LayoutError::ParsingError(s) => Self::ParsingError(s),
            LayoutError::ConfigError(s) => Self::ConfigError(s),
            LayoutError::IoError(s) => Self::OtherError(s),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::OtherError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("12.5, 40").unwrap(), (12.5, 40.0));
        assert!(matches!(parse_point("12"), Err(AppError::ParsingError(_))));
        assert!(matches!(parse_point("a,b"), Err(AppError::ParsingError(_))));
    }
}
