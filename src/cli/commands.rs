//! Subcommand handlers for config actions.

use std::path::Path;

use super::args::ConfigAction;
use super::settings::params_from_config;
use crate::config::{self, default_path as get_config_path, Config};
use crate::error::AppError;

/// Handle config subcommand actions.
///
/// `path` overrides the default config location.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), AppError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(path)?;
            let params = params_from_config(&config)?;

            println!("Current configuration:");
            println!("  Characters: \"{}\"", params.ramp);
            println!("  Color: {}", yes_no(params.color));
            println!("  Invert: {}", yes_no(params.invert));
            println!("  Invert color: {}", yes_no(params.invert_color));
            println!("  Brightness: {}", params.brightness);
            println!("  Scale: {}", params.scale);
            println!("  Edges: {}", yes_no(params.edges));
            println!("  Aspect ratio: {}", params.aspect_ratio);
            println!("  Block: {}x{}", params.block.width, params.block.height);
            println!("  Filter: {}", params.filter.name());
            println!("  Fit to terminal: {}", yes_no(params.auto_fit));
            match params.frame_delay {
                Some(delay) => println!("  Frame delay: {} ms", delay.as_millis()),
                None => println!("  Frame delay: from source"),
            }
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            config::init(&config_path)?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_init_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        handle_config_action(ConfigAction::Init, Some(&path)).unwrap();
        assert!(path.exists());
        handle_config_action(ConfigAction::Show, Some(&path)).unwrap();
    }

    #[test]
    fn test_init_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let err = handle_config_action(ConfigAction::Init, Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::AlreadyExists { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_show_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render]\nchars = \"\"\n").unwrap();

        let err = handle_config_action(ConfigAction::Show, Some(&path)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
