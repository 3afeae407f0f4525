//! Merging settings: CLI args > config file > built-in defaults.

use std::time::Duration;

use super::args::Args;
use crate::ascii::{BlockSize, CharSet, Filter, Ramp};
use crate::config::Config;
use crate::error::ValidationError;
use crate::params::RenderParams;

/// Parameters described by a config file alone, on top of the defaults.
///
/// Unknown preset or filter names are logged and ignored.
pub fn params_from_config(config: &Config) -> Result<RenderParams, ValidationError> {
    let render = &config.render;
    let playback = &config.playback;
    let defaults = RenderParams::default();

    let ramp = match (&render.chars, &render.charset) {
        (Some(chars), _) => Ramp::new(chars)?,
        (None, Some(name)) => match CharSet::from_name(name) {
            Some(set) => set.ramp(),
            None => {
                log::warn!("Unknown charset '{}' in config, using standard", name);
                defaults.ramp.clone()
            }
        },
        (None, None) => defaults.ramp.clone(),
    };

    let filter = match &render.filter {
        Some(name) => Filter::from_name(name).unwrap_or_else(|| {
            log::warn!("Unknown filter '{}' in config, using nearest", name);
            Filter::Nearest
        }),
        None => defaults.filter,
    };

    Ok(RenderParams {
        ramp,
        color: render.color.unwrap_or(defaults.color),
        invert: render.invert.unwrap_or(defaults.invert),
        invert_color: render.invert_color.unwrap_or(defaults.invert_color),
        brightness: render.brightness.unwrap_or(defaults.brightness),
        scale: render.scale.unwrap_or(defaults.scale),
        edges: render.edges.unwrap_or(defaults.edges),
        aspect_ratio: render.aspect_ratio.unwrap_or(defaults.aspect_ratio),
        auto_fit: playback.fit.unwrap_or(defaults.auto_fit),
        block: BlockSize {
            width: render.block_width.unwrap_or(defaults.block.width),
            height: render.block_height.unwrap_or(defaults.block.height),
        },
        filter,
        frame_delay: playback.delay_ms.map(Duration::from_millis),
        ..defaults
    })
}

/// Build validated run parameters from the command line and config file.
pub fn resolve_params(args: &Args, config: &Config) -> Result<RenderParams, ValidationError> {
    let base = params_from_config(config)?;

    // Ramp: --chars > --charset > config
    let ramp = if let Some(ref chars) = args.chars {
        Ramp::new(chars)?
    } else if let Some(set) = args.charset {
        CharSet::from(set).ramp()
    } else {
        base.ramp.clone()
    };

    // Fit: --original-size and --fit override config
    let auto_fit = if args.original_size {
        false
    } else {
        args.fit || base.auto_fit
    };

    let block = args.block.unwrap_or(BlockSize {
        width: args.block_width.unwrap_or(base.block.width),
        height: args.block_height.unwrap_or(base.block.height),
    });

    let params = RenderParams {
        input: args.input().unwrap_or_default().to_string(),
        output: args.output.clone(),
        ramp,
        color: args.color().unwrap_or(base.color),
        invert: args.invert().unwrap_or(base.invert),
        invert_color: args.invert_color().unwrap_or(base.invert_color),
        brightness: args.brightness.unwrap_or(base.brightness),
        scale: args.scale.unwrap_or(base.scale),
        edges: args.edges().unwrap_or(base.edges),
        aspect_ratio: args.aspect_ratio.unwrap_or(base.aspect_ratio),
        auto_fit,
        block,
        filter: args.filter.map(Filter::from).unwrap_or(base.filter),
        frame_delay: args.delay.map(Duration::from_millis).or(base.frame_delay),
    };

    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["glyphcast"];
        full.extend_from_slice(argv);
        Args::parse_from(full)
    }

    fn config(toml: &str) -> Config {
        Config::parse(toml).unwrap()
    }

    #[test]
    fn test_defaults() {
        let params = resolve_params(&args(&["cat.png"]), &Config::default()).unwrap();
        assert_eq!(
            params,
            RenderParams {
                input: "cat.png".to_string(),
                ..RenderParams::default()
            }
        );
    }

    #[test]
    fn test_config_fills_unset_flags() {
        let cfg = config(
            r#"
            [render]
            charset = "minimal"
            color = true
            brightness = 0.5
            filter = "bilinear"
            block_width = 2

            [playback]
            fit = true
            delay_ms = 50
            "#,
        );
        let params = resolve_params(&args(&["a.gif"]), &cfg).unwrap();
        assert_eq!(params.ramp, CharSet::Minimal.ramp());
        assert!(params.color);
        assert_eq!(params.brightness, 0.5);
        assert_eq!(params.filter, Filter::Bilinear);
        assert_eq!(
            params.block,
            BlockSize {
                width: 2,
                height: 1
            }
        );
        assert!(params.auto_fit);
        assert_eq!(params.frame_delay, Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cfg = config(
            r#"
            [render]
            chars = "ab"
            brightness = 0.5
            filter = "bilinear"

            [playback]
            fit = true
            delay_ms = 50
            "#,
        );
        let params = resolve_params(
            &args(&[
                "a.gif",
                "--charset",
                "blocks",
                "-b",
                "2",
                "--filter",
                "nearest",
                "--original-size",
                "--delay",
                "10",
            ]),
            &cfg,
        )
        .unwrap();
        assert_eq!(params.ramp, CharSet::Blocks.ramp());
        assert_eq!(params.brightness, 2.0);
        assert_eq!(params.filter, Filter::Nearest);
        assert!(!params.auto_fit);
        assert_eq!(params.frame_delay, Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_no_flags_turn_off_config_switches() {
        let cfg = config(
            r#"
            [render]
            color = true
            invert = true
            invert_color = true
            edges = true
            "#,
        );
        let params = resolve_params(&args(&["a.png"]), &cfg).unwrap();
        assert!(params.color && params.invert && params.invert_color && params.edges);

        let params = resolve_params(
            &args(&[
                "a.png",
                "--no-color",
                "--no-invert",
                "--no-invert-color",
                "--no-edges",
            ]),
            &cfg,
        )
        .unwrap();
        assert!(!params.color);
        assert!(!params.invert);
        assert!(!params.invert_color);
        assert!(!params.edges);
    }

    #[test]
    fn test_chars_beats_charset() {
        let params =
            resolve_params(&args(&["a.png", "--charset", "blocks", "-c", "xy"]), &Config::default())
                .unwrap();
        assert_eq!(params.ramp, Ramp::new("xy").unwrap());
    }

    #[test]
    fn test_unknown_config_names_fall_back() {
        let cfg = config("[render]\ncharset = \"braille\"\nfilter = \"lanczos\"\n");
        let params = resolve_params(&args(&["a.png"]), &cfg).unwrap();
        assert_eq!(params.ramp, Ramp::default());
        assert_eq!(params.filter, Filter::Nearest);
    }

    #[test]
    fn test_block_width_and_height_flags() {
        let params = resolve_params(
            &args(&["a.png", "--block-width", "3", "--block-height", "5"]),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(
            params.block,
            BlockSize {
                width: 3,
                height: 5
            }
        );
    }

    #[test]
    fn test_validation_errors() {
        let cfg = Config::default();
        assert_eq!(
            resolve_params(&args(&[]), &cfg),
            Err(ValidationError::MissingInput)
        );
        assert_eq!(
            resolve_params(&args(&["a.png", "-c", ""]), &cfg),
            Err(ValidationError::EmptyRamp)
        );
        assert_eq!(
            resolve_params(&args(&["a.png", "-s", "0"]), &cfg),
            Err(ValidationError::NonPositiveScale(0.0))
        );
        assert_eq!(
            resolve_params(&args(&["a.png", "--aspect-ratio", "-2"]), &cfg),
            Err(ValidationError::NonPositiveAspectRatio(-2.0))
        );
        assert_eq!(
            resolve_params(&args(&["a.png", "-b", "-1"]), &cfg),
            Err(ValidationError::NegativeBrightness(-1.0))
        );
        assert_eq!(
            resolve_params(&args(&["a.png", "--block-width", "0"]), &cfg),
            Err(ValidationError::EmptyBlock {
                width: 0,
                height: 1
            })
        );
    }
}
