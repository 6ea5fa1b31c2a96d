//! Stroke Kinematics - command-line front end
//!
//! Reads keypoint request files, runs the feature extractor, writes responses.

use std::path::{Path, PathBuf};

use stroke_kinematics::app::cli::{Cli, Commands, ConfigAction};
use stroke_kinematics::app::config::Config;
use stroke_kinematics::wire::{FeatureRequest, FeatureResponse, FrameDecoder};
use stroke_kinematics::FeatureExtractor;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status for requests the engine rejected
const EXIT_INPUT_ERROR: i32 = 2;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Compute {
            input,
            output,
            fps,
            left_handed,
        } => {
            let config = Config::load_from(config_path)?;
            run_compute(&input, output, fps, left_handed, &config)?;
        }
        Commands::Joints => {
            run_joints(&Config::load_from(config_path)?);
        }
        Commands::Config { action } => {
            run_config(action, &Config::resolve_path(config_path))?;
        }
    }

    Ok(())
}

fn run_compute(
    input: &Path,
    output: Option<PathBuf>,
    fps: Option<f64>,
    left_handed: bool,
    config: &Config,
) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Request file not found: {:?}", input);
    }

    let mut request = FeatureRequest::load(input)?;
    if let Some(fps) = fps {
        request.fps = fps;
    }
    if left_handed {
        request.right_handed = false;
    }

    info!(
        "Loaded request with {} frames and {} phase marks",
        request.len(),
        request.phases.len()
    );

    let decoder = FrameDecoder::with_options(&config.joints, config.decode_options());
    let extractor = FeatureExtractor::with_params(config.extractor_params());

    let features = match request
        .decode(&decoder)
        .and_then(|d| extractor.compute(&d.frames, &d.phases, d.fps, d.right_handed))
    {
        Ok(features) => features,
        Err(e) if e.is_input_error() => {
            error!("Request rejected: {}", e);
            std::process::exit(EXIT_INPUT_ERROR);
        }
        Err(e) => return Err(e.into()),
    };

    let response = FeatureResponse::new(request.stroke_type.clone(), features).stamped();

    match output {
        Some(path) => {
            response.save(&path)?;
            info!("Wrote features to {:?}", path);
        }
        None => println!("{}", response.to_json_pretty()?),
    }

    Ok(())
}

fn run_joints(config: &Config) {
    println!("{:<16} {:<20} {}", "JOINT", "NAME", "INDEX");
    for binding in config.joints.bindings() {
        let index = binding
            .index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<16} {:<20} {}", binding.joint.as_str(), binding.name, index);
    }
}

fn run_config(action: ConfigAction, config_path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default(config_path)?;
            println!("Configuration ({:?}):\n", config_path);
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {:?}. Use --force to overwrite.",
                    config_path
                );
            }

            let config = Config::load_or_default(config_path)?;
            config.save(config_path)?;
            println!("Created config at {:?}", config_path);
        }
        ConfigAction::Reset { force } => {
            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save(config_path)?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}
