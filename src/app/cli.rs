//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stroke Kinematics - Phase-anchored features from pose keypoints
#[derive(Parser, Debug)]
#[command(name = "stroke-kin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute features from a keypoint request file
    Compute {
        /// Input request JSON (frames, phases, fps, stroke_type)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the response JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the request frame rate
        #[arg(long)]
        fps: Option<f64>,

        /// Treat the player as left-handed regardless of the request
        #[arg(long)]
        left_handed: bool,
    },

    /// Show the active joint mapping table
    Joints,

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the default location
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Reset configuration to defaults
    Reset {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_compute_with_defaults() {
        let cli = Cli::try_parse_from(["stroke-kin", "compute", "--input", "req.json"]).unwrap();

        match cli.command {
            Commands::Compute { input, output, fps, left_handed } => {
                assert_eq!(input, PathBuf::from("req.json"));
                assert!(output.is_none());
                assert!(fps.is_none());
                assert!(!left_handed);
            }
            _ => panic!("Expected Compute command"),
        }
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_compute_with_all_options() {
        let args = [
            "stroke-kin",
            "compute",
            "-i", "req.json",
            "-o", "out/features.json",
            "--fps", "59.94",
            "--left-handed",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Compute { input, output, fps, left_handed } => {
                assert_eq!(input, PathBuf::from("req.json"));
                assert_eq!(output, Some(PathBuf::from("out/features.json")));
                assert_eq!(fps, Some(59.94));
                assert!(left_handed);
            }
            _ => panic!("Expected Compute command"),
        }
    }

    #[test]
    fn test_cli_compute_requires_input() {
        assert!(Cli::try_parse_from(["stroke-kin", "compute"]).is_err());
    }

    #[test]
    fn test_cli_parse_joints() {
        let cli = Cli::try_parse_from(["stroke-kin", "joints"]).unwrap();
        assert!(matches!(cli.command, Commands::Joints));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let args = ["stroke-kin", "joints", "--verbose", "--config", "alt.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn test_cli_parse_config_actions() {
        let cli = Cli::try_parse_from(["stroke-kin", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { action: ConfigAction::Show }));

        let cli = Cli::try_parse_from(["stroke-kin", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config { action: ConfigAction::Init { force: true } }
        ));

        let cli = Cli::try_parse_from(["stroke-kin", "config", "reset"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config { action: ConfigAction::Reset { force: false } }
        ));
    }

    #[test]
    fn test_cli_config_path_applies_to_config_actions() {
        let args = ["stroke-kin", "config", "init", "--config", "alt.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config { action: ConfigAction::Init { force: false } }
        ));
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["stroke-kin", "record"]).is_err());
    }
}
