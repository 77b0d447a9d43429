// FILE: src/cli/mod.rs

mod config;
mod handlers;

pub use config::{ConfigFile, DEFAULT_CONFIG_FILE};
pub use handlers::BuildSession;

use crate::error::{LazyError, Result};
use crate::{BaseStyles, Config, CssGenerator};
use clap::{Arg, ArgAction, Command};
use std::path::Path;

pub const DEFAULT_INPUT_FILE: &str = "index.html";
pub const DEFAULT_OUTPUT_FILE: &str = "style.css";

/// Everything a build needs besides the generator.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input_path: String,
    pub output_path: String,
    /// Also write the markup with synthetic classes injected.
    pub annotate_path: Option<String>,
    pub show_stats: bool,
    pub config: Config,
}

pub struct LazyCli {
    config_file: ConfigFile,
}

impl LazyCli {
    pub fn new() -> Self {
        Self {
            config_file: ConfigFile::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let matches = self.build_cli().get_matches();

        self.setup_logging(matches.get_count("verbose"))?;

        if matches.get_flag("config") {
            let config_path = matches
                .get_one::<String>("config-file")
                .map(String::as_str)
                .unwrap_or(DEFAULT_CONFIG_FILE);
            self.config_file = config::load_or_create(config_path)?;
        }

        let options = self.build_options(&matches)?;

        let generator = match matches.get_one::<String>("base-styles") {
            Some(path) => CssGenerator::with_base_styles(BaseStyles::load(path)?)?,
            None => CssGenerator::new()?,
        };

        if matches.get_flag("build") {
            handlers::handle_build(&generator, options)
        } else {
            handlers::handle_watch(&generator, options)
        }
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("Lazy CSS Development Team")
            .arg(Arg::new("input").help(format!("Input HTML file (default: {})", DEFAULT_INPUT_FILE)).index(1))
            .arg(Arg::new("output").help(format!("Output CSS file (default: {})", DEFAULT_OUTPUT_FILE)).index(2))
            .arg(
                Arg::new("build")
                    .short('b')
                    .long("build")
                    .help("Perform a single build and exit")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .help(format!("Include and use {} (created when missing)", DEFAULT_CONFIG_FILE))
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("config-file")
                    .long("config-file")
                    .value_name("FILE")
                    .help("Configuration file to use with --config (.json or .toml)")
                    .requires("config"),
            )
            .arg(
                Arg::new("base-styles")
                    .long("base-styles")
                    .value_name("FILE")
                    .help("Base style library JSON replacing the bundled one"),
            )
            .arg(
                Arg::new("annotate")
                    .long("annotate")
                    .value_name("FILE")
                    .help("Write the markup with responsive classes injected"),
            )
            .arg(
                Arg::new("stats")
                    .long("stats")
                    .help("Show detailed generation statistics")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .try_init()
            .map_err(|e| LazyError::config(format!("Failed to initialize logging: {}", e)))
    }

    pub fn build_options(&self, matches: &clap::ArgMatches) -> Result<BuildOptions> {
        let input_path = matches
            .get_one::<String>("input")
            .cloned()
            .or_else(|| self.config_file.input_file.clone())
            .unwrap_or_else(|| DEFAULT_INPUT_FILE.to_string());
        let output_path = matches
            .get_one::<String>("output")
            .cloned()
            .or_else(|| self.config_file.output_file.clone())
            .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string());

        if !Path::new(&input_path).exists() {
            return Err(LazyError::FileNotFound {
                path: format!("Input file '{}'", input_path),
            });
        }

        Ok(BuildOptions {
            input_path,
            output_path,
            annotate_path: matches.get_one::<String>("annotate").cloned(),
            show_stats: matches.get_flag("stats"),
            config: self.config_file.to_config(),
        })
    }
}

impl Default for LazyCli {
    fn default() -> Self {
        Self::new()
    }
}
