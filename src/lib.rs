//! Lazy CSS
//!
//! Generates a utility stylesheet from the class tokens written in markup.
//!
//! # Features
//!
//! - Compact class DSL: palette colors, bracketed literals, border composites,
//!   grid columns, z-index, paired shorthands and `{key}` config references
//! - Pseudo-class wrapping (`hover-(...)`, `active-(...)`)
//! - Responsive variants (`sm-(...)` .. `xl-(...)`) emitted under media queries
//! - Bundled base utility library, emitted only for classes in use
//! - Custom classes and variables from configuration or an inline
//!   `<script id="lazy-config">` block
//!
//! # Basic Usage
//!
//! ```rust
//! use lazycss::{generate_css, Config, Result};
//!
//! fn main() -> Result<()> {
//!     let css = generate_css(r#"<div class="bg-blue-500"></div>"#, &Config::new())?;
//!     assert!(css.contains("background-color:#3b82f6;"));
//!     Ok(())
//! }
//! ```
//!
//! # Generation Pipeline
//!
//! 1. **Extractor** - Scan class attributes and apply inline configuration
//! 2. **Style Resolver** - Match each token against the grammar
//! 3. **Rule Generator** - Plain, pseudo-class and responsive rules
//! 4. **Assembler** - Base, generated, custom and media rules, formatted

pub mod types;
pub mod error;
pub mod utils;
pub mod tables;
pub mod config;
pub mod base_styles;
pub mod extractor;
pub mod style_resolver;
pub mod generator;
pub mod assembler;
pub mod cli;

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

// Re-export commonly used types and functions
pub use error::{LazyError, Result};
pub use types::*;
pub use config::{Config, ConfigValue};
pub use base_styles::BaseStyles;
pub use tables::StaticTables;
pub use extractor::{annotate_markup, scan_markup, InlineConfigError, ScannedMarkup};
pub use style_resolver::StyleResolver;
pub use generator::{CssGenerator, GenerationContext, GenerationOutput, GenerationStats, RuleGenerator};
pub use assembler::Stylesheet;
pub use utils::escape_class_name;
pub use cli::LazyCli;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Result of building one markup file into a stylesheet file
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildStats {
    /// Markup size in bytes
    pub source_size: u64,

    /// Stylesheet size in bytes
    pub output_size: u64,

    /// Build time in milliseconds
    pub build_time_ms: u64,

    pub generation: GenerationStats,
}

/// Generate the stylesheet for a markup document with the bundled tables.
pub fn generate_css(markup: &str, config: &Config) -> Result<String> {
    Ok(CssGenerator::new()?.generate(markup, config)?.css)
}

/// Read `input_path`, generate, and write the stylesheet to `output_path`.
pub fn build_file(input_path: &str, output_path: &str, config: &Config) -> Result<BuildStats> {
    let start_time = Instant::now();
    let generator = CssGenerator::new()?;

    let (markup, output) = generate_from_file(&generator, input_path, config)?;
    write_output(output_path, &output.css)?;

    let stats = BuildStats {
        source_size: markup.len() as u64,
        output_size: output.css.len() as u64,
        build_time_ms: start_time.elapsed().as_millis() as u64,
        generation: output.stats,
    };

    log::info!("Built '{}' -> '{}' ({} bytes)", input_path, output_path, stats.output_size);
    log::debug!("Full stats: {:?}", stats);

    Ok(stats)
}

/// Read a markup file and generate its stylesheet without writing anything.
pub fn generate_from_file(
    generator: &CssGenerator,
    input_path: &str,
    config: &Config,
) -> Result<(String, GenerationOutput)> {
    let markup = fs::read_to_string(input_path).map_err(|e| LazyError::FileNotFound {
        path: format!("{}: {}", input_path, e),
    })?;
    let output = generator.generate(&markup, config)?;
    Ok((markup, output))
}

/// Write a stylesheet, creating the parent directory when needed.
pub fn write_output(output_path: &str, css: &str) -> Result<()> {
    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_path, css)?;
    Ok(())
}
