// FILE: src/cli/handlers.rs
use super::BuildOptions;
use crate::{
    annotate_markup, generate_from_file, write_output, BuildStats, CssGenerator,
    GenerationOutput, LazyError, Result,
};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Instant, SystemTime};

/// Build state for one input/output pair. Remembers the last written CSS so
/// rebuilds that produce the same stylesheet leave the output untouched.
pub struct BuildSession<'g> {
    generator: &'g CssGenerator,
    options: BuildOptions,
    watch_path: PathBuf,
    last_css: String,
    last_modified: Option<SystemTime>,
}

impl<'g> BuildSession<'g> {
    pub fn new(generator: &'g CssGenerator, options: BuildOptions) -> Self {
        let watch_path = absolute_path(Path::new(&options.input_path));
        let last_css = fs::read_to_string(&options.output_path).unwrap_or_default();
        Self {
            generator,
            options,
            watch_path,
            last_css,
            last_modified: None,
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Generate and always write.
    pub fn build(&mut self) -> Result<BuildStats> {
        let start_time = Instant::now();
        let (markup, output) =
            generate_from_file(self.generator, &self.options.input_path, &self.options.config)?;
        self.persist(start_time, &markup, output)
    }

    /// Generate and write only when the stylesheet differs from the last one
    /// written. Returns `None` when nothing changed.
    pub fn build_and_compare(&mut self) -> Result<Option<BuildStats>> {
        let start_time = Instant::now();
        let (markup, output) =
            generate_from_file(self.generator, &self.options.input_path, &self.options.config)?;

        if output.css == self.last_css {
            log::debug!("Generated CSS unchanged, skipping write");
            return Ok(None);
        }
        self.persist(start_time, &markup, output).map(Some)
    }

    fn persist(&mut self, start_time: Instant, markup: &str, output: GenerationOutput) -> Result<BuildStats> {
        write_output(&self.options.output_path, &output.css)?;
        if let Some(annotate_path) = &self.options.annotate_path {
            write_output(annotate_path, &annotate_markup(markup, &output.elements))?;
        }

        let stats = BuildStats {
            source_size: markup.len() as u64,
            output_size: output.css.len() as u64,
            build_time_ms: start_time.elapsed().as_millis() as u64,
            generation: output.stats,
        };
        self.last_css = output.css;
        Ok(stats)
    }

    /// Whether a watcher event concerns the input file.
    pub fn is_input_event(&self, event: &Event) -> bool {
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return false;
        }
        event
            .paths
            .iter()
            .any(|path| absolute_path(path) == self.watch_path)
    }

    /// True when the input's modification time moved past the last one seen.
    pub fn input_modified(&mut self) -> bool {
        let modified = match fs::metadata(&self.options.input_path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                log::warn!("Cannot read modification time of {}: {}", self.options.input_path, e);
                return false;
            }
        };
        match self.last_modified {
            Some(last) if modified <= last => false,
            _ => {
                self.last_modified = Some(modified);
                true
            }
        }
    }
}

fn absolute_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

// --- BUILD ---
pub fn handle_build(generator: &CssGenerator, options: BuildOptions) -> Result<()> {
    println!("🔨 Building {} -> {}", options.input_path, options.output_path);

    let show_stats = options.show_stats;
    let mut session = BuildSession::new(generator, options);
    let stats = session.build()?;

    println!("✅ Initialized {}", session.options().output_path);
    println!("   Output: {} bytes", stats.output_size);
    println!("   Time: {}ms", stats.build_time_ms);
    report_inline_config_errors(&stats);

    if show_stats {
        print_detailed_stats(&stats)?;
    }
    Ok(())
}

// --- WATCH ---
pub fn handle_watch(generator: &CssGenerator, options: BuildOptions) -> Result<()> {
    let show_stats = options.show_stats;
    let mut session = BuildSession::new(generator, options);

    let stats = session.build()?;
    println!("✅ Initialized {}", session.options().output_path);
    report_inline_config_errors(&stats);
    session.input_modified();

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| LazyError::watch(format!("Failed to create file watcher: {}", e)))?;

    // Editors often replace the file, so watch the directory that holds it.
    let watch_dir = session
        .watch_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    watcher
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| LazyError::watch(format!("Failed to watch {}: {}", watch_dir.display(), e)))?;

    println!("👀 Watching {} for changes...", session.options().input_path);

    loop {
        match rx.recv() {
            Ok(event) => {
                if !session.is_input_event(&event) || !session.input_modified() {
                    continue;
                }
                match session.build_and_compare() {
                    Ok(Some(stats)) => {
                        println!("🔄 Detected change. Build in {}ms", stats.build_time_ms);
                        report_inline_config_errors(&stats);
                        if show_stats {
                            print_detailed_stats(&stats)?;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("❌ Error during build: {}", e),
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn report_inline_config_errors(stats: &BuildStats) {
    for error in &stats.generation.inline_config_errors {
        eprintln!("⚠️  Error parsing inline JSON: {}, in line: {}", error.message, error.line);
    }
}

fn print_detailed_stats(stats: &BuildStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)
        .map_err(|e| LazyError::invalid_format(format!("Failed to serialize stats: {}", e)))?;
    println!("\n📊 Generation Statistics:\n{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BaseStyles, Config};
    use notify::event::{CreateKind, ModifyKind};
    use tempfile::TempDir;

    fn options(dir: &TempDir) -> BuildOptions {
        BuildOptions {
            input_path: dir.path().join("index.html").to_string_lossy().into_owned(),
            output_path: dir.path().join("style.css").to_string_lossy().into_owned(),
            annotate_path: None,
            show_stats: false,
            config: Config::new(),
        }
    }

    fn generator() -> CssGenerator {
        CssGenerator::with_base_styles(BaseStyles::empty()).unwrap()
    }

    #[test]
    fn test_build_and_compare_skips_identical_output() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        fs::write(&opts.input_path, r#"<p class="c-red-500"></p>"#).unwrap();

        let generator = generator();
        let mut session = BuildSession::new(&generator, opts.clone());
        session.build().unwrap();
        assert!(session.build_and_compare().unwrap().is_none());

        // Whitespace-only markup edits leave the stylesheet unchanged.
        fs::write(&opts.input_path, r#"<p  class="c-red-500" ></p>"#).unwrap();
        assert!(session.build_and_compare().unwrap().is_none());

        fs::write(&opts.input_path, r#"<p class="c-red-500 w-[1px]"></p>"#).unwrap();
        let stats = session.build_and_compare().unwrap().unwrap();
        assert_eq!(stats.generation.generated_rule_count, 2);
        assert!(fs::read_to_string(&opts.output_path).unwrap().contains("width:1px;"));
    }

    #[test]
    fn test_existing_output_counts_as_last_written() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        fs::write(&opts.input_path, r#"<p class="c-red-500"></p>"#).unwrap();

        let generator = generator();
        let css = generator
            .generate(r#"<p class="c-red-500"></p>"#, &Config::new())
            .unwrap()
            .css;
        fs::write(&opts.output_path, css).unwrap();

        let mut session = BuildSession::new(&generator, opts);
        assert!(session.build_and_compare().unwrap().is_none());
    }

    #[test]
    fn test_annotated_markup_written() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(&dir);
        let annotated = dir.path().join("out/index.html");
        opts.annotate_path = Some(annotated.to_string_lossy().into_owned());
        fs::write(&opts.input_path, r#"<div class="lg-(h-[3rem])"></div>"#).unwrap();

        let generator = generator();
        BuildSession::new(&generator, opts).build().unwrap();

        assert_eq!(
            fs::read_to_string(annotated).unwrap(),
            r#"<div class="lg-(h-[3rem]) lazy-responsive-lg-0"></div>"#
        );
    }

    #[test]
    fn test_event_filtering() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        fs::write(&opts.input_path, "<p></p>").unwrap();

        let generator = generator();
        let mut session = BuildSession::new(&generator, opts.clone());

        let input_event = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from(&opts.input_path));
        let other_event = Event::new(EventKind::Create(CreateKind::File)).add_path(dir.path().join("other.html"));
        let remove_event = Event::new(EventKind::Remove(notify::event::RemoveKind::File))
            .add_path(PathBuf::from(&opts.input_path));

        assert!(session.is_input_event(&input_event));
        assert!(!session.is_input_event(&other_event));
        assert!(!session.is_input_event(&remove_event));

        assert!(session.input_modified());
        assert!(!session.input_modified());
    }
}
