//! Rule generation: plain, pseudo-class and responsive token shapes

use crate::assembler::Stylesheet;
use crate::base_styles::BaseStyles;
use crate::config::Config;
use crate::error::Result;
use crate::extractor::{apply_inline_config, scan_markup, InlineConfigError};
use crate::style_resolver::StyleResolver;
use crate::tables::StaticTables;
use crate::types::{Breakpoint, CssRule, Element};
use crate::utils::{class_selector, split_top_level};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

pub const SYNTHETIC_CLASS_PREFIX: &str = "lazy-responsive";

/// Per-call generation state. A fresh context is created for every
/// generation so separate runs never share counters or buckets.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Live configuration, including inline overrides from the markup.
    pub config: Config,
    processed: HashSet<String>,
    synthetic_counter: usize,
    media_buckets: BTreeMap<Breakpoint, Vec<CssRule>>,
    generated: Vec<CssRule>,
}

impl GenerationContext {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn is_processed(&self, token: &str) -> bool {
        self.processed.contains(token)
    }

    pub fn generated_rules(&self) -> &[CssRule] {
        &self.generated
    }

    pub fn media_rules(&self, breakpoint: Breakpoint) -> &[CssRule] {
        self.media_buckets
            .get(&breakpoint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn synthetic_count(&self) -> usize {
        self.synthetic_counter
    }

    fn next_synthetic_class(&mut self, breakpoint: Breakpoint) -> String {
        let name = format!("{}-{}-{}", SYNTHETIC_CLASS_PREFIX, breakpoint, self.synthetic_counter);
        self.synthetic_counter += 1;
        name
    }
}

pub struct RuleGenerator<'g> {
    resolver: &'g StyleResolver,
    tables: &'g StaticTables,
    responsive_regex: &'g Regex,
    pseudo_regex: &'g Regex,
}

impl<'g> RuleGenerator<'g> {
    /// Generate the rule for one token. Each token is handled at most once per
    /// context; responsive tokens never yield a rule here.
    pub fn generate(&self, token: &str, ctx: &mut GenerationContext) -> Option<CssRule> {
        if !ctx.processed.insert(token.to_string()) {
            return None;
        }

        if self.responsive_regex.is_match(token) {
            return None;
        }

        if let Some(caps) = self.pseudo_regex.captures(token) {
            let pseudo = &caps[1];
            let declarations: String = split_top_level(&caps[2])
                .into_iter()
                .filter_map(|inner| {
                    self.resolver
                        .resolve(inner, &ctx.config, self.tables)
                        .into_declarations()
                })
                .collect();

            if declarations.is_empty() {
                return None;
            }
            return Some(CssRule::new(
                format!("{}:{}", class_selector(token), pseudo),
                declarations,
            ));
        }

        self.resolver
            .resolve(token, &ctx.config, self.tables)
            .into_declarations()
            .map(|declarations| CssRule::new(class_selector(token), declarations))
    }

    /// Walk every class token in document order, generating plain and
    /// pseudo-class rules and synthesizing responsive classes.
    pub fn process_elements(&self, elements: &mut [Element], ctx: &mut GenerationContext) {
        for element in elements.iter_mut() {
            let tokens: Vec<String> = element.classes[..element.source_class_count].to_vec();
            for token in tokens {
                if ctx.is_processed(&token) {
                    continue;
                }

                match self.responsive_parts(&token) {
                    Some((breakpoint, inner)) => {
                        self.synthesize_responsive(element, breakpoint, &inner, ctx)
                    }
                    None => {
                        if let Some(rule) = self.generate(&token, ctx) {
                            log::debug!("Generated rule for '{}'", token);
                            ctx.generated.push(rule);
                        }
                    }
                }
            }
        }
    }

    fn responsive_parts(&self, token: &str) -> Option<(Breakpoint, String)> {
        let caps = self.responsive_regex.captures(token)?;
        let breakpoint = Breakpoint::parse(&caps[1])?;
        Some((breakpoint, caps[2].to_string()))
    }

    /// One synthetic class per inner query; the class is attached to the
    /// element even when its query resolves to nothing.
    fn synthesize_responsive(
        &self,
        element: &mut Element,
        breakpoint: Breakpoint,
        inner: &str,
        ctx: &mut GenerationContext,
    ) {
        for query in split_top_level(inner) {
            let synthetic = ctx.next_synthetic_class(breakpoint);
            element.add_class(&synthetic);

            let resolution = self.resolver.resolve(query, &ctx.config, self.tables);
            if let Some(declarations) = resolution.into_declarations() {
                log::debug!("Synthesized '{}' for {} query '{}'", synthetic, breakpoint, query);
                ctx.media_buckets
                    .entry(breakpoint)
                    .or_default()
                    .push(CssRule::new(class_selector(&synthetic), declarations));
            }
        }
    }
}

/// Counters describing one generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    /// Elements carrying a class attribute
    pub element_count: usize,

    /// Class tokens taken from the markup, duplicates included
    pub token_count: usize,

    pub base_rule_count: usize,
    pub generated_rule_count: usize,
    pub custom_rule_count: usize,
    pub media_rule_count: usize,

    /// Synthetic responsive classes created
    pub synthetic_class_count: usize,

    /// Inline configuration lines that could not be applied
    pub inline_config_errors: Vec<InlineConfigError>,

    /// Size of the stylesheet in bytes
    pub output_size: usize,
}

#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub css: String,
    /// Scanned elements, with synthetic classes appended.
    pub elements: Vec<Element>,
    pub stats: GenerationStats,
}

/// Stylesheet generator. Immutable once built; every call to
/// [`CssGenerator::generate`] starts from fresh state.
pub struct CssGenerator {
    tables: StaticTables,
    base_styles: BaseStyles,
    resolver: StyleResolver,
    responsive_regex: Regex,
    pseudo_regex: Regex,
}

impl CssGenerator {
    /// Generator with the bundled tables and base style library.
    pub fn new() -> Result<Self> {
        Self::with_base_styles(BaseStyles::bundled()?)
    }

    pub fn with_base_styles(base_styles: BaseStyles) -> Result<Self> {
        Self::with_tables(StaticTables::builtin()?, base_styles)
    }

    pub fn with_tables(tables: StaticTables, base_styles: BaseStyles) -> Result<Self> {
        let resolver = StyleResolver::new(&tables)?;
        Ok(Self {
            tables,
            base_styles,
            resolver,
            responsive_regex: Regex::new(r"^(sm|md|lg|xl)-\((.*)\)$")?,
            pseudo_regex: Regex::new(r"^(hover|active)-\((.*)\)$")?,
        })
    }

    pub fn rule_generator(&self) -> RuleGenerator<'_> {
        RuleGenerator {
            resolver: &self.resolver,
            tables: &self.tables,
            responsive_regex: &self.responsive_regex,
            pseudo_regex: &self.pseudo_regex,
        }
    }

    /// Generate the stylesheet for `markup`. The caller's configuration is
    /// copied; inline overrides only affect this run.
    pub fn generate(&self, markup: &str, config: &Config) -> Result<GenerationOutput> {
        let mut ctx = GenerationContext::new(config.clone());
        let mut stats = GenerationStats::default();

        let scanned = scan_markup(markup);
        if let Some(body) = &scanned.inline_config {
            stats.inline_config_errors = apply_inline_config(body, &mut ctx.config);
        }

        let mut elements = scanned.elements;
        stats.element_count = elements.len();
        stats.token_count = elements.iter().map(|e| e.source_class_count).sum();

        self.rule_generator().process_elements(&mut elements, &mut ctx);

        let used: HashSet<&str> = elements
            .iter()
            .flat_map(|e| e.classes.iter().map(String::as_str))
            .collect();
        let base = self.base_styles.rules_for(&used);

        let GenerationContext {
            config: live_config,
            media_buckets,
            generated,
            synthetic_counter,
            ..
        } = ctx;

        let stylesheet = Stylesheet::assemble(
            base,
            generated,
            live_config.custom_classes(),
            media_buckets,
            &self.tables,
        )?;

        stats.base_rule_count = stylesheet.base.len();
        stats.generated_rule_count = stylesheet.generated.len();
        stats.custom_rule_count = stylesheet.custom.len();
        stats.media_rule_count = stylesheet.media.iter().map(|m| m.rules.len()).sum();
        stats.synthetic_class_count = synthetic_counter;

        let css = stylesheet.render();
        stats.output_size = css.len();
        log::debug!(
            "Generated {} rules ({} base, {} utility, {} custom, {} responsive)",
            stylesheet.rule_count(),
            stats.base_rule_count,
            stats.generated_rule_count,
            stats.custom_rule_count,
            stats.media_rule_count
        );

        Ok(GenerationOutput {
            css,
            elements,
            stats,
        })
    }
}
