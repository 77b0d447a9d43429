//! Stylesheet assembly and output formatting

use crate::error::{LazyError, Result};
use crate::tables::StaticTables;
use crate::types::{Breakpoint, CssRule};
use crate::utils::class_selector;
use std::collections::BTreeMap;

const RULE_INDENT: &str = "    ";
const MEDIA_RULE_INDENT: &str = "        ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlock {
    pub breakpoint: Breakpoint,
    pub min_width: &'static str,
    pub rules: Vec<CssRule>,
}

/// The four rule sources, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub base: Vec<CssRule>,
    pub generated: Vec<CssRule>,
    /// Custom classes keep their declaration text verbatim.
    pub custom: Vec<CssRule>,
    pub media: Vec<MediaBlock>,
}

impl Stylesheet {
    pub fn assemble(
        base: Vec<CssRule>,
        generated: Vec<CssRule>,
        custom_classes: &[(String, String)],
        media_buckets: BTreeMap<Breakpoint, Vec<CssRule>>,
        tables: &StaticTables,
    ) -> Result<Self> {
        let custom = custom_classes
            .iter()
            .map(|(name, css)| CssRule::new(class_selector(name), css.clone()))
            .collect();

        let mut media = Vec::with_capacity(media_buckets.len());
        for (breakpoint, rules) in media_buckets {
            if rules.is_empty() {
                continue;
            }
            let min_width = tables.breakpoint_width(breakpoint).ok_or_else(|| {
                LazyError::static_data(format!("no min-width for breakpoint '{}'", breakpoint))
            })?;
            media.push(MediaBlock {
                breakpoint,
                min_width,
                rules,
            });
        }

        Ok(Self {
            base,
            generated,
            custom,
            media,
        })
    }

    pub fn rule_count(&self) -> usize {
        self.base.len()
            + self.generated.len()
            + self.custom.len()
            + self.media.iter().map(|m| m.rules.len()).sum::<usize>()
    }

    pub fn render(&self) -> String {
        let mut blocks: Vec<String> = Vec::with_capacity(self.rule_count());
        blocks.extend(self.base.iter().map(|r| format_rule(r, RULE_INDENT, "}\n")));
        blocks.extend(self.generated.iter().map(|r| format_rule(r, RULE_INDENT, "}\n")));
        blocks.extend(self.custom.iter().map(format_custom_rule));

        let mut output = blocks.join("\n");
        let media: Vec<String> = self.media.iter().map(format_media_block).collect();
        output.push_str(&media.join("\n"));
        output
    }
}

/// Pretty-print one rule: a line break and `indent` after the opening
/// brace and after every `;`, then `close`.
pub fn format_rule(rule: &CssRule, indent: &str, close: &str) -> String {
    let separator = format!(";\n{}", indent);
    format!(
        "{} {{\n{}{}\n{}",
        rule.selector,
        indent,
        rule.declarations.replace(';', &separator),
        close
    )
}

fn format_custom_rule(rule: &CssRule) -> String {
    format!("{} {{\n{}{}\n}}", rule.selector, RULE_INDENT, rule.declarations)
}

fn format_media_block(block: &MediaBlock) -> String {
    let rules: Vec<String> = block
        .rules
        .iter()
        .map(|r| format_rule(r, MEDIA_RULE_INDENT, "    }"))
        .collect();
    format!(
        "\n@media (min-width: {}) {{\n{}{}\n}}\n",
        block.min_width,
        RULE_INDENT,
        rules.join(&format!("\n{}", RULE_INDENT))
    )
}
