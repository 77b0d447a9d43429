//! Core data types shared across the generator

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// CSS property a utility prefix maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyDef {
    Plain(&'static str),
    /// Offset utilities (`l`, `r`, `t`, `b`) also force `position:absolute`.
    Positional(&'static str),
}

impl PropertyDef {
    pub fn property(&self) -> &'static str {
        match self {
            PropertyDef::Plain(p) | PropertyDef::Positional(p) => p,
        }
    }

    /// Render `<property>:<value>;`, with the positioning declaration when needed.
    pub fn declaration(&self, value: &str) -> String {
        match self {
            PropertyDef::Plain(p) => format!("{}:{};", p, value),
            PropertyDef::Positional(p) => format!("{}:{};position:absolute;", p, value),
        }
    }
}

/// Responsive thresholds, ordered as they appear in the breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Sm,
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 4] = [Breakpoint::Sm, Breakpoint::Md, Breakpoint::Lg, Breakpoint::Xl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "sm" => Some(Breakpoint::Sm),
            "md" => Some(Breakpoint::Md),
            "lg" => Some(Breakpoint::Lg),
            "xl" => Some(Breakpoint::Xl),
            _ => None,
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grammar rules of the style resolver, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarRule {
    PaletteColor,
    BorderComposite,
    GridColumns,
    ZIndex,
    PairedShorthand,
    BracketLiteral,
    ConfigReference,
}

/// Outcome of resolving one class token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No grammar rule recognises the token; it stays an ordinary class.
    NoMatch,
    /// A rule matched but a palette, configuration or property lookup failed.
    Unresolved(GrammarRule),
    Declarations { rule: GrammarRule, text: String },
}

impl Resolution {
    pub fn declarations(&self) -> Option<&str> {
        match self {
            Resolution::Declarations { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn into_declarations(self) -> Option<String> {
        match self {
            Resolution::Declarations { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn rule(&self) -> Option<GrammarRule> {
        match self {
            Resolution::NoMatch => None,
            Resolution::Unresolved(rule) | Resolution::Declarations { rule, .. } => Some(*rule),
        }
    }
}

/// A selector and its unformatted declaration list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub selector: String,
    pub declarations: String,
}

impl CssRule {
    pub fn new(selector: impl Into<String>, declarations: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: declarations.into(),
        }
    }
}

impl fmt::Display for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.selector, self.declarations)
    }
}

/// A markup element that carries a class attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Source tokens followed by any synthetic classes added during generation.
    pub classes: Vec<String>,
    /// Number of leading entries in `classes` that came from the markup.
    pub source_class_count: usize,
    /// Byte range of the attribute value in the markup, quotes included.
    pub value_span: Option<Range<usize>>,
}

impl Element {
    pub fn new(tag: impl Into<String>, class_value: &str, value_span: Option<Range<usize>>) -> Self {
        let classes: Vec<String> = class_value.split_whitespace().map(str::to_string).collect();
        Self {
            tag: tag.into(),
            source_class_count: classes.len(),
            classes,
            value_span,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Append a class unless the element already carries it.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn synthetic_classes(&self) -> &[String] {
        &self.classes[self.source_class_count..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_declaration() {
        assert_eq!(PropertyDef::Plain("width").declaration("50%"), "width:50%;");
        assert_eq!(
            PropertyDef::Positional("top").declaration("0"),
            "top:0;position:absolute;"
        );
    }

    #[test]
    fn test_breakpoint_order() {
        let mut bps = vec![Breakpoint::Xl, Breakpoint::Sm, Breakpoint::Lg, Breakpoint::Md];
        bps.sort();
        assert_eq!(bps, Breakpoint::ALL.to_vec());
        assert_eq!(Breakpoint::parse("lg"), Some(Breakpoint::Lg));
        assert_eq!(Breakpoint::parse("xxl"), None);
    }

    #[test]
    fn test_element_classes() {
        let mut el = Element::new("div", "  p-[4px]\tbg-red-500 ", Some(0..10));
        assert_eq!(el.classes, vec!["p-[4px]", "bg-red-500"]);

        el.add_class("lazy-responsive-sm-0");
        el.add_class("lazy-responsive-sm-0");
        assert_eq!(el.synthetic_classes(), &["lazy-responsive-sm-0".to_string()]);
    }
}
