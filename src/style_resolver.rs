//! Class token grammar: maps one utility token to a CSS declaration list

use crate::config::Config;
use crate::error::Result;
use crate::tables::StaticTables;
use crate::types::{GrammarRule, Resolution};
use crate::utils::{is_all_digits, split_values};
use regex::Regex;

type RuleHandler = fn(&StyleResolver, &str, &Config, &StaticTables) -> Option<Resolution>;

pub struct StyleResolver {
    palette_regex: Regex,
    border_regex: Regex,
    short_color_regex: Regex,
    grid_regex: Regex,
    z_index_regex: Regex,
    paired_regex: Regex,
    literal_regex: Regex,
    config_ref_regex: Regex,
}

impl StyleResolver {
    /// Compile the grammar. The bracket-literal rule is built from the
    /// property table keys.
    pub fn new(tables: &StaticTables) -> Result<Self> {
        let keys: Vec<String> = tables.property_keys().map(regex::escape).collect();

        Ok(Self {
            palette_regex: Regex::new(r"^(bg|c|border)-([a-z]+)-([0-9]+)$")?,
            border_regex: Regex::new(r"^(border(?:-[trbl])?)-\[(.*)\]$")?,
            short_color_regex: Regex::new(r"^([a-z]+)-([0-9]+)$")?,
            grid_regex: Regex::new(r"^gridCols-([0-9]+)$")?,
            z_index_regex: Regex::new(r"^zIndex-\[(.*)\]$")?,
            paired_regex: Regex::new(r"^(hw|mp)-\[(.*)\]$")?,
            literal_regex: Regex::new(&format!(r"^({})-\[(.*)\]$", keys.join("|")))?,
            config_ref_regex: Regex::new(r"^(\w+)-\{(.*)\}$")?,
        })
    }

    /// Resolve a token against the grammar. The first rule that claims the
    /// token decides the outcome, even when its lookup fails.
    pub fn resolve(&self, token: &str, config: &Config, tables: &StaticTables) -> Resolution {
        const RULES: [RuleHandler; 7] = [
            StyleResolver::palette_color,
            StyleResolver::border_composite,
            StyleResolver::grid_columns,
            StyleResolver::z_index,
            StyleResolver::paired_shorthand,
            StyleResolver::bracket_literal,
            StyleResolver::config_reference,
        ];

        let token = token.replace('_', " ");
        for handler in RULES {
            if let Some(resolution) = handler(self, &token, config, tables) {
                log::trace!("Token '{}' resolved as {:?}", token, resolution);
                return resolution;
            }
        }
        Resolution::NoMatch
    }

    fn palette_color(&self, token: &str, _config: &Config, tables: &StaticTables) -> Option<Resolution> {
        let caps = self.palette_regex.captures(token)?;
        let rule = GrammarRule::PaletteColor;

        let resolved = tables
            .property(&caps[1])
            .zip(tables.color(&caps[2], &caps[3]))
            .map(|(def, hex)| format!("{}:{};", def.property(), hex));

        Some(match resolved {
            Some(text) => Resolution::Declarations { rule, text },
            None => Resolution::Unresolved(rule),
        })
    }

    fn border_composite(&self, token: &str, _config: &Config, tables: &StaticTables) -> Option<Resolution> {
        let caps = self.border_regex.captures(token)?;

        let property = match &caps[1] {
            "border-t" => "border-top",
            "border-r" => "border-right",
            "border-b" => "border-bottom",
            "border-l" => "border-left",
            _ => "border",
        };

        let values = split_values(&caps[2]);
        let part = |idx: usize, default: &'static str| -> String {
            match values.get(idx) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => default.to_string(),
            }
        };
        let width = part(0, "1px");
        let style = part(1, "solid");
        let mut color = part(2, "currentColor");

        if let Some(short) = self.short_color_regex.captures(&color) {
            if let Some(hex) = tables.color(&short[1], &short[2]) {
                color = hex.to_string();
            }
        }

        Some(Resolution::Declarations {
            rule: GrammarRule::BorderComposite,
            text: format!("{}:{} {} {};", property, width, style, color),
        })
    }

    fn grid_columns(&self, token: &str, _config: &Config, _tables: &StaticTables) -> Option<Resolution> {
        let caps = self.grid_regex.captures(token)?;
        let digits = caps[1].trim_start_matches('0');
        let columns = if digits.is_empty() { "0" } else { digits };

        Some(Resolution::Declarations {
            rule: GrammarRule::GridColumns,
            text: format!("grid-template-columns: repeat({}, minmax(0, 1fr));", columns),
        })
    }

    fn z_index(&self, token: &str, _config: &Config, _tables: &StaticTables) -> Option<Resolution> {
        let caps = self.z_index_regex.captures(token)?;
        let value = &caps[1];

        // Anything else is left for the later rules.
        if !is_all_digits(value) && value != "auto" {
            return None;
        }

        Some(Resolution::Declarations {
            rule: GrammarRule::ZIndex,
            text: format!("z-index: {};", value),
        })
    }

    fn paired_shorthand(&self, token: &str, _config: &Config, _tables: &StaticTables) -> Option<Resolution> {
        let caps = self.paired_regex.captures(token)?;
        let values = split_values(&caps[2]);
        let first = values[0];
        let second = values.get(1).copied().unwrap_or(first);

        let text = if &caps[1] == "hw" {
            format!("height:{};width:{};", first, second)
        } else {
            format!("margin:{};padding:{};", first, second)
        };

        Some(Resolution::Declarations {
            rule: GrammarRule::PairedShorthand,
            text,
        })
    }

    fn bracket_literal(&self, token: &str, _config: &Config, tables: &StaticTables) -> Option<Resolution> {
        let caps = self.literal_regex.captures(token)?;
        let rule = GrammarRule::BracketLiteral;

        Some(match tables.property(&caps[1]) {
            Some(def) => Resolution::Declarations {
                rule,
                text: def.declaration(&caps[2]),
            },
            None => Resolution::Unresolved(rule),
        })
    }

    fn config_reference(&self, token: &str, config: &Config, tables: &StaticTables) -> Option<Resolution> {
        let caps = self.config_ref_regex.captures(token)?;
        let rule = GrammarRule::ConfigReference;

        Some(match (tables.property(&caps[1]), config.text(&caps[2])) {
            (Some(def), Some(value)) => Resolution::Declarations {
                rule,
                text: def.declaration(value),
            },
            _ => Resolution::Unresolved(rule),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (StyleResolver, StaticTables) {
        let tables = StaticTables::builtin().unwrap();
        let resolver = StyleResolver::new(&tables).unwrap();
        (resolver, tables)
    }

    fn resolve(token: &str, config: &Config) -> Resolution {
        let (resolver, tables) = setup();
        resolver.resolve(token, config, &tables)
    }

    fn declarations(token: &str) -> Option<String> {
        resolve(token, &Config::new()).into_declarations()
    }

    #[test]
    fn test_palette_color() {
        assert_eq!(declarations("bg-blue-500").as_deref(), Some("background-color:#3b82f6;"));
        assert_eq!(declarations("c-gray-100").as_deref(), Some("color:#f3f4f6;"));
        assert_eq!(declarations("border-red-500").as_deref(), Some("border-color:#ef4444;"));
    }

    #[test]
    fn test_unknown_shade_stops_evaluation() {
        let config = Config::new();
        assert_eq!(resolve("bg-blue-525", &config), Resolution::Unresolved(GrammarRule::PaletteColor));
        assert_eq!(resolve("bg-mauve-500", &config), Resolution::Unresolved(GrammarRule::PaletteColor));
    }

    #[test]
    fn test_border_composite() {
        assert_eq!(
            declarations("border-[2px,dashed,blue-500]").as_deref(),
            Some("border:2px dashed #3b82f6;")
        );
        assert_eq!(declarations("border-t-[3px]").as_deref(), Some("border-top:3px solid currentColor;"));
        assert_eq!(
            declarations("border-l-[1px,solid,#abc]").as_deref(),
            Some("border-left:1px solid #abc;")
        );
        assert_eq!(
            declarations("border-b-[1px,solid,teal-999]").as_deref(),
            Some("border-bottom:1px solid teal-999;")
        );
        assert_eq!(declarations("border-[]").as_deref(), Some("border:1px solid currentColor;"));
    }

    #[test]
    fn test_grid_columns_and_z_index() {
        assert_eq!(
            declarations("gridCols-3").as_deref(),
            Some("grid-template-columns: repeat(3, minmax(0, 1fr));")
        );
        assert_eq!(
            declarations("gridCols-99999999999999999999").as_deref(),
            Some("grid-template-columns: repeat(99999999999999999999, minmax(0, 1fr));")
        );
        assert_eq!(
            declarations("gridCols-007").as_deref(),
            Some("grid-template-columns: repeat(7, minmax(0, 1fr));")
        );
        assert_eq!(
            declarations("gridCols-00").as_deref(),
            Some("grid-template-columns: repeat(0, minmax(0, 1fr));")
        );
        assert_eq!(declarations("zIndex-[10]").as_deref(), Some("z-index: 10;"));
        assert_eq!(declarations("zIndex-[auto]").as_deref(), Some("z-index: auto;"));
        assert_eq!(resolve("zIndex-[1a]", &Config::new()), Resolution::NoMatch);
    }

    #[test]
    fn test_paired_shorthand() {
        assert_eq!(declarations("hw-[10px,20px]").as_deref(), Some("height:10px;width:20px;"));
        assert_eq!(declarations("hw-[5rem]").as_deref(), Some("height:5rem;width:5rem;"));
        assert_eq!(declarations("mp-[0, 8px]").as_deref(), Some("margin:0;padding:8px;"));
    }

    #[test]
    fn test_bracket_literal() {
        assert_eq!(declarations("w-[50%]").as_deref(), Some("width:50%;"));
        assert_eq!(declarations("p-[10px_20px]").as_deref(), Some("padding:10px 20px;"));
        assert_eq!(declarations("t-[0]").as_deref(), Some("top:0;position:absolute;"));
        assert_eq!(declarations("mr-[4px]").as_deref(), Some("margin-right:4px;"));
        assert_eq!(resolve("unknownProp-[5px]", &Config::new()), Resolution::NoMatch);
    }

    #[test]
    fn test_config_reference() {
        let mut config = Config::new();
        config.set_text("gap-size", "16px");
        config.set_text("offset", "2rem");

        assert_eq!(resolve("gap-{gap-size}", &config).declarations(), Some("gap:16px;"));
        assert_eq!(
            resolve("l-{offset}", &config).declarations(),
            Some("left:2rem;position:absolute;")
        );
        assert_eq!(
            resolve("gap-{missing}", &config),
            Resolution::Unresolved(GrammarRule::ConfigReference)
        );
        assert_eq!(
            resolve("nope-{gap-size}", &config),
            Resolution::Unresolved(GrammarRule::ConfigReference)
        );
    }

    #[test]
    fn test_precedence() {
        let config = Config::new();
        assert_eq!(resolve("bg-blue-500", &config).rule(), Some(GrammarRule::PaletteColor));
        // `border` is also a property table key; the composite rule comes first.
        assert_eq!(resolve("border-[red]", &config).rule(), Some(GrammarRule::BorderComposite));
        assert_eq!(
            resolve("border-[red]", &config).declarations(),
            Some("border:red solid currentColor;")
        );
        assert_eq!(resolve("hw-[1px]", &config).rule(), Some(GrammarRule::PairedShorthand));
        assert_eq!(resolve("gridCols-[auto]", &config).rule(), Some(GrammarRule::BracketLiteral));
    }

    #[test]
    fn test_plain_words_do_not_match() {
        let config = Config::new();
        assert_eq!(resolve("container", &config), Resolution::NoMatch);
        assert_eq!(resolve("bg-blue", &config), Resolution::NoMatch);
        assert_eq!(resolve("", &config), Resolution::NoMatch);
    }
}
