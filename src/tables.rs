// FILE: src/tables.rs

//! Static lookup tables: utility prefixes, the color palette and breakpoints.

use crate::error::{LazyError, Result};
use crate::types::{Breakpoint, PropertyDef};
use std::collections::HashMap;

// Utility prefix -> CSS property. Order is kept for the bracket-literal pattern.
pub const PROPERTY_TABLE: &[(&str, PropertyDef)] = &[
    ("bg", PropertyDef::Plain("background-color")),
    ("c", PropertyDef::Plain("color")),
    ("round", PropertyDef::Plain("border-radius")),
    ("ml", PropertyDef::Plain("margin-left")),
    ("m", PropertyDef::Plain("margin")),
    ("mr", PropertyDef::Plain("margin-right")),
    ("h", PropertyDef::Plain("height")),
    ("w", PropertyDef::Plain("width")),
    ("mt", PropertyDef::Plain("margin-top")),
    ("mb", PropertyDef::Plain("margin-bottom")),
    ("pl", PropertyDef::Plain("padding-left")),
    ("p", PropertyDef::Plain("padding")),
    ("pr", PropertyDef::Plain("padding-right")),
    ("pt", PropertyDef::Plain("padding-top")),
    ("pb", PropertyDef::Plain("padding-bottom")),
    ("l", PropertyDef::Positional("left")),
    ("r", PropertyDef::Positional("right")),
    ("t", PropertyDef::Positional("top")),
    ("b", PropertyDef::Positional("bottom")),
    ("fs", PropertyDef::Plain("font-size")),
    ("border", PropertyDef::Plain("border-color")),
    ("z", PropertyDef::Plain("z-index")),
    ("gridCols", PropertyDef::Plain("grid-template-columns")),
    ("gap", PropertyDef::Plain("gap")),
];

pub const SHADES: [&str; 11] = [
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "950",
];

// Hex values line up with SHADES.
pub const PALETTE: &[(&str, [&str; 11])] = &[
    ("orange", ["#fff7ed", "#FFE8D1", "#FFD1A4", "#FFB877", "#FF9F4A", "#FF8500", "#E57700", "#CC6900", "#B35A00", "#994B00", "#431407"]),
    ("black", ["#e6e6e6", "#cccccc", "#999999", "#666666", "#333333", "#1a1a1a", "#0d0d0d", "#080808", "#040404", "#020202", "#000000"]),
    ("gray", ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827", "#030712"]),
    ("red", ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d", "#450a0a"]),
    ("yellow", ["#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207", "#854d0e", "#713f12", "#422006"]),
    ("green", ["#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d", "#052e16"]),
    ("blue", ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a", "#172554"]),
    ("purple", ["#faf5ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95", "#2e1065"]),
    ("pink", ["#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d", "#9d174d", "#831843", "#500724"]),
    ("lime", ["#f7fee7", "#ecfccb", "#d9f99d", "#bef264", "#a3e635", "#84cc16", "#65a30d", "#4d7c0f", "#3f6212", "#365314", "#1a2e05"]),
    ("teal", ["#f0fdfa", "#ccfbf1", "#99f6e4", "#5eead4", "#2dd4bf", "#14b8a6", "#0d9488", "#0f766e", "#115e59", "#134e4a", "#042f2e"]),
    ("cyan", ["#ecfeff", "#cffafe", "#a5f3fc", "#67e8f9", "#22d3ee", "#06b6d4", "#0891b2", "#0e7490", "#155e75", "#164e63", "#083344"]),
    ("sky", ["#f0f9ff", "#e0f2fe", "#bae6fd", "#7dd3fc", "#38bdf8", "#0ea5e9", "#0284c7", "#0369a1", "#075985", "#0c4a6e", "#082f49"]),
    ("indigo", ["#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca", "#3730a3", "#312e81", "#1e1b4b"]),
    ("violet", ["#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95", "#2e1065"]),
    ("fuchsia", ["#fdf4ff", "#fae8ff", "#f5d0fe", "#f0abfc", "#e879f9", "#d946ef", "#c026d3", "#a21caf", "#86198f", "#701a75", "#4a044e"]),
    ("rose", ["#fff1f2", "#ffe4e6", "#fecdd3", "#fda4af", "#fb7185", "#f43f5e", "#e11d48", "#be123c", "#9f1239", "#881337", "#4c0519"]),
    ("neutral", ["#fafafa", "#f5f5f5", "#e5e5e5", "#d4d4d4", "#a3a3a3", "#737373", "#525252", "#404040", "#262626", "#171717", "#0a0a0a"]),
    ("stone", ["#fafaf9", "#f5f5f4", "#e7e5e4", "#d6d3d1", "#a8a29e", "#78716c", "#57534e", "#44403c", "#292524", "#1c1917", "#0c0a09"]),
    ("zinc", ["#fafafa", "#f4f4f5", "#e4e4e7", "#d4d4d8", "#a1a1aa", "#71717a", "#52525b", "#3f3f46", "#27272a", "#18181b", "#09090b"]),
    ("slate", ["#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155", "#1e293b", "#0f172a", "#020617"]),
];

pub const BREAKPOINTS: [(Breakpoint, &str); 4] = [
    (Breakpoint::Sm, "640px"),
    (Breakpoint::Md, "768px"),
    (Breakpoint::Lg, "1024px"),
    (Breakpoint::Xl, "1280px"),
];

/// Immutable lookup tables shared by the resolver and the generator.
#[derive(Debug, Clone)]
pub struct StaticTables {
    properties: Vec<(&'static str, PropertyDef)>,
    property_index: HashMap<&'static str, PropertyDef>,
    palette: HashMap<&'static str, HashMap<&'static str, &'static str>>,
    breakpoints: Vec<(Breakpoint, &'static str)>,
}

impl StaticTables {
    /// The tables bundled with the generator.
    pub fn builtin() -> Result<Self> {
        Self::from_parts(PROPERTY_TABLE, PALETTE, &BREAKPOINTS)
    }

    pub fn from_parts(
        properties: &[(&'static str, PropertyDef)],
        palette: &[(&'static str, [&'static str; 11])],
        breakpoints: &[(Breakpoint, &'static str)],
    ) -> Result<Self> {
        if properties.is_empty() {
            return Err(LazyError::static_data("property table is empty"));
        }
        if palette.is_empty() {
            return Err(LazyError::static_data("color palette is empty"));
        }
        for breakpoint in Breakpoint::ALL {
            if !breakpoints.iter().any(|(bp, _)| *bp == breakpoint) {
                return Err(LazyError::static_data(format!(
                    "breakpoint table is missing '{}'",
                    breakpoint.as_str()
                )));
            }
        }

        let property_index = properties.iter().copied().collect();
        let palette = palette
            .iter()
            .map(|(family, hexes)| {
                let shades = SHADES.iter().copied().zip(hexes.iter().copied()).collect();
                (*family, shades)
            })
            .collect();

        let mut breakpoints = breakpoints.to_vec();
        breakpoints.sort_by_key(|(bp, _)| *bp);

        Ok(Self {
            properties: properties.to_vec(),
            property_index,
            palette,
            breakpoints,
        })
    }

    pub fn property(&self, prefix: &str) -> Option<PropertyDef> {
        self.property_index.get(prefix).copied()
    }

    /// Property prefixes in table order.
    pub fn property_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.iter().map(|(key, _)| *key)
    }

    /// Shade keys are compared as strings; there is no interpolation.
    pub fn color(&self, family: &str, shade: &str) -> Option<&'static str> {
        self.palette.get(family)?.get(shade).copied()
    }

    pub fn breakpoint_width(&self, breakpoint: Breakpoint) -> Option<&'static str> {
        self.breakpoints
            .iter()
            .find(|(bp, _)| *bp == breakpoint)
            .map(|(_, width)| *width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables() {
        let tables = StaticTables::builtin().unwrap();

        assert_eq!(tables.property("bg"), Some(PropertyDef::Plain("background-color")));
        assert_eq!(tables.property("t"), Some(PropertyDef::Positional("top")));
        assert_eq!(tables.property("BG"), None);

        assert_eq!(tables.color("blue", "500"), Some("#3b82f6"));
        assert_eq!(tables.color("orange", "950"), Some("#431407"));
        assert_eq!(tables.color("blue", "525"), None);
        assert_eq!(tables.color("Blue", "500"), None);

        assert_eq!(tables.breakpoint_width(Breakpoint::Sm), Some("640px"));
        assert_eq!(tables.breakpoint_width(Breakpoint::Xl), Some("1280px"));
    }

    #[test]
    fn test_missing_static_data_is_fatal() {
        let err = StaticTables::from_parts(&[], PALETTE, &BREAKPOINTS).unwrap_err();
        assert!(err.is_initialization_failure());

        let err = StaticTables::from_parts(PROPERTY_TABLE, &[], &BREAKPOINTS).unwrap_err();
        assert!(err.to_string().contains("palette"));

        let partial = [(Breakpoint::Sm, "640px"), (Breakpoint::Md, "768px")];
        let err = StaticTables::from_parts(PROPERTY_TABLE, PALETTE, &partial).unwrap_err();
        assert!(err.to_string().contains("'lg'"));
    }

    #[test]
    fn test_property_keys_keep_table_order() {
        let tables = StaticTables::builtin().unwrap();
        let keys: Vec<_> = tables.property_keys().take(3).collect();
        assert_eq!(keys, vec!["bg", "c", "round"]);
    }
}
