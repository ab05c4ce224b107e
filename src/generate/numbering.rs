//! Deterministic list level generation.
//!
//! Output documents need concrete numbering definitions even when the source
//! (Markdown, PDF) had none. `generate_levels` produces them from nothing
//! but the list kind: symbols and number formats cycle fixed tables, and
//! indentation is purely positional, so rendering is identical for identical
//! input regardless of content.

use crate::ast::ListKind;

/// Left indent of level 0, in twentieths of a point.
pub const BASE_INDENT: i64 = 720;
/// Additional left indent per level.
pub const INDENT_STEP: i64 = 720;
/// Hanging indent applied to every level.
pub const HANGING_INDENT: i64 = 360;

/// Bullet glyphs, cycled by level.
pub const BULLET_SYMBOLS: [&str; 4] = ["\u{2022}", "\u{25E6}", "\u{25AA}", "\u{2023}"];

/// Ordered-list `(numFmt, levelText pattern)` pairs, cycled by level. `%L`
/// stands for the level placeholder and becomes `%<level+1>`.
const NUMBER_FORMATS: [(&str, &str); 9] = [
    ("decimal", "%L."),
    ("lowerLetter", "%L."),
    ("lowerRoman", "%L."),
    ("decimal", "(%L)"),
    ("lowerLetter", "(%L)"),
    ("lowerRoman", "(%L)"),
    ("decimal", "%L)"),
    ("lowerLetter", "%L)"),
    ("lowerRoman", "%L)"),
];

/// One generated numbering level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStyle {
    pub level: u8,
    /// `w:numFmt` value (`bullet`, `decimal`, `lowerRoman`, ...).
    pub format: String,
    /// `w:lvlText` value: a glyph for bullets, a counter pattern otherwise.
    pub text: String,
    /// Left indent in twentieths of a point.
    pub indent_left: i64,
    pub hanging: i64,
}

/// Generate `count` levels for a list of the given kind.
///
/// Indentation grows strictly with the level and the hanging indent is
/// constant, independent of content.
pub fn generate_levels(kind: ListKind, count: usize) -> Vec<LevelStyle> {
    (0..count)
        .map(|i| {
            let (format, text) = match kind {
                ListKind::Bullet => {
                    ("bullet".to_string(), BULLET_SYMBOLS[i % 4].to_string())
                },
                ListKind::Number => {
                    let (format, pattern) = NUMBER_FORMATS[i % 9];
                    (
                        format.to_string(),
                        pattern.replace("%L", &format!("%{}", i + 1)),
                    )
                },
            };
            LevelStyle {
                level: i as u8,
                format,
                text,
                indent_left: BASE_INDENT + i as i64 * INDENT_STEP,
                hanging: HANGING_INDENT,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bullet_symbols_cycle() {
        let levels = generate_levels(ListKind::Bullet, 9);
        assert_eq!(levels.len(), 9);
        assert_eq!(levels[0].text, BULLET_SYMBOLS[0]);
        assert_eq!(levels[4].text, BULLET_SYMBOLS[0]);
        assert_eq!(levels[5].text, BULLET_SYMBOLS[1]);
        assert!(levels.iter().all(|l| l.format == "bullet"));
    }

    #[test]
    fn test_number_patterns_substitute_level() {
        let levels = generate_levels(ListKind::Number, 9);
        assert_eq!(levels[0].format, "decimal");
        assert_eq!(levels[0].text, "%1.");
        assert_eq!(levels[2].format, "lowerRoman");
        assert_eq!(levels[2].text, "%3.");
        assert_eq!(levels[3].text, "(%4)");
        assert_eq!(levels[8].text, "%9)");
    }

    proptest! {
        #[test]
        fn prop_indents_strictly_increase(count in 0usize..=16, bullet in proptest::bool::ANY) {
            let kind = if bullet { ListKind::Bullet } else { ListKind::Number };
            let levels = generate_levels(kind, count);
            prop_assert_eq!(levels.len(), count);
            for pair in levels.windows(2) {
                prop_assert!(pair[0].indent_left < pair[1].indent_left);
            }
            for level in &levels {
                prop_assert_eq!(level.hanging, HANGING_INDENT);
                prop_assert!(!level.text.is_empty());
            }
        }

        #[test]
        fn prop_generation_is_deterministic(count in 0usize..=16) {
            prop_assert_eq!(
                generate_levels(ListKind::Number, count),
                generate_levels(ListKind::Number, count)
            );
        }
    }
}
