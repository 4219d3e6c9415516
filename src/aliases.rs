// 🏷️ Alias Extraction - "Name (alias1 / alias2)" → canonical name + aliases
// Pure string parsing, no failure mode

use serde::{Deserialize, Serialize};

/// Separators accepted between aliases inside the parentheses
pub const ALIAS_SEPARATORS: [char; 4] = ['/', ',', ';', '|'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    /// Everything before the first '(' (trimmed)
    pub main_name: String,

    /// Pieces inside the parentheses, trimmed, empties dropped
    pub aliases: Vec<String>,
}

/// Parse a raw catalog name into its canonical name and aliases
///
/// Unbalanced parentheses are treated as "no aliases": the whole trimmed
/// input becomes the main name.
///
/// Example:
/// - "Ne (Negm / N)" → main_name "Ne", aliases ["Negm", "N"]
/// - "Sam" → main_name "Sam", aliases []
pub fn extract_aliases(raw: &str) -> ParsedName {
    let no_aliases = || ParsedName {
        main_name: raw.trim().to_string(),
        aliases: Vec::new(),
    };

    let open = match raw.find('(') {
        Some(pos) => pos,
        None => return no_aliases(),
    };

    let close = match raw[open + 1..].find(')') {
        Some(rel) => open + 1 + rel,
        None => return no_aliases(),
    };

    let inner = &raw[open + 1..close];

    ParsedName {
        main_name: raw[..open].trim().to_string(),
        aliases: split_aliases(inner),
    }
}

/// Split an alias list on any of `/ , ; |`, trimming pieces and dropping empties
pub fn split_aliases(list: &str) -> Vec<String> {
    list.split(|c: char| ALIAS_SEPARATORS.contains(&c))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_with_aliases() {
        let parsed = extract_aliases("Ne (Negm / N)");
        assert_eq!(parsed.main_name, "Ne");
        assert_eq!(parsed.aliases, vec!["Negm".to_string(), "N".to_string()]);
    }

    #[test]
    fn test_plain_name() {
        let parsed = extract_aliases("Sam");
        assert_eq!(parsed.main_name, "Sam");
        assert!(parsed.aliases.is_empty());
    }

    #[test]
    fn test_plain_name_is_trimmed() {
        let parsed = extract_aliases("   Sam  ");
        assert_eq!(parsed.main_name, "Sam");
    }

    #[test]
    fn test_all_separators() {
        let parsed = extract_aliases("Mohamed (Mo, Moh; Hamada | M7 / Mido)");
        assert_eq!(parsed.main_name, "Mohamed");
        assert_eq!(parsed.aliases, vec!["Mo", "Moh", "Hamada", "M7", "Mido"]);
    }

    #[test]
    fn test_empty_pieces_dropped() {
        let parsed = extract_aliases("Omar ( / Omo //  , )");
        assert_eq!(parsed.main_name, "Omar");
        assert_eq!(parsed.aliases, vec!["Omo"]);
    }

    #[test]
    fn test_empty_parentheses() {
        let parsed = extract_aliases("Omar ()");
        assert_eq!(parsed.main_name, "Omar");
        assert!(parsed.aliases.is_empty());
    }

    #[test]
    fn test_unbalanced_parentheses_degrade() {
        let parsed = extract_aliases("Omar (Omo");
        assert_eq!(parsed.main_name, "Omar (Omo");
        assert!(parsed.aliases.is_empty());
    }

    #[test]
    fn test_text_after_group_is_ignored() {
        let parsed = extract_aliases("Karim (KB) captain");
        assert_eq!(parsed.main_name, "Karim");
        assert_eq!(parsed.aliases, vec!["KB"]);
    }
}
