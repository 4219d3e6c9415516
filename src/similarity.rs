// 📏 String Similarity - Normalized edit distance
// Self-contained Levenshtein so scoring is fully specified and testable

/// Calculate Levenshtein distance between two strings
///
/// Levenshtein distance = minimum number of single-character edits
/// (insertions, deletions, substitutions) to change one string into another.
/// Works on chars, not bytes, so accented names count one edit per letter.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Two rolling rows instead of the full matrix
    let mut previous: Vec<usize> = (0..=len2).collect();
    let mut current = vec![0; len2 + 1];

    for i in 1..=len1 {
        current[0] = i;

        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };

            current[j] = std::cmp::min(
                std::cmp::min(
                    previous[j] + 1,     // deletion
                    current[j - 1] + 1,  // insertion
                ),
                previous[j - 1] + cost, // substitution
            );
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous[len2]
}

/// Normalized similarity in [0.0, 1.0], case-insensitive
///
/// `1 - levenshtein(a, b) / max(len(a), len(b))`
///
/// - identical strings → 1.0 (including two empty strings)
/// - one side empty, the other not → 0.0
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();

    if a_lower == b_lower {
        return 1.0;
    }

    // Lengths come from the lowercased strings, the same ones the distance runs
    // on; lowercasing can add chars ('İ' → "i̇"), so the raw lengths would not bound it.
    let max_len = a_lower.chars().count().max(b_lower.chars().count());
    if a_lower.is_empty() || b_lower.is_empty() || max_len == 0 {
        return 0.0;
    }

    let distance = levenshtein_distance(&a_lower, &b_lower);
    1.0 - (distance as f64 / max_len as f64)
}

// ============================================================================
// TESTS
// ============================================================================
