//! Edit-distance string matching for name search.

/// Levenshtein distance between two strings, by characters.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; s2_chars.len() + 1];

    for (i, a) in s1_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b) in s2_chars.iter().enumerate() {
            let cost = usize::from(a != b);
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[s2_chars.len()]
}

/// Smallest edit distance between `pattern` and any substring of `text`.
///
/// Sellers' variant of the Levenshtein table: the first row is all zeros so
/// a match may start anywhere, and the answer is the minimum of the last row
/// so it may end anywhere.
pub fn approximate_substring_distance(pattern: &str, text: &str) -> usize {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut prev_row: Vec<usize> = vec![0; text.len() + 1];
    let mut curr_row: Vec<usize> = vec![0; text.len() + 1];

    for (i, a) in pattern.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b) in text.iter().enumerate() {
            let cost = usize::from(a != b);
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row.into_iter().min().unwrap_or(pattern.len())
}

/// Whether some substring of `text` is within `max_distance` edits of `pattern`.
#[inline]
pub fn fuzzy_contains(pattern: &str, text: &str, max_distance: usize) -> bool {
    approximate_substring_distance(pattern, text) <= max_distance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("Springfield", "Springfield"), 0);
        assert_eq!(levenshtein_distance("Springfield", "Springfeld"), 1);
    }

    #[test]
    fn test_substring_distance() {
        assert_eq!(approximate_substring_distance("Paris", "Paris"), 0);
        assert_eq!(approximate_substring_distance("Springfield", "West Springfield"), 0);
        assert_eq!(approximate_substring_distance("Springfield", "Springfeld Township"), 1);
        assert_eq!(approximate_substring_distance("abc", ""), 3);
    }

    #[test]
    fn test_fuzzy_contains_is_superset_of_whole_name() {
        let names = ["Springfield", "Springfeld", "Springfields", "Sprongfield", "Springville"];
        for name in names {
            if levenshtein_distance("Springfield", name) <= 1 {
                assert!(fuzzy_contains("Springfield", name, 1), "{name}");
            }
        }
        assert!(!fuzzy_contains("Springfield", "Springville", 1));
    }

    #[test]
    fn test_unicode_counts_characters() {
        assert_eq!(levenshtein_distance("München", "Munchen"), 1);
        assert!(fuzzy_contains("München", "Munchen", 1));
    }
}
