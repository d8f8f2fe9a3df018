//! Free-text answer validation.
//!
//! An answer is accepted when it matches one of the candidate meanings by
//! one of three rules, applied to trimmed, lowercased text:
//!
//! 1. the whole answer equals the whole meaning;
//! 2. a single-token answer of at least [`MIN_SINGLE_TOKEN_CHARS`] characters
//!    equals one whitespace token of the meaning;
//! 3. the token set of a multi-token answer is a subset of the meaning's
//!    token set (order and repetition ignored).

use std::collections::HashSet;

/// Shortest single-token answer that may match a token inside a meaning.
pub const MIN_SINGLE_TOKEN_CHARS: usize = 3;

/// Returns `true` if `user_input` matches any of `accepted_meanings`.
///
/// Never fails: empty input or an empty meaning list is simply `false`.
pub fn is_valid<S: AsRef<str>>(user_input: &str, accepted_meanings: &[S]) -> bool {
    let input = user_input.trim().to_lowercase();
    if input.is_empty() || accepted_meanings.is_empty() {
        return false;
    }

    let input_tokens: Vec<&str> = input.split_whitespace().collect();

    accepted_meanings
        .iter()
        .any(|meaning| matches_meaning(&input, &input_tokens, meaning.as_ref()))
}

fn matches_meaning(input: &str, input_tokens: &[&str], meaning: &str) -> bool {
    let meaning = meaning.trim().to_lowercase();

    if input == meaning {
        return true;
    }

    match input_tokens {
        [single] => {
            single.chars().count() >= MIN_SINGLE_TOKEN_CHARS
                && meaning.split_whitespace().any(|token| token == *single)
        }
        tokens => {
            let meaning_tokens: HashSet<&str> = meaning.split_whitespace().collect();
            tokens.iter().all(|token| meaning_tokens.contains(token))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(is_valid("rumah", &["rumah", "tempat tinggal"]));
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        assert!(is_valid("  RuMaH ", &["Rumah "]));
        assert!(is_valid("Tempat  Tinggal", &["tempat tinggal"]));
    }

    #[test]
    fn split_meaning_list() {
        assert!(is_valid("lari", &["lari", "menjalankan", "mengelola"]));
        assert!(is_valid("mengelola", &["lari", "menjalankan", "mengelola"]));
    }

    #[test]
    fn single_token_inside_multi_word_meaning() {
        assert!(is_valid("tinggal", &["rumah", "tempat tinggal"]));
        assert!(is_valid("halaman", &["kampung halaman"]));
    }

    #[test]
    fn single_token_must_be_a_whole_token() {
        assert!(!is_valid("tem", &["tempat tinggal"]));
        assert!(!is_valid("ting", &["tempat tinggal"]));
    }

    #[test]
    fn short_token_needs_exact_match() {
        assert!(!is_valid("ke", &["ke arah", "menuju"]));
        assert!(is_valid("ke", &["ke"]));
    }

    #[test]
    fn short_token_counts_chars_not_bytes() {
        // "été" is three chars but five bytes
        assert!(is_valid("été", &["un été chaud"]));
        assert!(!is_valid("ét", &["ét é"]));
    }

    #[test]
    fn multi_word_exact() {
        assert!(is_valid(
            "tempat tinggal",
            &["rumah", "tempat tinggal", "kampung halaman"]
        ));
    }

    #[test]
    fn multi_word_order_independent() {
        assert!(is_valid("tinggal tempat", &["rumah", "tempat tinggal"]));
    }

    #[test]
    fn multi_word_subset_of_longer_meaning() {
        assert!(is_valid("orang tua", &["orang tua kandung"]));
        assert!(is_valid("tua tua orang", &["orang tua"]));
    }

    #[test]
    fn multi_word_allows_short_tokens() {
        assert!(is_valid("ke arah", &["ke arah"]));
        assert!(is_valid("arah ke", &["menuju", "ke arah"]));
    }

    #[test]
    fn multi_word_with_foreign_token_rejected() {
        assert!(!is_valid("tempat makan", &["tempat tinggal"]));
    }

    #[test]
    fn empty_inputs() {
        assert!(!is_valid("", &["rumah"]));
        assert!(!is_valid("   ", &["rumah"]));
        let none: [&str; 0] = [];
        assert!(!is_valid("rumah", &none));
    }

    #[test]
    fn owned_meanings() {
        let meanings = vec!["anak".to_string(), "bocah".to_string()];
        assert!(is_valid("bocah", &meanings));
        assert!(!is_valid("anak-anak", &meanings));
    }
}
