//! Parsing of free-form LLM replies into a list of meanings.

/// Upper bound on meanings kept from one reply.
pub const MAX_MEANINGS: usize = 10;

const SEPARATORS: [char; 4] = [',', ';', '\n', '|'];
/// A hyphen with spaces on both sides separates meanings; one inside a word
/// does not.
const DASH_SEPARATOR: &str = " - ";
const LIST_MARKERS: [&str; 8] = ["*", "-", "•", "1.", "2.", "3.", "4.", "5."];

/// Split an LLM reply such as `"lari, menjalankan, mengelola"` into meanings.
///
/// Handles comma/semicolon/pipe/newline separated lists, bulleted and
/// numbered lists, spaced dashes (`rumah - tempat tinggal`), and surrounding
/// quotes. Hyphens inside a word are kept so reduplicated words (`laki-laki`)
/// survive.
pub fn parse_meanings(response: &str) -> Vec<String> {
    let mut meanings: Vec<String> = Vec::new();
    let response = response.replace(DASH_SEPARATOR, "\n");

    for raw in response.split(SEPARATORS.as_slice()) {
        let cleaned = clean_item(raw);
        if cleaned.chars().count() < 2 {
            continue;
        }
        if meanings.iter().any(|m| m.eq_ignore_ascii_case(&cleaned)) {
            continue;
        }
        meanings.push(cleaned);
        if meanings.len() == MAX_MEANINGS {
            break;
        }
    }

    meanings
}

fn clean_item(raw: &str) -> String {
    let mut item = raw.trim();
    for marker in LIST_MARKERS {
        if let Some(rest) = item.strip_prefix(marker) {
            item = rest.trim_start();
        }
    }
    item.trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated() {
        assert_eq!(
            parse_meanings("lari, menjalankan, mengelola"),
            vec!["lari", "menjalankan", "mengelola"]
        );
    }

    #[test]
    fn quoted_reply() {
        assert_eq!(
            parse_meanings("\"rumah, tempat tinggal\""),
            vec!["rumah", "tempat tinggal"]
        );
    }

    #[test]
    fn bulleted_and_numbered_lists() {
        let reply = "1. rumah\n2. tempat tinggal\n- kampung halaman\n• hunian";
        assert_eq!(
            parse_meanings(reply),
            vec!["rumah", "tempat tinggal", "kampung halaman", "hunian"]
        );
    }

    #[test]
    fn keeps_reduplicated_words() {
        assert_eq!(
            parse_meanings("pria; laki-laki | orang"),
            vec!["pria", "laki-laki", "orang"]
        );
    }

    #[test]
    fn spaced_dash_separates_meanings() {
        assert_eq!(
            parse_meanings("rumah - tempat tinggal"),
            vec!["rumah", "tempat tinggal"]
        );
        assert_eq!(
            parse_meanings("pria - laki-laki, orang"),
            vec!["pria", "laki-laki", "orang"]
        );
    }

    #[test]
    fn drops_short_and_duplicate_items() {
        assert_eq!(parse_meanings("a, ibu, Ibu, , mama"), vec!["ibu", "mama"]);
    }

    #[test]
    fn caps_at_ten() {
        let reply = (0..20).map(|i| format!("kata{i}")).collect::<Vec<_>>().join(", ");
        assert_eq!(parse_meanings(&reply).len(), MAX_MEANINGS);
    }

    #[test]
    fn empty_reply() {
        assert!(parse_meanings("").is_empty());
        assert!(parse_meanings("  \n ").is_empty());
    }
}
