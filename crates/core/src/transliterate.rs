//! Accented-character to ASCII transliteration.
//!
//! Every displayed string goes through [`transliterate`] before it is
//! measured or shortened, so the rest of the pipeline only sees characters
//! the base-14 fonts can draw.

use std::collections::HashMap;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Fixed transliteration table. Every replacement is plain ASCII, so no
/// replacement is itself a key.
const TRANSLITERATIONS: &[(char, &str)] = &[
    // Lowercase vowels
    ('à', "a"), ('á', "a"), ('â', "a"), ('ã', "a"), ('ä', "a"), ('å', "a"), ('ā', "a"), ('ą', "a"),
    ('è', "e"), ('é', "e"), ('ê', "e"), ('ë', "e"), ('ē', "e"), ('ę', "e"), ('ě', "e"),
    ('ì', "i"), ('í', "i"), ('î', "i"), ('ï', "i"), ('ī', "i"),
    ('ò', "o"), ('ó', "o"), ('ô', "o"), ('õ', "o"), ('ö', "o"), ('ø', "o"), ('ő', "o"), ('ō', "o"),
    ('ù', "u"), ('ú', "u"), ('û', "u"), ('ü', "u"), ('ű', "u"), ('ū', "u"), ('ů', "u"),
    ('ý', "y"), ('ÿ', "y"),
    // Uppercase vowels
    ('À', "A"), ('Á', "A"), ('Â', "A"), ('Ã', "A"), ('Ä', "A"), ('Å', "A"), ('Ā', "A"), ('Ą', "A"),
    ('È', "E"), ('É', "E"), ('Ê', "E"), ('Ë', "E"), ('Ē', "E"), ('Ę', "E"), ('Ě', "E"),
    ('Ì', "I"), ('Í', "I"), ('Î', "I"), ('Ï', "I"), ('Ī', "I"),
    ('Ò', "O"), ('Ó', "O"), ('Ô', "O"), ('Õ', "O"), ('Ö', "O"), ('Ø', "O"), ('Ő', "O"), ('Ō', "O"),
    ('Ù', "U"), ('Ú', "U"), ('Û', "U"), ('Ü', "U"), ('Ű', "U"), ('Ū', "U"), ('Ů', "U"),
    ('Ý', "Y"), ('Ÿ', "Y"),
    // Consonants
    ('ç', "c"), ('ć', "c"), ('č', "c"), ('Ç', "C"), ('Ć', "C"), ('Č', "C"),
    ('ñ', "n"), ('ń', "n"), ('ň', "n"), ('Ñ', "N"), ('Ń', "N"), ('Ň', "N"),
    ('š', "s"), ('ś', "s"), ('Š', "S"), ('Ś', "S"),
    ('ž', "z"), ('ź', "z"), ('ż', "z"), ('Ž', "Z"), ('Ź', "Z"), ('Ż', "Z"),
    ('ł', "l"), ('Ł', "L"), ('ř', "r"), ('Ř', "R"), ('ď', "d"), ('Ď', "D"),
    ('ť', "t"), ('Ť', "T"), ('ğ', "g"), ('Ğ', "G"), ('ş', "s"), ('Ş', "S"),
    // Ligatures
    ('æ', "ae"), ('Æ', "AE"), ('œ', "oe"), ('Œ', "OE"), ('ß', "ss"),
    // Typographic punctuation
    ('\u{2018}', "'"), ('\u{2019}', "'"), ('\u{201C}', "\""), ('\u{201D}', "\""),
    ('\u{2013}', "-"), ('\u{2014}', "-"), ('\u{2026}', "..."), ('\u{00A0}', " "),
];

static TABLE: LazyLock<HashMap<char, &'static str>> =
    LazyLock::new(|| TRANSLITERATIONS.iter().copied().collect());

/// Replace every character found in the transliteration table with its
/// ASCII equivalent. Characters outside the table pass through.
///
/// Input is composed to NFC first, so a decomposed `e` + combining acute
/// accent maps the same way as a precomposed `é`.
pub fn transliterate(text: &str) -> String {
    let mut output = String::with_capacity(text.len());

    for c in text.nfc() {
        match TABLE.get(&c) {
            Some(replacement) => output.push_str(replacement),
            None => output.push(c),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii_unchanged() {
        assert_eq!(transliterate("Hey Jude"), "Hey Jude");
        assert_eq!(transliterate(""), "");
    }

    #[test]
    fn test_accented_letters() {
        assert_eq!(transliterate("Café del Mar"), "Cafe del Mar");
        assert_eq!(transliterate("Für Elise"), "Fur Elise");
        assert_eq!(transliterate("Niño"), "Nino");
        assert_eq!(transliterate("ÉTÉ À PARIS"), "ETE A PARIS");
    }

    #[test]
    fn test_ligatures_expand() {
        assert_eq!(transliterate("Straße"), "Strasse");
        assert_eq!(transliterate("Œuvre"), "OEuvre");
    }

    #[test]
    fn test_typographic_punctuation() {
        assert_eq!(transliterate("Don\u{2019}t Stop"), "Don't Stop");
        assert_eq!(transliterate("Rock \u{2013} Roll"), "Rock - Roll");
        assert_eq!(transliterate("Wait\u{2026}"), "Wait...");
    }

    #[test]
    fn test_decomposed_accents_are_composed_first() {
        assert_eq!(transliterate("Cafe\u{0301}"), "Cafe");
    }

    #[test]
    fn test_unknown_characters_pass_through() {
        assert_eq!(transliterate("\u{6771}\u{4eac}"), "\u{6771}\u{4eac}");
    }

    #[test]
    fn test_idempotent() {
        let samples = ["Café Niño", "Ærø Straße", "Don\u{2019}t", "Señor – Sí", "plain"];
        for sample in samples {
            let once = transliterate(sample);
            assert_eq!(transliterate(&once), once);
        }
    }

    #[test]
    fn test_table_outputs_are_not_keys() {
        for (key, replacement) in TRANSLITERATIONS {
            assert!(replacement.is_ascii(), "{key:?} maps to non-ASCII");
            for c in replacement.chars() {
                assert!(!TABLE.contains_key(&c), "{key:?} maps to another key");
            }
        }
    }
}
