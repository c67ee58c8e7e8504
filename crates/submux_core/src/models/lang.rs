//! ISO 639-2 language code validation.
//!
//! mkvmerge accepts both the terminological (639-2/T) and bibliographic
//! (639-2/B) three-letter forms, so both validate here. The `isolang` table
//! only indexes the terminological form; the twenty codes whose bibliographic
//! form differs are aliased before lookup.

use isolang::Language;

/// ISO 639-2/B codes that differ from their terminological counterpart.
const BIBLIOGRAPHIC_ALIASES: &[(&str, &str)] = &[
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("dut", "nld"),
    ("fre", "fra"),
    ("geo", "kat"),
    ("ger", "deu"),
    ("gre", "ell"),
    ("ice", "isl"),
    ("mac", "mkd"),
    ("mao", "mri"),
    ("may", "msa"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("tib", "bod"),
    ("wel", "cym"),
];

/// Look up a three-letter ISO 639-2 code, accepting either form.
///
/// Lookup is case-sensitive: codes are lowercase by definition and mkvmerge
/// treats them that way. Two-letter 639-1 codes and language names are
/// rejected.
pub fn lookup(code: &str) -> Option<Language> {
    let terminological = BIBLIOGRAPHIC_ALIASES
        .iter()
        .find(|(biblio, _)| *biblio == code)
        .map(|(_, term)| *term)
        .unwrap_or(code);
    Language::from_639_3(terminological)
}

/// True if `code` is an acceptable ISO 639-2 language code.
pub fn is_valid(code: &str) -> bool {
    lookup(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_terminological_codes() {
        assert!(is_valid("eng"));
        assert!(is_valid("nld"));
        assert!(is_valid("jpn"));
        assert!(is_valid("und"));
    }

    #[test]
    fn accepts_bibliographic_codes() {
        assert!(is_valid("dut"));
        assert!(is_valid("fre"));
        assert!(is_valid("ger"));
        assert!(is_valid("chi"));
    }

    #[test]
    fn rejects_names_and_short_codes() {
        assert!(!is_valid("english"));
        assert!(!is_valid("en"));
        assert!(!is_valid(""));
        assert!(!is_valid("e1g"));
    }

    #[test]
    fn rejects_uppercase() {
        assert!(!is_valid("ENG"));
        assert!(!is_valid("Dut"));
    }

    #[test]
    fn aliases_resolve_to_same_language() {
        assert_eq!(lookup("dut"), lookup("nld"));
        assert_eq!(lookup("fre"), lookup("fra"));
    }
}
