//! Language code handling
//!
//! Clients pass a BCP-47-like tag (`mn`, `zh-Hant`, `pt_BR`). Tags are
//! validated and canonicalized before being forwarded to the translator.

use unic_langid::LanguageIdentifier;

/// Validate a language tag and return its canonical form.
///
/// Separators may be `-` or `_`; casing is normalized (`PT_br` -> `pt-BR`).
/// Returns `None` for blank, malformed, or undetermined (`und`) tags.
pub fn normalize_language_code(code: &str) -> Option<String> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }

    let langid: LanguageIdentifier = code.parse().ok()?;
    let canonical = langid.to_string();
    if canonical == "und" || canonical.starts_with("und-") {
        return None;
    }
    Some(canonical)
}
