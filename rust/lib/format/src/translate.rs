//! Translate — the capability every formatter receives for user-facing text.
//!
//! Keys are the English source strings (`"Just now"`, `"{{amount}} mins ago"`).
//! A translator maps a key to a localized string and substitutes the
//! `{{amount}}` placeholder when `vars` is present. Formatters never own or
//! cache translations.

/// Placeholder substituted with [`Vars::amount`].
pub const AMOUNT_PLACEHOLDER: &str = "{{amount}}";

/// Substitution variables passed alongside a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vars {
    pub amount: i64,
}

impl Vars {
    pub fn amount(amount: i64) -> Self {
        Self { amount }
    }
}

/// A translation function: `(key, vars?) -> String`.
///
/// Unknown keys are the implementation's business; the usual fallback is to
/// return the key itself (with the placeholder substituted).
pub trait Translate {
    fn t(&self, key: &str, vars: Option<Vars>) -> String;
}

/// Convenience: closures implement Translate.
impl<F> Translate for F
where
    F: Fn(&str, Option<Vars>) -> String,
{
    fn t(&self, key: &str, vars: Option<Vars>) -> String {
        (self)(key, vars)
    }
}

/// Replace `{{amount}}` in `text` when vars are present.
pub fn interpolate(text: &str, vars: Option<Vars>) -> String {
    match vars {
        Some(v) => text.replace(AMOUNT_PLACEHOLDER, &v.amount.to_string()),
        None => text.to_string(),
    }
}

/// Identity translator: returns the key, interpolated.
///
/// Useful when no catalog is configured and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTranslator;

impl Translate for KeyTranslator {
    fn t(&self, key: &str, vars: Option<Vars>) -> String {
        interpolate(key, vars)
    }
}
