use serde::Serialize;

use crate::domain::types::{Locale, TypeConstraintError};

/// The set of locales a category must carry translations for.
///
/// Built once from configuration and passed explicitly to every operation
/// that reads or writes translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedLocales {
    default: Locale,
    available: Vec<Locale>,
}

impl SupportedLocales {
    /// Builds the set, rejecting empty lists, duplicates and a default that is
    /// not one of the available locales.
    pub fn new(default: Locale, available: Vec<Locale>) -> Result<Self, TypeConstraintError> {
        if available.is_empty() {
            return Err(TypeConstraintError::InvalidValue(
                "at least one locale must be available".to_string(),
            ));
        }
        for (index, locale) in available.iter().enumerate() {
            if available[..index].contains(locale) {
                return Err(TypeConstraintError::InvalidValue(format!(
                    "locale {locale} is listed twice"
                )));
            }
        }
        if !available.contains(&default) {
            return Err(TypeConstraintError::InvalidValue(format!(
                "default locale {default} is not among the available locales"
            )));
        }
        Ok(Self { default, available })
    }

    /// Parses raw locale codes, typically read from configuration.
    pub fn parse<S: AsRef<str>>(
        default: &str,
        available: &[S],
    ) -> Result<Self, TypeConstraintError> {
        let available = available
            .iter()
            .map(|code| Locale::new(code.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(Locale::new(default)?, available)
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// Locales in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.available.iter()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.available.iter().any(|locale| locale.as_str() == code)
    }

    /// Returns the supported locale matching `code`, if any.
    pub fn find(&self, code: &str) -> Option<&Locale> {
        self.available.iter().find(|locale| locale.as_str() == code)
    }

    /// Picks the locale used to display a screen, falling back to the default
    /// when nothing (or something unsupported) was requested.
    pub fn resolve(&self, requested: Option<&str>) -> &Locale {
        requested
            .map(str::trim)
            .and_then(|code| self.find(code))
            .unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> SupportedLocales {
        SupportedLocales::parse("en", &["en", "es", "fr"]).unwrap()
    }

    #[test]
    fn keeps_configuration_order() {
        let codes: Vec<&str> = locales().iter().map(Locale::as_str).collect();
        assert_eq!(codes, vec!["en", "es", "fr"]);
    }

    #[test]
    fn default_must_be_available() {
        assert!(SupportedLocales::parse("de", &["en", "es"]).is_err());
    }

    #[test]
    fn rejects_duplicates_and_empty_lists() {
        assert!(SupportedLocales::parse("en", &["en", "en"]).is_err());
        assert!(SupportedLocales::parse::<&str>("en", &[]).is_err());
    }

    #[test]
    fn resolve_falls_back_to_default() {
        let locales = locales();
        assert_eq!(locales.resolve(Some("es")).as_str(), "es");
        assert_eq!(locales.resolve(Some("de")).as_str(), "en");
        assert_eq!(locales.resolve(None).as_str(), "en");
    }
}
