#[cfg(feature = "server")]
use pushkind_common::models::config::CommonServerConfig;
use serde::Deserialize;

use crate::domain::locale::SupportedLocales;
use crate::domain::types::TypeConstraintError;

/// Configuration options of the registry admin service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Key material for session, identity and flash cookies (at least 64 bytes).
    pub secret: String,
    /// Glob passed to Tera when loading templates.
    pub templates_dir: String,
    /// Where users are sent to sign in and where the navigation "home" points.
    pub auth_service_url: String,
    pub locales: LocaleConfig,
}

#[cfg(feature = "server")]
impl ServerConfig {
    /// Settings read by the shared auth extractor and page context helpers.
    pub fn common(&self) -> CommonServerConfig {
        CommonServerConfig {
            secret: self.secret.clone(),
            auth_service_url: self.auth_service_url.clone(),
        }
    }
}

/// Locales the admin must provide category text for.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    pub default: String,
    pub available: Vec<String>,
}

impl LocaleConfig {
    pub fn supported_locales(&self) -> Result<SupportedLocales, TypeConstraintError> {
        SupportedLocales::parse(&self.default, &self.available)
    }
}
