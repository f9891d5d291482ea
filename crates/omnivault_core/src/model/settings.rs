//! User preference model.

use serde::{Deserialize, Serialize};

/// Display name used when no identity is known.
pub const ANONYMOUS_DISPLAY_NAME: &str = "Agent";
/// Display name seeded for a known identity without stored settings.
pub const NEW_USER_DISPLAY_NAME: &str = "العميل";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Neon,
    Arctic,
    Midnight,
    Sepia,
    Gold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Modern,
    Mono,
    Classic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Ar,
    Fr,
}

impl Language {
    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Ar)
    }
}

/// Per-identity display preferences.
///
/// Missing fields in a stored record are filled from [`UserSettings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub user_name: String,
    pub theme: Theme,
    pub font_size: FontSize,
    pub font_style: FontStyle,
    pub language: Language,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self::with_display_name(ANONYMOUS_DISPLAY_NAME)
    }
}

impl UserSettings {
    /// Default preferences seeded the first time a known identity loads.
    pub fn for_new_user() -> Self {
        Self::with_display_name(NEW_USER_DISPLAY_NAME)
    }

    fn with_display_name(name: &str) -> Self {
        Self {
            user_name: name.to_string(),
            theme: Theme::default(),
            font_size: FontSize::default(),
            font_style: FontStyle::default(),
            language: Language::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_lowercase_enums_and_camel_case_fields() {
        let json = serde_json::to_value(UserSettings::for_new_user()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userName": NEW_USER_DISPLAY_NAME,
                "theme": "neon",
                "fontSize": "medium",
                "fontStyle": "modern",
                "language": "ar"
            })
        );
    }

    #[test]
    fn partial_record_is_filled_from_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"userName":"Nadia","language":"fr"}"#).unwrap();
        assert_eq!(settings.user_name, "Nadia");
        assert_eq!(settings.language, Language::Fr);
        assert_eq!(settings.theme, Theme::Neon);
        assert_eq!(settings.font_size, FontSize::Medium);
    }
}
