//! Per-nursery branding.

use serde::{Deserialize, Serialize};

/// Branding applied to a nursery's screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Backend identifier; absent for the built-in default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning nursery; absent for the built-in default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nursery_id: Option<String>,
    /// Primary colour, CSS notation.
    pub primary_color: String,
    /// Secondary colour.
    pub secondary_color: String,
    /// Accent colour.
    pub accent_color: String,
    /// Font family name.
    pub font_family: String,
    /// Base font size, CSS length.
    pub font_size_base: String,
    /// Logo image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Favicon location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    /// Corner radius, CSS length.
    pub border_radius: String,
    /// Spacing unit, CSS length.
    pub spacing_unit: String,
    /// `light` or `dark`.
    pub theme_mode: String,
}

impl Default for Theme {
    /// Theme used when no nursery is selected or its theme cannot be loaded.
    fn default() -> Self {
        Self {
            id: None,
            nursery_id: None,
            primary_color: "#3B82F6".to_string(),
            secondary_color: "#8B5CF6".to_string(),
            accent_color: "#10B981".to_string(),
            font_family: "Inter".to_string(),
            font_size_base: "16px".to_string(),
            logo_url: None,
            favicon_url: None,
            border_radius: "8px".to_string(),
            spacing_unit: "8px".to_string(),
            theme_mode: "light".to_string(),
        }
    }
}

/// Partial theme update; unset fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRequest {
    /// Primary colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    /// Secondary colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    /// Accent colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    /// Font family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Base font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_base: Option<String>,
    /// Logo image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Favicon location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    /// Corner radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    /// Spacing unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_unit: Option<String>,
    /// `light` or `dark`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_mode: Option<String>,
}

impl ThemeRequest {
    /// Whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.primary_color.is_none()
            && self.secondary_color.is_none()
            && self.accent_color.is_none()
            && self.font_family.is_none()
            && self.font_size_base.is_none()
            && self.logo_url.is_none()
            && self.favicon_url.is_none()
            && self.border_radius.is_none()
            && self.spacing_unit.is_none()
            && self.theme_mode.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_request_serialises_to_empty_object() {
        let request = ThemeRequest::default();
        assert!(request.is_empty());
        assert_eq!(serde_json::to_value(&request).expect("serialise"), json!({}));

        let request = ThemeRequest {
            theme_mode: Some("dark".to_string()),
            ..ThemeRequest::default()
        };
        assert!(!request.is_empty());
        assert_eq!(
            serde_json::to_value(&request).expect("serialise"),
            json!({"themeMode": "dark"})
        );
    }

    #[test]
    fn default_theme_matches_builtin_palette() {
        let theme = Theme::default();
        assert_eq!(theme.primary_color, "#3B82F6");
        assert_eq!(theme.theme_mode, "light");
        assert_eq!(theme.id, None);
    }
}
