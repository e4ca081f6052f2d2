use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub content: ContentConfig,
    pub overlays: OverlayConfig,
    pub style: StyleConfig,
    pub theme: ThemeConfig,
    pub slide_number: SlideNumberConfig,
    pub math: MathConfig,
    pub layout: LayoutConfig,
    pub font: FontConfig,
    pub pdf: PdfConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub slide_separator: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            slide_separator: "---".to_string(),
        }
    }
}

/// Staged reveal. Segments after a pause marker become numbered overlays.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
    pub marker: String,
    /// Tried only when `marker` does not occur in the slide.
    pub alternate_marker: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            marker: "<!--pause-->".to_string(),
            alternate_marker: "\\pause".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct StyleConfig {
    pub hrule: HruleConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HruleStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl HruleStyle {
    pub fn as_css(self) -> &'static str {
        match self {
            HruleStyle::Solid => "solid",
            HruleStyle::Dashed => "dashed",
            HruleStyle::Dotted => "dotted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HruleConfig {
    pub enabled: bool,
    pub width: String,
    pub thickness: String,
    pub style: HruleStyle,
}

impl Default for HruleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: "80%".to_string(),
            thickness: "2px".to_string(),
            style: HruleStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: String,
    /// Themes may request title underlines regardless of `style.hrule.enabled`.
    pub title_hrule: bool,
    pub colors: ThemeColors,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "modern".to_string(),
            title_hrule: false,
            colors: ThemeColors::default(),
        }
    }
}

/// Hex strings (`#rrggbb`). Malformed values render as black.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub background: String,
    pub text: String,
    pub accent: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1a1a1a".to_string(),
            accent: "#2563eb".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum SlideNumberFormat {
    #[serde(rename = "current")]
    Current,
    #[default]
    #[serde(rename = "current/total")]
    CurrentOfTotal,
    #[serde(rename = "total")]
    Total,
    #[serde(rename = "percent")]
    Percent,
}

impl SlideNumberFormat {
    pub fn template(self) -> &'static str {
        match self {
            SlideNumberFormat::Current => "{current}",
            SlideNumberFormat::CurrentOfTotal => "{current}/{total}",
            SlideNumberFormat::Total => "{total}",
            SlideNumberFormat::Percent => "{percent}%",
        }
    }

    /// Fill the template for slide `current` (1-based) of `total`.
    pub fn render(self, current: usize, total: usize) -> String {
        let percent = if total == 0 {
            0
        } else {
            ((current as f64 / total as f64) * 100.0).round() as usize
        };
        self.template()
            .replace("{current}", &current.to_string())
            .replace("{total}", &total.to_string())
            .replace("{percent}", &percent.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SlideNumberConfig {
    pub enabled: bool,
    pub format: SlideNumberFormat,
}

impl Default for SlideNumberConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: SlideNumberFormat::CurrentOfTotal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    pub enabled: bool,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Kept for compatibility with older configs. Column layouts always use
    /// the number of columns found on the slide.
    pub columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { columns: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub sans: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { sans: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub latex_engine: String,
    /// Engine runs per compile.
    pub passes: u8,
    pub timeout_secs: u64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            latex_engine: "pdflatex".to_string(),
            passes: 2,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::compiled_default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The settings bundled in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Whether title underlines are requested by the user or by the theme.
    pub fn title_hrule_enabled(&self) -> bool {
        self.style.hrule.enabled || self.theme.title_hrule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_default_matches_struct_defaults() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = Config::from_toml(
            "[overlays]\nenabled = true\n\n[theme.colors]\naccent = \"#ff0000\"\n",
        )
        .unwrap();
        assert!(config.overlays.enabled);
        assert_eq!(config.overlays.marker, "<!--pause-->");
        assert_eq!(config.theme.colors.accent, "#ff0000");
        assert_eq!(config.theme.colors.background, "#ffffff");
        assert_eq!(config.content.slide_separator, "---");
    }

    #[test]
    fn slide_number_formats() {
        let config = Config::from_toml("[slide_number]\nformat = \"percent\"\n").unwrap();
        assert_eq!(config.slide_number.format, SlideNumberFormat::Percent);
        assert_eq!(SlideNumberFormat::Percent.render(1, 4), "25%");
        assert_eq!(SlideNumberFormat::CurrentOfTotal.render(2, 5), "2/5");
        assert_eq!(SlideNumberFormat::Current.render(2, 5), "2");
        assert_eq!(SlideNumberFormat::Total.render(2, 5), "5");
    }

    #[test]
    fn hrule_style_parses_lowercase() {
        let config = Config::from_toml("[style.hrule]\nstyle = \"dashed\"\n").unwrap();
        assert_eq!(config.style.hrule.style, HruleStyle::Dashed);
        assert_eq!(config.style.hrule.width, "80%");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::from_toml("[content\nslide_separator = 1").is_err());
    }

    #[test]
    fn theme_can_force_title_hrule() {
        let config = Config::from_toml("[theme]\ntitle_hrule = true\n").unwrap();
        assert!(config.title_hrule_enabled());
        assert!(!Config::default().title_hrule_enabled());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/bodh/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
