//! Window - Mac Window Chrome Presets
//!
//! Each variant carries a fixed preset. The configured style only
//! contributes border radius and shadow size on top of it.

use crate::domain::config::{ButtonStyle, MacWindowConfig, MacWindowVariant};

const LARGE_SHADOW: &str = "0 10px 30px -5px rgba(0, 0, 0, 0.3)";
const GLASS_SHADOW: &str = "0 8px 32px 0 rgba(255, 255, 255, 0.1)";
const GLASS_BLUR: &str = "blur(10px)";

/// Preset colors for one window variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantPreset {
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub title_bar_color: &'static str,
    pub button_style: ButtonStyle,
    /// `true` when the variant forces the drop shadow off
    pub no_shadow: bool,
}

impl MacWindowVariant {
    pub fn preset(self) -> VariantPreset {
        match self {
            MacWindowVariant::Default => VariantPreset {
                background_color: "rgba(0, 0, 0, 0.8)",
                border_color: "rgba(255, 255, 255, 0.1)",
                title_bar_color: "rgba(0, 0, 0, 0.9)",
                button_style: ButtonStyle::Default,
                no_shadow: false,
            },
            MacWindowVariant::Minimal => VariantPreset {
                background_color: "rgba(0, 0, 0, 0.7)",
                border_color: "transparent",
                title_bar_color: "transparent",
                button_style: ButtonStyle::Minimal,
                no_shadow: false,
            },
            MacWindowVariant::Dark => VariantPreset {
                background_color: "rgba(0, 0, 0, 0.95)",
                border_color: "rgba(255, 255, 255, 0.05)",
                title_bar_color: "rgba(0, 0, 0, 1)",
                button_style: ButtonStyle::Default,
                no_shadow: false,
            },
            MacWindowVariant::Gradient => VariantPreset {
                background_color: "linear-gradient(135deg, rgba(45,45,45,0.9) 0%, rgba(20,20,20,0.95) 50%, rgba(0,0,0,1) 100%)",
                border_color: "rgba(255, 255, 255, 0.15)",
                title_bar_color: "linear-gradient(to right, rgba(0,0,0,0.95), rgba(20,20,20,0.9))",
                button_style: ButtonStyle::Default,
                no_shadow: false,
            },
            MacWindowVariant::Glassmorphic => VariantPreset {
                background_color: "linear-gradient(135deg, rgba(255,255,255,0.1) 0%, rgba(255,255,255,0.05) 100%)",
                border_color: "rgba(255, 255, 255, 0.2)",
                title_bar_color: "rgba(255, 255, 255, 0.05)",
                button_style: ButtonStyle::Minimal,
                no_shadow: false,
            },
            MacWindowVariant::Chroma => VariantPreset {
                background_color: "#0000FF",
                border_color: "rgba(255, 255, 255, 0.2)",
                title_bar_color: "#0000FF",
                button_style: ButtonStyle::Default,
                no_shadow: true,
            },
        }
    }
}

/// Fully resolved window chrome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowFrame {
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub title_bar_color: &'static str,
    pub button_style: ButtonStyle,
    pub border_radius: String,
    /// CSS box shadow, `None` to leave the default
    pub box_shadow: Option<&'static str>,
    pub backdrop_filter: Option<&'static str>,
    pub title: Option<String>,
}

impl WindowFrame {
    pub fn shows_buttons(&self) -> bool {
        self.button_style != ButtonStyle::Hidden
    }
}

impl MacWindowConfig {
    /// Combine the variant preset with the configured style
    pub fn resolve(&self) -> WindowFrame {
        let preset = self.variant.preset();

        let mut box_shadow = if preset.no_shadow {
            Some("none")
        } else if self.style.shadow == "lg" {
            Some(LARGE_SHADOW)
        } else {
            None
        };
        let mut backdrop_filter = None;

        if self.variant == MacWindowVariant::Glassmorphic {
            box_shadow = Some(GLASS_SHADOW);
            backdrop_filter = Some(GLASS_BLUR);
        }

        let title = (self.show_title && !self.title.is_empty()).then(|| self.title.clone());

        WindowFrame {
            background_color: preset.background_color,
            border_color: preset.border_color,
            title_bar_color: preset.title_bar_color,
            button_style: preset.button_style,
            border_radius: self.style.border_radius.clone(),
            box_shadow,
            backdrop_filter,
            title,
        }
    }
}
