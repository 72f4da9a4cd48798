//! Config - Widget Configuration Snapshot
//!
//! One record per widget, keyed by the widget's camelCase name when
//! persisted. Every field carries a built-in default so a snapshot read from
//! storage is always fully populated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::media::MediaRef;
use crate::error::{Error, Result};

/// Widget names, in the order the site lists them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKey {
    Terminal,
    CodeEditor,
    CommandPalette,
    NotificationStack,
    MacWindow,
    TypewriterMenu,
    InteractiveTypewriter,
}

impl WidgetKey {
    pub const ALL: [WidgetKey; 7] = [
        WidgetKey::Terminal,
        WidgetKey::CodeEditor,
        WidgetKey::CommandPalette,
        WidgetKey::NotificationStack,
        WidgetKey::MacWindow,
        WidgetKey::TypewriterMenu,
        WidgetKey::InteractiveTypewriter,
    ];

    /// Persisted key of the widget's section
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKey::Terminal => "terminal",
            WidgetKey::CodeEditor => "codeEditor",
            WidgetKey::CommandPalette => "commandPalette",
            WidgetKey::NotificationStack => "notificationStack",
            WidgetKey::MacWindow => "macWindow",
            WidgetKey::TypewriterMenu => "typewriterMenu",
            WidgetKey::InteractiveTypewriter => "interactiveTypewriter",
        }
    }
}

impl fmt::Display for WidgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        WidgetKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownWidget {
                name: s.to_string(),
            })
    }
}

// ==================== Snapshot ====================

/// Complete configuration for all widgets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigSnapshot {
    pub terminal: TerminalConfig,
    pub code_editor: CodeEditorConfig,
    pub command_palette: CommandPaletteConfig,
    pub notification_stack: NotificationStackConfig,
    pub mac_window: MacWindowConfig,
    pub typewriter_menu: TypewriterMenuConfig,
    pub interactive_typewriter: InteractiveTypewriterConfig,
}

impl ConfigSnapshot {
    /// Serialize one section to a JSON value
    pub fn section(&self, key: WidgetKey) -> Result<Value> {
        let value = match key {
            WidgetKey::Terminal => serde_json::to_value(&self.terminal)?,
            WidgetKey::CodeEditor => serde_json::to_value(&self.code_editor)?,
            WidgetKey::CommandPalette => serde_json::to_value(&self.command_palette)?,
            WidgetKey::NotificationStack => serde_json::to_value(&self.notification_stack)?,
            WidgetKey::MacWindow => serde_json::to_value(&self.mac_window)?,
            WidgetKey::TypewriterMenu => serde_json::to_value(&self.typewriter_menu)?,
            WidgetKey::InteractiveTypewriter => {
                serde_json::to_value(&self.interactive_typewriter)?
            }
        };
        Ok(value)
    }

    /// Copy of this snapshot with one section swapped for `value`
    ///
    /// Fails when `value` is not a valid record for the widget.
    pub fn with_section(&self, key: WidgetKey, value: Value) -> serde_json::Result<Self> {
        let mut next = self.clone();
        match key {
            WidgetKey::Terminal => next.terminal = serde_json::from_value(value)?,
            WidgetKey::CodeEditor => next.code_editor = serde_json::from_value(value)?,
            WidgetKey::CommandPalette => next.command_palette = serde_json::from_value(value)?,
            WidgetKey::NotificationStack => {
                next.notification_stack = serde_json::from_value(value)?
            }
            WidgetKey::MacWindow => next.mac_window = serde_json::from_value(value)?,
            WidgetKey::TypewriterMenu => next.typewriter_menu = serde_json::from_value(value)?,
            WidgetKey::InteractiveTypewriter => {
                next.interactive_typewriter = serde_json::from_value(value)?
            }
        }
        Ok(next)
    }
}

// ==================== Terminal ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerminalConfig {
    pub commands: Vec<String>,
    pub prompt: String,
    /// Milliseconds per typed character
    pub typing_speed: u64,
    /// Milliseconds per deleted character
    pub delete_speed: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            commands: ["detect: truck", "detect: car", "detect: moon", "detect: lights"]
                .into_iter()
                .map(String::from)
                .collect(),
            prompt: "moondream:".to_string(),
            typing_speed: 75,
            delete_speed: 50,
        }
    }
}

// ==================== Code Editor ====================

const SAMPLE_CODE: &str = "function animate() {
  const element = document.querySelector('.box');
  element.style.transform = 'rotate(360deg)';
  element.style.transition = 'all 0.5s ease';
}

// Call the animation function
animate();";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeEditorConfig {
    pub code: String,
    pub language: String,
    pub theme: String,
}

impl Default for CodeEditorConfig {
    fn default() -> Self {
        Self {
            code: SAMPLE_CODE.to_string(),
            language: "javascript".to_string(),
            theme: "dark".to_string(),
        }
    }
}

// ==================== Command Palette ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteCommand {
    pub id: String,
    pub title: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
}

/// Animation timings, in seconds (distance in pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaletteAnimations {
    pub search_input_delay: f64,
    pub item_stagger_delay: f64,
    pub hover_transition_duration: f64,
    pub slide_in_distance: f64,
}

impl Default for PaletteAnimations {
    fn default() -> Self {
        Self {
            search_input_delay: 0.2,
            item_stagger_delay: 0.05,
            hover_transition_duration: 0.2,
            slide_in_distance: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaletteStyle {
    pub max_height: String,
    pub width: String,
    pub background_color: String,
    pub text_color: String,
}

impl Default for PaletteStyle {
    fn default() -> Self {
        Self {
            max_height: "400px".to_string(),
            width: "100%".to_string(),
            background_color: "rgba(0, 0, 0, 0.5)".to_string(),
            text_color: "rgba(255, 255, 255, 0.8)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandPaletteConfig {
    pub placeholder: String,
    pub commands: Vec<PaletteCommand>,
    pub animations: PaletteAnimations,
    pub style: PaletteStyle,
}

impl Default for CommandPaletteConfig {
    fn default() -> Self {
        Self {
            placeholder: "Type a command or search...".to_string(),
            commands: vec![
                PaletteCommand {
                    id: "1".to_string(),
                    title: "New File".to_string(),
                    icon: "📄".to_string(),
                    shortcut: Some("⌘N".to_string()),
                },
                PaletteCommand {
                    id: "2".to_string(),
                    title: "Open Project".to_string(),
                    icon: "📁".to_string(),
                    shortcut: Some("⌘O".to_string()),
                },
            ],
            animations: PaletteAnimations::default(),
            style: PaletteStyle::default(),
        }
    }
}

// ==================== Notification Stack ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackPosition {
    #[default]
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Display time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StackAnimations {
    pub enter_duration: f64,
    pub exit_duration: f64,
    pub stagger_delay: f64,
    pub slide_distance: f64,
}

impl Default for StackAnimations {
    fn default() -> Self {
        Self {
            enter_duration: 0.3,
            exit_duration: 0.2,
            stagger_delay: 0.1,
            slide_distance: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StackStyle {
    pub spacing: f64,
    pub max_width: String,
    pub opacity: f64,
    pub blur: String,
}

impl Default for StackStyle {
    fn default() -> Self {
        Self {
            spacing: 8.0,
            max_width: "384px".to_string(),
            opacity: 0.95,
            blur: "8px".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationStackConfig {
    pub notifications: Vec<Notification>,
    pub position: StackPosition,
    pub max_notifications: usize,
    pub animations: StackAnimations,
    pub style: StackStyle,
}

impl Default for NotificationStackConfig {
    fn default() -> Self {
        Self {
            notifications: vec![Notification {
                id: "1".to_string(),
                kind: NotificationKind::Success,
                title: "Deployment Successful".to_string(),
                message: "Your changes are now live".to_string(),
                icon: None,
                duration: Some(3000),
            }],
            position: StackPosition::TopRight,
            max_notifications: 3,
            animations: StackAnimations::default(),
            style: StackStyle::default(),
        }
    }
}

impl NotificationStackConfig {
    /// Notifications that fit on screen at once, oldest first
    pub fn visible(&self) -> &[Notification] {
        let len = self.notifications.len().min(self.max_notifications);
        &self.notifications[..len]
    }
}

// ==================== Mac Window ====================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacWindowVariant {
    #[default]
    Default,
    Minimal,
    Dark,
    Gradient,
    Glassmorphic,
    Chroma,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Default,
    Minimal,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MacWindowStyle {
    pub background_color: String,
    pub border_color: String,
    pub title_bar_color: String,
    pub button_style: ButtonStyle,
    pub border_radius: String,
    pub shadow: String,
}

impl Default for MacWindowStyle {
    fn default() -> Self {
        Self {
            background_color: "rgba(0, 0, 0, 0.8)".to_string(),
            border_color: "rgba(255, 255, 255, 0.1)".to_string(),
            title_bar_color: "rgba(0, 0, 0, 0.9)".to_string(),
            button_style: ButtonStyle::Default,
            border_radius: "0.75rem".to_string(),
            shadow: "lg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowAnimations {
    pub mount: bool,
    pub hover: bool,
    pub button_hover: bool,
}

impl Default for WindowAnimations {
    fn default() -> Self {
        Self {
            mount: true,
            hover: true,
            button_hover: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MacWindowConfig {
    pub variant: MacWindowVariant,
    pub custom_cursor: bool,
    pub style: MacWindowStyle,
    pub animations: WindowAnimations,
    pub title: String,
    pub show_title: bool,
}

// ==================== Typewriter Menu ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub href: String,
}

impl MenuItem {
    fn new(id: &str, text: &str, href: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuAnimations {
    pub typing_speed: u64,
    pub delete_speed: u64,
    /// Seconds per cursor blink
    pub cursor_blink_speed: f64,
}

impl Default for MenuAnimations {
    fn default() -> Self {
        Self {
            typing_speed: 50,
            delete_speed: 30,
            cursor_blink_speed: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypewriterMenuConfig {
    pub items: Vec<MenuItem>,
    pub animations: MenuAnimations,
}

impl Default for TypewriterMenuConfig {
    fn default() -> Self {
        Self {
            items: vec![
                MenuItem::new("1", "Welcome to Moondream", "/"),
                MenuItem::new("2", "Create Beautiful Videos", "/create"),
                MenuItem::new("3", "Explore Components", "/explore"),
                MenuItem::new("4", "Join Our Community", "/community"),
            ],
            animations: MenuAnimations::default(),
        }
    }
}

// ==================== Interactive Typewriter ====================

/// One demo query, in either the short `{id, text, href}` form or the
/// media form `{id, display, command, initialSrc, resultSrc}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypewriterItem {
    pub id: String,
    #[serde(alias = "text")]
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_src: Option<MediaRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_src: Option<MediaRef>,
}

impl TypewriterItem {
    fn short(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            display: text.to_string(),
            command: None,
            href: Some("/".to_string()),
            initial_src: None,
            result_src: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypewriterCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<TypewriterItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractiveAnimations {
    pub typing_speed: u64,
    pub cursor_blink_speed: f64,
    /// Delay before the Enter hint appears, in milliseconds
    pub enter_hint_delay: u64,
    /// Time from typing start to auto-advance, in milliseconds
    pub progress_duration: u64,
}

impl Default for InteractiveAnimations {
    fn default() -> Self {
        Self {
            typing_speed: 50,
            cursor_blink_speed: 0.5,
            enter_hint_delay: 500,
            progress_duration: crate::constants::DEFAULT_PROGRESS_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractiveTypewriterConfig {
    pub categories: Vec<TypewriterCategory>,
    pub animations: InteractiveAnimations,
}

impl Default for InteractiveTypewriterConfig {
    fn default() -> Self {
        let category = |id: &str, name: &str, items: &[&str]| TypewriterCategory {
            id: id.to_string(),
            name: name.to_string(),
            items: items
                .iter()
                .enumerate()
                .map(|(i, text)| TypewriterItem::short(&(i + 1).to_string(), text))
                .collect(),
        };

        Self {
            categories: vec![
                category(
                    "detection",
                    "Object Detection",
                    &["detect: truck", "detect: car", "detect: moon", "detect: lights"],
                ),
                category(
                    "vqa",
                    "Visual Q&A",
                    &[
                        "ask: what time of day is it?",
                        "ask: how many people are in the scene?",
                        "ask: what's the weather like?",
                    ],
                ),
                category(
                    "caption",
                    "Image Captioning",
                    &[
                        "caption: describe the scene",
                        "caption: describe the mood",
                        "caption: describe the lighting",
                    ],
                ),
            ],
            animations: InteractiveAnimations::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn widget_keys_round_trip_through_names() {
        for key in WidgetKey::ALL {
            assert_eq!(key.as_str().parse::<WidgetKey>().expect("known key"), key);
        }
        assert!("sidebar".parse::<WidgetKey>().is_err());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let snapshot: ConfigSnapshot =
            serde_json::from_value(json!({ "terminal": { "prompt": "$" } })).expect("valid");

        assert_eq!(snapshot.terminal.prompt, "$");
        assert_eq!(snapshot.terminal.typing_speed, 75);
        let defaults = ConfigSnapshot::default();
        assert_eq!(snapshot.code_editor, defaults.code_editor);
        assert_eq!(snapshot.interactive_typewriter, defaults.interactive_typewriter);
    }

    #[test]
    fn persisted_names_are_camel_case() {
        let value = serde_json::to_value(ConfigSnapshot::default()).expect("serializable");
        for key in WidgetKey::ALL {
            assert!(value.get(key.as_str()).is_some(), "missing {key}");
        }
        assert_eq!(value["notificationStack"]["position"], "top-right");
        assert_eq!(value["notificationStack"]["notifications"][0]["type"], "success");
        assert_eq!(value["macWindow"]["style"]["buttonStyle"], "default");
        assert_eq!(value["macWindow"]["title"], "");
        assert_eq!(value["macWindow"]["showTitle"], false);
    }

    #[test]
    fn typewriter_item_accepts_both_forms() {
        let short: TypewriterItem =
            serde_json::from_value(json!({ "id": "1", "text": "detect: car", "href": "/" }))
                .expect("short form");
        assert_eq!(short.display, "detect: car");
        assert_eq!(short.href.as_deref(), Some("/"));

        let media: TypewriterItem = serde_json::from_value(json!({
            "id": "gauge",
            "display": "What temperature does the gauge read?",
            "command": "The gauge reads 53 °C.",
            "initialSrc": "@gauge.png",
            "resultSrc": "@gauge.png"
        }))
        .expect("media form");
        assert_eq!(media.initial_src, Some(MediaRef::Image("gauge.png".to_string())));
    }

    #[test]
    fn with_section_swaps_only_that_widget() {
        let base = ConfigSnapshot::default();
        let next = base
            .with_section(WidgetKey::Terminal, json!({ "prompt": "λ", "commands": ["ls"] }))
            .expect("valid section");

        assert_eq!(next.terminal.prompt, "λ");
        assert_eq!(next.terminal.commands, vec!["ls".to_string()]);
        assert_eq!(next.code_editor, base.code_editor);
        assert_eq!(next.mac_window, base.mac_window);
    }

    #[test]
    fn with_section_rejects_wrong_shape() {
        let base = ConfigSnapshot::default();
        assert!(
            base.with_section(WidgetKey::Terminal, json!({ "typingSpeed": "fast" }))
                .is_err()
        );
        assert!(base.with_section(WidgetKey::MacWindow, json!([1, 2])).is_err());
    }

    #[test]
    fn section_serializes_current_values() {
        let snapshot = ConfigSnapshot::default();
        let section = snapshot.section(WidgetKey::TypewriterMenu).expect("serializable");
        assert_eq!(section["items"][1]["text"], "Create Beautiful Videos");
        assert_eq!(section["animations"]["deleteSpeed"], 30);
    }

    #[test]
    fn visible_notifications_are_capped() {
        let mut stack = NotificationStackConfig::default();
        let template = stack.notifications[0].clone();
        stack.notifications = (0..5)
            .map(|i| Notification {
                id: i.to_string(),
                ..template.clone()
            })
            .collect();
        assert_eq!(stack.visible().len(), 3);
        assert_eq!(stack.visible()[0].id, "0");
    }
}
