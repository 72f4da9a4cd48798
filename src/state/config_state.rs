//! ConfigStore - Widget Configuration State
//!
//! Holds the current [`ConfigSnapshot`] in memory, notifies subscribers on
//! every replacement and writes the snapshot through to [`Storage`].
//!
//! ```text
//! load(storage) ──▶ snapshot ◀── replace / edit_field / reset
//!                       │
//!                       ├──▶ subscribers (in subscription order)
//!                       └──▶ storage.set("componentConfig", json)
//! ```

use serde_json::{Map, Value};
use snafu::ResultExt;
use tracing::{debug, error, info, warn};

use crate::constants::CONFIG_STORAGE_KEY;
use crate::domain::config::{ConfigSnapshot, WidgetKey};
use crate::error::{DeserializationSnafu, Error, ParseSnafu, Result};
use crate::utils::storage::Storage;

/// Handle returned by [`ConfigStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&ConfigSnapshot) + Send>;

/// Single source of truth for widget configuration
pub struct ConfigStore {
    snapshot: ConfigSnapshot,
    storage: Box<dyn Storage>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl ConfigStore {
    /// Load the persisted snapshot, falling back to the built-in default
    ///
    /// Never fails: unreadable records are logged and ignored, stale records
    /// are also removed from storage.
    pub fn load(mut storage: Box<dyn Storage>) -> Self {
        let snapshot = match read_record(storage.as_ref()) {
            Ok(Some(snapshot)) => {
                info!(key = CONFIG_STORAGE_KEY, "Loaded stored config");
                snapshot
            }
            Ok(None) => {
                debug!(key = CONFIG_STORAGE_KEY, "No stored config, using defaults");
                ConfigSnapshot::default()
            }
            Err(e @ Error::SchemaDrift { .. }) => {
                warn!(error = %e, "Discarding stale config");
                if let Err(e) = storage.remove(CONFIG_STORAGE_KEY) {
                    error!(error = %e, "Failed to remove stale config");
                }
                ConfigSnapshot::default()
            }
            Err(e) => {
                warn!(error = %e, "Stored config unreadable, using defaults");
                ConfigSnapshot::default()
            }
        };

        Self {
            snapshot,
            storage,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    // ==================== Getters ====================

    /// Current snapshot, no I/O
    pub fn read(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    /// Pretty-printed JSON of one section, the editing surface's initial text
    pub fn section_text(&self, key: WidgetKey) -> Result<String> {
        let value = self.snapshot.section(key)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    // ==================== Mutations ====================

    /// Replace the whole snapshot, notify subscribers, then persist
    ///
    /// A failed write is logged; the in-memory snapshot stays replaced.
    pub fn replace(&mut self, snapshot: ConfigSnapshot) {
        self.snapshot = snapshot;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.snapshot);
        }
        self.persist();
    }

    /// Parse `raw_text` as the new `key` section and apply it
    ///
    /// Rejected text leaves the store untouched and yields an error whose
    /// message is "Invalid JSON format".
    pub fn edit_field(&mut self, key: WidgetKey, raw_text: &str) -> Result<()> {
        let value: Value = serde_json::from_str(raw_text).context(ParseSnafu {
            widget: key.as_str(),
        })?;
        let next = self
            .snapshot
            .with_section(key, value)
            .context(ParseSnafu {
                widget: key.as_str(),
            })?;

        info!(widget = %key, "Config section edited");
        self.replace(next);
        Ok(())
    }

    /// Restore the built-in default
    pub fn reset(&mut self) {
        info!("Config reset to defaults");
        self.replace(ConfigSnapshot::default());
    }

    // ==================== Subscriptions ====================

    /// Call `subscriber` with the new snapshot after every replacement
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&ConfigSnapshot) + Send + 'static,
    ) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(current, _)| *current != id);
        self.subscribers.len() != before
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.snapshot) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize config");
                return;
            }
        };
        if let Err(e) = self.storage.set(CONFIG_STORAGE_KEY, &json) {
            error!(error = %e, key = CONFIG_STORAGE_KEY, "Failed to save config");
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("snapshot", &self.snapshot)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Decode the stored record, if any
fn read_record(storage: &dyn Storage) -> Result<Option<ConfigSnapshot>> {
    let Some(raw) = storage.get(CONFIG_STORAGE_KEY)? else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(&raw).context(DeserializationSnafu {
        key: CONFIG_STORAGE_KEY,
    })?;
    check_schema(&value)?;
    let mut sections: Map<String, Value> =
        serde_json::from_value(value).context(DeserializationSnafu {
            key: CONFIG_STORAGE_KEY,
        })?;
    Ok(Some(decode_sections(&mut sections)))
}

/// Decode each widget section on its own; a bad section keeps its default
fn decode_sections(sections: &mut Map<String, Value>) -> ConfigSnapshot {
    let mut snapshot = ConfigSnapshot::default();
    for key in WidgetKey::ALL {
        let Some(section) = sections.remove(key.as_str()) else {
            continue;
        };
        match snapshot.with_section(key, section) {
            Ok(next) => snapshot = next,
            Err(e) => warn!(widget = %key, error = %e, "Stored section unreadable, using default"),
        }
    }
    snapshot
}

/// Records written before categories existed carry an `interactiveTypewriter`
/// section without a `categories` list
fn check_schema(value: &Value) -> Result<()> {
    let Some(section) = value.get(WidgetKey::InteractiveTypewriter.as_str()) else {
        return Ok(());
    };
    match section.get("categories") {
        Some(Value::Array(_)) => Ok(()),
        _ => Err(Error::SchemaDrift {
            key: CONFIG_STORAGE_KEY.to_string(),
            reason: "interactiveTypewriter has no categories list".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::config::{MacWindowConfig, MacWindowVariant, TerminalConfig};
    use crate::utils::storage::MemoryStorage;

    fn store_with(record: Option<&str>) -> (ConfigStore, MemoryStorage) {
        let storage = match record {
            Some(record) => MemoryStorage::with_record(CONFIG_STORAGE_KEY, record),
            None => MemoryStorage::new(),
        };
        (ConfigStore::load(Box::new(storage.clone())), storage)
    }

    fn custom_snapshot() -> ConfigSnapshot {
        let mut snapshot = ConfigSnapshot::default();
        snapshot.terminal = TerminalConfig {
            commands: vec!["detect: boat".to_string()],
            prompt: "> ".to_string(),
            typing_speed: 10,
            delete_speed: 5,
        };
        snapshot.mac_window.variant = MacWindowVariant::Chroma;
        snapshot.interactive_typewriter.categories.truncate(1);
        snapshot
    }

    #[test]
    fn absent_record_loads_default() {
        let (store, _) = store_with(None);
        assert_eq!(store.read(), &ConfigSnapshot::default());
    }

    #[test]
    fn replace_then_read_is_identity() {
        let (mut store, storage) = store_with(None);
        let snapshot = custom_snapshot();

        store.replace(snapshot.clone());

        assert_eq!(store.read(), &snapshot);
        let reloaded = ConfigStore::load(Box::new(storage));
        assert_eq!(reloaded.read(), &snapshot);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let (store, _) = store_with(Some(r#"{"terminal":{"prompt":"$ "}}"#));
        let defaults = ConfigSnapshot::default();

        assert_eq!(store.read().terminal.prompt, "$ ");
        assert_eq!(store.read().terminal.commands, defaults.terminal.commands);
        assert_eq!(store.read().code_editor, defaults.code_editor);
        assert_eq!(store.read().notification_stack, defaults.notification_stack);
        assert_eq!(
            store.read().interactive_typewriter,
            defaults.interactive_typewriter
        );
    }

    #[test]
    fn unparseable_record_loads_default() {
        let (store, storage) = store_with(Some("{not json"));
        assert_eq!(store.read(), &ConfigSnapshot::default());
        // left in place for diagnosis
        assert!(storage.contains(CONFIG_STORAGE_KEY));
    }

    #[test]
    fn non_object_record_loads_default() {
        let (store, _) = store_with(Some(r#"["terminal"]"#));
        assert_eq!(store.read(), &ConfigSnapshot::default());
    }

    #[test]
    fn bad_section_keeps_the_other_sections() {
        let (store, _) = store_with(Some(
            r#"{"terminal":{"prompt":"$ "},"codeEditor":{"language":"rust"},"macWindow":{"variant":"neon"}}"#,
        ));

        assert_eq!(store.read().terminal.prompt, "$ ");
        assert_eq!(store.read().code_editor.language, "rust");
        assert_eq!(store.read().mac_window, MacWindowConfig::default());
    }

    #[test]
    fn drifted_record_loads_default_and_is_removed() {
        let (store, storage) = store_with(Some(
            r#"{"terminal":{"prompt":"$ "},"interactiveTypewriter":{"items":[]}}"#,
        ));
        assert_eq!(store.read(), &ConfigSnapshot::default());
        assert!(!storage.contains(CONFIG_STORAGE_KEY));
    }

    #[test]
    fn invalid_edit_text_is_rejected() {
        let (mut store, storage) = store_with(None);
        let before = store.read().clone();

        let err = store
            .edit_field(WidgetKey::Terminal, "{\"prompt\": ")
            .expect_err("syntax error");
        assert!(err.is_parse_error());
        assert_eq!(err.to_string(), "Invalid JSON format");

        let err = store
            .edit_field(WidgetKey::Terminal, r#"{"typingSpeed": "fast"}"#)
            .expect_err("shape error");
        assert_eq!(err.to_string(), "Invalid JSON format");

        assert_eq!(store.read(), &before);
        assert!(!storage.contains(CONFIG_STORAGE_KEY));
    }

    #[test]
    fn edit_field_swaps_one_section() {
        let (mut store, storage) = store_with(None);

        store
            .edit_field(WidgetKey::MacWindow, r#"{"variant":"dark","showTitle":true}"#)
            .expect("valid section");

        assert_eq!(store.read().mac_window.variant, MacWindowVariant::Dark);
        assert!(store.read().mac_window.show_title);
        assert_eq!(store.read().terminal, TerminalConfig::default());
        assert!(storage.contains(CONFIG_STORAGE_KEY));
    }

    #[test]
    fn section_text_round_trips_through_edit() {
        let (mut store, _) = store_with(None);
        let text = store
            .section_text(WidgetKey::InteractiveTypewriter)
            .expect("section");
        assert!(text.contains("\"categories\""));

        store
            .edit_field(WidgetKey::InteractiveTypewriter, &text)
            .expect("own text is valid");
        assert_eq!(store.read(), &ConfigSnapshot::default());
    }

    #[test]
    fn subscribers_notified_in_order_until_unsubscribed() {
        let (mut store, _) = store_with(None);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = seen.clone();
            store.subscribe(move |snapshot| {
                seen.lock().expect("lock").push(("first", snapshot.terminal.prompt.clone()));
            })
        };
        {
            let seen = seen.clone();
            store.subscribe(move |snapshot| {
                seen.lock().expect("lock").push(("second", snapshot.terminal.prompt.clone()));
            });
        }

        store
            .edit_field(WidgetKey::Terminal, r#"{"prompt":"$ "}"#)
            .expect("valid");
        assert!(store.unsubscribe(first));
        assert!(!store.unsubscribe(first));
        store.reset();

        let seen = seen.lock().expect("lock");
        assert_eq!(
            *seen,
            vec![
                ("first", "$ ".to_string()),
                ("second", "$ ".to_string()),
                ("second", TerminalConfig::default().prompt),
            ]
        );
    }

    #[test]
    fn failed_write_keeps_in_memory_value() {
        struct ReadOnly;

        impl Storage for ReadOnly {
            fn get(&self, _key: &str) -> Result<Option<String>> {
                Ok(None)
            }
            fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
                Err(Error::Invalid {
                    message: "quota exceeded".to_string(),
                })
            }
            fn remove(&mut self, _key: &str) -> Result<()> {
                Ok(())
            }
        }

        let mut store = ConfigStore::load(Box::new(ReadOnly));
        let snapshot = custom_snapshot();
        store.replace(snapshot.clone());
        assert_eq!(store.read(), &snapshot);
    }
}
