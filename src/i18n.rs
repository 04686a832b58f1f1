//! Human-readable labels attached to results and notifications.
//!
//! Translations never drive control flow; plugins only copy these strings
//! into result names and descriptions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    German,
}

/// Every label the engine and its plugins need for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSet {
    pub language: Language,
    pub no_search_results_found: String,
    pub no_search_results_found_description: String,
    pub successfully_refreshed_indexes: String,
    pub successfully_cleared_caches: String,
    pub successfully_updated_config: String,
    pub open_in_browser: String,
    /// `{engine}` and `{query}` are substituted.
    pub search_with: String,
    /// `{command}` is substituted.
    pub run_command: String,
    pub operating_system_setting: String,
    pub built_in_command: String,
    pub system_command: String,
    settings: Vec<(&'static str, &'static str)>,
    commands: Vec<(&'static str, &'static str)>,
}

impl TranslationSet {
    pub fn english() -> Self {
        Self {
            language: Language::English,
            no_search_results_found: "No search results found".to_string(),
            no_search_results_found_description: "Try a different search term".to_string(),
            successfully_refreshed_indexes: "Successfully refreshed indexes".to_string(),
            successfully_cleared_caches: "Successfully cleared caches".to_string(),
            successfully_updated_config: "Successfully updated settings".to_string(),
            open_in_browser: "Open in default browser".to_string(),
            search_with: "Search {engine} for '{query}'".to_string(),
            run_command: "Run '{command}'".to_string(),
            operating_system_setting: "System setting".to_string(),
            built_in_command: "Orbit command".to_string(),
            system_command: "System command".to_string(),
            settings: vec![
                ("display", "Display"),
                ("sound", "Sound"),
                ("network", "Network"),
                ("wifi", "Wi-Fi"),
                ("bluetooth", "Bluetooth"),
                ("power", "Power"),
                ("notifications", "Notifications"),
                ("privacy", "Privacy"),
                ("datetime", "Date & Time"),
                ("keyboard", "Keyboard"),
                ("mouse", "Mouse & Touchpad"),
                ("printers", "Printers"),
                ("users", "Users"),
                ("about", "About"),
                ("wallpaper", "Background"),
                ("applications", "Default Applications"),
            ],
            commands: vec![
                ("exit", "Exit Orbit"),
                ("reload", "Reload Orbit"),
                ("edit-config-file", "Edit config file"),
                ("open-settings", "Open Orbit settings"),
                ("refresh-indexes", "Refresh indexes"),
                ("clear-caches", "Clear caches"),
                ("lock", "Lock Screen"),
                ("sleep", "Sleep"),
                ("logout", "Log Out"),
                ("restart", "Restart"),
                ("shutdown", "Shut Down"),
            ],
        }
    }

    pub fn german() -> Self {
        Self {
            language: Language::German,
            no_search_results_found: "Keine Suchergebnisse gefunden".to_string(),
            no_search_results_found_description: "Versuche einen anderen Suchbegriff".to_string(),
            successfully_refreshed_indexes: "Indizes erfolgreich aktualisiert".to_string(),
            successfully_cleared_caches: "Caches erfolgreich geleert".to_string(),
            successfully_updated_config: "Einstellungen erfolgreich gespeichert".to_string(),
            open_in_browser: "Im Standardbrowser öffnen".to_string(),
            search_with: "Mit {engine} nach '{query}' suchen".to_string(),
            run_command: "'{command}' ausführen".to_string(),
            operating_system_setting: "Systemeinstellung".to_string(),
            built_in_command: "Orbit-Befehl".to_string(),
            system_command: "Systembefehl".to_string(),
            settings: vec![
                ("display", "Bildschirm"),
                ("sound", "Ton"),
                ("network", "Netzwerk"),
                ("wifi", "WLAN"),
                ("bluetooth", "Bluetooth"),
                ("power", "Energie"),
                ("notifications", "Benachrichtigungen"),
                ("privacy", "Datenschutz"),
                ("datetime", "Datum & Uhrzeit"),
                ("keyboard", "Tastatur"),
                ("mouse", "Maus & Touchpad"),
                ("printers", "Drucker"),
                ("users", "Benutzer"),
                ("about", "Info"),
                ("wallpaper", "Hintergrund"),
                ("applications", "Standardanwendungen"),
            ],
            commands: vec![
                ("exit", "Orbit beenden"),
                ("reload", "Orbit neu laden"),
                ("edit-config-file", "Konfigurationsdatei bearbeiten"),
                ("open-settings", "Orbit-Einstellungen öffnen"),
                ("refresh-indexes", "Indizes aktualisieren"),
                ("clear-caches", "Caches leeren"),
                ("lock", "Bildschirm sperren"),
                ("sleep", "Ruhezustand"),
                ("logout", "Abmelden"),
                ("restart", "Neu starten"),
                ("shutdown", "Herunterfahren"),
            ],
        }
    }

    /// Label of an operating-system setting, falling back to its key.
    pub fn setting_label<'a>(&'a self, key: &'a str) -> &'a str {
        lookup(&self.settings, key).unwrap_or(key)
    }

    /// Label of a built-in command, falling back to its key.
    pub fn command_label<'a>(&'a self, key: &'a str) -> &'a str {
        lookup(&self.commands, key).unwrap_or(key)
    }

    pub fn search_with_label(&self, engine: &str, query: &str) -> String {
        self.search_with
            .replace("{engine}", engine)
            .replace("{query}", query)
    }

    pub fn run_command_label(&self, command: &str) -> String {
        self.run_command.replace("{command}", command)
    }
}

impl Default for TranslationSet {
    fn default() -> Self {
        Self::english()
    }
}

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Supplies the translation set for a language.
pub trait TranslationProvider: Send + Sync {
    fn get_strings(&self, language: Language) -> TranslationSet;
}

/// The translations compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltInTranslations;

impl TranslationProvider for BuiltInTranslations {
    fn get_strings(&self, language: Language) -> TranslationSet {
        match language {
            Language::English => TranslationSet::english(),
            Language::German => TranslationSet::german(),
        }
    }
}
