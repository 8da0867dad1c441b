//! Persisted settings schema for AppImage integration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse settings file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("No config directory found")]
    NoConfigDir,
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),
    #[error("Setting {key} expects a {expected} value")]
    WrongType {
        key: SettingKey,
        expected: &'static str,
    },
    #[error("Invalid value {value:?} for {key}: expected true or false")]
    InvalidValue { key: SettingKey, value: String },
}

/// The recognized settings keys, named exactly as they appear on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Root folder for integrated AppImages.
    DefaultFolder,
    /// List AppImages integrated into the menu but stored outside the default folder.
    ManageFilesOutsideDefaultFolder,
    /// Enable periodic background update checks.
    FetchUpdatesInBackground,
    /// Move (true) vs copy (false) the source file on integration.
    MoveAppImageOnIntegration,
    /// Rename terminal-mode executables to their binary name.
    ExecAsNameForTerminalApps,
    /// Strip the vendor prefix from saved filenames.
    SimpleFileNameForApps,
    /// Verbose logging toggle.
    DebugLogs,
}

impl SettingKey {
    /// Every recognized key, in display order.
    pub const ALL: [SettingKey; 7] = [
        SettingKey::DefaultFolder,
        SettingKey::ManageFilesOutsideDefaultFolder,
        SettingKey::FetchUpdatesInBackground,
        SettingKey::MoveAppImageOnIntegration,
        SettingKey::ExecAsNameForTerminalApps,
        SettingKey::SimpleFileNameForApps,
        SettingKey::DebugLogs,
    ];

    /// The on-disk (kebab-case) name of the key.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::DefaultFolder => "appimages-default-folder",
            SettingKey::ManageFilesOutsideDefaultFolder => "manage-files-outside-default-folder",
            SettingKey::FetchUpdatesInBackground => "fetch-updates-in-background",
            SettingKey::MoveAppImageOnIntegration => "move-appimage-on-integration",
            SettingKey::ExecAsNameForTerminalApps => "exec-as-name-for-terminal-apps",
            SettingKey::SimpleFileNameForApps => "simple-file-name-for-apps",
            SettingKey::DebugLogs => "debug-logs",
        }
    }

    /// The value type this key accepts.
    pub fn type_name(self) -> &'static str {
        match self {
            SettingKey::DefaultFolder => "path",
            _ => "boolean",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == name)
            .ok_or_else(|| SettingsError::UnknownKey(name.to_string()))
    }
}

/// A value stored under a [`SettingKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    /// A folder path, possibly in `~`-collapsed form.
    Path(String),
    Bool(bool),
}

impl SettingValue {
    /// Parse a raw string into the value type `key` expects.
    pub fn parse_for(key: SettingKey, raw: &str) -> Result<Self, SettingsError> {
        match key {
            SettingKey::DefaultFolder => Ok(SettingValue::Path(raw.to_string())),
            _ => raw
                .parse::<bool>()
                .map(SettingValue::Bool)
                .map_err(|_| SettingsError::InvalidValue {
                    key,
                    value: raw.to_string(),
                }),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Path(path) => f.write_str(path),
            SettingValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// How the source file is treated when an AppImage is integrated.
///
/// The two options are mutually exclusive and exhaustive; on disk they are a
/// single boolean (`move-appimage-on-integration`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPolicy {
    /// Move the source file into the default folder.
    Move,
    /// Keep the source file and copy it into the default folder.
    Copy,
}

impl PlacementPolicy {
    /// Whether this policy removes the source file.
    pub fn moves_source(self) -> bool {
        matches!(self, PlacementPolicy::Move)
    }

    /// Map the stored boolean back to the policy.
    pub fn from_move_flag(flag: bool) -> Self {
        if flag {
            PlacementPolicy::Move
        } else {
            PlacementPolicy::Copy
        }
    }
}

/// All persisted settings, one field per key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Root folder for integrated AppImages (may contain `~`).
    pub appimages_default_folder: String,
    pub manage_files_outside_default_folder: bool,
    pub fetch_updates_in_background: bool,
    pub move_appimage_on_integration: bool,
    pub exec_as_name_for_terminal_apps: bool,
    pub simple_file_name_for_apps: bool,
    pub debug_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            appimages_default_folder: "~/AppImages".to_string(),
            manage_files_outside_default_folder: false,
            fetch_updates_in_background: false,
            move_appimage_on_integration: true,
            exec_as_name_for_terminal_apps: false,
            simple_file_name_for_apps: false,
            debug_logs: false,
        }
    }
}

impl Settings {
    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default settings file path.
    pub fn settings_path() -> Result<PathBuf, SettingsError> {
        let dirs = directories::ProjectDirs::from("", "", "appimage-settings")
            .ok_or(SettingsError::NoConfigDir)?;
        Ok(dirs.config_dir().join("settings.toml"))
    }

    /// The default folder with `~` expanded.
    pub fn default_folder_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.appimages_default_folder).as_ref())
    }

    /// The move/copy policy encoded by `move-appimage-on-integration`.
    pub fn placement_policy(&self) -> PlacementPolicy {
        PlacementPolicy::from_move_flag(self.move_appimage_on_integration)
    }

    /// Set the move/copy policy.
    pub fn set_placement_policy(&mut self, policy: PlacementPolicy) {
        self.move_appimage_on_integration = policy.moves_source();
    }

    /// Read a value by key.
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::DefaultFolder => {
                SettingValue::Path(self.appimages_default_folder.clone())
            }
            SettingKey::ManageFilesOutsideDefaultFolder => {
                SettingValue::Bool(self.manage_files_outside_default_folder)
            }
            SettingKey::FetchUpdatesInBackground => {
                SettingValue::Bool(self.fetch_updates_in_background)
            }
            SettingKey::MoveAppImageOnIntegration => {
                SettingValue::Bool(self.move_appimage_on_integration)
            }
            SettingKey::ExecAsNameForTerminalApps => {
                SettingValue::Bool(self.exec_as_name_for_terminal_apps)
            }
            SettingKey::SimpleFileNameForApps => {
                SettingValue::Bool(self.simple_file_name_for_apps)
            }
            SettingKey::DebugLogs => SettingValue::Bool(self.debug_logs),
        }
    }

    /// Write a value by key; the value must match the key's type.
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        match (key, value) {
            (SettingKey::DefaultFolder, SettingValue::Path(path)) => {
                self.appimages_default_folder = path;
            }
            (SettingKey::ManageFilesOutsideDefaultFolder, SettingValue::Bool(value)) => {
                self.manage_files_outside_default_folder = value;
            }
            (SettingKey::FetchUpdatesInBackground, SettingValue::Bool(value)) => {
                self.fetch_updates_in_background = value;
            }
            (SettingKey::MoveAppImageOnIntegration, SettingValue::Bool(value)) => {
                self.move_appimage_on_integration = value;
            }
            (SettingKey::ExecAsNameForTerminalApps, SettingValue::Bool(value)) => {
                self.exec_as_name_for_terminal_apps = value;
            }
            (SettingKey::SimpleFileNameForApps, SettingValue::Bool(value)) => {
                self.simple_file_name_for_apps = value;
            }
            (SettingKey::DebugLogs, SettingValue::Bool(value)) => {
                self.debug_logs = value;
            }
            (key, _) => {
                return Err(SettingsError::WrongType {
                    key,
                    expected: key.type_name(),
                });
            }
        }
        Ok(())
    }
}

/// A single applied settings mutation, as delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingChange {
    pub key: SettingKey,
    pub value: SettingValue,
}

/// Owning handle over the persisted settings.
///
/// Every mutation is written back to disk immediately and published to the
/// registered observers. The panel receives this handle at construction; the
/// CLI builds its own.
pub struct SettingsStore {
    settings: Settings,
    path: PathBuf,
    observers: Vec<Box<dyn Fn(&SettingChange)>>,
}

impl SettingsStore {
    /// Open the store at the default location, writing defaults on first run.
    pub fn open() -> Result<Self, SettingsError> {
        Self::open_at(Settings::settings_path()?)
    }

    /// Open the store at a specific path, writing defaults if the file is missing.
    pub fn open_at(path: PathBuf) -> Result<Self, SettingsError> {
        let settings = if path.exists() {
            Settings::load_from(&path)?
        } else {
            let settings = Settings::default();
            settings.save_to(&path)?;
            debug!("Created settings file with defaults: {:?}", path);
            settings
        };

        Ok(Self {
            settings,
            path,
            observers: Vec::new(),
        })
    }

    /// The current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The backing settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register an observer called once for every applied mutation.
    pub fn observe(&mut self, observer: impl Fn(&SettingChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Write a value by key, persist it, and notify observers.
    ///
    /// Writing the current value again is a no-op.
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        if self.settings.get(key) == value {
            return Ok(());
        }

        self.settings.set(key, value.clone())?;
        self.save()?;
        self.notify(&SettingChange { key, value });
        Ok(())
    }

    /// Convenience for the boolean keys.
    pub fn set_bool(&mut self, key: SettingKey, value: bool) -> Result<(), SettingsError> {
        self.set(key, SettingValue::Bool(value))
    }

    /// Persist a move/copy policy selection.
    pub fn set_placement(&mut self, policy: PlacementPolicy) -> Result<(), SettingsError> {
        self.set_bool(SettingKey::MoveAppImageOnIntegration, policy.moves_source())
    }

    /// Replace all settings at once, notifying observers per changed key.
    pub fn replace(&mut self, settings: Settings) -> Result<(), SettingsError> {
        let old = std::mem::replace(&mut self.settings, settings);
        self.save()?;

        for key in SettingKey::ALL {
            let value = self.settings.get(key);
            if old.get(key) != value {
                self.notify(&SettingChange { key, value });
            }
        }
        Ok(())
    }

    fn save(&self) -> Result<(), SettingsError> {
        self.settings.save_to(&self.path)?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }

    fn notify(&self, change: &SettingChange) {
        for observer in &self.observers {
            observer(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.appimages_default_folder, "~/AppImages");
        assert!(settings.move_appimage_on_integration);
        assert!(!settings.manage_files_outside_default_folder);
        assert!(!settings.fetch_updates_in_background);
        assert!(!settings.exec_as_name_for_terminal_apps);
        assert!(!settings.simple_file_name_for_apps);
        assert!(!settings.debug_logs);
    }

    #[test]
    fn test_serialized_keys_are_kebab_case() {
        let serialized = toml::to_string_pretty(&Settings::default()).unwrap();
        for key in SettingKey::ALL {
            assert!(
                serialized.contains(key.as_str()),
                "missing {} in:\n{}",
                key,
                serialized
            );
        }
    }

    #[test]
    fn test_serialize_deserialize() {
        let mut settings = Settings::default();
        settings.debug_logs = true;
        settings.appimages_default_folder = "~/Apps".to_string();

        let serialized = toml::to_string_pretty(&settings).unwrap();
        let deserialized: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(settings, deserialized);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = toml::from_str("debug-logs = true\n").unwrap();
        assert!(settings.debug_logs);
        assert_eq!(settings.appimages_default_folder, "~/AppImages");
        assert!(settings.move_appimage_on_integration);
    }

    #[test]
    fn test_key_name_roundtrip() {
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>().unwrap(), key);
        }
        assert!(matches!(
            "no-such-key".parse::<SettingKey>(),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_every_boolean_key_flips_through_the_keyed_surface() {
        let mut settings = Settings::default();

        for key in SettingKey::ALL {
            if key == SettingKey::DefaultFolder {
                continue;
            }
            for value in [true, false] {
                settings.set(key, SettingValue::Bool(value)).unwrap();
                assert_eq!(settings.get(key), SettingValue::Bool(value), "{key}");
            }
        }
    }

    #[test]
    fn test_set_rejects_wrong_type() {
        let mut settings = Settings::default();
        let err = settings
            .set(SettingKey::DefaultFolder, SettingValue::Bool(true))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::WrongType {
                key: SettingKey::DefaultFolder,
                expected: "path",
            }
        ));

        let err = settings
            .set(
                SettingKey::DebugLogs,
                SettingValue::Path("/tmp".to_string()),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::WrongType {
                key: SettingKey::DebugLogs,
                expected: "boolean",
            }
        ));
    }

    #[test]
    fn test_parse_for() {
        assert_eq!(
            SettingValue::parse_for(SettingKey::DebugLogs, "true").unwrap(),
            SettingValue::Bool(true)
        );
        assert_eq!(
            SettingValue::parse_for(SettingKey::DebugLogs, "false").unwrap(),
            SettingValue::Bool(false)
        );
        assert!(matches!(
            SettingValue::parse_for(SettingKey::DebugLogs, "yes"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert_eq!(
            SettingValue::parse_for(SettingKey::DefaultFolder, "~/Apps").unwrap(),
            SettingValue::Path("~/Apps".to_string())
        );
    }

    #[test]
    fn test_placement_policy_mapping() {
        assert_eq!(PlacementPolicy::from_move_flag(true), PlacementPolicy::Move);
        assert_eq!(
            PlacementPolicy::from_move_flag(false),
            PlacementPolicy::Copy
        );

        let mut settings = Settings::default();
        settings.set_placement_policy(PlacementPolicy::Copy);
        assert!(!settings.move_appimage_on_integration);
        assert_eq!(settings.placement_policy(), PlacementPolicy::Copy);

        settings.set_placement_policy(PlacementPolicy::Move);
        assert!(settings.move_appimage_on_integration);
        assert_eq!(settings.placement_policy(), PlacementPolicy::Move);
    }

    #[test]
    fn test_default_folder_path_expands_tilde() {
        let settings = Settings::default();
        let expanded = settings.default_folder_path();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("AppImages"));
    }

    #[test]
    fn test_store_creates_file_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");

        let store = SettingsStore::open_at(path.clone()).unwrap();
        assert!(path.exists());
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");

        let mut store = SettingsStore::open_at(path.clone()).unwrap();
        store
            .set_bool(SettingKey::FetchUpdatesInBackground, true)
            .unwrap();
        store
            .set(
                SettingKey::DefaultFolder,
                SettingValue::Path("~/Apps".to_string()),
            )
            .unwrap();

        let reopened = SettingsStore::open_at(path).unwrap();
        assert!(reopened.settings().fetch_updates_in_background);
        assert_eq!(reopened.settings().appimages_default_folder, "~/Apps");
    }

    #[test]
    fn test_store_notifies_once_per_mutation() {
        let dir = TempDir::new().unwrap();
        let mut store = SettingsStore::open_at(dir.path().join("settings.toml")).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.observe(move |change| sink.borrow_mut().push(change.clone()));

        store.set_bool(SettingKey::DebugLogs, true).unwrap();
        assert_eq!(
            seen.borrow().as_slice(),
            [SettingChange {
                key: SettingKey::DebugLogs,
                value: SettingValue::Bool(true),
            }]
        );

        // Same value again: no write, no notification.
        store.set_bool(SettingKey::DebugLogs, true).unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_store_set_placement() {
        let dir = TempDir::new().unwrap();
        let mut store = SettingsStore::open_at(dir.path().join("settings.toml")).unwrap();

        store.set_placement(PlacementPolicy::Copy).unwrap();
        assert!(!store.settings().move_appimage_on_integration);

        store.set_placement(PlacementPolicy::Move).unwrap();
        assert!(store.settings().move_appimage_on_integration);
    }

    #[test]
    fn test_store_replace_notifies_per_changed_key() {
        let dir = TempDir::new().unwrap();
        let mut store = SettingsStore::open_at(dir.path().join("settings.toml")).unwrap();
        store.set_bool(SettingKey::DebugLogs, true).unwrap();
        store
            .set_bool(SettingKey::FetchUpdatesInBackground, true)
            .unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.observe(move |change| sink.borrow_mut().push(change.key));

        store.replace(Settings::default()).unwrap();
        let mut keys = seen.borrow().clone();
        keys.sort_by_key(|key| key.as_str());
        assert_eq!(
            keys,
            [
                SettingKey::DebugLogs,
                SettingKey::FetchUpdatesInBackground,
            ]
        );
        assert_eq!(store.settings(), &Settings::default());
    }
}
