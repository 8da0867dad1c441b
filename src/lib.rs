//! AppImage Settings Library
//!
//! This library provides the persisted settings schema for AppImage desktop
//! integration, validation for the default storage folder, and the background
//! portal request issued when update checks are toggled on. The preferences
//! panel itself lives in the feature-gated `gui` module.

pub mod folders;
pub mod portal;
pub mod settings;

#[cfg(feature = "gui")]
pub mod gui;

pub use settings::{
    PlacementPolicy, SettingKey, SettingValue, Settings, SettingsError, SettingsStore,
};

/// GTK application id for the preferences panel.
pub const APP_ID: &str = "io.github.appimage-settings";

/// Command the background portal uses to relaunch the application.
pub const APP_COMMAND: &str = "appimage-settings-gui";

/// Argument appended to the autostart commandline so the relaunched
/// application runs a background update check instead of opening a window.
pub const FETCH_UPDATES_ARG: &str = "--fetch-updates";
