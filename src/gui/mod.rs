//! GTK4 preferences panel for appimage-settings
//!
//! This module provides the graphical preferences window for editing the
//! persisted AppImage integration settings, using Relm4 and libadwaita.

mod dialogs;
mod window;

pub use window::PrefsWindow;
