//! AppImage Settings GUI
//!
//! The GTK4/libadwaita preferences panel for AppImage integration.

use appimage_settings::gui::PrefsWindow;
use appimage_settings::{SettingsStore, APP_ID, FETCH_UPDATES_ARG};
use relm4::RelmApp;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let mut store = match SettingsStore::open() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open settings: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = if store.settings().debug_logs {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("appimage_settings={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // The portal relaunches this binary with the update-check argument on
    // login; that run must stay windowless.
    if std::env::args().any(|arg| arg == FETCH_UPDATES_ARG) {
        info!("Launched for a background update check, not opening the panel");
        return;
    }

    store.observe(|change| debug!("Setting changed: {} = {}", change.key, change.value));

    let app = RelmApp::new(APP_ID);
    app.run::<PrefsWindow>(store);
}
