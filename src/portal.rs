//! Background portal integration.
//!
//! Autostart for the background update check goes through the
//! `org.freedesktop.portal.Background` interface so it works both in
//! sandboxed and unsandboxed installs.

use crate::{APP_COMMAND, FETCH_UPDATES_ARG};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;
use zbus::zvariant::{OwnedObjectPath, Value};

/// Reason string shown by the desktop environment when it asks the user to
/// allow background activity.
const BACKGROUND_REASON: &str = "AppImage Settings background updates fetch";

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("D-Bus error: {0}")]
    Bus(#[from] zbus::Error),
}

#[zbus::proxy(
    interface = "org.freedesktop.portal.Background",
    default_service = "org.freedesktop.portal.Desktop",
    default_path = "/org/freedesktop/portal/desktop"
)]
trait Background {
    fn request_background(
        &self,
        parent_window: &str,
        options: HashMap<&str, Value<'_>>,
    ) -> zbus::Result<OwnedObjectPath>;
}

/// One portal request: ask for (or drop) permission to run in the background
/// and autostart on login.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundRequest {
    pub reason: String,
    pub autostart: bool,
    pub background: bool,
    pub commandline: Vec<String>,
}

impl BackgroundRequest {
    /// The request sent when the background update check toggle changes.
    ///
    /// Both the autostart and background flags follow the toggle, so turning
    /// the setting off also revokes the permission.
    pub fn for_update_checks(enabled: bool) -> Self {
        Self {
            reason: BACKGROUND_REASON.to_string(),
            autostart: enabled,
            background: enabled,
            commandline: vec![APP_COMMAND.to_string(), FETCH_UPDATES_ARG.to_string()],
        }
    }

    fn options(&self) -> HashMap<&'static str, Value<'_>> {
        HashMap::from([
            ("reason", Value::from(self.reason.as_str())),
            ("autostart", Value::from(self.autostart)),
            ("background", Value::from(self.background)),
            ("commandline", Value::from(self.commandline.clone())),
        ])
    }
}

/// Send `request` over the session bus.
///
/// Returns the portal request handle; the response signal is not awaited
/// since the desktop environment applies the permission on its own.
pub fn request_background(request: &BackgroundRequest) -> Result<OwnedObjectPath, PortalError> {
    let connection = zbus::blocking::Connection::session()?;
    let proxy = BackgroundProxyBlocking::new(&connection)?;
    let handle = proxy.request_background("", request.options())?;
    debug!("Background portal request handle: {}", handle.as_str());
    Ok(handle)
}
