//! File chooser dialogs for the GUI.

use relm4::gtk::glib;
use relm4::gtk::{self, gio, prelude::*};
use std::path::PathBuf;
use tracing::debug;

/// Show a folder chooser dialog for picking the AppImage default folder.
pub fn show_folder_chooser<F>(parent: &impl IsA<gtk::Window>, callback: F)
where
    F: Fn(PathBuf) + 'static,
{
    let dialog = gtk::FileChooserNative::builder()
        .title("Select a folder")
        .modal(true)
        .transient_for(parent)
        .action(gtk::FileChooserAction::SelectFolder)
        .accept_label("Select")
        .cancel_label("Cancel")
        .build();

    // Start browsing from the home directory; only folders below it are valid
    let home = glib::home_dir();
    let file = gio::File::for_path(&home);
    let _ = dialog.set_current_folder(Some(&file));

    dialog.connect_response(move |dialog, response| {
        if response == gtk::ResponseType::Accept {
            if let Some(file) = dialog.file() {
                if let Some(path) = file.path() {
                    callback(path);
                }
            }
        } else {
            debug!("Folder selection dismissed: {:?}", response);
        }
    });

    dialog.show();
}
