//! Main preferences window.

use super::dialogs;
use crate::folders;
use crate::portal::{self, BackgroundRequest};
use crate::settings::{PlacementPolicy, SettingKey, SettingValue, SettingsStore};
use relm4::adw::prelude::*;
use relm4::gtk::glib;
use relm4::gtk;
use relm4::prelude::*;
use relm4::{adw, ComponentParts, ComponentSender, RelmWidgetExt};
use std::path::PathBuf;
use tracing::warn;

/// The preferences window model.
pub struct PrefsWindow {
    /// Handle over the persisted settings.
    store: SettingsStore,
    /// Overlay for transient error messages.
    toast_overlay: adw::ToastOverlay,
    /// Radio for the move-on-integration policy.
    move_check: gtk::CheckButton,
    /// Radio for the copy-on-integration policy.
    copy_check: gtk::CheckButton,
}

/// Messages for the preferences window.
#[derive(Debug)]
pub enum PrefsMsg {
    /// Open the folder chooser for the default folder.
    PickDefaultFolder,
    /// Handle folder selected from chooser.
    DefaultFolderSelected(PathBuf),
    /// Toggle listing AppImages outside the default folder.
    SetManageOutside(bool),
    /// Toggle background update checks.
    SetBackgroundUpdates(bool),
    /// Select the move/copy policy.
    SetPlacement(PlacementPolicy),
    /// Toggle executable names for terminal apps.
    SetExecAsName(bool),
    /// Toggle simplified file names.
    SetSimpleFileNames(bool),
    /// Toggle debug logging.
    SetDebugLogs(bool),
}

#[relm4::component(pub)]
impl SimpleComponent for PrefsWindow {
    type Init = SettingsStore;
    type Input = PrefsMsg;
    type Output = ();

    view! {
        #[root]
        adw::ApplicationWindow {
            set_title: Some("AppImage Settings"),
            set_default_width: 640,
            set_default_height: 560,

            #[local_ref]
            toast_overlay -> adw::ToastOverlay {
                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,

                    adw::HeaderBar {
                        #[wrap(Some)]
                        set_title_widget = &adw::WindowTitle {
                            set_title: "Preferences",
                        },
                    },

                    gtk::ScrolledWindow {
                        set_vexpand: true,
                        set_hscrollbar_policy: gtk::PolicyType::Never,

                        adw::Clamp {
                            set_maximum_size: 600,
                            set_margin_all: 12,

                            gtk::Box {
                                set_orientation: gtk::Orientation::Vertical,
                                set_spacing: 24,

                                // General Section
                                adw::PreferencesGroup {
                                    set_title: "General",

                                    adw::ActionRow {
                                        set_title: "AppImage default location",
                                        #[watch]
                                        set_subtitle: &model.store.settings().appimages_default_folder,

                                        add_suffix = &gtk::Button {
                                            set_icon_name: "folder-symbolic",
                                            add_css_class: "flat",
                                            set_valign: gtk::Align::Center,
                                            set_tooltip_text: Some("Select a folder"),
                                            connect_clicked[sender] => move |_| {
                                                sender.input(PrefsMsg::PickDefaultFolder);
                                            },
                                        },
                                    },

                                    adw::ActionRow {
                                        set_title: "Show integrated AppImages outside the default folder",
                                        set_subtitle: "List AppImages that have been integrated into the system menu but are located outside the default folder",

                                        add_suffix = &gtk::Switch {
                                            set_valign: gtk::Align::Center,
                                            #[watch]
                                            set_active: model.store.settings().manage_files_outside_default_folder,
                                            connect_state_set[sender] => move |_, state| {
                                                sender.input(PrefsMsg::SetManageOutside(state));
                                                glib::Propagation::Proceed
                                            },
                                        },
                                    },
                                },

                                // Updates Section
                                adw::PreferencesGroup {
                                    set_title: "Updates management",

                                    adw::ActionRow {
                                        set_title: "Check updates in the background",
                                        set_subtitle: "Receive a notification when a new update is detected; updates will not be installed automatically",

                                        add_suffix = &gtk::Switch {
                                            set_valign: gtk::Align::Center,
                                            #[watch]
                                            set_active: model.store.settings().fetch_updates_in_background,
                                            connect_state_set[sender] => move |_, state| {
                                                sender.input(PrefsMsg::SetBackgroundUpdates(state));
                                                glib::Propagation::Proceed
                                            },
                                        },
                                    },
                                },

                                // File Management Section
                                adw::PreferencesGroup {
                                    set_title: "File management",

                                    #[name(move_row)]
                                    adw::ActionRow {
                                        set_title: "Move AppImages into the destination folder",
                                        set_subtitle: "Reduce disk usage",
                                    },

                                    #[name(copy_row)]
                                    adw::ActionRow {
                                        set_title: "Clone AppImages into the destination folder",
                                        set_subtitle: "Keep the original file and create a copy in the destination folder",
                                    },
                                },

                                // Naming Section
                                adw::PreferencesGroup {
                                    set_title: "Naming conventions",

                                    adw::ActionRow {
                                        set_title: "Use executable name for integrated terminal apps",
                                        set_subtitle: "If enabled, apps that run in the terminal are renamed as their executable.\nYou would need to add the aforementioned folder to your $PATH manually.\n\nFor example, \"golang_x86_64.appimage\" will be saved as \"go\"",

                                        add_suffix = &gtk::Switch {
                                            set_valign: gtk::Align::Center,
                                            #[watch]
                                            set_active: model.store.settings().exec_as_name_for_terminal_apps,
                                            connect_state_set[sender] => move |_, state| {
                                                sender.input(PrefsMsg::SetExecAsName(state));
                                                glib::Propagation::Proceed
                                            },
                                        },
                                    },

                                    adw::ActionRow {
                                        set_title: "Save AppImage files without prefixes",
                                        set_subtitle: "When enabled, every AppImage is renamed as a short, lowercase version of its app name.\n\nFor example, \"kdenlive-24.02-x86_64.appimage\" will be saved as \"kdenlive.appimage\"",

                                        add_suffix = &gtk::Switch {
                                            set_valign: gtk::Align::Center,
                                            #[watch]
                                            set_active: model.store.settings().simple_file_name_for_apps,
                                            connect_state_set[sender] => move |_, state| {
                                                sender.input(PrefsMsg::SetSimpleFileNames(state));
                                                glib::Propagation::Proceed
                                            },
                                        },
                                    },
                                },

                                // Debugging Section
                                adw::PreferencesGroup {
                                    set_title: "Debugging",

                                    adw::ActionRow {
                                        set_title: "Enable debug logs",
                                        set_subtitle: "Increases log verbosity, occupying more disk space and potentially impacting performance.\nRequires a restart.",

                                        add_suffix = &gtk::Switch {
                                            set_valign: gtk::Align::Center,
                                            #[watch]
                                            set_active: model.store.settings().debug_logs,
                                            connect_state_set[sender] => move |_, state| {
                                                sender.input(PrefsMsg::SetDebugLogs(state));
                                                glib::Propagation::Proceed
                                            },
                                        },
                                    },
                                },
                            }
                        }
                    }
                }
            }
        }
    }

    fn init(
        store: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let moves_source = store.settings().placement_policy().moves_source();

        let move_check = gtk::CheckButton::builder()
            .valign(gtk::Align::Center)
            .active(moves_source)
            .build();
        let copy_check = gtk::CheckButton::builder()
            .valign(gtk::Align::Center)
            .active(!moves_source)
            .build();
        copy_check.set_group(Some(&move_check));

        // One handler on the move radio is enough: the group flips both
        // buttons together, so each selection fires exactly once here.
        let sender_clone = sender.clone();
        move_check.connect_toggled(move |check| {
            sender_clone.input(PrefsMsg::SetPlacement(PlacementPolicy::from_move_flag(
                check.is_active(),
            )));
        });

        let model = Self {
            store,
            toast_overlay: adw::ToastOverlay::new(),
            move_check,
            copy_check,
        };

        let toast_overlay = model.toast_overlay.clone();
        let widgets = view_output!();

        // Attach the policy radios as row prefixes
        widgets.move_row.add_prefix(&model.move_check);
        widgets.move_row.set_activatable_widget(Some(&model.move_check));
        widgets.copy_row.add_prefix(&model.copy_check);
        widgets.copy_row.set_activatable_widget(Some(&model.copy_check));

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            PrefsMsg::PickDefaultFolder => {
                let app = relm4::main_adw_application();
                if let Some(window) = app.active_window() {
                    let sender_clone = sender.input_sender().clone();
                    dialogs::show_folder_chooser(&window, move |path| {
                        sender_clone.emit(PrefsMsg::DefaultFolderSelected(path));
                    });
                }
            }
            PrefsMsg::DefaultFolderSelected(path) => {
                let home = glib::home_dir();
                match folders::validate_default_folder(&path, &home) {
                    Ok(()) => {
                        let stored = folders::collapse_home(&path, &home);
                        self.persist(SettingKey::DefaultFolder, SettingValue::Path(stored));
                    }
                    Err(e) => {
                        warn!("Rejected default folder {:?}: {}", path, e);
                        self.show_toast(&e.to_string());
                    }
                }
            }
            PrefsMsg::SetManageOutside(enabled) => {
                self.persist(
                    SettingKey::ManageFilesOutsideDefaultFolder,
                    SettingValue::Bool(enabled),
                );
            }
            PrefsMsg::SetBackgroundUpdates(enabled) => {
                self.persist(
                    SettingKey::FetchUpdatesInBackground,
                    SettingValue::Bool(enabled),
                );

                // The portal both grants and revokes the autostart permission,
                // so it is called for either direction of the toggle.
                let request = BackgroundRequest::for_update_checks(enabled);
                if let Err(e) = portal::request_background(&request) {
                    warn!("Background portal request failed: {}", e);
                    self.show_toast("Failed to update the background permission");
                }
            }
            PrefsMsg::SetPlacement(policy) => {
                if let Err(e) = self.store.set_placement(policy) {
                    self.show_toast(&format!("Failed to save settings: {}", e));
                }
            }
            PrefsMsg::SetExecAsName(enabled) => {
                self.persist(
                    SettingKey::ExecAsNameForTerminalApps,
                    SettingValue::Bool(enabled),
                );
            }
            PrefsMsg::SetSimpleFileNames(enabled) => {
                self.persist(SettingKey::SimpleFileNameForApps, SettingValue::Bool(enabled));
            }
            PrefsMsg::SetDebugLogs(enabled) => {
                self.persist(SettingKey::DebugLogs, SettingValue::Bool(enabled));
            }
        }
    }
}

impl PrefsWindow {
    /// Write a value to the store, surfacing failures as a toast.
    fn persist(&mut self, key: SettingKey, value: SettingValue) {
        if let Err(e) = self.store.set(key, value) {
            self.show_toast(&format!("Failed to save settings: {}", e));
        }
    }

    fn show_toast(&self, message: &str) {
        self.toast_overlay.add_toast(adw::Toast::new(message));
    }
}
