//! Tray menu management

use super::view::{MenuView, TITLE_UNCONFIGURED};
use crate::core::events::{AppEvent, EventSender};
use crate::dispatcher::UserAction;
use anyhow::{Context, Result};
use tray_icon::{
    menu::{CheckMenuItem, Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem},
    TrayIcon as TrayIconHandle, TrayIconBuilder,
};
use tracing::{debug, error, info};

const TOOLTIP: &str = "Bluetooth Earbuds Controller";

/// Tray menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    /// Connect or disconnect the selected device
    Toggle,
    /// Choose from paired devices
    SelectDevice,
    /// Type an address
    EnterAddress,
    /// Forget the selected device
    ClearDevice,
    /// Launch at login checkbox
    ToggleLoginItem,
    /// Quit application
    Quit,
}

impl TrayAction {
    /// The dispatcher action for this menu item; `None` for Quit
    pub fn user_action(self) -> Option<UserAction> {
        match self {
            TrayAction::Toggle => Some(UserAction::Toggle),
            TrayAction::SelectDevice => Some(UserAction::SelectDevice),
            TrayAction::EnterAddress => Some(UserAction::EnterAddress),
            TrayAction::ClearDevice => Some(UserAction::ClearDevice),
            TrayAction::ToggleLoginItem => Some(UserAction::ToggleLoginItem),
            TrayAction::Quit => None,
        }
    }
}

/// Menu item IDs, moved into the menu event thread
#[derive(Clone)]
struct MenuIds {
    toggle: MenuId,
    select: MenuId,
    enter: MenuId,
    clear: MenuId,
    login: MenuId,
    quit: MenuId,
}

impl MenuIds {
    fn action_for(&self, id: &MenuId) -> Option<TrayAction> {
        if *id == self.toggle {
            Some(TrayAction::Toggle)
        } else if *id == self.select {
            Some(TrayAction::SelectDevice)
        } else if *id == self.enter {
            Some(TrayAction::EnterAddress)
        } else if *id == self.clear {
            Some(TrayAction::ClearDevice)
        } else if *id == self.login {
            Some(TrayAction::ToggleLoginItem)
        } else if *id == self.quit {
            Some(TrayAction::Quit)
        } else {
            None
        }
    }
}

/// Tray manager
///
/// Must be created and used on the main thread.
pub struct TrayManager {
    /// Tray icon handle
    tray: TrayIconHandle,
    status_item: MenuItem,
    toggle_item: MenuItem,
    clear_item: MenuItem,
    login_item: CheckMenuItem,
}

impl TrayManager {
    /// Create the tray and start forwarding menu clicks to `event_tx`
    pub fn new(event_tx: EventSender, login_enabled: bool) -> Result<Self> {
        let menu = Menu::new();

        let status_item = MenuItem::new("Status: Unknown", false, None);
        let toggle_item = MenuItem::new("Connect", false, None);
        let select_item = MenuItem::new("Select Device...", true, None);
        let enter_item = MenuItem::new("Enter Address...", true, None);
        let clear_item = MenuItem::new("Clear Selected Device", false, None);
        let login_item = CheckMenuItem::new("Launch at Login", true, login_enabled, None);
        let quit_item = MenuItem::new("Quit", true, None);

        menu.append(&status_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&toggle_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&select_item)?;
        menu.append(&enter_item)?;
        menu.append(&clear_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&login_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&quit_item)?;

        let ids = MenuIds {
            toggle: toggle_item.id().clone(),
            select: select_item.id().clone(),
            enter: enter_item.id().clone(),
            clear: clear_item.id().clone(),
            login: login_item.id().clone(),
            quit: quit_item.id().clone(),
        };

        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(TOOLTIP)
            .with_title(TITLE_UNCONFIGURED)
            .build()
            .context("Failed to create tray icon")?;

        info!("Tray icon created");

        start_menu_handler(ids, event_tx);

        Ok(Self {
            tray,
            status_item,
            toggle_item,
            clear_item,
            login_item,
        })
    }

    /// Show the result of a status poll
    pub fn apply(&mut self, view: &MenuView) {
        self.status_item.set_text(&view.status);

        if let Some((text, enabled)) = view.toggle {
            self.toggle_item.set_text(text);
            self.toggle_item.set_enabled(enabled);
        }
        if let Some(enabled) = view.clear_enabled {
            self.clear_item.set_enabled(enabled);
        }
        if let Some(title) = view.title {
            self.tray.set_title(Some(title));
        }
    }

    /// Replace the status line with a transient message
    pub fn set_status(&mut self, status: &str) {
        self.status_item.set_text(status);
    }

    /// Sync the Launch at Login checkbox
    pub fn set_login_item(&mut self, enabled: bool) {
        self.login_item.set_checked(enabled);
    }
}

/// Forward menu clicks as `AppEvent::TrayAction` from a dedicated thread
fn start_menu_handler(ids: MenuIds, event_tx: EventSender) {
    std::thread::spawn(move || {
        let receiver = MenuEvent::receiver();

        while let Ok(event) = receiver.recv() {
            debug!("Menu event: {:?}", event);

            if let Some(action) = ids.action_for(&event.id) {
                if let Err(e) = event_tx.send(AppEvent::TrayAction(action)) {
                    error!("Failed to send tray action: {}", e);
                    break;
                }
            }
        }
    });
}
