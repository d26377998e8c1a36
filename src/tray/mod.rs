//! Tray module - Menu bar title and menu

mod menu;
mod view;

pub use menu::{TrayAction, TrayManager};
pub use view::MenuView;
