//! Menu text for a poll outcome

use crate::core::config::Config;
use crate::core::state::PollOutcome;

/// Title shown in the menu bar when no device is selected
pub const TITLE_UNCONFIGURED: &str = "BT •";
pub const TITLE_CONNECTED: &str = "BT ✓";
pub const TITLE_DISCONNECTED: &str = "BT ×";

/// Everything the tray shows for one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub status: String,
    /// Toggle item text and enabled flag; `None` leaves the item as is
    pub toggle: Option<(&'static str, bool)>,
    /// Whether "Clear Selected Device" is enabled; `None` leaves it as is
    pub clear_enabled: Option<bool>,
    /// Menu bar title; `None` leaves it as is
    pub title: Option<&'static str>,
}

impl MenuView {
    /// View for `outcome` of a poll made with `config`.
    ///
    /// A failed poll only replaces the status line.
    pub fn new(config: &Config, outcome: &PollOutcome) -> Self {
        match outcome {
            PollOutcome::NoDevice => Self {
                status: "Status: No device selected".to_string(),
                toggle: Some(("Connect", false)),
                clear_enabled: Some(false),
                title: Some(TITLE_UNCONFIGURED),
            },
            PollOutcome::Connected => Self {
                status: format!("Status: Connected to {}", config.label()),
                toggle: Some(("Disconnect", true)),
                clear_enabled: Some(true),
                title: Some(TITLE_CONNECTED),
            },
            PollOutcome::Disconnected => Self {
                status: format!("Status: Disconnected from {}", config.label()),
                toggle: Some(("Connect", true)),
                clear_enabled: Some(true),
                title: Some(TITLE_DISCONNECTED),
            },
            PollOutcome::Failed(_) => Self {
                status: "Status: Error".to_string(),
                toggle: None,
                clear_enabled: None,
                title: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_device() {
        let view = MenuView::new(&Config::default(), &PollOutcome::NoDevice);
        assert_eq!(view.status, "Status: No device selected");
        assert_eq!(view.toggle, Some(("Connect", false)));
        assert_eq!(view.clear_enabled, Some(false));
        assert_eq!(view.title, Some(TITLE_UNCONFIGURED));
    }

    #[test]
    fn test_connected_uses_name() {
        let config = Config::with_device("11-22", "Buds");
        let view = MenuView::new(&config, &PollOutcome::Connected);
        assert_eq!(view.status, "Status: Connected to Buds");
        assert_eq!(view.toggle, Some(("Disconnect", true)));
        assert_eq!(view.title, Some(TITLE_CONNECTED));
    }

    #[test]
    fn test_disconnected_falls_back_to_address() {
        let config = Config::with_device("11-22", "");
        let view = MenuView::new(&config, &PollOutcome::Disconnected);
        assert_eq!(view.status, "Status: Disconnected from 11-22");
        assert_eq!(view.toggle, Some(("Connect", true)));
        assert_eq!(view.clear_enabled, Some(true));
        assert_eq!(view.title, Some(TITLE_DISCONNECTED));
    }

    #[test]
    fn test_failure_only_touches_status() {
        let config = Config::with_device("11-22", "Buds");
        let view = MenuView::new(&config, &PollOutcome::Failed("boom".into()));
        assert_eq!(view.status, "Status: Error");
        assert_eq!(view.toggle, None);
        assert_eq!(view.clear_enabled, None);
        assert_eq!(view.title, None);
    }
}
