//! macOS-specific functionality

/// Run as a menu bar accessory: no Dock icon, no app menu
#[allow(deprecated)]
pub fn set_accessory_activation_policy() {
    use cocoa::appkit::NSApp;
    use objc::{sel, sel_impl};

    unsafe {
        let app = NSApp();
        // NSApplicationActivationPolicyAccessory = 1
        let _: () = objc::msg_send![app, setActivationPolicy: 1_isize];
    }
}
