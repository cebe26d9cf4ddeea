//! macOS window configuration for the floating surfaces
//!
//! The popover and chat bar must float above full-screen apps and follow the
//! user across spaces, and the app itself must not take a Dock slot.
//!
//! All AppKit/Cocoa operations MUST run on the main thread.

#[cfg(target_os = "macos")]
use block::ConcreteBlock;
#[cfg(target_os = "macos")]
use cocoa::{
    appkit::NSWindowCollectionBehavior,
    base::{id, nil},
};
#[cfg(target_os = "macos")]
use objc::{class, msg_send, sel, sel_impl};
#[cfg(target_os = "macos")]
use std::sync::{mpsc, Arc, Mutex};

use crate::shared::error::{AppError, AppResult};

// NSStatusWindowLevel = 25 (menu bar level - appears over full-screen apps)
#[cfg(target_os = "macos")]
const NS_STATUS_WINDOW_LEVEL: i64 = 25;

// NSApplicationActivationPolicyAccessory: no Dock icon, activating doesn't switch spaces
#[cfg(target_os = "macos")]
const NS_APPLICATION_ACTIVATION_POLICY_ACCESSORY: i64 = 1;

#[allow(non_upper_case_globals)]
#[cfg(target_os = "macos")]
const NSWindowCollectionBehaviorCanJoinAllSpaces: u64 = 1 << 0;
#[allow(non_upper_case_globals)]
#[cfg(target_os = "macos")]
const NSWindowCollectionBehaviorFullScreenAuxiliary: u64 = 1 << 7;

/// Run as a background agent (no Dock icon).
#[cfg(target_os = "macos")]
pub fn set_app_activation_policy_accessory() -> AppResult<()> {
    let (tx, rx) = mpsc::channel();
    run_on_main_thread(move || {
        let result = unsafe {
            let ns_app: id = msg_send![class!(NSApplication), sharedApplication];
            if ns_app == nil {
                Err(AppError::Window("Failed to get NSApplication".to_string()))
            } else {
                let current: i64 = msg_send![ns_app, activationPolicy];
                if current == NS_APPLICATION_ACTIVATION_POLICY_ACCESSORY {
                    Ok(())
                } else {
                    let success: bool =
                        msg_send![ns_app, setActivationPolicy: NS_APPLICATION_ACTIVATION_POLICY_ACCESSORY];
                    if success {
                        Ok(())
                    } else {
                        Err(AppError::Window(
                            "Failed to set activation policy to Accessory".to_string(),
                        ))
                    }
                }
            }
        };
        let _ = tx.send(result);
    });
    rx.recv()
        .map_err(|e| AppError::Window(format!("Main thread channel closed: {}", e)))?
}

#[cfg(not(target_os = "macos"))]
pub fn set_app_activation_policy_accessory() -> AppResult<()> {
    Ok(())
}

/// Execute a closure on the main thread, blocking until it has run
#[cfg(target_os = "macos")]
fn run_on_main_thread<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    let is_main_thread = unsafe {
        let current_thread: id = msg_send![class!(NSThread), currentThread];
        let is_main: bool = msg_send![current_thread, isMainThread];
        is_main
    };

    if is_main_thread {
        f();
        return;
    }

    let (tx, rx) = mpsc::channel();
    // ConcreteBlock needs Fn, so the FnOnce is taken out of a slot
    let closure = Arc::new(Mutex::new(Some(f)));

    unsafe {
        let block = ConcreteBlock::new(move || {
            let mut guard = match closure.lock() {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(f) = guard.take() {
                f();
            }
            let _ = tx.send(());
        });
        let block = block.copy();

        let main_queue: id = msg_send![class!(NSOperationQueue), mainQueue];
        let _: () = msg_send![main_queue, addOperationWithBlock: block];
    }

    let _ = rx.recv();
}

/// # Safety
/// MUST be called from the main thread with a valid NSWindow pointer.
#[cfg(target_os = "macos")]
unsafe fn configure_floating_panel_main_thread(ns_window: id) -> AppResult<()> {
    if ns_window == nil {
        return Err(AppError::Window("Received nil window pointer".to_string()));
    }

    let ns_window_class: id = msg_send![class!(NSWindow), class];
    let is_window: bool = msg_send![ns_window, isKindOfClass: ns_window_class];
    if !is_window {
        return Err(AppError::Window("Provided pointer is not NSWindow".to_string()));
    }

    let _: () = msg_send![ns_window, setLevel: NS_STATUS_WINDOW_LEVEL];

    let desired_bits =
        NSWindowCollectionBehaviorCanJoinAllSpaces | NSWindowCollectionBehaviorFullScreenAuxiliary;
    let behavior = NSWindowCollectionBehavior::from_bits_truncate(desired_bits);
    let _: () = msg_send![ns_window, setCollectionBehavior: behavior];

    let verified: NSWindowCollectionBehavior = msg_send![ns_window, collectionBehavior];
    if verified.bits() & NSWindowCollectionBehaviorFullScreenAuxiliary == 0 {
        tracing::warn!("FullScreenAuxiliary flag did not stick on floating panel");
    }

    Ok(())
}

/// Make a surface window float over full-screen apps on every space.
///
/// Call after the window is built and before it is first shown.
#[cfg(target_os = "macos")]
pub fn configure_floating_panel(window: &tauri::Window) -> AppResult<()> {
    let ns_window_ptr = window
        .ns_window()
        .map_err(|e| AppError::Window(format!("Failed to get NSWindow: {}", e)))?;
    // Raw pointers aren't Send; move the address instead
    let ns_window_usize = ns_window_ptr as usize;

    let (tx, rx) = mpsc::channel();
    run_on_main_thread(move || {
        let result = unsafe { configure_floating_panel_main_thread(ns_window_usize as id) };
        let _ = tx.send(result);
    });

    rx.recv()
        .map_err(|e| AppError::Window(format!("Main thread channel closed: {}", e)))?
}

#[cfg(not(target_os = "macos"))]
pub fn configure_floating_panel(_window: &tauri::Window) -> AppResult<()> {
    Ok(())
}
