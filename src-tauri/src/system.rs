pub mod alert;
pub mod chat;
pub mod downloads;
pub mod login_item;
pub mod shortcut;
pub mod tray;
pub mod window;
