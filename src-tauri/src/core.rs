//! Platform-independent logic: surface ownership, panel sizing, geometry and
//! the page bridge. Nothing here touches Tauri windows.

pub mod animation;
pub mod bridge;
pub mod downloads;
pub mod geometry;
pub mod navigation;
pub mod sizer;
pub mod surface;
pub mod zoom;
