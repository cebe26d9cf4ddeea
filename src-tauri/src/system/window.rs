pub mod chat_bar;
pub mod host;
pub mod nswindow;
pub mod surfaces;
