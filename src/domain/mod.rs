pub mod identity;
pub mod notification;
pub mod widget;
pub mod window;
