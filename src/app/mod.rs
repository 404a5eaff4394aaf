pub mod bridge;
pub mod center;
pub mod layout;
pub mod prompt;
pub mod windows;
