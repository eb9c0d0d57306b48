pub mod ai;
pub mod config;
pub mod conversation;
pub mod profile;
#[cfg(feature = "proxy")]
pub mod proxy;
pub mod session;
pub mod types;
pub mod ui;
pub mod views;
