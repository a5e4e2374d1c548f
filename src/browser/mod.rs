//! Browser session management and configuration

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::{BrowserSession, PageSnapshot};
