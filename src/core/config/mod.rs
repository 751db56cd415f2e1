pub mod data;
pub mod io;
pub mod printing;

pub use data::{path_display, Config, Settings, SettingsOverrides, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use io::ConfigError;
