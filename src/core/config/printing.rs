use crate::core::config::data::{Config, DEFAULT_BASE_URL};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, using {DEFAULT_BASE_URL})"),
        }
        match self.default_mode {
            Some(mode) => println!("  default-mode: {mode}"),
            None => println!("  default-mode: (unset, using chat)"),
        }
        match self.timeout_secs {
            Some(secs) => println!("  timeout-secs: {secs}"),
            None => println!("  timeout-secs: (unset)"),
        }
    }
}
