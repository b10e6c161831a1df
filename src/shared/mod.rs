use once_cell::sync::Lazy;

pub mod activity;
pub mod configuration;
pub mod constants;
pub mod lucky;
pub mod narrative;
pub mod notifier;
pub mod scheduler;
pub mod util;

pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);
