pub mod app_state;
pub mod claim;
pub mod configuration;
pub mod errors;
pub mod fortune;
pub mod login_info;
pub mod omikuji;
