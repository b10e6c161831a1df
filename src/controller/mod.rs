pub mod admin_controller;
pub mod login_controller;
pub mod omikuji_controller;
