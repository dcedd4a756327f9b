pub mod addons;
pub mod app_info;
pub mod config;
pub mod worlds;

pub use addons::*;
pub use app_info::*;
pub use config::*;
pub use worlds::*;
