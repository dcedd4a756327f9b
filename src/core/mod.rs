pub mod addons;
pub mod paths;
pub mod worlds;
