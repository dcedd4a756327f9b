pub mod inventory;
pub mod packs;
