pub mod discovery;
pub mod lang;
pub mod manifest;
