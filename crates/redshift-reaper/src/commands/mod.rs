pub mod nuke;
pub mod profile;
