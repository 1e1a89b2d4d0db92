pub mod groups;
pub mod sessions;
