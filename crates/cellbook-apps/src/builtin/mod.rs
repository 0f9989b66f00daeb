//! Built-in apps

pub mod claim;
pub mod note;
