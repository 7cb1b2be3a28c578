//! Command implementations

pub mod info;
pub mod pose;
pub mod validate;
