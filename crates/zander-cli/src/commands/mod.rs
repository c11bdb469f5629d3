//! Command handlers

pub mod bookmark;
pub mod category;
pub mod data;
