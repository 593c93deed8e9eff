//! HTTP request handlers

pub mod download;
pub mod generate;
pub mod index;
pub mod status;
