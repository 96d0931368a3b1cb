//! Client-side emulation of a hosted faceted-search index over a fixed
//! catalog of tutorial videos.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod search;

pub use error::{AppError, Result};
