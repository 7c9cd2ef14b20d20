//! Common types and utilities for the showcase badge engine

pub mod config;
pub mod error;
pub mod models;
pub mod reader;


pub use config::Config;
pub use error::{Error, Result};
pub use reader::ActivityReader;
