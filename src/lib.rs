pub mod config;
pub mod db;
pub mod error;
pub mod security;
pub mod services;
pub mod uploads;

pub use error::Error;
