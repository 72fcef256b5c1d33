#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod constants;
pub mod error;
pub mod pin;

pub use config::{Config, Settings, SETTINGS};
pub use error::{Error, ErrorKind, Field, Violations};
