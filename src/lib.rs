#![doc = include_str!("../README.md")]

pub mod backend;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod prelude;
pub mod shell;
pub mod source;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod text;
pub mod window;
