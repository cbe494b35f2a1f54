#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod bundle;
pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod output;
pub mod packer;
pub mod paths;

pub use config::PackOptions;
pub use error::{PackError, PackResult};
pub use models::{ModuleKind, ModuleMap, ModuleRecord};
pub use packer::Packer;
