//! Hytale world export: converts an editor's per-tile terrain representation
//! into Hytale's on-disk world format (`spec.md` §1).

pub mod chunk;
pub mod codec;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod rand;
pub mod region;
pub mod registry;
pub mod serialize;

pub use config::ExportConfig;
pub use error::{Error, Result};
pub use export::{CancellationToken, ExportDriver, Stats};
