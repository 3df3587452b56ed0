//! Shared helpers for the mirroring engine.
pub mod fs;
