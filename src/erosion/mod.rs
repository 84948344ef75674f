//! Crust erosion.
//!
//! A plate erodes in two phases: rivers carve the cells they flow from, then
//! every peak sheds part of its height onto its lower neighbours. Both phases
//! only look at the plate's own cells.

mod config;
pub mod cpu;

pub use config::ErosionConfig;
