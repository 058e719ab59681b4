//! Configuration loader and schema types.
//!
//! This module exposes the settings schema used by the runtime and the
//! helpers that load it from disk and the environment.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
