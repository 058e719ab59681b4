//! Application module: the model the TUI renders and the runtime mutates.
//!
//! `App` holds the browse list built from the catalog, the cursor, the
//! status message and the file-path prompt used by the capture dialog.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
