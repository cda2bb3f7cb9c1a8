//! TabShell Navigation
//!
//! Navigation bar behaviour:
//! - Submitted text is looked up in the rename map (keyed by display text);
//!   a hit navigates to the mapped URL, a miss navigates to the text verbatim.
//! - URLs reported by the engine are shown under their friendly name when the
//!   rename map has one.

mod action;
mod input;

pub use action::NavAction;
pub use input::InputResolver;
