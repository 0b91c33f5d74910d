//! Domain models for the virtual lab.
//!
//! # Core Concepts
//!
//! ## Static Configuration
//!
//! Loaded once at startup and never mutated afterwards:
//!
//! - [`Reagent`]: A chemical that can be placed in the vessel, keyed by a stable id.
//! - [`ReactionRule`]: An exact set of reagent ids mapped to a [`Product`], a hazard
//!   flag and an optional [`Quiz`].
//!
//! ## Per-Session State
//!
//! - [`StagedReagent`]: A catalog reagent sitting in the vessel with a quantity.
//! - [`MixtureSnapshot`]: Read-only view of a session's vessel, including the
//!   derived [`VesselVisuals`].
//! - [`LabSession`]: Session metadata plus the reagents extracted from the last
//!   uploaded document.
//! - [`LabEvent`]: Discrete notifications for the presentation layer.

mod event;
mod extraction;
mod mixture;
mod outcome;
mod reaction;
mod reagent;
mod session;

pub use event::*;
pub use extraction::*;
pub use mixture::*;
pub use outcome::*;
pub use reaction::*;
pub use reagent::*;
pub use session::*;
