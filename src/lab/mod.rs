//! Reaction resolution and mixture-state lifecycle.
//!
//! [`Resolver`] is stateless and can be shared freely between sessions.
//! [`Mixture`] is the only mutable piece and belongs to exactly one session.

mod error;
mod mixture;
mod resolver;
mod set;
pub mod visuals;

pub use error::LabError;
pub use mixture::*;
pub use resolver::Resolver;
pub use set::ReagentSet;
