//! Combo routing.
//!
//! - [`ComboRouting`]: the single directive an action carries
//! - [`ComboRouter`]: computes the next slot from the directive
//! - [`ComboSequence`]: owns one actor's slot state and applies results

mod directive;
mod router;
mod sequence;

pub use directive::{ComboDirective, ComboRouting, ComboRoutingFlags};
pub use router::{ComboRouter, RoutingResult};
pub use sequence::{ComboAdvance, ComboSequence};
