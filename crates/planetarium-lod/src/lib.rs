//! Level-of-detail selection for planet sections.
//!
//! Each icosahedron section picks a subdivision level from the viewer's
//! altitude above the planet, capped for sections on the far side of the
//! horizon. Also provides the atmosphere fog ramp used while flying.

mod fog;
mod selector;

pub use fog::{FOG_MULTIPLIER_MAX, atmosphere_fog_multiplier};
pub use selector::{LodError, LodSelector, LodThresholds, MAX_THRESHOLDS};
