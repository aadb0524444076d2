//! Orbital motion for planetarium bodies.
//!
//! Two independent models live here. Spline orbits move bodies along a
//! closed ellipse around a parent at a fixed speed ([`OrbitalSystem`]).
//! N-body gravity integrates point masses under mutual attraction
//! ([`GravitySystem`]).

mod body;
pub mod ellipse;
mod error;
pub mod gravity;
mod spline;
mod system;

pub use body::OrbitalBody;
pub use ellipse::{ellipse_points, semi_minor_axis};
pub use error::OrbitError;
pub use gravity::{G, GravityBody, GravitySystem, RegisterBodyMessage};
pub use spline::OrbitSpline;
pub use system::{BodyId, OrbitalSystem};
