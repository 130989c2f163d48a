//! Lagrangian drift kernel.
//!
//! Per-step element updates, applied by the simulation loop in a fixed order:
//! advection, vertical processes, weathering, coastline interaction. The
//! parameterizations are first-order; the contract is the shape of the mass
//! budget (retained oil monotonically non-increasing, weathered compartments
//! non-decreasing, total conserved), not spectral fidelity.

mod advection;
mod stranding;
mod vertical;
mod weathering;

pub use advection::advect_elements;
pub use stranding::apply_coastline;
pub use vertical::vertical_processes;
pub use weathering::weather_elements;

/// Wave entrainment rate coefficient (1/(m s)); multiplied by significant
/// wave height to give a per-second entrainment rate.
pub const ENTRAINMENT_RATE: f64 = 2.0e-5;

/// Vertical eddy diffusivity inside the mixed layer (m2/s).
pub const VERTICAL_DIFFUSIVITY: f64 = 0.01;

/// Rise speed scale for buoyant oil (m/s), scaled by relative buoyancy.
pub const RISE_SPEED_SCALE: f64 = 0.1;

/// Depth above which an element counts as resurfaced (m).
pub const SURFACE_THRESHOLD: f64 = 0.05;

/// Emulsification uptake rate coefficient (1/s).
pub const EMULSIFICATION_RATE: f64 = 5.0e-6;
