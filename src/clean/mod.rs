//! Physical filtering and gap interpolation (stage 2 of the pipeline).

pub mod interp;
pub mod physical;

pub use interp::interpolate_missing;
pub use physical::apply_physical_filter;
