// Re-export glam for convenience
pub use glam::*;

// SGRT math types
mod interval;
mod ray;
mod transform;

pub use interval::Interval;
pub use ray::Ray;
pub use transform::{window_transform, Mat4Ext};
