//! SGRT renderer: scene graph ray tracing on the CPU.
//!
//! One ray per pixel is cast through the scene graph, the nearest hit is
//! shaded with a multi-light Phong model, and the raster is assembled in
//! parallel buckets.

mod bucket;
mod hit;
mod output;
mod primitive;
mod raycast;
mod renderer;
mod shading;

pub use bucket::{generate_buckets, render_bucket, render_buckets, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use hit::{nearer, HitRecord};
pub use output::{save_png, OutputError, OutputResult};
pub use primitive::{intersect_box, intersect_leaf, intersect_primitive, intersect_sphere, sphere_uv, SurfaceHit};
pub use raycast::{cast_ray, cast_ray_from, raycast};
pub use renderer::{
    color_to_rgb, pixel_ray, render, render_pixel, render_serial, render_with_cancel, ImageBuffer, RenderConfig,
    RenderContext, RenderError, RenderResult, MAX_PIXELS,
};
pub use shading::{reflect, shade, Color};

/// Re-export the math types callers need alongside the renderer
pub use sgrt_math::{Mat4, Ray, Vec2, Vec3, Vec4};
