//! Flatland: a first-person view of a flat world of polygons.
//!
//! One ray is cast per screen column from a [`Camera`]; the nearest polygon
//! edge it strikes decides the column's color, darkened with distance.

pub mod camera;
pub mod color;
pub mod config;
pub mod ray;
pub mod renderer;
pub mod shading;
pub mod world;

pub use camera::{Camera, RenderSettings};
pub use color::Color;
pub use ray::Ray;
pub use shading::Falloff;
pub use world::{Hit, Polygon, World, WorldObject};
