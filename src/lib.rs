//! Wall-sprite projection and column rasterizer for a Doom-style software
//! renderer.
//!
//! A wall sprite is a flat decal pinned to a world position and a yaw-aligned
//! plane.  [`renderer::software::project`] turns one into a
//! [`renderer::software::VisibleSprite`] inside the per-frame registry, and
//! [`renderer::software::render`] draws it column by column through a
//! [`renderer::ColumnDrawer`].

pub mod config;
pub mod fixed;
pub mod renderer;
pub mod world;

pub use config::RenderConfig;
