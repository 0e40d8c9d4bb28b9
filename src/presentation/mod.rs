//! Page contexts, askama templates and the renderer seam.

pub mod renderer;
pub mod views;
