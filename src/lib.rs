//! Link annotated fragment shader snippets into complete programs and run them over an image pipeline.
//!
//! Snippets declare what they provide and need with directives:
//!
//! ```text
//! import convolution
//!
//! uniform vec2 uTexelSize;
//!
//! export vec4 edges() {
//!     return abs(convolution(uTexelSize, mat3(1.0, 0.0, -1.0, 1.0, 0.0, -1.0, 1.0, 0.0, -1.0)));
//! }
//! ```
//!
//! A [`Registry`] collects them, [`build`] orders the modules reachable from an entry point and [`render`] emits the
//! final program. With the `pipeline` feature, [`pipeline::DeferredPipeline`] drives a backend through a queue of
//! deferred image operations.

pub use fragforge_core::*;

#[cfg(feature = "pipeline")]
pub use fragforge_pipeline as pipeline;
