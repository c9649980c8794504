use crate::Uniforms;
use std::future::Future;
use thiserror::Error;

/// A struct representing a size in physical pixels.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of a single texel in normalized texture coordinates.
    pub fn texel(&self) -> [f32; 2] {
        [1.0 / self.width.max(1) as f32, 1.0 / self.height.max(1) as f32]
    }
}

impl From<[u32; 2]> for Size {
    fn from(value: [u32; 2]) -> Self {
        Self {
            width: value[0],
            height: value[1],
        }
    }
}

/// An image handle owned by the backend.
pub trait Image {
    fn size(&self) -> Size;
}

/// Where an [`Executor`] draws to.
#[derive(Debug)]
pub enum Destination<'a, I> {
    /// An off-screen target previously returned by [`Executor::create_target`].
    Image(&'a I),
    /// The visible surface.
    Surface,
}

/// The graphics backend the pipeline drives.
///
/// Compiles generated fragment programs and runs them as full screen draws.
pub trait Executor {
    type Program;
    type Image: Image + Clone;

    /// Compile a generated fragment program.
    fn compile(&mut self, source: &str) -> Result<Self::Program, BackendError>;

    /// Allocate a blank off-screen target of the given size.
    fn create_target(&mut self, size: Size) -> Result<Self::Image, BackendError>;

    /// Run `program` over the whole `destination`, sampling `input` as the program's texture.
    fn execute(
        &mut self,
        program: &Self::Program,
        input: Option<&Self::Image>,
        destination: Destination<'_, Self::Image>,
        uniforms: &Uniforms,
    ) -> Result<(), BackendError>;
}

/// Turns a resource locator into a backend image.
pub trait ImageDecoder {
    type Image;

    fn decode(&mut self, locator: &str) -> impl Future<Output = Result<Self::Image, BackendError>>;
}

/// Errors reported by an [`Executor`] or [`ImageDecoder`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("program compilation failed: {0}")]
    Compile(String),

    #[error("target allocation failed: {0}")]
    Allocate(String),

    #[error("program execution failed: {0}")]
    Execute(String),

    #[error("failed to decode image `{locator}`: {reason}")]
    Decode { locator: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texel_size() {
        assert_eq!(Size::new(4, 2).texel(), [0.25, 0.5]);
        assert_eq!(Size::from([0, 0]).texel(), [1.0, 1.0]);
    }
}
