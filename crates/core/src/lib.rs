mod codegen;
mod error;
mod library;
mod linker;
mod module;
mod registry;

pub use codegen::{GeneratorOptions, Precision, banner, banner_width, numbered_listing, render};
pub use error::{ForgeError, Result};
pub use library::BUILTIN_LIBRARY;
pub use linker::build;
pub use module::{ExportType, Module};
pub use registry::Registry;

/// Identifier of the sampler holding the pipeline's current image.
pub const UNIFORM_TEXTURE: &str = "uTexture";
/// Identifier of the `vec2` uniform carrying the size of one texel of the input image.
pub const UNIFORM_TEXEL_SIZE: &str = "uTexelSize";
/// Identifier of the interpolated texture coordinate available to every module.
pub const VARYING_UV: &str = "vUV";

pub const KEYWORD_EXPORT: &str = "export ";
pub const KEYWORD_IMPORT: &str = "import ";
pub const KEYWORD_OVERLOAD: &str = "overload ";
