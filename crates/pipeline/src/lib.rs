mod backend;
mod command;
mod deferred;
mod error;
mod pipeline;
mod uniforms;

pub use backend::{BackendError, Destination, Executor, Image, ImageDecoder, Size};
pub use command::{Command, CommandQueue};
pub use deferred::DeferredPipeline;
pub use error::{PipelineError, Result};
pub use pipeline::{PASS_PROGRAM, Pipeline, PipelineOptions, ProgramId};
pub use uniforms::{Uniform, Uniforms};
