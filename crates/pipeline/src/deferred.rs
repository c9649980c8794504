use crate::{CommandQueue, Executor, ImageDecoder, Pipeline, PipelineOptions, Result, Uniforms};
use futures::FutureExt;
use futures::future::ready;
use std::ops::Deref;

/// A fluent, deferred front end over a [`Pipeline`].
///
/// Every operation only records a command and returns the handle, so calls can be chained. Nothing runs until
/// [`DeferredPipeline::submit`] drains the recorded commands in order:
///
/// ```rust,ignore
/// pipeline
///     .load_image("./image.jpg")
///     .execute_program("edge_detection", Uniforms::new().float("uWidth", 500.0))
///     .send_to_canvas();
///
/// pipeline.submit().await?;
/// ```
///
/// Reads go straight to the underlying state through [`Deref`] and are never deferred.
pub struct DeferredPipeline<E: Executor, D> {
    state: Pipeline<E, D>,
    queue: CommandQueue<Pipeline<E, D>>,
}

impl<E, D> DeferredPipeline<E, D>
where
    E: Executor + 'static,
    D: ImageDecoder<Image = E::Image> + 'static,
{
    pub fn new(executor: E, decoder: D, options: PipelineOptions) -> Result<Self> {
        Ok(Self::from_pipeline(Pipeline::new(executor, decoder, options)?))
    }

    pub fn from_pipeline(state: Pipeline<E, D>) -> Self {
        Self {
            state,
            queue: CommandQueue::new(),
        }
    }

    /// Record registering a shader module.
    pub fn add_dependency(&mut self, source: impl Into<String>) -> &mut Self {
        let source = source.into();
        self.queue.push(move |state| ready(state.add_dependency(&source).map(drop)).boxed_local());
        self
    }

    /// Record running a program over the current image, see [`Pipeline::execute_program`].
    pub fn execute_program(&mut self, entry: impl Into<String>, uniforms: Uniforms) -> &mut Self {
        let entry = entry.into();
        self.queue.push(move |state| ready(state.execute_program(&entry, &uniforms)).boxed_local());
        self
    }

    /// Record decoding an image into the current image.
    pub fn load_image(&mut self, locator: impl Into<String>) -> &mut Self {
        let locator = locator.into();
        self.queue.push(move |state| async move { state.load_image(&locator).await }.boxed_local());
        self
    }

    /// Record presenting the current image on the visible surface.
    pub fn send_to_canvas(&mut self) -> &mut Self {
        self.queue.push(|state| ready(state.send_to_canvas()).boxed_local());
        self
    }

    /// Record saving the current image under `name`.
    pub fn buffer_save(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.queue.push(move |state| {
            state.buffer_save(&name);
            ready(Ok(())).boxed_local()
        });
        self
    }

    /// Record restoring the image saved under `name`.
    pub fn buffer_load(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.queue.push(move |state| ready(state.buffer_load(&name)).boxed_local());
        self
    }

    /// Execute every recorded command in order.
    ///
    /// The recorded commands are consumed even when one of them fails, the failing command's error is returned
    /// and the commands recorded after it never run.
    pub async fn submit(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        log::debug!("submitting {} pipeline commands", self.queue.len());
        self.queue.drain(&mut self.state).await
    }

    /// Number of recorded commands waiting for [`DeferredPipeline::submit`].
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Take the underlying state, dropping any commands that were not submitted.
    pub fn into_inner(self) -> Pipeline<E, D> {
        self.state
    }
}

impl<E: Executor, D> Deref for DeferredPipeline<E, D> {
    type Target = Pipeline<E, D>;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}
