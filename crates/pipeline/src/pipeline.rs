use crate::{Destination, Executor, Image, ImageDecoder, PipelineError, Result, Size, Uniforms};
use fragforge_core::{GeneratorOptions, Registry, UNIFORM_TEXEL_SIZE, numbered_listing};
use slotmap::{DefaultKey, Key, KeyData, SlotMap};
use std::collections::HashMap;

/// Entry point used to present the current image.
pub const PASS_PROGRAM: &str = "pass";

/// A compiled program cached by a [`Pipeline`].
///
/// Ids stay valid for the lifetime of the pipeline, the same entry point always maps to the same id.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct ProgramId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Size of every off-screen target the pipeline allocates.
    pub size: Size,
    pub generator: GeneratorOptions,
}

/// The synchronous state behind a [`DeferredPipeline`](crate::DeferredPipeline).
///
/// Holds a single "current image" that every operation reads from and replaces, a set of named saved images,
/// and a cache of compiled programs keyed by entry point name.
///
/// The cache is never invalidated: a module registered after an entry point was built has no effect on that
/// entry point's cached program.
pub struct Pipeline<E: Executor, D> {
    executor: E,
    decoder: D,
    registry: Registry,
    options: PipelineOptions,

    programs: SlotMap<DefaultKey, CompiledProgram<E::Program>>,
    build_cache: HashMap<String, ProgramId>,

    current: E::Image,
    saved_buffers: HashMap<String, E::Image>,
}

struct CompiledProgram<P> {
    program: P,
    uses_texel_size: bool,
}

impl PipelineOptions {
    pub fn new(size: impl Into<Size>) -> Self {
        Self {
            size: size.into(),
            generator: GeneratorOptions::default(),
        }
    }
}

impl<E, D> Pipeline<E, D>
where
    E: Executor,
    D: ImageDecoder<Image = E::Image>,
{
    /// Create a pipeline with the built-in module library.
    ///
    /// The current image starts out as a blank target of `options.size`.
    pub fn new(executor: E, decoder: D, options: PipelineOptions) -> Result<Self> {
        Self::with_registry(executor, decoder, Registry::new(), options)
    }

    pub fn with_registry(mut executor: E, decoder: D, registry: Registry, options: PipelineOptions) -> Result<Self> {
        let current = executor.create_target(options.size)?;

        Ok(Self {
            executor,
            decoder,
            registry,
            options,
            programs: SlotMap::with_key(),
            build_cache: HashMap::new(),
            current,
            saved_buffers: HashMap::new(),
        })
    }

    /// Register a shader module, returning its export name.
    pub fn add_dependency(&mut self, source: &str) -> Result<String> {
        Ok(self.registry.register(source)?)
    }

    /// Get the cached program for `entry`, building and compiling it on first use.
    pub fn program(&mut self, entry: &str) -> Result<ProgramId> {
        if let Some(id) = self.build_cache.get(entry) {
            log::trace!("program `{}` served from cache", entry);
            return Ok(*id);
        }

        let source = self.registry.generate(entry, &self.options.generator)?;
        log::debug!("compiling program `{}`", entry);
        log::trace!("program `{}` source:\n{}", entry, numbered_listing(&source));

        let program = self.executor.compile(&source)?;
        let key = self.programs.insert(CompiledProgram {
            program,
            uses_texel_size: source.contains(UNIFORM_TEXEL_SIZE),
        });

        let id = ProgramId(key.data().as_ffi());
        self.build_cache.insert(entry.to_owned(), id);
        Ok(id)
    }

    /// Run `entry` over the current image into a fresh target, which becomes the new current image.
    ///
    /// If the program samples `uTexelSize` and `uniforms` doesn't set it, the texel size of the current image is
    /// supplied. The current image is only replaced after a successful draw, a program that compiled stays cached
    /// even if allocating or executing fails afterwards.
    pub fn execute_program(&mut self, entry: &str, uniforms: &Uniforms) -> Result<()> {
        let id = self.program(entry)?;
        let output = self.executor.create_target(self.options.size)?;

        self.run(id, Destination::Image(&output), uniforms)?;
        self.current = output;
        Ok(())
    }

    /// Decode an image and make it the current image.
    pub async fn load_image(&mut self, locator: &str) -> Result<()> {
        log::debug!("loading image `{}`", locator);
        let image = self.decoder.decode(locator).await?;
        self.current = image;
        Ok(())
    }

    /// Draw the current image onto the visible surface using the `pass` program.
    pub fn send_to_canvas(&mut self) -> Result<()> {
        let id = self.program(PASS_PROGRAM)?;
        self.run(id, Destination::Surface, &Uniforms::new())
    }

    /// Remember the current image under `name`, replacing any image saved under the same name.
    pub fn buffer_save(&mut self, name: &str) {
        log::debug!("saving buffer `{}`", name);
        self.saved_buffers.insert(name.to_owned(), self.current.clone());
    }

    /// Make the image saved under `name` the current image.
    ///
    /// #### Error Conditions
    /// - If nothing was saved under `name` [`PipelineError::UnknownBuffer`] is returned.
    pub fn buffer_load(&mut self, name: &str) -> Result<()> {
        let image = self
            .saved_buffers
            .get(name)
            .ok_or_else(|| PipelineError::UnknownBuffer(name.to_owned()))?;

        log::debug!("loading buffer `{}`", name);
        self.current = image.clone();
        Ok(())
    }

    fn run(&mut self, id: ProgramId, destination: Destination<'_, E::Image>, uniforms: &Uniforms) -> Result<()> {
        let compiled = self
            .programs
            .get(KeyData::from_ffi(id.0).into())
            .expect("invalid program id");

        let texel_size;
        let uniforms = if compiled.uses_texel_size && !uniforms.contains(UNIFORM_TEXEL_SIZE) {
            texel_size = uniforms.clone().vec2(UNIFORM_TEXEL_SIZE, self.current.size().texel());
            &texel_size
        } else {
            uniforms
        };

        self.executor
            .execute(&compiled.program, Some(&self.current), destination, uniforms)?;
        Ok(())
    }
}

impl<E: Executor, D> Pipeline<E, D> {
    pub fn current_image(&self) -> &E::Image {
        &self.current
    }

    pub fn saved_buffer(&self, name: &str) -> Option<&E::Image> {
        self.saved_buffers.get(name)
    }

    /// The cached program of `entry`, if it was built already.
    pub fn cached_program(&self, entry: &str) -> Option<ProgramId> {
        self.build_cache.get(entry).copied()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn size(&self) -> Size {
        self.options.size
    }
}
