use fragforge::pipeline::{
    BackendError, DeferredPipeline, Destination, Executor, Image, ImageDecoder, Pipeline, PipelineError,
    PipelineOptions, Size, Uniform, Uniforms,
};
use fragforge::{ForgeError, UNIFORM_TEXEL_SIZE};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

const EDGE_DETECTION: &str = "
import convolution

uniform float uWidth;
uniform float uHeight;

export vec4 edge_detection() {
    vec2 texel = vec2(1.0 / uWidth, 1.0 / uHeight);

    const mat3 verticalWeights = mat3(
        1.0,  1.0,  1.0,
        0.0,  0.0,  0.0,
        -1.0, -1.0, -1.0
    );

    const mat3 horizontalWeights = mat3(
        1.0,  0.0,  -1.0,
        1.0,  0.0,  -1.0,
        1.0,  0.0,  -1.0
    );

    vec4 verticalEdges = convolution(texel, verticalWeights);
    vec4 horizontalEdges = convolution(texel, horizontalWeights);
    return abs(verticalEdges) + abs(horizontalEdges);
}
";

/// a backend that records what it is asked to do instead of drawing
#[derive(Default)]
struct RecordingExecutor {
    targets: u32,
    sources: Vec<String>,
    draws: Vec<Draw>,
}

#[derive(Clone, Debug, PartialEq)]
struct Draw {
    program: usize,
    input: Option<String>,
    output: Option<String>,
    uniforms: Uniforms,
}

#[derive(Clone, Debug, PartialEq)]
struct RecordedImage {
    label: String,
    size: Size,
}

struct RecordedProgram {
    index: usize,
}

impl Image for RecordedImage {
    fn size(&self) -> Size {
        self.size
    }
}

impl Executor for RecordingExecutor {
    type Program = RecordedProgram;
    type Image = RecordedImage;

    fn compile(&mut self, source: &str) -> Result<Self::Program, BackendError> {
        if source.contains("BROKEN") {
            return Err(BackendError::Compile("syntax error".into()));
        }

        self.sources.push(source.to_owned());
        Ok(RecordedProgram {
            index: self.sources.len() - 1,
        })
    }

    fn create_target(&mut self, size: Size) -> Result<Self::Image, BackendError> {
        self.targets += 1;
        Ok(RecordedImage {
            label: format!("target#{}", self.targets),
            size,
        })
    }

    fn execute(
        &mut self,
        program: &Self::Program,
        input: Option<&Self::Image>,
        destination: Destination<'_, Self::Image>,
        uniforms: &Uniforms,
    ) -> Result<(), BackendError> {
        if uniforms.contains("uFail") {
            return Err(BackendError::Execute("device lost".into()));
        }

        self.draws.push(Draw {
            program: program.index,
            input: input.map(|image| image.label.clone()),
            output: match destination {
                Destination::Image(image) => Some(image.label.clone()),
                Destination::Surface => None,
            },
            uniforms: uniforms.clone(),
        });
        Ok(())
    }
}

/// a decoder that knows a fixed set of images and suspends once before yielding each one
#[derive(Default)]
struct FixedDecoder {
    images: HashMap<String, Size>,
}

impl FixedDecoder {
    fn with(mut self, locator: &str, size: [u32; 2]) -> Self {
        self.images.insert(locator.to_owned(), size.into());
        self
    }
}

impl ImageDecoder for FixedDecoder {
    type Image = RecordedImage;

    fn decode(&mut self, locator: &str) -> impl Future<Output = Result<Self::Image, BackendError>> {
        let result = match self.images.get(locator) {
            Some(size) => Ok(RecordedImage {
                label: locator.to_owned(),
                size: *size,
            }),
            None => Err(BackendError::Decode {
                locator: locator.to_owned(),
                reason: "not found".into(),
            }),
        };

        async move {
            YieldOnce(false).await;
            result
        }
    }
}

struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

type TestPipeline = DeferredPipeline<RecordingExecutor, FixedDecoder>;

fn setup() -> TestPipeline {
    let _ = env_logger::builder().is_test(true).try_init();

    let decoder = FixedDecoder::default()
        .with("./image.jpg", [500, 700])
        .with("./lego.png", [64, 32]);

    DeferredPipeline::new(RecordingExecutor::default(), decoder, PipelineOptions::new([500, 700])).unwrap()
}

fn submit(pipeline: &mut TestPipeline) -> Result<(), PipelineError> {
    pollster::block_on(pipeline.submit())
}

/// edge detection over a decoded image, presented on the surface
/// - nothing runs before submit
/// - commands run in order, each draw reads the previous output
#[test]
fn edge_detection_chain() {
    let mut pipeline = setup();

    pipeline
        .add_dependency(EDGE_DETECTION)
        .load_image("./image.jpg")
        .execute_program("edge_detection", Uniforms::new().float("uWidth", 500.0).float("uHeight", 700.0))
        .send_to_canvas();

    assert_eq!(pipeline.pending(), 4);
    assert!(pipeline.executor().draws.is_empty());
    assert!(!pipeline.registry().contains("edge_detection"));

    submit(&mut pipeline).unwrap();
    assert_eq!(pipeline.pending(), 0);

    let executor = pipeline.executor();
    assert_eq!(executor.sources.len(), 2);
    assert!(executor.sources[0].contains("vec4 convolution(vec2 step, mat3 weights)"));
    assert!(executor.sources[0].contains("gl_FragColor = edge_detection();"));
    assert!(executor.sources[1].contains("gl_FragColor = pass();"));

    assert_eq!(
        executor.draws,
        [
            Draw {
                program: 0,
                input: Some("./image.jpg".into()),
                output: Some("target#2".into()),
                uniforms: Uniforms::new().float("uWidth", 500.0).float("uHeight", 700.0),
            },
            Draw {
                program: 1,
                input: Some("target#2".into()),
                output: None,
                uniforms: Uniforms::new(),
            },
        ]
    );

    assert_eq!(pipeline.current_image().label, "target#2");
}

/// executing the same entry point twice compiles it once, even when the input differs
#[test]
fn programs_are_cached_per_entry_point() {
    let mut pipeline = setup();

    pipeline
        .execute_program("gray_scale", Uniforms::new())
        .load_image("./lego.png")
        .execute_program("gray_scale", Uniforms::new());
    submit(&mut pipeline).unwrap();

    let executor = pipeline.executor();
    assert_eq!(executor.sources.len(), 1);
    assert_eq!(executor.draws.len(), 2);
    assert_eq!(executor.draws[0].program, executor.draws[1].program);
    assert_ne!(executor.draws[0].input, executor.draws[1].input);

    let id = pipeline.cached_program("gray_scale").unwrap();
    let mut state = pipeline.into_inner();
    assert_eq!(state.program("gray_scale").unwrap(), id);
    assert_eq!(state.executor().sources.len(), 1);
}

/// re-registering an imported module doesn't touch programs that were already built
#[test]
fn cache_survives_registration() {
    let mut pipeline = setup();

    pipeline
        .add_dependency("export float value() { return 0.25; }")
        .add_dependency("import value\nexport float user() { return value(); }")
        .execute_program("user", Uniforms::new())
        .add_dependency("export float value() { return 0.75; }")
        .execute_program("user", Uniforms::new())
        .execute_program("value", Uniforms::new());
    submit(&mut pipeline).unwrap();

    let executor = pipeline.executor();
    assert_eq!(executor.sources.len(), 2);
    assert!(executor.sources[0].contains("return 0.25;"));
    assert!(executor.sources[1].contains("return 0.75;"));
    assert_eq!(executor.draws[0].program, executor.draws[1].program);
}

/// a failing command aborts the rest of the queue, and the queue is gone afterwards
#[test]
fn failure_aborts_submit() {
    let mut pipeline = setup();

    pipeline
        .buffer_save("before")
        .execute_program("missing", Uniforms::new())
        .buffer_save("after");

    assert_eq!(
        submit(&mut pipeline),
        Err(PipelineError::Forge(ForgeError::UnresolvedImport {
            name: "missing".into(),
            requested_by: None,
        }))
    );

    assert!(pipeline.saved_buffer("before").is_some());
    assert!(pipeline.saved_buffer("after").is_none());
    assert_eq!(pipeline.pending(), 0);

    submit(&mut pipeline).unwrap();
    assert!(pipeline.saved_buffer("after").is_none());
}

/// a program that fails to compile leaves the current image and the cache alone
#[test]
fn compile_failure_changes_nothing() {
    let mut pipeline = setup();

    pipeline
        .add_dependency("export vec4 broken() { BROKEN }")
        .execute_program("broken", Uniforms::new());

    assert_eq!(
        submit(&mut pipeline),
        Err(PipelineError::Backend(BackendError::Compile("syntax error".into())))
    );

    assert_eq!(pipeline.current_image().label, "target#1");
    assert_eq!(pipeline.cached_program("broken"), None);
    assert!(pipeline.executor().draws.is_empty());
}

/// unsupported entry types are reported before anything reaches the backend
#[test]
fn unsupported_entry_type() {
    let mut pipeline = setup();

    pipeline
        .add_dependency("export int count() { return 3; }")
        .execute_program("count", Uniforms::new());

    assert_eq!(
        submit(&mut pipeline),
        Err(PipelineError::Forge(ForgeError::UnsupportedExportType {
            export: "count".into(),
            ty: "int".into(),
        }))
    );
    assert!(pipeline.executor().sources.is_empty());
}

#[test]
fn buffers_save_and_load() {
    let mut pipeline = setup();

    pipeline
        .load_image("./lego.png")
        .buffer_save("lego")
        .execute_program("gray_scale", Uniforms::new())
        .buffer_save("gray")
        .buffer_load("lego");
    submit(&mut pipeline).unwrap();

    assert_eq!(pipeline.current_image().label, "./lego.png");
    assert_eq!(pipeline.saved_buffer("gray").unwrap().label, "target#2");

    pipeline.buffer_load("nope");
    assert_eq!(
        submit(&mut pipeline),
        Err(PipelineError::UnknownBuffer("nope".into()))
    );
    assert_eq!(pipeline.current_image().label, "./lego.png");
}

#[test]
fn send_to_canvas_keeps_current_image() {
    let mut pipeline = setup();

    pipeline.load_image("./image.jpg").send_to_canvas().send_to_canvas();
    submit(&mut pipeline).unwrap();

    let executor = pipeline.executor();
    assert_eq!(executor.sources.len(), 1);
    assert_eq!(executor.draws.len(), 2);
    assert!(executor.draws.iter().all(|draw| draw.output.is_none()));
    assert_eq!(pipeline.current_image().label, "./image.jpg");
}

/// programs sampling `uTexelSize` get the input texel size unless the caller sets it
#[test]
fn texel_size_is_supplied() {
    let mut pipeline = setup();

    pipeline
        .add_dependency(
            "uniform vec2 uTexelSize;
export float right_neighbor() { return texture2D(uTexture, vUV + vec2(uTexelSize.x, 0.0)).r; }",
        )
        .load_image("./lego.png")
        .execute_program("right_neighbor", Uniforms::new().float("uStrength", 2.0))
        .execute_program("right_neighbor", Uniforms::new().vec2(UNIFORM_TEXEL_SIZE, [0.5, 0.5]))
        .execute_program("pass", Uniforms::new());
    submit(&mut pipeline).unwrap();

    let draws = &pipeline.executor().draws;
    assert_eq!(draws[0].uniforms.get("uStrength"), Some(Uniform::Float(2.0)));
    assert_eq!(
        draws[0].uniforms.get(UNIFORM_TEXEL_SIZE),
        Some(Uniform::Vec2([1.0 / 64.0, 1.0 / 32.0]))
    );
    assert_eq!(draws[1].uniforms.get(UNIFORM_TEXEL_SIZE), Some(Uniform::Vec2([0.5, 0.5])));
    assert!(!draws[2].uniforms.contains(UNIFORM_TEXEL_SIZE));
}

#[test]
fn load_image_failure() {
    let mut pipeline = setup();

    pipeline.load_image("./missing.png").send_to_canvas();
    assert_eq!(
        submit(&mut pipeline),
        Err(PipelineError::Backend(BackendError::Decode {
            locator: "./missing.png".into(),
            reason: "not found".into(),
        }))
    );
    assert!(pipeline.executor().draws.is_empty());
}

#[test]
fn empty_submit_is_noop() {
    let mut pipeline = setup();

    submit(&mut pipeline).unwrap();
    assert!(pipeline.executor().draws.is_empty());
    assert_eq!(pipeline.executor().targets, 1);
}

/// the synchronous state can be driven directly
#[test]
fn pipeline_state_directly() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut state = Pipeline::new(
        RecordingExecutor::default(),
        FixedDecoder::default().with("./lego.png", [64, 32]),
        PipelineOptions::new(Size::new(8, 8)),
    )
    .unwrap();

    assert_eq!(state.add_dependency("export vec3 tint() { return vec3(1.0, 0.5, 0.0); }").unwrap(), "tint");
    assert!(matches!(
        state.add_dependency("vec3 untagged() { return vec3(0.0); }"),
        Err(PipelineError::Forge(ForgeError::MissingExport { .. }))
    ));

    pollster::block_on(state.load_image("./lego.png")).unwrap();
    state.execute_program("tint", &Uniforms::new()).unwrap();

    assert_eq!(state.current_image().size(), Size::new(8, 8));
    assert_eq!(state.size(), Size::new(8, 8));
    assert_eq!(state.options().size, state.size());
    assert!(state.executor().sources[0].contains("vec3 v = tint();\n\tgl_FragColor = vec4(v, 1.0);"));
    assert!(!state.executor().sources[0].contains("uniform sampler2D"));
}

#[test]
fn execute_failure_keeps_compiled_program() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut state = Pipeline::new(
        RecordingExecutor::default(),
        FixedDecoder::default(),
        PipelineOptions::new(Size::new(4, 4)),
    )
    .unwrap();

    let result = state.execute_program("pass", &Uniforms::new().float("uFail", 1.0));
    assert!(matches!(result, Err(PipelineError::Backend(BackendError::Execute(_)))));

    // compiled once, current image still the initial target
    assert!(state.cached_program("pass").is_some());
    assert_eq!(state.executor().sources.len(), 1);
    assert_eq!(state.current_image().label, "target#1");

    state.execute_program("pass", &Uniforms::new()).unwrap();
    assert_eq!(state.executor().sources.len(), 1);
    assert_eq!(state.current_image().label, "target#3");
}
