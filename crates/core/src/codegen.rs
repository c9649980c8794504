use crate::{ExportType, ForgeError, Module, Result, UNIFORM_TEXTURE, VARYING_UV};
use std::fmt::{Display, Write};

const BANNER_MIN_WIDTH: usize = 20;
const BANNER_MARGIN: usize = 4;
const LISTING_NUMBER_WIDTH: usize = 5;

/// Floating point precision of the generated fragment program.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum Precision {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub precision: Precision,
}

impl Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Low => "lowp",
            Self::Medium => "mediump",
            Self::High => "highp",
        })
    }
}

/// Render an ordered list of modules into a complete fragment program.
///
/// `modules` must already be in dependency order (see [`build`](crate::build)), every module is emitted
/// below its dependencies. The generated `main` calls `entry()` and converts its `entry_type` result into `gl_FragColor`.
///
/// #### Error Conditions
/// - If `entry_type` is not one of `float`, `vec2`, `vec3` or `vec4` [`ForgeError::UnsupportedExportType`] is returned.
pub fn render(modules: &[&Module], entry: &str, entry_type: &str, options: &GeneratorOptions) -> Result<String> {
    let call = match ExportType::parse(entry_type) {
        Some(ExportType::Float) => format!("\tfloat v = {entry}();\n\tgl_FragColor = vec4(v, v, v, 1.0);"),
        Some(ExportType::Vec2) => format!("\tvec2 v = {entry}();\n\tgl_FragColor = vec4(v, 0.0, 1.0);"),
        Some(ExportType::Vec3) => format!("\tvec3 v = {entry}();\n\tgl_FragColor = vec4(v, 1.0);"),
        Some(ExportType::Vec4) => format!("\tgl_FragColor = {entry}();"),
        None => {
            return Err(ForgeError::UnsupportedExportType {
                export: entry.to_owned(),
                ty: entry_type.to_owned(),
            });
        }
    };

    let mut buffer = String::new();
    writeln!(&mut buffer, "precision {} float;", options.precision).ok();
    writeln!(&mut buffer, "varying vec2 {};", VARYING_UV).ok();

    if modules.iter().any(|module| module.body().contains(UNIFORM_TEXTURE)) {
        writeln!(&mut buffer, "uniform sampler2D {};", UNIFORM_TEXTURE).ok();
    }

    let width = banner_width(modules);
    for module in modules {
        writeln!(&mut buffer).ok();
        writeln!(&mut buffer, "{}", banner(module.export_name(), width)).ok();
        writeln!(&mut buffer, "{}", module.body()).ok();
    }

    write!(&mut buffer, "\nvoid main() {{\n{}\n}}\n", call).ok();
    Ok(buffer)
}

/// Width of the banners emitted above each module of a program.
pub fn banner_width(modules: &[&Module]) -> usize {
    modules
        .iter()
        .map(|module| module.export_name().len())
        .max()
        .unwrap_or(0)
        .max(BANNER_MIN_WIDTH)
        + BANNER_MARGIN
}

/// A `/*--- name ---*/` comment centering `name` within `width` columns.
///
/// When the padding can't be split evenly the extra dash goes to the left side.
pub fn banner(name: &str, width: usize) -> String {
    let padding = width.saturating_sub(name.len());
    let spacing = "-".repeat(padding / 2);
    let separator = if padding % 2 == 0 { " " } else { "- " };

    format!("/*{spacing}{separator}{name} {spacing}*/")
}

/// Prefix every line of `source` with its right-aligned line number.
pub fn numbered_listing(source: &str) -> String {
    let mut buffer = String::new();
    for (i, line) in source.lines().enumerate() {
        writeln!(&mut buffer, "{:>width$}: {}", i + 1, line, width = LISTING_NUMBER_WIDTH).ok();
    }
    buffer
}
