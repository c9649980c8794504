use crate::codegen::banner;
use thiserror::Error;

/// Errors produced while registering, linking or generating shader modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForgeError {
    /// The registered text has no `export` directive.
    #[error("{}", missing_export_report(.text))]
    MissingExport { text: String },

    /// A module imports a name that is not registered.
    ///
    /// `requested_by` is `None` when the requested entry point itself is missing.
    #[error("{}", unresolved_import_report(.name, .requested_by))]
    UnresolvedImport {
        name: String,
        requested_by: Option<String>,
    },

    /// Adding `module` to the build would close a dependency cycle.
    #[error("adding \"{module}\" would cause a circular dependency")]
    CircularDependency { module: String },

    /// The entry point returns a type that can't be written to the output color.
    #[error("export \"{export}\" returns `{ty}`, which has no output conversion")]
    UnsupportedExportType { export: String, ty: String },
}

pub type Result<T> = std::result::Result<T, ForgeError>;

fn missing_export_report(text: &str) -> String {
    let width = text.lines().map(str::len).max().unwrap_or(0).max(20) + 4;
    format!(
        "the following program does not have an export available:\n{}\n{}\n{}",
        banner("Program", width),
        text,
        banner("", width)
    )
}

fn unresolved_import_report(name: &str, requested_by: &Option<String>) -> String {
    match requested_by {
        Some(module) => format!("the module \"{module}\" is expecting \"{name}\" which does not exist"),
        None => format!("the entry point \"{name}\" does not exist"),
    }
}
