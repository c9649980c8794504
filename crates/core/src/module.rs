use crate::{ForgeError, KEYWORD_EXPORT, KEYWORD_IMPORT, KEYWORD_OVERLOAD, Result};

/// A registered shader function unit.
///
/// A module is parsed from a snippet of shader source annotated with directives:
/// - `export <type> <name>(<args>) { ... }` declares the function other modules import (exactly one is required)
/// - `import <name>` declares a dependency on another module's export
/// - `overload <type> <name>(<args>) { ... }` adds an alternate signature to the same module
///
/// The body is kept as opaque text, only the directive keywords are stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    export_name: String,
    export_type: String,
    body: String,
    imports: Vec<String>,
}

/// Return types an entry point can have.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ExportType {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl Module {
    /// Parse a module from annotated shader source.
    ///
    /// #### Error Conditions
    /// - If the source has no `export` directive [`ForgeError::MissingExport`] is returned.
    pub fn parse(source: &str) -> Result<Self> {
        let mut export = None;
        let mut imports = vec![];

        let mut lines = source
            .lines()
            .map(|raw| {
                let line = raw.trim();

                if let Some(decl) = line.strip_prefix(KEYWORD_EXPORT) {
                    let decl = decl.trim();
                    export = Some(parse_declaration(decl));
                    return decl;
                }

                if let Some(name) = line.strip_prefix(KEYWORD_IMPORT) {
                    imports.push(name.trim().to_owned());
                    return "";
                }

                if let Some(decl) = line.strip_prefix(KEYWORD_OVERLOAD) {
                    return decl.trim();
                }

                line
            })
            .collect::<Vec<_>>();

        let leading = lines.iter().take_while(|line| line.is_empty()).count();
        lines.drain(..leading);

        let Some((export_type, export_name)) = export else {
            return Err(ForgeError::MissingExport {
                text: source.to_owned(),
            });
        };

        Ok(Self {
            export_name,
            export_type,
            body: lines.join("\n"),
            imports,
        })
    }

    /// Name of the exported function, used as the registry key.
    pub fn export_name(&self) -> &str {
        &self.export_name
    }

    /// Return type of the exported function as written in the source.
    pub fn export_type(&self) -> &str {
        &self.export_type
    }

    /// Function source with directive lines removed.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Imported export names in declaration order.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }
}

/// Split `<type> <name>(<args>)...` into its type and name.
fn parse_declaration(decl: &str) -> (String, String) {
    let space = decl.find(' ').unwrap_or(decl.len());
    let paren = decl.find('(').unwrap_or(decl.len()).max(space);

    let ty = decl[..space].trim();
    let name = decl[space..paren].trim();
    (ty.to_owned(), name.to_owned())
}

impl ExportType {
    pub fn parse(ty: &str) -> Option<Self> {
        match ty {
            "float" => Some(Self::Float),
            "vec2" => Some(Self::Vec2),
            "vec3" => Some(Self::Vec3),
            "vec4" => Some(Self::Vec4),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
        }
    }
}
