use crate::{BUILTIN_LIBRARY, ForgeError, GeneratorOptions, Module, Result, build, render};
use std::collections::HashMap;

/// A set of shader modules keyed by their export name.
///
/// Every registry starts from a default module set, [`Registry::new`] uses the [`BUILTIN_LIBRARY`].
/// Registering a module under a name that is already taken replaces the old module.
#[derive(Clone, Debug)]
pub struct Registry {
    modules: HashMap<String, Module>,
}

impl Registry {
    /// Create a registry seeded with the built-in library.
    pub fn new() -> Self {
        Self::with_library(BUILTIN_LIBRARY).expect("built-in library is malformed")
    }

    /// Create a registry seeded with the given module sources, registered in order.
    pub fn with_library(library: &[&str]) -> Result<Self> {
        let mut registry = Self {
            modules: HashMap::new(),
        };

        for source in library {
            registry.register(source)?;
        }

        Ok(registry)
    }

    /// Parse and register a module, returning its export name.
    ///
    /// See [`Module::parse`] for the accepted directives.
    ///
    /// #### Error Conditions
    /// - If the source has no `export` directive [`ForgeError::MissingExport`] is returned.
    pub fn register(&mut self, source: &str) -> Result<String> {
        let module = Module::parse(source)?;
        let name = module.export_name().to_owned();

        if self.modules.insert(name.clone(), module).is_some() {
            log::debug!("replaced shader module `{}`", name);
        } else {
            log::debug!("registered shader module `{}`", name);
        }

        Ok(name)
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Every registered module, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> + '_ {
        self.modules.values()
    }

    /// Export names of every registered module, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.modules.keys().map(String::as_str)
    }

    /// Link `entry` with its dependencies and render the complete fragment program.
    ///
    /// #### Error Conditions
    /// - Any error of [`build`] or [`render`].
    pub fn generate(&self, entry: &str, options: &GeneratorOptions) -> Result<String> {
        let modules = build(self, entry)?;
        let entry_type = match modules.last() {
            Some(module) => module.export_type(),
            None => {
                return Err(ForgeError::UnresolvedImport {
                    name: entry.to_owned(),
                    requested_by: None,
                });
            }
        };

        render(&modules, entry, entry_type, options)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
