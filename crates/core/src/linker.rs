use crate::{ForgeError, Module, Registry, Result};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Visiting,
    Resolved,
}

/// Resolve every module reachable from `entry` in dependency order.
///
/// Imports are visited depth first in declaration order and each module is placed once, after all of its own imports,
/// so that every module precedes the modules that import it. A module shared by several importers stays at the
/// position where it was first reached. The traversal keeps its own stack, so import depth is bounded by memory only.
///
/// #### Error Conditions
/// - If a module (or `entry` itself) is not registered [`ForgeError::UnresolvedImport`] is returned.
/// - If a module can reach itself through its imports [`ForgeError::CircularDependency`] is returned.
pub fn build<'a>(registry: &'a Registry, entry: &str) -> Result<Vec<&'a Module>> {
    let mut marks = HashMap::<&'a str, Mark>::new();
    let mut order = Vec::new();

    let root = resolve(registry, entry, None)?;
    marks.insert(root.export_name(), Mark::Visiting);

    // (module, index of the next import to visit)
    let mut stack: Vec<(&'a Module, usize)> = vec![(root, 0)];

    while let Some((module, next)) = stack.last_mut() {
        let module = *module;
        let Some(import) = module.imports().get(*next) else {
            marks.insert(module.export_name(), Mark::Resolved);
            order.push(module);
            stack.pop();
            continue;
        };
        *next += 1;

        let dependency = resolve(registry, import, Some(module))?;
        match marks.get(dependency.export_name()) {
            Some(Mark::Resolved) => {}
            Some(Mark::Visiting) => {
                return Err(ForgeError::CircularDependency {
                    module: dependency.export_name().to_owned(),
                });
            }
            None => {
                marks.insert(dependency.export_name(), Mark::Visiting);
                stack.push((dependency, 0));
            }
        }
    }

    Ok(order)
}

fn resolve<'a>(registry: &'a Registry, name: &str, parent: Option<&Module>) -> Result<&'a Module> {
    registry.get(name).ok_or_else(|| ForgeError::UnresolvedImport {
        name: name.to_owned(),
        requested_by: parent.map(|parent| parent.export_name().to_owned()),
    })
}
