use std::collections::{HashSet, VecDeque};

use tracing::trace;

use super::{normalize_name, Reflector, TypeDescriptor};
use crate::error::Result;

/// Every type that contributes to `name`'s definition, `name` first.
///
/// Walks parents, interfaces (including the interfaces they extend) and
/// traits (including the traits they use) breadth-first. Each type appears
/// once, so cyclic or diamond-shaped hierarchies terminate. The order is
/// deterministic for a given registry but callers should not depend on it.
pub fn dependency_closure<'r, R: Reflector + ?Sized>(
    reflector: &'r R,
    name: &str,
) -> Result<Vec<&'r TypeDescriptor>> {
    let root = normalize_name(name);
    let mut closure = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    seen.insert(root);
    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        let ty = reflector.reflect(current)?;
        for dependency in ty.direct_dependencies() {
            if seen.insert(dependency) {
                queue.push_back(dependency);
            }
        }
        closure.push(ty);
    }

    trace!(root, size = closure.len(), "resolved dependency closure");
    Ok(closure)
}
