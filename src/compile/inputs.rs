use crate::graph::command::Command;
use std::collections::HashMap;

/// Path-keyed input deduplication for one compilation pass.
///
/// The first sighting of a path appends an [`Input`](crate::Input) and takes the next index; later
/// sightings reuse that index, so every distinct file is opened exactly once.
#[derive(Debug, Default)]
pub(crate) struct InputRegistry {
    indices: HashMap<String, usize>,
    next: usize,
}

impl InputRegistry {
    /// Input index for `path`, appending it to `cmd` with `options()` on first use.
    pub(crate) fn register<F>(&mut self, cmd: &mut Command, path: &str, options: F) -> usize
    where
        F: FnOnce() -> Vec<String>,
    {
        if let Some(&idx) = self.indices.get(path) {
            return idx;
        }
        let idx = self.next;
        cmd.add_input(path, options());
        self.indices.insert(path.to_string(), idx);
        self.next += 1;
        idx
    }

    /// Number of distinct inputs registered so far.
    pub(crate) fn len(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/inputs.rs"]
mod tests;
