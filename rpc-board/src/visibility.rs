//! Expansion state of the operation tree.

use std::collections::HashMap;

/// Per-path open/closed flags. Unknown paths are closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityStore {
    open: HashMap<String, bool>,
}

impl VisibilityStore {
    /// Create a store with `initial` (if any) open.
    pub fn new(initial: Option<&str>) -> Self {
        let mut open = HashMap::new();
        if let Some(path) = initial {
            open.insert(path.to_string(), true);
        }
        Self { open }
    }

    /// Returns true if `path` is expanded.
    pub fn is_open(&self, path: &str) -> bool {
        self.open.get(path).copied().unwrap_or(false)
    }

    /// Flip `path` and return its new state.
    pub fn toggle(&mut self, path: &str) -> bool {
        let next = !self.is_open(path);
        self.open.insert(path.to_string(), next);
        tracing::trace!(path = %path, open = next, "visibility toggled");
        next
    }

    /// Every expanded path, sorted.
    pub fn open_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .open
            .iter()
            .filter(|(_, open)| **open)
            .map(|(path, _)| path.as_str())
            .collect();
        paths.sort_unstable();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_path_open() {
        let vns = VisibilityStore::new(Some("root.greeting"));
        assert!(vns.is_open("root.greeting"));
        assert!(!vns.is_open("root.add"));
        assert!(!VisibilityStore::new(None).is_open("root.greeting"));
    }

    #[test]
    fn test_toggle_returns_new_state() {
        let mut vns = VisibilityStore::default();
        assert!(vns.toggle("root.r"));
        assert_eq!(vns.open_paths(), vec!["root.r"]);
        assert!(!vns.toggle("root.r"));
        assert!(vns.open_paths().is_empty());
    }
}
