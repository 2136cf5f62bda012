//! The board: an operation tree, its expansion state and open forms.

use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::form::ProcedureForm;
use crate::render::{render_tree, Frame};
use crate::tree::TreeData;
use crate::visibility::VisibilityStore;
use indexmap::IndexMap;

/// Owns one [`TreeData`], one [`VisibilityStore`] and one
/// [`ProcedureForm`] per shown procedure.
///
/// A procedure is shown while it and every router above it are expanded.
///
/// Paths are rooted: `root.greeting`, `root.r.nested`.
#[derive(Debug)]
pub struct Board {
    config: BoardConfig,
    tree: TreeData,
    visibility: VisibilityStore,
    forms: IndexMap<String, ProcedureForm>,
}

impl Board {
    /// Create a board and open the forms of initially shown procedures.
    pub fn new(tree: TreeData, config: BoardConfig) -> BoardResult<Self> {
        config.validate()?;
        tree.validate()?;
        let visibility = VisibilityStore::new(config.initial_expanded.as_deref());
        let mut board = Self {
            config,
            tree,
            visibility,
            forms: IndexMap::new(),
        };
        board.sync_forms()?;
        tracing::debug!(forms = board.forms.len(), "board created");
        Ok(board)
    }

    /// The configuration in use.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The operation tree.
    pub fn tree(&self) -> &TreeData {
        &self.tree
    }

    /// The expansion state.
    pub fn visibility(&self) -> &VisibilityStore {
        &self.visibility
    }

    /// Rooted paths of every procedure, in display order.
    pub fn procedure_paths(&self) -> Vec<String> {
        self.tree
            .procedures()
            .into_iter()
            .map(|(path, _)| self.rooted(&path))
            .collect()
    }

    /// Current frames.
    pub fn frames(&self) -> Vec<Frame<'_>> {
        render_tree(&self.tree, &self.visibility, &self.config)
    }

    /// The open form of the procedure at `path`.
    pub fn form(&self, path: &str) -> Option<&ProcedureForm> {
        self.forms.get(path)
    }

    /// Mutable access to the open form of the procedure at `path`.
    pub fn form_mut(&mut self, path: &str) -> Option<&mut ProcedureForm> {
        self.forms.get_mut(path)
    }

    /// Paths of open forms, in opening order.
    pub fn open_forms(&self) -> Vec<&str> {
        self.forms.keys().map(String::as_str).collect()
    }

    /// Flip the node at `path` and return its new state.
    ///
    /// A procedure that becomes shown gets a fresh form session; one that
    /// stops being shown, itself or through a collapsed router above it, has
    /// its form unmounted and its session closed.
    pub fn toggle(&mut self, path: &str) -> BoardResult<bool> {
        self.node(path)?;
        let open = self.visibility.toggle(path);
        self.sync_forms()?;
        Ok(open)
    }

    /// Returns true if `path` and all of its ancestors below the root are
    /// expanded.
    pub fn is_shown(&self, path: &str) -> bool {
        let root = self.config.root_path.as_str();
        let mut current = path;
        loop {
            if !self.visibility.is_open(current) {
                return false;
            }
            match current.rsplit_once('.') {
                Some((parent, _)) if parent != root => current = parent,
                _ => return true,
            }
        }
    }

    fn sync_forms(&mut self) -> BoardResult<()> {
        let wanted: Vec<String> = self
            .procedure_paths()
            .into_iter()
            .filter(|path| self.is_shown(path))
            .collect();
        let stale: Vec<String> = self
            .forms
            .keys()
            .filter(|path| !wanted.contains(path))
            .cloned()
            .collect();
        for path in stale {
            if let Some(form) = self.forms.shift_remove(&path) {
                tracing::debug!(path = %path, "form hidden, unmounting");
                form.unmount()?;
            }
        }
        for path in wanted {
            if !self.forms.contains_key(&path) {
                self.open_form(&path)?;
            }
        }
        Ok(())
    }

    /// Unmount every open form and close their sessions.
    pub fn close(mut self) -> BoardResult<()> {
        for (_, form) in self.forms.drain(..) {
            form.unmount()?;
        }
        Ok(())
    }

    fn open_form(&mut self, path: &str) -> BoardResult<()> {
        let relative = self.relative(path)?;
        let procedure = self.tree.find_procedure(relative)?;
        let form = ProcedureForm::open(&procedure.input_type, &self.config.root_path)?;
        tracing::debug!(path = %path, session = %form.session(), "form opened");
        if let Some(previous) = self.forms.insert(path.to_string(), form) {
            previous.unmount()?;
        }
        Ok(())
    }

    fn node(&self, path: &str) -> BoardResult<&TreeData> {
        let relative = self.relative(path)?;
        self.tree
            .find(relative)
            .ok_or_else(|| BoardError::not_found(path))
    }

    fn relative<'p>(&self, path: &'p str) -> BoardResult<&'p str> {
        let root = self.config.root_path.as_str();
        if path == root {
            return Ok("");
        }
        path.strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('.'))
            .ok_or_else(|| BoardError::not_found(path))
    }

    fn rooted(&self, relative: &str) -> String {
        crate::resolver::join_path(&self.config.root_path, relative)
    }
}
