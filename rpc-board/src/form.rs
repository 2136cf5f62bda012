//! Mounted procedure forms
//!
//! Mounting walks a [`ParsedType`] with [`describe_field`], writing the
//! default of every leaf into an [`InputStore`]. Objects write nothing and
//! mount their children; a field that cannot be described becomes a
//! [`MountedField::Failed`] node so its siblings still mount. Unmounting
//! deletes exactly the leaf paths that were written.

use crate::error::{BoardError, BoardResult};
use crate::field::{describe_field, FieldDescriptor};
use crate::parsed_type::ParsedType;
use crate::store::{InputStore, ListenerId, SessionId, StoreState};
use crate::value::InputValue;
use serde_json::{Map, Value};

/// One node of a mounted form.
#[derive(Debug, Clone, PartialEq)]
pub enum MountedField {
    /// A field holding a value in the store
    Leaf(FieldDescriptor),
    /// A record whose children are mounted in declaration order
    Object {
        descriptor: FieldDescriptor,
        children: Vec<(String, MountedField)>,
    },
    /// A field whose type has no input
    Failed { path: String, error: BoardError },
}

impl MountedField {
    /// The dotted path of this node.
    pub fn path(&self) -> &str {
        match self {
            Self::Leaf(descriptor) | Self::Object { descriptor, .. } => &descriptor.path,
            Self::Failed { path, .. } => path,
        }
    }

    /// The descriptor, unless the field failed.
    pub fn descriptor(&self) -> Option<&FieldDescriptor> {
        match self {
            Self::Leaf(descriptor) | Self::Object { descriptor, .. } => Some(descriptor),
            Self::Failed { .. } => None,
        }
    }

    /// This node and all descendants, parents first.
    pub fn walk(&self) -> Vec<&MountedField> {
        let mut out = vec![self];
        if let Self::Object { children, .. } = self {
            for (_, child) in children {
                out.extend(child.walk());
            }
        }
        out
    }

    /// Paths of every mounted leaf, in mount order.
    pub fn leaf_paths(&self) -> Vec<&str> {
        self.walk()
            .into_iter()
            .filter_map(|field| match field {
                Self::Leaf(descriptor) => Some(descriptor.path.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every failed node.
    pub fn failures(&self) -> Vec<&BoardError> {
        self.walk()
            .into_iter()
            .filter_map(|field| match field {
                Self::Failed { error, .. } => Some(error),
                _ => None,
            })
            .collect()
    }

    /// Find a node by its full dotted path.
    pub fn find(&self, path: &str) -> Option<&MountedField> {
        self.walk().into_iter().find(|field| field.path() == path)
    }

    /// Assemble this node's value from the store.
    ///
    /// Returns `None` for `undefined` leaves and failed fields so that the
    /// parent record omits them.
    fn payload(&self, state: &StoreState) -> Option<Value> {
        match self {
            Self::Leaf(descriptor) => match state.get(&descriptor.path).map(|e| &e.value) {
                None | Some(InputValue::Undefined) => None,
                Some(value) => Some(value.to_json()),
            },
            Self::Object { children, .. } => {
                let mut record = Map::new();
                for (name, child) in children {
                    if let Some(value) = child.payload(state) {
                        record.insert(name.clone(), value);
                    }
                }
                Some(Value::Object(record))
            }
            Self::Failed { .. } => None,
        }
    }
}

/// Mount the field `parsed` at `path`, writing leaf defaults into `store`.
///
/// Only store errors are returned; shape errors become `Failed` nodes.
pub fn mount_field(
    parsed: &ParsedType,
    path: &str,
    is_root: bool,
    store: &mut InputStore,
) -> BoardResult<MountedField> {
    let descriptor = match describe_field(parsed, path, is_root) {
        Ok(descriptor) => descriptor,
        Err(error) => {
            tracing::trace!(path = %path, error = %error, "field failed to mount");
            return Ok(MountedField::Failed {
                path: path.to_string(),
                error,
            });
        }
    };

    if descriptor.is_leaf() {
        store.set_input(path, descriptor.default_value.clone())?;
        tracing::trace!(path = %path, kind = %descriptor.classification, "leaf mounted");
        return Ok(MountedField::Leaf(descriptor));
    }

    let mut children = Vec::with_capacity(descriptor.children.len());
    for child in &descriptor.children {
        let mounted = mount_field(&child.parsed_type, &child.path, false, store)?;
        children.push((child.name.clone(), mounted));
    }
    tracing::trace!(path = %path, children = children.len(), "object mounted");
    Ok(MountedField::Object {
        descriptor,
        children,
    })
}

/// Delete every leaf path `field` wrote.
pub fn unmount(field: &MountedField, store: &mut InputStore) -> BoardResult<()> {
    for path in field.leaf_paths() {
        store.delete_input(path)?;
        tracing::trace!(path = %path, "leaf unmounted");
    }
    Ok(())
}

/// A procedure input form bound to its own input store session.
///
/// # Example
/// ```rust,ignore
/// let mut form = ProcedureForm::open(&procedure.input_type, "root")?;
/// form.set_value("root.a", InputValue::from(3.0))?;
/// let payload = form.payload()?;
/// form.unmount()?;
/// ```
#[derive(Debug)]
pub struct ProcedureForm {
    root: MountedField,
    store: InputStore,
}

impl ProcedureForm {
    /// Open a session and mount `input_type` as the root field at `root_path`.
    pub fn open(input_type: &ParsedType, root_path: &str) -> BoardResult<Self> {
        let mut store = InputStore::new();
        let root = mount_field(input_type, root_path, true, &mut store)?;
        tracing::debug!(
            session = %store.session(),
            leaves = store.len(),
            failures = root.failures().len(),
            "procedure form opened"
        );
        Ok(Self { root, store })
    }

    /// The session backing this form.
    pub fn session(&self) -> SessionId {
        self.store.session()
    }

    /// The mounted field tree.
    pub fn root(&self) -> &MountedField {
        &self.root
    }

    /// Read-only access to the input store.
    pub fn store(&self) -> &InputStore {
        &self.store
    }

    /// Register a store listener for this session.
    pub fn subscribe<F>(&mut self, listener: F) -> BoardResult<ListenerId>
    where
        F: FnMut(&StoreState) + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Current value of a leaf.
    pub fn value(&self, path: &str) -> BoardResult<Option<&InputValue>> {
        self.store.get(path)
    }

    fn leaf(&self, path: &str) -> BoardResult<&FieldDescriptor> {
        match self.root.find(path) {
            Some(MountedField::Leaf(descriptor)) => Ok(descriptor),
            _ => Err(BoardError::store_misuse(format!(
                "'{}' is not a mounted input",
                path
            ))
            .with_path(path)),
        }
    }

    /// Edit a leaf. The value must fit the leaf's classification.
    pub fn set_value(&mut self, path: &str, value: InputValue) -> BoardResult<()> {
        let descriptor = self.leaf(path)?;
        if !descriptor.classification.accepts(&value) {
            return Err(BoardError::invalid_value(
                path,
                format!(
                    "{} value does not fit field of type {}",
                    value.kind(),
                    descriptor.classification
                ),
            ));
        }
        self.store.set_input(path, value)
    }

    /// Reset an optional leaf to its absence value.
    pub fn clear_value(&mut self, path: &str) -> BoardResult<()> {
        let descriptor = self.leaf(path)?;
        let cleared = descriptor.classification.clear_value().ok_or_else(|| {
            BoardError::invalid_value(
                path,
                format!("field of type {} cannot be cleared", descriptor.classification),
            )
        })?;
        self.store.set_input(path, cleared)
    }

    /// The input as nested JSON, `undefined` leaves omitted.
    pub fn payload(&self) -> BoardResult<Value> {
        let state = self.store.state()?;
        Ok(self.root.payload(state).unwrap_or(Value::Null))
    }

    /// Unmount every field and close the session.
    pub fn unmount(mut self) -> BoardResult<()> {
        unmount(&self.root, &mut self.store)?;
        let session = self.store.session();
        self.store.close()?;
        tracing::debug!(session = %session, "procedure form closed");
        Ok(())
    }
}
