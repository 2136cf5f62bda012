//! Type descriptor resolution
//!
//! Turns a [`StructuralType`] node into a [`ParsedType`]. The rules are tried
//! in a fixed order and the first match wins:
//!
//! 1. primitive or literal (terminal at any depth)
//! 2. depth bound, yielding the `unknown` sentinel
//! 3. union, each constituent one level deeper
//! 4. opaque wrapper name, yielding `Date`
//! 5. first index signature
//! 6. any other non-object node, yielding `unknown` named by its kind
//! 7. object, optional properties widened with `undefined`
//!
//! Recoverable conditions are logged and kept as diagnostics on the
//! [`Resolver`]; everything else is returned as an error carrying the dotted
//! path from the resolution root.

use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::graph::{LiteralKind, Primitive, StructuralType};
use crate::parsed_type::{BigIntText, ParsedType};
use indexmap::IndexMap;

/// Resolves structural types against a [`BoardConfig`].
#[derive(Debug)]
pub struct Resolver<'c> {
    config: &'c BoardConfig,
    diagnostics: Vec<BoardError>,
}

impl<'c> Resolver<'c> {
    /// Create a resolver.
    pub fn new(config: &'c BoardConfig) -> Self {
        Self {
            config,
            diagnostics: Vec::new(),
        }
    }

    /// Recoverable conditions seen so far.
    pub fn diagnostics(&self) -> &[BoardError] {
        &self.diagnostics
    }

    /// Drain the recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<BoardError> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn record(&mut self, diagnostic: BoardError) {
        self.diagnostics.push(diagnostic);
    }

    /// Resolve `ty` at depth 0. `path` names the resolution root in errors.
    pub fn resolve<T: StructuralType>(&mut self, ty: T, path: &str) -> BoardResult<ParsedType> {
        self.resolve_at(ty, 0, path)
    }

    /// Resolve `ty` as if it were nested `depth` levels deep.
    pub fn resolve_at<T: StructuralType>(
        &mut self,
        ty: T,
        depth: usize,
        path: &str,
    ) -> BoardResult<ParsedType> {
        if let Some(primitive) = ty.primitive() {
            return Ok(resolve_primitive(primitive));
        }

        if let Some(literal) = ty.literal() {
            return resolve_literal(literal, path);
        }

        let max_depth = self.config.effective_max_depth();
        if depth > max_depth {
            let kind = ty.kind_name();
            tracing::warn!(
                path = %path,
                kind = %kind,
                max_depth,
                "type nesting exceeds max depth, emitting unknown"
            );
            self.record(BoardError::depth_exceeded(path, max_depth).with_tag(&kind));
            return Ok(ParsedType::Unknown { kind });
        }

        if let Some(members) = ty.union_members() {
            if members.is_empty() {
                return Err(BoardError::unsupported_shape(
                    path,
                    "union",
                    "union has no constituents",
                ));
            }
            let options = members
                .into_iter()
                .map(|member| self.resolve_at(member, depth + 1, path))
                .collect::<BoardResult<Vec<_>>>()?;
            return Ok(ParsedType::Union { options });
        }

        if ty.symbol_name().is_some_and(|name| self.config.is_opaque(name)) {
            return Ok(ParsedType::Date);
        }

        let signatures = ty.index_signatures();
        if let Some((key, value)) = signatures.first().copied() {
            if signatures.len() > 1 {
                tracing::warn!(
                    path = %path,
                    count = signatures.len(),
                    "multiple index signatures, using the first"
                );
            }
            let index_type = self.resolve_at(key, depth + 1, path)?;
            let indexed_type = self.resolve_at(value, depth + 1, path)?;
            return Ok(ParsedType::index(index_type, indexed_type));
        }

        if !ty.is_object() {
            let kind = ty.kind_name();
            tracing::warn!(path = %path, kind = %kind, "unrecognized named type, emitting unknown");
            self.record(BoardError::unsupported_shape(
                path,
                &kind,
                format!("'{}' is neither an object nor a configured opaque type", kind),
            ));
            return Ok(ParsedType::Unknown { kind });
        }

        let mut properties = IndexMap::new();
        for member in ty.properties() {
            let child_path = join_path(path, &member.name);
            let resolved = self.resolve_at(member.ty, depth + 1, &child_path)?;
            let resolved = if member.optional {
                widen_optional(resolved)
            } else {
                resolved
            };
            properties.insert(member.name, resolved);
        }
        Ok(ParsedType::Object { properties })
    }
}

/// Resolve `ty` with a throwaway resolver.
///
/// # Example
/// ```rust,ignore
/// let graph = TypeGraph::from_json(&text)?;
/// let parsed = resolve(graph.root_ref()?, &BoardConfig::default())?;
/// ```
pub fn resolve<T: StructuralType>(ty: T, config: &BoardConfig) -> BoardResult<ParsedType> {
    Resolver::new(config).resolve(ty, "")
}

fn resolve_primitive(primitive: Primitive) -> ParsedType {
    match primitive {
        Primitive::String => ParsedType::String,
        Primitive::Number => ParsedType::Number,
        Primitive::BigInt => ParsedType::BigInt,
        Primitive::Boolean => ParsedType::Boolean,
        Primitive::Undefined => ParsedType::Undefined,
        Primitive::Void => ParsedType::Void,
        Primitive::Null => ParsedType::Null,
    }
}

fn resolve_literal(literal: LiteralKind<'_>, path: &str) -> BoardResult<ParsedType> {
    match literal {
        LiteralKind::String(value) => Ok(ParsedType::string_literal(value)),
        LiteralKind::Number(value) => Ok(ParsedType::number_literal(value)),
        LiteralKind::Boolean(value) => Ok(ParsedType::boolean_literal(value)),
        LiteralKind::BigInt(text) => {
            // Still validated so the error says what was wrong with it.
            let detail = match BigIntText::parse(text) {
                Ok(value) => format!("bigint literal {}n is not supported", value),
                Err(e) => format!("bigint literal '{}' is not supported: {}", text, e),
            };
            Err(BoardError::unsupported_shape(path, "literal", detail))
        }
    }
}

/// Add `undefined` to the type of an optional property.
fn widen_optional(resolved: ParsedType) -> ParsedType {
    match resolved {
        ParsedType::Union { mut options } => {
            if !options.contains(&ParsedType::Undefined) {
                options.push(ParsedType::Undefined);
            }
            ParsedType::Union { options }
        }
        ParsedType::Undefined => ParsedType::Undefined,
        other => ParsedType::union([other, ParsedType::Undefined]),
    }
}

/// Join a dotted path with one more segment.
pub(crate) fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}
