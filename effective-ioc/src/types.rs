//! Type references and generic specialization
//!
//! A [`TypeRef`] names a type the container can be asked for. Generic types
//! are modelled explicitly instead of through a host generics API:
//!
//! - `Named("Logger")` is a plain, non-generic type
//! - `Generic { definition: "List", args: [Named("i32")] }` is the closed
//!   type `List<i32>`
//! - `Generic { definition: "List", args: [Param(0)] }` is the open
//!   definition `List<>`
//!
//! Textual identifiers (`List<i32>`, `List<>`, `Map<,>`) parse into the same
//! representation and are what configuration sources use.

use crate::error::{DiError, DiResult};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Reference to a closed, open or non-generic type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    /// A non-generic type
    Named(Arc<str>),
    /// A generic type with its argument list
    Generic {
        /// Name of the generic definition
        definition: Arc<str>,
        /// Type arguments; any `Param` (at any depth) makes the type open
        args: Vec<TypeRef>,
    },
    /// Unbound generic parameter slot
    Param(usize),
}

impl TypeRef {
    /// Create a non-generic type reference
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Create a generic type reference with the given arguments
    pub fn generic(definition: impl Into<Arc<str>>, args: Vec<TypeRef>) -> Self {
        TypeRef::Generic {
            definition: definition.into(),
            args,
        }
    }

    /// Create the open definition of a generic type with `arity` parameters
    pub fn open(definition: impl Into<Arc<str>>, arity: usize) -> Self {
        TypeRef::Generic {
            definition: definition.into(),
            args: (0..arity).map(TypeRef::Param).collect(),
        }
    }

    /// Create a parameter slot
    pub fn param(index: usize) -> Self {
        TypeRef::Param(index)
    }

    /// Name of the (generic) definition, `None` for a parameter slot
    pub fn definition_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name.as_ref()),
            TypeRef::Generic { definition, .. } => Some(definition.as_ref()),
            TypeRef::Param(_) => None,
        }
    }

    /// Number of generic parameters of this type's definition
    pub fn arity(&self) -> usize {
        match self {
            TypeRef::Generic { args, .. } => args.len(),
            _ => 0,
        }
    }

    /// Whether this is a generic type (open or closed)
    pub fn is_generic(&self) -> bool {
        matches!(self, TypeRef::Generic { .. })
    }

    /// Whether any unbound parameter slot occurs in this type
    pub fn contains_generic_parameters(&self) -> bool {
        match self {
            TypeRef::Named(_) => false,
            TypeRef::Param(_) => true,
            TypeRef::Generic { args, .. } => args.iter().any(TypeRef::contains_generic_parameters),
        }
    }

    /// Whether every type parameter is bound
    pub fn is_closed(&self) -> bool {
        !self.contains_generic_parameters()
    }

    /// Whether this is a closed generic type such as `List<i32>`
    pub fn is_closed_generic(&self) -> bool {
        self.is_generic() && self.is_closed()
    }

    /// The open definition of a generic type (`List<i32>` gives `List<>`)
    pub fn generic_definition(&self) -> Option<TypeRef> {
        match self {
            TypeRef::Generic { definition, args } => {
                Some(TypeRef::open(Arc::clone(definition), args.len()))
            }
            _ => None,
        }
    }

    /// Type arguments of a generic type, empty otherwise
    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Generic { args, .. } => args,
            _ => &[],
        }
    }

    /// Substitute parameter slots with `args`.
    ///
    /// Slots without a matching argument stay unbound.
    pub fn specialize(&self, args: &[TypeRef]) -> TypeRef {
        match self {
            TypeRef::Named(_) => self.clone(),
            TypeRef::Param(index) => args.get(*index).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Generic {
                definition,
                args: own,
            } => TypeRef::Generic {
                definition: Arc::clone(definition),
                args: own.iter().map(|arg| arg.specialize(args)).collect(),
            },
        }
    }

    /// Every definition name in this type is non-empty
    pub fn is_well_formed(&self) -> bool {
        match self {
            TypeRef::Named(name) => !name.trim().is_empty(),
            TypeRef::Param(_) => true,
            TypeRef::Generic { definition, args } => {
                !definition.trim().is_empty()
                    && !args.is_empty()
                    && args.iter().all(TypeRef::is_well_formed)
            }
        }
    }

    /// Whether the arguments are exactly the slots `0..n` in order
    fn is_definition(&self) -> bool {
        match self {
            TypeRef::Generic { args, .. } => args
                .iter()
                .enumerate()
                .all(|(i, arg)| *arg == TypeRef::Param(i)),
            _ => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::Param(index) => write!(f, "T{}", index),
            TypeRef::Generic { definition, args } if self.is_definition() => {
                write!(f, "{}<{}>", definition, ",".repeat(args.len().saturating_sub(1)))
            }
            TypeRef::Generic { definition, args } => {
                let args_str = args
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}<{}>", definition, args_str)
            }
        }
    }
}

impl FromStr for TypeRef {
    type Err = DiError;

    fn from_str(s: &str) -> DiResult<Self> {
        let mut parser = IdentifierParser { input: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }
}

/// Recursive-descent parser for type identifiers
struct IdentifierParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> IdentifierParser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, reason: &str) -> DiError {
        DiError::invalid_argument(
            "type identifier",
            format!("{} at offset {} in `{}`", reason, self.pos, self.input),
        )
    }

    fn parse_type(&mut self) -> DiResult<TypeRef> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '<' | '>' | ',') || c.is_whitespace() {
                break;
            }
            self.bump();
        }
        let name = &self.input[start..self.pos];
        if name.is_empty() {
            return Err(self.error("expected a type name"));
        }

        self.skip_whitespace();
        if self.peek() != Some('<') {
            return Ok(TypeRef::named(name));
        }
        self.bump();

        // `None` marks an empty (unbound) slot as in `Map<,>`
        let mut slots: Vec<Option<TypeRef>> = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') | Some('>') => slots.push(None),
                Some(_) => slots.push(Some(self.parse_type()?)),
                None => return Err(self.error("unterminated argument list")),
            }
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('>') => break,
                _ => return Err(self.error("expected `,` or `>`")),
            }
        }

        if slots.iter().all(Option::is_none) {
            Ok(TypeRef::open(name, slots.len()))
        } else if slots.iter().all(Option::is_some) {
            Ok(TypeRef::generic(name, slots.into_iter().flatten().collect()))
        } else {
            Err(self.error("cannot mix bound and unbound type arguments"))
        }
    }
}
