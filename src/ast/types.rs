//! Type system definitions for the typed AST.
//!
//! Types reach the backend already resolved by the type checker. Only the
//! scalar types have a storage representation; everything else is carried
//! through the data model so that unsupported constructs can be reported
//! precisely when lowering reaches them.

use std::fmt::Display;

/// A fully resolved static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Integer,
    Boolean,
    Floating,
    Void,
    String,
    Array(Box<Type>),
    /// A user declared record type, referenced by name.
    Custom(String),
}

impl Type {
    pub fn array_of(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Type::Custom(name.into())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// The scalar a value of this type is stored as.
    ///
    /// Anything without its own representation is stored as an integer.
    pub fn storage_kind(&self) -> ScalarKind {
        match self {
            Type::Boolean => ScalarKind::Boolean,
            Type::Floating => ScalarKind::Floating,
            _ => ScalarKind::Integer,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Integer => write!(f, "int"),
            Type::Boolean => write!(f, "bool"),
            Type::Floating => write!(f, "float"),
            Type::Void => write!(f, "void"),
            Type::String => write!(f, "string"),
            Type::Array(element) => write!(f, "{}[]", element),
            Type::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Machine-level scalar categories a [`Type`] can be stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Integer,
    Boolean,
    Floating,
}
