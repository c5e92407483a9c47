//! Typed statements and top-level declarations.

use super::{expressions::TypedExpr, types::Type};

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    Block(Vec<TypedStmt>),
    Expression(TypedExpr),
    Return(TypedExpr),
    If {
        condition: TypedExpr,
        then_body: Box<TypedStmt>,
        else_body: Option<Box<TypedStmt>>,
    },
    While {
        condition: TypedExpr,
        body: Box<TypedStmt>,
    },

    /// Counted loop over `start..end`, accepted but never lowered.
    For {
        variable: String,
        start: TypedExpr,
        end: TypedExpr,
        descending: bool,
        body: Box<TypedStmt>,
    },
}

impl TypedStmt {
    pub fn block(body: Vec<TypedStmt>) -> Self {
        TypedStmt::Block(body)
    }

    pub fn expression(expression: TypedExpr) -> Self {
        TypedStmt::Expression(expression)
    }

    pub fn ret(value: TypedExpr) -> Self {
        TypedStmt::Return(value)
    }

    pub fn if_else(condition: TypedExpr, then_body: TypedStmt, else_body: TypedStmt) -> Self {
        TypedStmt::If {
            condition,
            then_body: Box::new(then_body),
            else_body: Some(Box::new(else_body)),
        }
    }

    pub fn if_then(condition: TypedExpr, then_body: TypedStmt) -> Self {
        TypedStmt::If {
            condition,
            then_body: Box::new(then_body),
            else_body: None,
        }
    }

    pub fn while_loop(condition: TypedExpr, body: TypedStmt) -> Self {
        TypedStmt::While {
            condition,
            body: Box::new(body),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TypedStmt::Block(_) => "block",
            TypedStmt::Expression(_) => "expression statement",
            TypedStmt::Return(_) => "return",
            TypedStmt::If { .. } => "if statement",
            TypedStmt::While { .. } => "while loop",
            TypedStmt::For {
                descending: false, ..
            } => "ascending for loop",
            TypedStmt::For {
                descending: true, ..
            } => "descending for loop",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: Type,
    pub parameters: Vec<(Type, String)>,
    pub body: Vec<TypedStmt>,
}

impl FunctionDecl {
    pub fn new(
        name: impl Into<String>,
        return_type: Type,
        parameters: Vec<(Type, String)>,
        body: Vec<TypedStmt>,
    ) -> Self {
        FunctionDecl {
            name: name.into(),
            return_type,
            parameters,
            body,
        }
    }
}

/// A user declared record type. Only its name is used by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub fields: Vec<(Type, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Function(FunctionDecl),
    Type(TypeDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Function(function) => &function.name,
            Declaration::Type(type_decl) => &type_decl.name,
        }
    }
}

impl From<FunctionDecl> for Declaration {
    fn from(function: FunctionDecl) -> Self {
        Declaration::Function(function)
    }
}

impl From<TypeDecl> for Declaration {
    fn from(type_decl: TypeDecl) -> Self {
        Declaration::Type(type_decl)
    }
}
