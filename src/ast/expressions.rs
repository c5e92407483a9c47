//! Typed expression nodes.
//!
//! Every expression carries the static type the type checker assigned to
//! it. The backend dispatches on that type and never recomputes it.

use std::fmt::Display;

use super::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Equal,
    NotEqual,
    Less,
    Greater,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An expression together with its resolved static type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub ty: Type,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Integer(i64),
    Boolean(bool),
    Floating(f64),
    /// `name = value`, usable as an expression.
    Assignment {
        name: String,
        value: Box<TypedExpr>,
    },
    Symbol(String),
    /// Exchanges the contents of two locals.
    Swap(String, String),
    Binary {
        left: Box<TypedExpr>,
        operator: BinaryOperator,
        right: Box<TypedExpr>,
    },
    Call {
        callee: String,
        arguments: Vec<TypedExpr>,
    },

    // Accepted by the data model, rejected by the backend.
    String(String),
    ArrayLiteral(Vec<TypedExpr>),
    ArrayAccess {
        array: String,
        index: Box<TypedExpr>,
    },
    ArrayDecl {
        name: String,
        size: Box<TypedExpr>,
    },
    ArrayMemberAssign {
        array: String,
        index: Box<TypedExpr>,
        value: Box<TypedExpr>,
    },
    ArrayLength(String),
    FieldRef {
        object: String,
        field: String,
    },
    FieldAssign {
        object: String,
        field: String,
        value: Box<TypedExpr>,
    },
    CustomDecl {
        name: String,
        type_name: String,
    },
}

impl ExprKind {
    /// Human readable name of the construct, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Integer(_) => "integer literal",
            ExprKind::Boolean(_) => "boolean literal",
            ExprKind::Floating(_) => "floating literal",
            ExprKind::Assignment { .. } => "assignment",
            ExprKind::Symbol(_) => "variable reference",
            ExprKind::Swap(..) => "swap",
            ExprKind::Binary { .. } => "binary operation",
            ExprKind::Call { .. } => "call",
            ExprKind::String(_) => "string literal",
            ExprKind::ArrayLiteral(_) => "array literal",
            ExprKind::ArrayAccess { .. } => "array access",
            ExprKind::ArrayDecl { .. } => "array declaration",
            ExprKind::ArrayMemberAssign { .. } => "array member assignment",
            ExprKind::ArrayLength(_) => "array length",
            ExprKind::FieldRef { .. } => "field reference",
            ExprKind::FieldAssign { .. } => "field assignment",
            ExprKind::CustomDecl { .. } => "custom type declaration",
        }
    }
}

impl TypedExpr {
    pub fn new(ty: Type, kind: ExprKind) -> Self {
        TypedExpr { ty, kind }
    }

    pub fn integer(value: i64) -> Self {
        TypedExpr::new(Type::Integer, ExprKind::Integer(value))
    }

    pub fn boolean(value: bool) -> Self {
        TypedExpr::new(Type::Boolean, ExprKind::Boolean(value))
    }

    pub fn floating(value: f64) -> Self {
        TypedExpr::new(Type::Floating, ExprKind::Floating(value))
    }

    /// The assignment takes the type of the assigned value.
    pub fn assign(name: impl Into<String>, value: TypedExpr) -> Self {
        TypedExpr::new(
            value.ty.clone(),
            ExprKind::Assignment {
                name: name.into(),
                value: Box::new(value),
            },
        )
    }

    pub fn symbol(ty: Type, name: impl Into<String>) -> Self {
        TypedExpr::new(ty, ExprKind::Symbol(name.into()))
    }

    pub fn swap(ty: Type, first: impl Into<String>, second: impl Into<String>) -> Self {
        TypedExpr::new(ty, ExprKind::Swap(first.into(), second.into()))
    }

    pub fn binary(ty: Type, left: TypedExpr, operator: BinaryOperator, right: TypedExpr) -> Self {
        TypedExpr::new(
            ty,
            ExprKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
        )
    }

    pub fn call(ty: Type, callee: impl Into<String>, arguments: Vec<TypedExpr>) -> Self {
        TypedExpr::new(
            ty,
            ExprKind::Call {
                callee: callee.into(),
                arguments,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_display() {
        assert_eq!(BinaryOperator::NotEqual.to_string(), "!=");
        assert_eq!(BinaryOperator::And.to_string(), "and");
    }

    #[test]
    fn test_assignment_takes_value_type() {
        let expr = TypedExpr::assign("x", TypedExpr::floating(1.5));
        assert_eq!(expr.ty, Type::Floating);
        assert_eq!(expr.kind.describe(), "assignment");
    }
}
