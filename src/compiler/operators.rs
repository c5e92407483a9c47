//! Type directed dispatch of binary operators.
//!
//! The category is chosen from the static type of the *result*, not from
//! the operand types. Each category accepts a closed set of operators and
//! anything else is rejected before any instruction is built.

use crate::{
    ast::{expressions::BinaryOperator, types::Type},
    errors::errors::{Error, ErrorImpl},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Less,
    Greater,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCategory {
    /// Integer result over integer operands.
    Integer(ArithmeticOp),
    /// Floating result; integer operands are promoted first.
    Floating(ArithmeticOp),
    /// Boolean result from comparing two scalars.
    Comparison(ComparisonOp),
    /// Boolean result from combining two booleans.
    Logical(LogicalOp),
}

impl OperatorCategory {
    pub fn classify(result: &Type, operator: BinaryOperator) -> Result<Self, Error> {
        let category = match result {
            Type::Integer => arithmetic(operator).map(OperatorCategory::Integer),
            Type::Floating => arithmetic(operator).map(OperatorCategory::Floating),
            Type::Boolean => match operator {
                BinaryOperator::Equal => Some(OperatorCategory::Comparison(ComparisonOp::Equal)),
                BinaryOperator::NotEqual => {
                    Some(OperatorCategory::Comparison(ComparisonOp::NotEqual))
                }
                BinaryOperator::Less => Some(OperatorCategory::Comparison(ComparisonOp::Less)),
                BinaryOperator::Greater => {
                    Some(OperatorCategory::Comparison(ComparisonOp::Greater))
                }
                BinaryOperator::And => Some(OperatorCategory::Logical(LogicalOp::And)),
                BinaryOperator::Or => Some(OperatorCategory::Logical(LogicalOp::Or)),
                _ => None,
            },
            _ => None,
        };

        category.ok_or_else(|| invalid_operator(operator, result))
    }
}

fn arithmetic(operator: BinaryOperator) -> Option<ArithmeticOp> {
    match operator {
        BinaryOperator::Add => Some(ArithmeticOp::Add),
        BinaryOperator::Sub => Some(ArithmeticOp::Sub),
        BinaryOperator::Mul => Some(ArithmeticOp::Mul),
        BinaryOperator::Div => Some(ArithmeticOp::Div),
        _ => None,
    }
}

pub fn invalid_operator(operator: BinaryOperator, result: &Type) -> Error {
    ErrorImpl::InvalidOperatorForType {
        operator: operator.to_string(),
        type_: result.to_string(),
    }
    .into()
}
