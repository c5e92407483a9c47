use inkwell::{
    values::{BasicMetadataValueEnum, BasicValueEnum, FloatValue},
    FloatPredicate, IntPredicate,
};

use crate::{
    ast::{
        expressions::{BinaryOperator, ExprKind, TypedExpr},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compiler::Compiler,
    operators::{invalid_operator, ArithmeticOp, ComparisonOp, LogicalOp, OperatorCategory},
    storage::Storage,
};

/// Generates LLVM IR for the given expression.
pub fn gen_expression<'a>(
    compiler: &Compiler<'a>,
    storage: &mut Storage<'a>,
    expression: &TypedExpr,
) -> Result<BasicValueEnum<'a>, Error> {
    match &expression.kind {
        ExprKind::Integer(value) => Ok(compiler
            .context
            .i64_type()
            .const_int(*value as u64, true)
            .into()),
        ExprKind::Boolean(value) => Ok(compiler
            .context
            .bool_type()
            .const_int(*value as u64, false)
            .into()),
        ExprKind::Floating(value) => Ok(compiler.context.f64_type().const_float(*value).into()),
        ExprKind::Assignment { name, value } => {
            let assigned = gen_expression(compiler, storage, value)?;

            let slot = storage.get_or_create(name, compiler.convert_type(&value.ty))?;
            compiler.builder.build_store(slot, assigned)?;

            Ok(assigned)
        }
        ExprKind::Symbol(name) => {
            let slot = storage.get_existing(name)?;

            Ok(compiler.builder.build_load(slot, name)?)
        }
        ExprKind::Swap(first, second) => {
            let first_slot = storage.get_existing(first)?;
            let second_slot = storage.get_existing(second)?;

            let first_value = compiler.builder.build_load(first_slot, first)?;
            let second_value = compiler.builder.build_load(second_slot, second)?;

            compiler
                .builder
                .build_store(first_slot, second_value)?;
            compiler
                .builder
                .build_store(second_slot, first_value)?;

            // A swap has no value of its own
            Ok(compiler.placeholder(&expression.ty))
        }
        ExprKind::Binary {
            left,
            operator,
            right,
        } => {
            let category = OperatorCategory::classify(&expression.ty, *operator)?;

            let left = gen_expression(compiler, storage, left)?;
            let right = gen_expression(compiler, storage, right)?;

            gen_binary(
                compiler,
                category,
                (left, right),
                *operator,
                &expression.ty,
            )
        }
        ExprKind::Call { callee, arguments } => {
            // This should never fail unless there's a type checking bug
            let function = compiler.registry.lookup(callee)?;

            let mut args: Vec<BasicMetadataValueEnum<'a>> = Vec::with_capacity(arguments.len());
            for argument in arguments.iter() {
                args.push(gen_expression(compiler, storage, argument)?.into());
            }

            Ok(compiler
                .builder
                .build_call(function, &args[..], "")?
                .try_as_basic_value()
                .left()
                .unwrap_or_else(|| compiler.context.i64_type().const_zero().into()))
        }
        other => Err(ErrorImpl::unsupported(other.describe()).into()),
    }
}

/// Builds the instruction for an already classified binary operator.
fn gen_binary<'a>(
    compiler: &Compiler<'a>,
    category: OperatorCategory,
    operands: (BasicValueEnum<'a>, BasicValueEnum<'a>),
    operator: BinaryOperator,
    result: &Type,
) -> Result<BasicValueEnum<'a>, Error> {
    let builder = &compiler.builder;
    let (left, right) = operands;
    let as_int = |value: BasicValueEnum<'a>| match value {
        BasicValueEnum::IntValue(value) => Ok(value),
        _ => Err(invalid_operator(operator, result)),
    };
    let to_float = |value: BasicValueEnum<'a>| promote(compiler, value, operator, result);

    let value: BasicValueEnum<'a> = match category {
        OperatorCategory::Integer(op) => {
            let (left, right) = (as_int(left)?, as_int(right)?);
            let value = match op {
                ArithmeticOp::Add => builder.build_int_add(left, right, "add")?,
                ArithmeticOp::Sub => builder.build_int_sub(left, right, "sub")?,
                ArithmeticOp::Mul => builder.build_int_mul(left, right, "mul")?,
                ArithmeticOp::Div => builder.build_int_signed_div(left, right, "div")?,
            };
            value.into()
        }
        OperatorCategory::Floating(op) => {
            let (left, right) = (to_float(left)?, to_float(right)?);
            let value = match op {
                ArithmeticOp::Add => builder.build_float_add(left, right, "fadd")?,
                ArithmeticOp::Sub => builder.build_float_sub(left, right, "fsub")?,
                ArithmeticOp::Mul => builder.build_float_mul(left, right, "fmul")?,
                ArithmeticOp::Div => builder.build_float_div(left, right, "fdiv")?,
            };
            value.into()
        }
        OperatorCategory::Comparison(op) if left.is_float_value() || right.is_float_value() => {
            let (left, right) = (to_float(left)?, to_float(right)?);
            let predicate = match op {
                ComparisonOp::Equal => FloatPredicate::OEQ,
                // Unordered, so NaN compares unequal to everything
                ComparisonOp::NotEqual => FloatPredicate::UNE,
                ComparisonOp::Less => FloatPredicate::OLT,
                ComparisonOp::Greater => FloatPredicate::OGT,
            };
            builder
                .build_float_compare(predicate, left, right, "fcmp")?
                .into()
        }
        OperatorCategory::Comparison(op) => {
            let (left, right) = (as_int(left)?, as_int(right)?);
            // `true` is -1 as a signed i1
            let booleans = left.get_type().get_bit_width() == 1
                && right.get_type().get_bit_width() == 1;
            let predicate = match op {
                ComparisonOp::Equal => IntPredicate::EQ,
                ComparisonOp::NotEqual => IntPredicate::NE,
                ComparisonOp::Less if booleans => IntPredicate::ULT,
                ComparisonOp::Greater if booleans => IntPredicate::UGT,
                ComparisonOp::Less => IntPredicate::SLT,
                ComparisonOp::Greater => IntPredicate::SGT,
            };
            builder
                .build_int_compare(predicate, left, right, "cmp")?
                .into()
        }
        OperatorCategory::Logical(op) => {
            let (left, right) = (as_int(left)?, as_int(right)?);
            let value = match op {
                LogicalOp::And => builder.build_and(left, right, "and")?,
                LogicalOp::Or => builder.build_or(left, right, "or")?,
            };
            value.into()
        }
    };

    Ok(value)
}

/// Converts an integer operand to floating point; floats pass through.
fn promote<'a>(
    compiler: &Compiler<'a>,
    value: BasicValueEnum<'a>,
    operator: BinaryOperator,
    result: &Type,
) -> Result<FloatValue<'a>, Error> {
    match value {
        BasicValueEnum::FloatValue(value) => Ok(value),
        BasicValueEnum::IntValue(value) => Ok(compiler.builder.build_signed_int_to_float(
            value,
            compiler.context.f64_type(),
            "promote",
        )?),
        _ => Err(invalid_operator(operator, result)),
    }
}
