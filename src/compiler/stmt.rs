//! Statement lowering and basic block construction.
//!
//! The builder always has one insertion point: an open block without a
//! terminator. Control flow statements create new blocks and leave the
//! insertion point at their join block.

use inkwell::basic_block::BasicBlock;

use crate::{
    ast::statements::TypedStmt,
    errors::errors::{Error, ErrorImpl},
};

use super::{compiler::Compiler, expr::gen_expression, storage::Storage};

pub fn gen_statement<'a>(
    compiler: &Compiler<'a>,
    storage: &mut Storage<'a>,
    statement: &TypedStmt,
) -> Result<(), Error> {
    match statement {
        TypedStmt::Block(body) => {
            for stmt in body.iter() {
                gen_statement(compiler, storage, stmt)?;
            }
        }
        TypedStmt::Expression(expression) => {
            open_block(compiler)?;
            gen_expression(compiler, storage, expression)?;
        }
        TypedStmt::Return(value) => {
            open_block(compiler)?;
            let value = gen_expression(compiler, storage, value)?;

            let function = compiler.current_function()?;
            if function.get_type().get_return_type().is_none() {
                compiler.builder.build_return(None)?;
            } else {
                compiler.builder.build_return(Some(&value))?;
            }
        }
        TypedStmt::If {
            condition,
            then_body,
            else_body,
        } => {
            open_block(compiler)?;
            let condition = gen_expression(compiler, storage, condition)?;
            let current_position = compiler.current_block()?;

            let then_block = compiler.create_basic_block("then")?;
            let else_block = compiler.create_basic_block("else")?;
            let merge_block = compiler.create_basic_block("merge")?;

            compiler.builder.position_at_end(then_block);
            gen_statement(compiler, storage, then_body)?;
            close_block_into(compiler, merge_block)?;

            compiler.builder.position_at_end(else_block);
            if let Some(else_body) = else_body {
                gen_statement(compiler, storage, else_body)?;
            }
            close_block_into(compiler, merge_block)?;

            compiler.builder.position_at_end(current_position);
            compiler.builder.build_conditional_branch(
                condition.into_int_value(),
                then_block,
                else_block,
            )?;

            compiler.builder.position_at_end(merge_block);
        }
        TypedStmt::While { condition, body } => {
            open_block(compiler)?;

            let condition_block = compiler.create_basic_block("cond")?;
            let body_block = compiler.create_basic_block("body")?;
            let end_block = compiler.create_basic_block("end")?;

            compiler
                .builder
                .build_unconditional_branch(condition_block)?;

            compiler.builder.position_at_end(condition_block);
            let condition = gen_expression(compiler, storage, condition)?;
            let condition_end = compiler.current_block()?;

            compiler.builder.position_at_end(body_block);
            gen_statement(compiler, storage, body)?;
            close_block_into(compiler, condition_block)?;

            compiler.builder.position_at_end(condition_end);
            compiler.builder.build_conditional_branch(
                condition.into_int_value(),
                body_block,
                end_block,
            )?;

            compiler.builder.position_at_end(end_block);
        }
        TypedStmt::For { .. } => {
            return Err(ErrorImpl::unsupported(statement.describe()).into());
        }
    }

    Ok(())
}

/// Closes the current block with a branch to `target`, unless it already
/// ends in a terminator (a return, or a branch emitted by a nested
/// statement).
pub fn close_block_into<'a>(compiler: &Compiler<'a>, target: BasicBlock<'a>) -> Result<(), Error> {
    let block = compiler.current_block()?;

    if block.get_terminator().is_none() {
        compiler.builder.build_unconditional_branch(target)?;
    }

    Ok(())
}

/// Moves the insertion point to a fresh block if the current one is
/// already terminated. Code after a `return` lands in this unreachable
/// block.
fn open_block(compiler: &Compiler<'_>) -> Result<(), Error> {
    let block = compiler.current_block()?;

    if block.get_terminator().is_some() {
        let dead_block = compiler.create_basic_block("dead")?;
        compiler.builder.position_at_end(dead_block);
    }

    Ok(())
}
