//! Lowering of a single function declaration into its prototype.

use inkwell::values::FunctionValue;

use crate::{ast::statements::FunctionDecl, errors::errors::Error};

use super::{compiler::Compiler, stmt::gen_statement, storage::Storage};

/// Fills in the body of a registered function.
///
/// Parameters are copied into their own storage slots so the body can
/// assign to them like any other local. A body that falls off its end is
/// closed with an implicit return.
pub fn gen_function<'a>(
    compiler: &Compiler<'a>,
    function: FunctionValue<'a>,
    declaration: &FunctionDecl,
) -> Result<(), Error> {
    tracing::debug!(name = %declaration.name, "lowering function");

    let entry = compiler.context.append_basic_block(function, "entry");
    compiler.builder.position_at_end(entry);

    let mut storage = Storage::new(compiler.context, function);

    for ((type_, name), value) in declaration.parameters.iter().zip(function.get_params()) {
        let slot = storage.create(name, compiler.convert_type(type_))?;
        compiler.builder.build_store(slot, value)?;
    }

    for statement in declaration.body.iter() {
        gen_statement(compiler, &mut storage, statement)?;
    }

    let last = compiler.current_block()?;
    if last.get_terminator().is_none() {
        // Only void functions get the implicit `ret void`. A non-void function
        // ends in `unreachable` instead, since `ret void` there fails the
        // verifier; the block is dead or a missing return slipped through.
        if declaration.return_type.is_void() {
            compiler.builder.build_return(None)?;
        } else {
            compiler.builder.build_unreachable()?;
        }
    }

    tracing::trace!(
        name = %declaration.name,
        slots = storage.len(),
        blocks = function.count_basic_blocks(),
        "function lowered"
    );

    Ok(())
}
