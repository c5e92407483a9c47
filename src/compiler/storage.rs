//! Local variable storage for a single function.
//!
//! Locals live in one flat map per function: a name assigned inside an
//! `if` or `while` body refers to the same slot as the name everywhere
//! else in the function. Slots are allocated in the entry block so that
//! every slot dominates all of its uses.

use std::collections::HashMap;

use inkwell::{
    builder::Builder,
    context::Context,
    types::BasicTypeEnum,
    values::{FunctionValue, PointerValue},
};

use crate::errors::errors::{Error, ErrorImpl};

pub struct Storage<'a> {
    function: FunctionValue<'a>,
    /// Stack location of every local, keyed by name
    slots: HashMap<String, PointerValue<'a>>,
    /// Builder used only for entry block allocations, so the main
    /// builder's insertion point is never disturbed.
    alloca_builder: Builder<'a>,
}

impl<'a> Storage<'a> {
    pub fn new(context: &'a Context, function: FunctionValue<'a>) -> Self {
        Storage {
            function,
            slots: HashMap::new(),
            alloca_builder: context.create_builder(),
        }
    }

    /// Returns the slot bound to `name`, allocating one of type `ty` if the
    /// name is new. The type of an existing slot is never compared with `ty`.
    pub fn get_or_create(
        &mut self,
        name: &str,
        ty: BasicTypeEnum<'a>,
    ) -> Result<PointerValue<'a>, Error> {
        if let Some(slot) = self.slots.get(name) {
            return Ok(*slot);
        }

        self.create(name, ty)
    }

    /// Allocates a fresh slot and binds `name` to it, replacing any
    /// previous binding.
    pub fn create(
        &mut self,
        name: &str,
        ty: BasicTypeEnum<'a>,
    ) -> Result<PointerValue<'a>, Error> {
        let entry = self
            .function
            .get_first_basic_block()
            .ok_or_else(|| ErrorImpl::Builder {
                message: String::from("function has no entry block"),
            })?;

        match entry.get_first_instruction() {
            Some(instruction) => self.alloca_builder.position_before(&instruction),
            None => self.alloca_builder.position_at_end(entry),
        }

        let pointer = self.alloca_builder.build_alloca(ty, name)?;
        tracing::trace!(name, "allocated storage slot");

        self.slots.insert(name.to_string(), pointer);

        Ok(pointer)
    }

    /// Returns the slot bound to `name`. Reads always follow a write, so a
    /// missing name is an upstream bug.
    pub fn get_existing(&self, name: &str) -> Result<PointerValue<'a>, Error> {
        self.slots
            .get(name)
            .copied()
            .ok_or_else(|| ErrorImpl::undeclared(name).into())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
