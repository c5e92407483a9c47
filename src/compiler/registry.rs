//! Whole-program declaration table.
//!
//! Every declaration is registered before any function body is lowered,
//! which lets a body call functions declared later in the program as well
//! as mutually recursive ones. The table is only read once lowering starts.

use std::collections::{HashMap, HashSet};

use inkwell::values::FunctionValue;

use crate::{
    ast::statements::{FunctionDecl, TypeDecl},
    errors::errors::{Error, ErrorImpl},
};

#[derive(Debug, Default)]
pub struct Registry<'a> {
    functions: HashMap<String, FunctionValue<'a>>,
    types: HashSet<String>,
}

impl<'a> Registry<'a> {
    pub fn new() -> Self {
        Registry {
            functions: HashMap::new(),
            types: HashSet::new(),
        }
    }

    /// Binds a function name to its prototype. A later declaration with the
    /// same name replaces the earlier binding.
    pub fn register_function(&mut self, declaration: &FunctionDecl, handle: FunctionValue<'a>) {
        if self
            .functions
            .insert(declaration.name.clone(), handle)
            .is_some()
        {
            tracing::debug!(name = %declaration.name, "function declaration replaced");
        }
    }

    /// Custom types only contribute their name; their fields are never lowered.
    pub fn register_type(&mut self, declaration: &TypeDecl) {
        self.types.insert(declaration.name.clone());
    }

    pub fn lookup(&self, name: &str) -> Result<FunctionValue<'a>, Error> {
        self.functions
            .get(name)
            .copied()
            .ok_or_else(|| ErrorImpl::undeclared(name).into())
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
