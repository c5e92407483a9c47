//! Main compiler module.
//!
//! This module contains the core Compiler structure and drives lowering of a
//! whole program: a registration pass that declares every function, followed
//! by a lowering pass that fills in each function body.

use std::path::Path;

use inkwell::{
    attributes::{Attribute, AttributeLoc},
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::{Linkage, Module},
    targets::{CodeModel, InitializationConfig, RelocMode, Target, TargetMachine},
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::{BasicValueEnum, FunctionValue},
    AddressSpace, OptimizationLevel,
};

use crate::{
    ast::{
        statements::{Declaration, FunctionDecl},
        types::{ScalarKind, Type},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{function::gen_function, options::CompileOptions, registry::Registry};

/// The name of the externally linked formatted print primitive.
pub const PRINTF: &str = "printf";

/// Holds the state of one compilation.
///
/// Everything created while lowering is owned by the borrowed LLVM context,
/// which must not be shared with another compilation running concurrently.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the LLVM context
pub struct Compiler<'a> {
    pub options: CompileOptions,

    /// Every declared function and custom type of the program
    pub registry: Registry<'a>,

    /// Reference to the LLVM context
    pub context: &'a Context,
    /// The LLVM module being built
    pub module: Module<'a>,
    /// The LLVM IR builder
    pub builder: Builder<'a>,
}

impl<'a> Compiler<'a> {
    pub fn new(context: &'a Context, options: CompileOptions) -> Self {
        Compiler {
            module: context.create_module(&options.module_name),
            builder: context.create_builder(),
            registry: Registry::new(),
            options,
            context,
        }
    }

    /// Saves the current LLVM module to a file.
    pub fn save_module_to_file(&self, output_file: impl AsRef<Path>) -> Result<(), Error> {
        self.module
            .print_to_file(output_file)
            .map_err(|message| {
                ErrorImpl::Io {
                    message: message.to_string(),
                }
                .into()
            })
    }

    /// Renders the module as textual LLVM IR.
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Lowers a whole program into the module.
    ///
    /// This function:
    /// 1. Optionally stamps the host target on the module
    /// 2. Declares the external print primitive
    /// 3. Registers every declaration, in program order
    /// 4. Lowers every function body, in the same order
    /// 5. Optionally runs the verifier
    pub fn compile(&mut self, program: &[Declaration]) -> Result<(), Error> {
        if self.options.configure_host_target {
            self.configure_host_target()?;
        }

        self.create_external_functions();

        let handles = program
            .iter()
            .map(|declaration| self.register(declaration))
            .collect::<Vec<Option<FunctionValue<'a>>>>();

        tracing::debug!(
            functions = self.registry.function_count(),
            types = self.registry.type_count(),
            "registered declarations"
        );

        for (declaration, handle) in program.iter().zip(handles) {
            if let (Declaration::Function(function), Some(handle)) = (declaration, handle) {
                gen_function(self, handle, function)
                    .map_err(|error| error.in_function(&function.name))?;
            }
        }

        if self.options.verify {
            self.module.verify().map_err(|message| ErrorImpl::VerificationFailed {
                message: message.to_string(),
            })?;
        }

        tracing::debug!(module = %self.options.module_name, "module lowered");

        Ok(())
    }

    /// Registers one top-level declaration. Functions get a prototype in the
    /// module, whose handle is returned; custom types only record their name.
    pub fn register(&mut self, declaration: &Declaration) -> Option<FunctionValue<'a>> {
        tracing::debug!(name = declaration.name(), "registering declaration");

        match declaration {
            Declaration::Function(function) => {
                let handle = self.create_function_proto(function);
                self.registry.register_function(function, handle);
                Some(handle)
            }
            Declaration::Type(type_decl) => {
                self.registry.register_type(type_decl);
                None
            }
        }
    }

    /// Converts a language type to the LLVM type used to store it.
    ///
    /// Types without a scalar representation are stored as integers.
    pub fn convert_type(&self, type_: &Type) -> BasicTypeEnum<'a> {
        match type_.storage_kind() {
            ScalarKind::Integer => self.context.i64_type().into(),
            ScalarKind::Boolean => self.context.bool_type().into(),
            ScalarKind::Floating => self.context.f64_type().into(),
        }
    }

    /// Builds the LLVM signature of a function declaration.
    pub fn function_type(&self, function: &FunctionDecl) -> FunctionType<'a> {
        let params = function
            .parameters
            .iter()
            .map(|(type_, _)| self.convert_type(type_).into())
            .collect::<Vec<BasicMetadataTypeEnum<'a>>>();

        if function.return_type.is_void() {
            self.context.void_type().fn_type(&params, false)
        } else {
            self.convert_type(&function.return_type)
                .fn_type(&params, false)
        }
    }

    /// The fixed value produced by expressions that have no meaningful
    /// result of their own.
    pub fn placeholder(&self, type_: &Type) -> BasicValueEnum<'a> {
        match self.convert_type(type_) {
            BasicTypeEnum::FloatType(float_type) => float_type.const_zero().into(),
            BasicTypeEnum::IntType(int_type) => int_type.const_zero().into(),
            _ => self.context.i64_type().const_zero().into(),
        }
    }

    pub fn current_block(&self) -> Result<BasicBlock<'a>, Error> {
        self.builder.get_insert_block().ok_or_else(|| {
            ErrorImpl::Builder {
                message: String::from("no insertion block"),
            }
            .into()
        })
    }

    pub fn current_function(&self) -> Result<FunctionValue<'a>, Error> {
        self.current_block()?.get_parent().ok_or_else(|| {
            ErrorImpl::Builder {
                message: String::from("insertion block has no parent function"),
            }
            .into()
        })
    }

    /// Appends a new basic block to the function being lowered.
    pub fn create_basic_block(&self, name: &str) -> Result<BasicBlock<'a>, Error> {
        let function = self.current_function()?;
        tracing::trace!(name, "created basic block");
        Ok(self.context.append_basic_block(function, name))
    }

    /// Stamps the host triple and data layout on the module.
    fn configure_host_target(&self) -> Result<(), Error> {
        Target::initialize_native(&InitializationConfig::default())
            .map_err(|message| ErrorImpl::TargetUnavailable { message })?;

        let target_triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&target_triple).map_err(|message| {
            ErrorImpl::TargetUnavailable {
                message: message.to_string(),
            }
        })?;
        let target_machine = target
            .create_target_machine(
                &target_triple,
                "generic",
                "",
                OptimizationLevel::Default,
                RelocMode::PIC,
                CodeModel::Default,
            )
            .ok_or_else(|| ErrorImpl::TargetUnavailable {
                message: String::from("could not create a target machine"),
            })?;

        self.module.set_triple(&target_triple);
        self.module
            .set_data_layout(&target_machine.get_target_data().get_data_layout());

        Ok(())
    }

    /// Declares the variadic formatted print primitive.
    ///
    /// `i32 printf(i8* format, ...)` must be supplied by whatever links the
    /// produced object.
    fn create_external_functions(&self) {
        let i8_ptr_type = self.context.i8_type().ptr_type(AddressSpace::default());

        let printf_type = self.context.i32_type().fn_type(&[i8_ptr_type.into()], true);
        self.module
            .add_function(PRINTF, printf_type, Some(Linkage::External));
    }

    /// Creates the function prototype in the module.
    ///
    /// A fresh prototype is created for every declaration, so a duplicated
    /// name yields two functions (LLVM renames the second).
    fn create_function_proto(&self, function: &FunctionDecl) -> FunctionValue<'a> {
        let handle = self.module.add_function(
            &function.name,
            self.function_type(function),
            Some(Linkage::External),
        );

        // Add function attributes
        let attributes = [
            self.context
                .create_enum_attribute(Attribute::get_named_enum_kind_id("uwtable"), 0),
            self.context
                .create_enum_attribute(Attribute::get_named_enum_kind_id("nounwind"), 0),
        ];

        for attribute in attributes.iter() {
            handle.add_attribute(AttributeLoc::Function, *attribute);
        }

        handle
    }
}

/// Lowers a type-checked program into a new LLVM module.
///
/// This is the primary entry point. Lowering either completes or returns the
/// first error; no partially lowered module is ever returned.
///
/// # Arguments
///
/// * `program` - Top-level declarations in program order
/// * `options` - Module name, verification and target settings
/// * `context` - LLVM context owning everything that is created
pub fn compile<'a>(
    program: &[Declaration],
    options: CompileOptions,
    context: &'a Context,
) -> Result<Compiler<'a>, Error> {
    let mut compiler = Compiler::new(context, options);

    compiler.compile(program)?;

    Ok(compiler)
}
