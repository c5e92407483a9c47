//! Lowering of typed programs into LLVM IR.
//!
//! This module contains the LLVM-based backend that turns a type-checked
//! program into a module of basic-block structured functions. It handles:
//!
//! - Whole-program registration of function prototypes
//! - Per-function local storage
//! - Expression lowering with type directed operator dispatch
//! - Statement lowering into basic blocks

pub mod compiler;
pub mod expr;
pub mod function;
pub mod operators;
pub mod options;
pub mod registry;
pub mod stmt;
pub mod storage;
