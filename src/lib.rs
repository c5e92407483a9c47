#![allow(clippy::module_inception)]

//! Backend of a small statically typed language: lowers a type-checked
//! program into LLVM IR.

pub mod ast;
pub mod compiler;
pub mod errors;

pub use compiler::{
    compiler::{compile, Compiler},
    options::CompileOptions,
};
pub use errors::errors::{Error, ErrorImpl};
