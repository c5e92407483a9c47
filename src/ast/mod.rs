/// AST (Abstract Syntax Tree) module
/// Contains the typed program representation handed to the backend
///
/// Submodules:
/// - expressions: Typed expression nodes and binary operators
/// - statements: Typed statements and top-level declarations
/// - types: Resolved static types
pub mod expressions;
pub mod statements;
pub mod types;
