//! Error types for the lowering backend.
//!
//! Every error is fatal: lowering stops at the first one and no module is
//! produced. The variants cover:
//!
//! - Constructs the language accepts but the backend cannot lower
//! - References the type checker should have rejected
//! - Operators outside the set allowed for their result type
//! - Failures reported by LLVM itself

pub mod errors;
