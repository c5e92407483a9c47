//! Compilation options.

/// Settings for a single compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Name given to the produced LLVM module.
    pub module_name: String,
    /// Run the LLVM verifier over the finished module.
    pub verify: bool,
    /// Stamp the host triple and data layout on the module.
    pub configure_host_target: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            module_name: String::from("main"),
            verify: true,
            configure_host_target: false,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = module_name.into();
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_host_target(mut self, configure_host_target: bool) -> Self {
        self.configure_host_target = configure_host_target;
        self
    }
}
