//! The port through which generated source is handed to a compiler.

use tracing::debug;

use crate::error::{CompilationFailure, CompileError};
use crate::settings::TranslationSettings;
use crate::source::SourceCodeExpression;

/// Compiles source text into whatever the implementation loads it as.
pub trait SourceCompiler {
    type Output;

    /// Compiles `source`, reporting every error the compiler found.
    fn compile(&self, source: &str) -> Result<Self::Output, CompilationFailure>;
}

impl SourceCodeExpression {
    /// Translates this source code and compiles the result.
    pub fn compile_with<C: SourceCompiler>(&self, compiler: &C, settings: &TranslationSettings) -> Result<C::Output, CompileError> {
        let source = crate::translate_source_code(self, settings)?;
        debug!(length = source.len(), classes = self.classes().len(), "Compiling source code");

        let compiled = compiler.compile(&source)?;
        Ok(compiled)
    }
}
