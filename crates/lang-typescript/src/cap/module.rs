use crate::TypeScriptPlugin;
use crate::constants::RESOLUTION_EXTENSIONS;
use crate::modules::extract_module_syntax;
use std::path::Path;
use wayfinder_plugin::{BoxError, ModuleSyntax, ModuleSyntaxCap};

impl ModuleSyntaxCap for TypeScriptPlugin {
    fn module_syntax(&self, _path: &Path, content: &str) -> Result<ModuleSyntax, BoxError> {
        Ok(extract_module_syntax(content))
    }

    fn resolution_extensions(&self) -> &[&str] {
        RESOLUTION_EXTENSIONS
    }
}
