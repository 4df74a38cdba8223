use crate::TypeScriptPlugin;
use crate::constants::SUPPORTED_EXTENSIONS;
use std::path::Path;
use wayfinder_plugin::FileMatcherCap;

impl FileMatcherCap for TypeScriptPlugin {
    fn supports_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            })
            .unwrap_or(false)
    }
}
