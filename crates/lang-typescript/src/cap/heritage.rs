use crate::TypeScriptPlugin;
use crate::heritage::extract_class_headers;
use wayfinder_plugin::{ClassHeader, HeritageCap};

impl HeritageCap for TypeScriptPlugin {
    fn class_headers(&self, content: &str) -> Vec<ClassHeader> {
        extract_class_headers(content)
    }
}
