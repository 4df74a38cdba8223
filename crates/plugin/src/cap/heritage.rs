use crate::model::ClassHeader;

pub trait HeritageCap: Send + Sync {
    /// Class and interface headers with their `extends` / `implements` clauses.
    fn class_headers(&self, content: &str) -> Vec<ClassHeader>;
}
