use std::path::Path;
use std::sync::Arc;
use wayfinder_api::models::{CodeSymbol, SymbolKind, SymbolLocation};
use wayfinder_plugin::{BoxError, FallbackParser, SymbolParser};

struct Fixed(&'static str, Vec<&'static str>);

impl SymbolParser for Fixed {
    fn strategy(&self) -> &'static str {
        self.0
    }

    fn parse_symbols(&self, path: &Path, _content: &str) -> Result<Vec<CodeSymbol>, BoxError> {
        Ok(self
            .1
            .iter()
            .map(|name| {
                CodeSymbol::new(*name, SymbolKind::Function, SymbolLocation::new(path, 1, 1))
            })
            .collect())
    }
}

struct Failing;

impl SymbolParser for Failing {
    fn strategy(&self) -> &'static str {
        "failing"
    }

    fn parse_symbols(&self, _path: &Path, _content: &str) -> Result<Vec<CodeSymbol>, BoxError> {
        Err("grammar unavailable".into())
    }
}

fn names(parser: &dyn SymbolParser) -> Vec<String> {
    parser
        .parse_symbols(Path::new("a.ts"), "")
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect()
}

#[test]
fn test_primary_result_wins_when_non_empty() {
    let parser = FallbackParser::new(
        Arc::new(Fixed("tree", vec!["fromTree"])),
        Arc::new(Fixed("pattern", vec!["fromPattern"])),
    );
    assert_eq!(names(&parser), vec!["fromTree"]);
}

#[test]
fn test_empty_primary_falls_back() {
    let parser = FallbackParser::new(
        Arc::new(Fixed("tree", vec![])),
        Arc::new(Fixed("pattern", vec!["fromPattern"])),
    );
    assert_eq!(names(&parser), vec!["fromPattern"]);
}

#[test]
fn test_failing_primary_falls_back() {
    let parser = FallbackParser::new(
        Arc::new(Failing),
        Arc::new(Fixed("pattern", vec!["fromPattern"])),
    );
    assert_eq!(names(&parser), vec!["fromPattern"]);
}
