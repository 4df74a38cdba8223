use std::path::Path;
use wayfinder_api::models::{CodeSymbol, Modifier, SymbolKind};
use wayfinder_plugin::{SymbolParseCap, SymbolParser};
use wayfinder_typescript::{PatternParser, TreeSitterParser, TypeScriptPlugin};

const SHAPES: &str = r#"export interface Shape {
  area(): number;
  name: string;
}

export abstract class Base implements Shape {
  constructor(private readonly id: string, label: string) {}
  abstract area(): number;
  get name(): string { return this.id; }
}

export class Circle extends Base {
  static count = 0;
  handler = () => this.area();
  area(): number {
    if (this.r > 0) { return 1; }
    return 3.14;
  }
}

export enum Color { Red, Green = 'g' }
export type Id = string | number;
export function area(s: Shape): number { return s.area(); }
export const a = 1, b = () => 2;
const local = 5;
export namespace Geometry { export const PI = 3.14; }
"#;

fn find<'a>(symbols: &'a [CodeSymbol], name: &str, container: Option<&str>) -> &'a CodeSymbol {
    symbols
        .iter()
        .find(|s| s.name == name && s.container_name.as_deref() == container)
        .unwrap_or_else(|| panic!("symbol {} in {:?} not found", name, container))
}

fn top_level_exports(symbols: &[CodeSymbol]) -> Vec<&str> {
    symbols
        .iter()
        .filter(|s| s.is_top_level_export())
        .map(|s| s.name.as_str())
        .collect()
}

#[test]
fn test_tree_sitter_export_count() {
    let symbols = TreeSitterParser::new()
        .parse_symbols(Path::new("shapes.ts"), SHAPES)
        .unwrap();
    assert_eq!(
        top_level_exports(&symbols),
        vec!["Shape", "Base", "Circle", "Color", "Id", "area", "a", "b", "Geometry"]
    );
}

#[test]
fn test_tree_sitter_members_and_kinds() {
    let symbols = TreeSitterParser::new()
        .parse_symbols(Path::new("shapes.ts"), SHAPES)
        .unwrap();

    let shape = find(&symbols, "Shape", None);
    assert_eq!(shape.kind, SymbolKind::Interface);
    assert_eq!(shape.location.start_line, 1);
    assert_eq!(shape.location.end_line, 4);
    assert_eq!(shape.location.column, Some(18));

    assert_eq!(find(&symbols, "area", Some("Shape")).kind, SymbolKind::Method);
    assert_eq!(find(&symbols, "name", Some("Shape")).kind, SymbolKind::Property);

    let base = find(&symbols, "Base", None);
    assert!(base.has_modifier(Modifier::Abstract));
    assert_eq!(
        find(&symbols, "constructor", Some("Base")).kind,
        SymbolKind::Constructor
    );

    let id = find(&symbols, "id", Some("Base.constructor"));
    assert_eq!(id.kind, SymbolKind::Parameter);
    assert!(id.has_modifier(Modifier::Private));
    assert!(id.has_modifier(Modifier::Readonly));
    assert_eq!(
        find(&symbols, "label", Some("Base.constructor")).kind,
        SymbolKind::Parameter
    );

    let count = find(&symbols, "count", Some("Circle"));
    assert_eq!(count.kind, SymbolKind::Property);
    assert!(count.has_modifier(Modifier::Static));
    assert_eq!(find(&symbols, "handler", Some("Circle")).kind, SymbolKind::Method);

    let circle_area = find(&symbols, "area", Some("Circle"));
    assert_eq!(circle_area.location.start_line, 15);
    assert_eq!(circle_area.location.end_line, 18);

    assert_eq!(find(&symbols, "Red", Some("Color")).kind, SymbolKind::EnumMember);
    assert_eq!(find(&symbols, "Green", Some("Color")).kind, SymbolKind::EnumMember);
    assert_eq!(find(&symbols, "Id", None).kind, SymbolKind::TypeAlias);
    assert_eq!(find(&symbols, "a", None).kind, SymbolKind::Constant);
    assert_eq!(find(&symbols, "b", None).kind, SymbolKind::Function);

    let local = find(&symbols, "local", None);
    assert_eq!(local.kind, SymbolKind::Constant);
    assert!(!local.has_modifier(Modifier::Export));

    assert_eq!(find(&symbols, "Geometry", None).kind, SymbolKind::Namespace);
    let pi = find(&symbols, "PI", Some("Geometry"));
    assert!(pi.has_modifier(Modifier::Export));
}

#[test]
fn test_tree_sitter_never_reports_control_keywords() {
    let symbols = TreeSitterParser::new()
        .parse_symbols(Path::new("shapes.ts"), SHAPES)
        .unwrap();
    for keyword in ["if", "for", "while", "switch", "catch", "return"] {
        assert!(
            symbols.iter().all(|s| s.name != keyword),
            "{} reported as a symbol",
            keyword
        );
    }
}

#[test]
fn test_pattern_export_count_matches_tree_walk() {
    let symbols = PatternParser::new()
        .parse_symbols(Path::new("shapes.ts"), SHAPES)
        .unwrap();
    assert_eq!(
        top_level_exports(&symbols),
        vec!["Shape", "Base", "Circle", "Color", "Id", "area", "a", "b", "Geometry"]
    );
}

#[test]
fn test_pattern_members() {
    let symbols = PatternParser::new()
        .parse_symbols(Path::new("shapes.ts"), SHAPES)
        .unwrap();
    assert_eq!(find(&symbols, "area", Some("Shape")).kind, SymbolKind::Method);
    assert_eq!(
        find(&symbols, "constructor", Some("Base")).kind,
        SymbolKind::Constructor
    );
    let id = find(&symbols, "id", Some("Base.constructor"));
    assert!(id.has_modifier(Modifier::Private));
    assert_eq!(find(&symbols, "handler", Some("Circle")).kind, SymbolKind::Method);
    assert_eq!(find(&symbols, "count", Some("Circle")).kind, SymbolKind::Property);

    let circle_area = find(&symbols, "area", Some("Circle"));
    assert_eq!(circle_area.location.start_line, 15);
    assert_eq!(circle_area.location.end_line, 18);
    assert_eq!(circle_area.location.column, Some(3));

    assert_eq!(find(&symbols, "b", None).kind, SymbolKind::Function);
    assert!(symbols.iter().all(|s| s.name != "if"));
}

#[test]
fn test_pattern_skips_control_flow_in_class_bodies() {
    let source = "class Loop {\n  while (x) {}\n  for (;;) {}\n  run() {}\n}\n";
    let symbols = PatternParser::new()
        .parse_symbols(Path::new("loop.ts"), source)
        .unwrap();
    let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Loop", "run"]);
}

#[test]
fn test_tsx_component_binding() {
    let source = "export const App = () => <div className=\"app\">hi</div>;\n";
    let plugin = TypeScriptPlugin::new();
    let symbols = plugin
        .symbol_parser()
        .parse_symbols(Path::new("App.tsx"), source)
        .unwrap();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "App");
    assert_eq!(symbols[0].kind, SymbolKind::Function);
    assert!(symbols[0].is_top_level_export());
}

#[test]
fn test_export_clause_marks_local_declarations() {
    let source = "function helper() {}\nconst value = 1;\nexport { helper, value as default };\n";
    let symbols = TreeSitterParser::new()
        .parse_symbols(Path::new("m.ts"), source)
        .unwrap();
    assert!(find(&symbols, "helper", None).has_modifier(Modifier::Export));
    let value = find(&symbols, "value", None);
    assert!(value.has_modifier(Modifier::Export));
    assert!(value.has_modifier(Modifier::Default));
}

#[test]
fn test_anonymous_default_class() {
    let source = "export default class {\n  run() {}\n}\n";
    let symbols = TreeSitterParser::new()
        .parse_symbols(Path::new("anon.ts"), source)
        .unwrap();
    let class = find(&symbols, "default", None);
    assert_eq!(class.kind, SymbolKind::Class);
    assert!(class.has_modifier(Modifier::Default));
    assert_eq!(find(&symbols, "run", Some("default")).kind, SymbolKind::Method);
}

#[test]
fn test_function_bodies_are_not_entered() {
    let source = "export function outer() {\n  const inner = 1;\n  return inner;\n}\n";
    let symbols = TreeSitterParser::new()
        .parse_symbols(Path::new("outer.ts"), source)
        .unwrap();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].location.end_line, 4);
}
