use crate::constants::is_control_keyword;
use std::path::Path;
use tree_sitter::Node;
use wayfinder_api::models::{CodeSymbol, Modifier, SymbolKind};
use wayfinder_plugin::utils::{location_from_ts, node_text, signature_text};

const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

/// Collects symbols in source order. Function bodies are never entered.
pub(super) struct Walker<'a> {
    path: &'a Path,
    source: &'a str,
    symbols: Vec<CodeSymbol>,
    /// Names listed in local `export { .. }` clauses, with their default flag.
    local_exports: Vec<(String, bool)>,
}

impl<'a> Walker<'a> {
    pub(super) fn new(path: &'a Path, source: &'a str) -> Self {
        Self {
            path,
            source,
            symbols: Vec::new(),
            local_exports: Vec::new(),
        }
    }

    pub(super) fn finish(mut self) -> Vec<CodeSymbol> {
        for (name, is_default) in std::mem::take(&mut self.local_exports) {
            for symbol in self
                .symbols
                .iter_mut()
                .filter(|s| s.container_name.is_none() && s.name == name)
            {
                symbol.add_modifier(Modifier::Export);
                if is_default {
                    symbol.add_modifier(Modifier::Default);
                }
            }
        }
        self.symbols
    }

    fn text(&self, node: Node) -> String {
        node_text(node, self.source)
    }

    /// Keyword children such as `export`, `async`, `static` or an accessibility modifier.
    fn own_modifiers(&self, node: Node) -> Vec<Modifier> {
        children(node)
            .into_iter()
            .filter(|c| {
                !c.is_named() || matches!(c.kind(), "accessibility_modifier" | "override_modifier")
            })
            .filter_map(|c| Modifier::from_keyword(&self.text(c)))
            .collect()
    }

    fn merged(&self, inherited: &[Modifier], node: Node) -> Vec<Modifier> {
        let mut out = inherited.to_vec();
        for m in self.own_modifiers(node) {
            if !out.contains(&m) {
                out.push(m);
            }
        }
        out
    }

    fn push(
        &mut self,
        name: String,
        kind: SymbolKind,
        declaration: Node,
        name_node: Node,
        container: Option<&str>,
        modifiers: Vec<Modifier>,
    ) {
        let location = location_from_ts(self.path, self.source, declaration, name_node);
        let mut symbol = CodeSymbol::new(name, kind, location);
        symbol.container_name = container.map(str::to_string);
        symbol.details = Some(signature_text(declaration, self.source)).filter(|d| !d.is_empty());
        for m in modifiers {
            symbol.add_modifier(m);
        }
        self.symbols.push(symbol);
    }

    pub(super) fn visit_statements(&mut self, block: Node, container: Option<&str>) {
        for statement in named_children(block) {
            self.visit_statement(statement, container, &[]);
        }
    }

    fn visit_statement(&mut self, node: Node, container: Option<&str>, inherited: &[Modifier]) {
        match node.kind() {
            "export_statement" => self.visit_export(node, container),
            "ambient_declaration" => {
                let mut mods = inherited.to_vec();
                mods.push(Modifier::Declare);
                for child in named_children(node) {
                    self.visit_statement(child, container, &mods);
                }
            }
            "expression_statement" => {
                for child in named_children(node) {
                    if matches!(child.kind(), "internal_module" | "module") {
                        self.visit_namespace(child, container, inherited);
                    }
                }
            }
            "class_declaration" | "abstract_class_declaration" => {
                let mods = self.merged(inherited, node);
                self.visit_class(node, container, mods);
            }
            "interface_declaration" => {
                let mods = self.merged(inherited, node);
                self.visit_interface(node, container, mods);
            }
            "enum_declaration" => {
                let mods = self.merged(inherited, node);
                self.visit_enum(node, container, mods);
            }
            "type_alias_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let mods = self.merged(inherited, node);
                    self.push(self.text(name), SymbolKind::TypeAlias, node, name, container, mods);
                }
            }
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let mods = self.merged(inherited, node);
                    self.push(self.text(name), SymbolKind::Function, node, name, container, mods);
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                self.visit_variables(node, container, inherited)
            }
            "internal_module" | "module" => self.visit_namespace(node, container, inherited),
            _ => {}
        }
    }

    fn visit_export(&mut self, node: Node, container: Option<&str>) {
        let mods = self.own_modifiers(node);
        let is_default = mods.contains(&Modifier::Default);

        // 1. `export <declaration>` and `export default <declaration>`
        if let Some(declaration) = node.child_by_field_name("declaration") {
            self.visit_statement(declaration, container, &mods);
            return;
        }

        // 2. `export default <expression>`
        if let Some(value) = node.child_by_field_name("value") {
            match value.kind() {
                "class" => self.visit_class(value, container, mods),
                kind if FUNCTION_VALUES.contains(&kind) => {
                    let (name, anchor) = match value.child_by_field_name("name") {
                        Some(n) => (self.text(n), n),
                        None => ("default".to_string(), value),
                    };
                    let mods = self.merged(&mods, value);
                    self.push(name, SymbolKind::Function, value, anchor, container, mods);
                }
                "identifier" => self.local_exports.push((self.text(value), true)),
                _ => {}
            }
            return;
        }

        // 3. `export { a, b as c }`; clauses with a `from` source re-export another module
        if node.child_by_field_name("source").is_some() {
            return;
        }
        for clause in named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "export_clause")
        {
            for specifier in named_children(clause) {
                if let Some(name) = specifier.child_by_field_name("name") {
                    let alias_is_default = specifier
                        .child_by_field_name("alias")
                        .is_some_and(|a| self.text(a) == "default");
                    self.local_exports
                        .push((self.text(name), is_default || alias_is_default));
                }
            }
        }
    }

    fn visit_class(&mut self, node: Node, container: Option<&str>, mods: Vec<Modifier>) {
        let name_node = node.child_by_field_name("name");
        let name = name_node
            .map(|n| self.text(n))
            .unwrap_or_else(|| "default".to_string());
        self.push(
            name.clone(),
            SymbolKind::Class,
            node,
            name_node.unwrap_or(node),
            container,
            mods,
        );

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        for member in named_children(body) {
            self.visit_class_member(member, &name);
        }
    }

    fn visit_class_member(&mut self, member: Node, class: &str) {
        let Some(name_node) = member.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node);
        let mods = self.own_modifiers(member);
        match member.kind() {
            "method_definition" if name == "constructor" => {
                self.push(
                    name,
                    SymbolKind::Constructor,
                    member,
                    name_node,
                    Some(class),
                    mods,
                );
                self.visit_constructor_parameters(member, class);
            }
            "method_definition" | "method_signature" | "abstract_method_signature" => {
                if !is_control_keyword(&name) {
                    self.push(name, SymbolKind::Method, member, name_node, Some(class), mods);
                }
            }
            "public_field_definition" => {
                let is_function = member
                    .child_by_field_name("value")
                    .is_some_and(|v| FUNCTION_VALUES.contains(&v.kind()));
                let kind = if is_function {
                    SymbolKind::Method
                } else if name_node.kind() == "private_property_identifier" {
                    SymbolKind::Field
                } else {
                    SymbolKind::Property
                };
                self.push(name, kind, member, name_node, Some(class), mods);
            }
            _ => {}
        }
    }

    fn visit_constructor_parameters(&mut self, constructor: Node, class: &str) {
        let Some(params) = constructor.child_by_field_name("parameters") else {
            return;
        };
        let container = format!("{}.constructor", class);
        for param in named_children(params) {
            if !matches!(param.kind(), "required_parameter" | "optional_parameter") {
                continue;
            }
            let Some(pattern) = param.child_by_field_name("pattern") else {
                continue;
            };
            if pattern.kind() != "identifier" {
                continue;
            }
            let mods = self.own_modifiers(param);
            self.push(
                self.text(pattern),
                SymbolKind::Parameter,
                param,
                pattern,
                Some(container.as_str()),
                mods,
            );
        }
    }

    fn visit_interface(&mut self, node: Node, container: Option<&str>, mods: Vec<Modifier>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node);
        self.push(
            name.clone(),
            SymbolKind::Interface,
            node,
            name_node,
            container,
            mods,
        );

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        for member in named_children(body) {
            let kind = match member.kind() {
                "property_signature" => SymbolKind::Property,
                "method_signature" => SymbolKind::Method,
                _ => continue,
            };
            let Some(member_name) = member.child_by_field_name("name") else {
                continue;
            };
            let text = self.text(member_name);
            if kind == SymbolKind::Method && is_control_keyword(&text) {
                continue;
            }
            let member_mods = self.own_modifiers(member);
            self.push(text, kind, member, member_name, Some(name.as_str()), member_mods);
        }
    }

    fn visit_enum(&mut self, node: Node, container: Option<&str>, mods: Vec<Modifier>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node);
        self.push(name.clone(), SymbolKind::Enum, node, name_node, container, mods);

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        for member in named_children(body) {
            let member_name = match member.kind() {
                "property_identifier" | "string" => member,
                "enum_assignment" => match member.child_by_field_name("name") {
                    Some(n) => n,
                    None => continue,
                },
                _ => continue,
            };
            let text = unquote(&self.text(member_name));
            self.push(
                text,
                SymbolKind::EnumMember,
                member,
                member_name,
                Some(name.as_str()),
                Vec::new(),
            );
        }
    }

    fn visit_namespace(&mut self, node: Node, container: Option<&str>, inherited: &[Modifier]) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let kind = if node.kind() == "module" {
            SymbolKind::Module
        } else {
            SymbolKind::Namespace
        };
        let name = unquote(&self.text(name_node));
        let mods = self.merged(inherited, node);
        self.push(name.clone(), kind, node, name_node, container, mods);

        if let Some(body) = node.child_by_field_name("body") {
            self.visit_statements(body, Some(name.as_str()));
        }
    }

    fn visit_variables(&mut self, node: Node, container: Option<&str>, inherited: &[Modifier]) {
        let is_const = children(node)
            .first()
            .is_some_and(|c| c.kind() == "const");
        let mods = self.merged(inherited, node);

        for declarator in named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
        {
            let Some(pattern) = declarator.child_by_field_name("name") else {
                continue;
            };
            let value = declarator.child_by_field_name("value");
            let function_value = value.filter(|v| FUNCTION_VALUES.contains(&v.kind()));

            let (kind, declarator_mods) = match function_value {
                Some(f) => (SymbolKind::Function, self.merged(&mods, f)),
                None if is_const => (SymbolKind::Constant, mods.clone()),
                None => (SymbolKind::Variable, mods.clone()),
            };

            for binding in binding_names(pattern) {
                self.push(
                    self.text(binding),
                    kind,
                    declarator,
                    binding,
                    container,
                    declarator_mods.clone(),
                );
            }
        }
    }
}

/// Identifiers bound by a declarator pattern, destructuring included.
fn binding_names(pattern: Node<'_>) -> Vec<Node<'_>> {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => vec![pattern],
        "pair_pattern" => pattern
            .child_by_field_name("value")
            .map(binding_names)
            .unwrap_or_default(),
        "assignment_pattern" | "object_assignment_pattern" => pattern
            .child_by_field_name("left")
            .map(binding_names)
            .unwrap_or_default(),
        "object_pattern" | "array_pattern" | "rest_pattern" => named_children(pattern)
            .into_iter()
            .flat_map(binding_names)
            .collect(),
        _ => Vec::new(),
    }
}
