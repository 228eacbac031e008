//! Node helpers for the declarative Ruby subset the extractors understand.

use tree_sitter::Node;

use super::ruby::ParsedSource;
use super::types::{OptionMap, OptionValue};

/// Method name of a `call` node (`belongs_to`, `create_table`, `string`, ...).
pub fn call_method<'s>(parsed: &'s ParsedSource, node: Node) -> Option<&'s str> {
    if node.kind() != "call" {
        return None;
    }
    node.child_by_field_name("method").map(|m| parsed.text(m))
}

/// Receiver text of a `call` node, if any (`t` in `t.string`).
pub fn call_receiver<'s>(parsed: &'s ParsedSource, node: Node) -> Option<&'s str> {
    node.child_by_field_name("receiver").map(|r| parsed.text(r))
}

/// Positional and keyword arguments of a call, in source order.
pub fn call_arguments<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let Some(args) = node.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut cursor = args.walk();
    args.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// `do ... end` or `{ ... }` block attached to a call.
pub fn call_block<'t>(node: Node<'t>) -> Option<Node<'t>> {
    node.child_by_field_name("block")
}

/// Statements inside a block, skipping its parameter list.
pub fn block_statements<'t>(block: Node<'t>) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut cursor = block.walk();
    for child in block.named_children(&mut cursor) {
        match child.kind() {
            "block_parameters" | "comment" => {}
            "body_statement" | "block_body" => out.extend(statements(child)),
            _ => out.push(child),
        }
    }
    out
}

/// Statements in the body of a `program`, `class`, `module` or `class << self`.
pub fn body_statements<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let skip: Vec<usize> = ["name", "superclass", "value"]
        .iter()
        .filter_map(|f| node.child_by_field_name(f))
        .map(|n| n.id())
        .collect();
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if skip.contains(&child.id()) {
            continue;
        }
        match child.kind() {
            "comment" => {}
            "body_statement" => out.extend(statements(child)),
            _ => out.push(child),
        }
    }
    out
}

fn statements(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// Name given as a string or symbol literal (`"people"`, `:account`).
pub fn literal_name(parsed: &ParsedSource, node: Node) -> Option<String> {
    match node.kind() {
        "string" => string_content(parsed, node),
        "simple_symbol" => Some(parsed.text(node).trim_start_matches(':').to_string()),
        "delimited_symbol" => {
            let text = parsed.text(node);
            Some(
                text.trim_start_matches(':')
                    .trim_matches(|c| c == '"' || c == '\'')
                    .to_string(),
            )
        }
        "hash_key_symbol" | "identifier" | "constant" => Some(parsed.text(node).to_string()),
        _ => None,
    }
}

/// Content of a string literal; `None` when it interpolates.
pub fn string_content(parsed: &ParsedSource, node: Node) -> Option<String> {
    let mut out = String::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "interpolation" => return None,
            _ => out.push_str(parsed.text(child)),
        }
    }
    Some(out)
}

/// Decode a literal expression into an `OptionValue`.
pub fn option_value(parsed: &ParsedSource, node: Node) -> OptionValue {
    let text = parsed.text(node);
    match node.kind() {
        "nil" => OptionValue::Nil,
        "true" => OptionValue::Bool(true),
        "false" => OptionValue::Bool(false),
        "integer" => parse_integer(text).map_or_else(|| OptionValue::Raw(text.to_string()), OptionValue::Integer),
        "float" => text
            .replace('_', "")
            .parse::<f64>()
            .map_or_else(|_| OptionValue::Raw(text.to_string()), OptionValue::Float),
        "string" => string_content(parsed, node)
            .map_or_else(|| OptionValue::Raw(text.to_string()), OptionValue::String),
        "simple_symbol" | "delimited_symbol" => literal_name(parsed, node)
            .map_or_else(|| OptionValue::Raw(text.to_string()), OptionValue::Symbol),
        "unary" => negated(parsed, node).unwrap_or_else(|| OptionValue::Raw(text.to_string())),
        _ => OptionValue::Raw(text.to_string()),
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    text.replace('_', "").parse::<i64>().ok()
}

fn negated(parsed: &ParsedSource, node: Node) -> Option<OptionValue> {
    let operator = node.child_by_field_name("operator")?;
    if parsed.text(operator) != "-" {
        return None;
    }
    match option_value(parsed, node.child_by_field_name("operand")?) {
        OptionValue::Integer(i) => Some(OptionValue::Integer(-i)),
        OptionValue::Float(x) => Some(OptionValue::Float(-x)),
        _ => None,
    }
}

/// `key: value` / `:key => value` pair.
pub fn pair_entry(parsed: &ParsedSource, pair: Node) -> Option<(String, OptionValue)> {
    if pair.kind() != "pair" {
        return None;
    }
    let key = pair.child_by_field_name("key")?;
    let value = pair.child_by_field_name("value")?;
    let key = literal_name(parsed, key)?;
    Some((key, option_value(parsed, value)))
}

/// Collect every `pair` argument of a call (trailing hash or explicit `{}`).
pub fn call_options(parsed: &ParsedSource, args: &[Node]) -> OptionMap {
    let mut options = OptionMap::new();
    for arg in args {
        match arg.kind() {
            "pair" => {
                if let Some((k, v)) = pair_entry(parsed, *arg) {
                    options.insert(k, v);
                }
            }
            "hash" => {
                let mut cursor = arg.walk();
                for child in arg.named_children(&mut cursor) {
                    if let Some((k, v)) = pair_entry(parsed, child) {
                        options.insert(k, v);
                    }
                }
            }
            _ => {}
        }
    }
    options
}

/// 1-based source line of `node`.
pub fn line_of(node: Node) -> u32 {
    node.start_position().row as u32 + 1
}
