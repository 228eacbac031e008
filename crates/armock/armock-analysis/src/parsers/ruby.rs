//! Ruby parser: thread-local tree-sitter instance plus an owned parse result.

use std::cell::RefCell;

use tree_sitter::{Node, Parser, Tree};
use xxhash_rust::xxh3::xxh3_64;

thread_local! {
    static PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

/// A parsed Ruby source together with the text its nodes point into.
pub struct ParsedSource {
    tree: Tree,
    source: String,
}

impl ParsedSource {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// xxh3 hash of the source text.
    pub fn content_hash(&self) -> u64 {
        xxh3_64(self.source.as_bytes())
    }
}

/// Parse Ruby source with the thread's cached parser.
pub fn parse_ruby(source: &str) -> Result<ParsedSource, String> {
    PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let mut parser = Parser::new();
            parser
                .set_language(&tree_sitter_ruby::LANGUAGE.into())
                .map_err(|e| format!("Failed to set language: {e}"))?;
            *slot = Some(parser);
        }
        let parser = slot
            .as_mut()
            .ok_or_else(|| "parser unavailable".to_string())?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| "tree-sitter produced no tree".to_string())?;
        Ok(ParsedSource {
            tree,
            source: source.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class() {
        let parsed = parse_ruby("class Person < ActiveRecord::Base\nend\n").unwrap();
        let root = parsed.root();
        assert_eq!(root.kind(), "program");
        let class = root.named_child(0).unwrap();
        assert_eq!(class.kind(), "class");
        let name = class.child_by_field_name("name").unwrap();
        assert_eq!(parsed.text(name), "Person");
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = parse_ruby("class A; end").unwrap();
        let b = parse_ruby("class A; end").unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
    }
}
