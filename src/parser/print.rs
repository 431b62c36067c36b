// src/parser/print.rs
use std::fmt;

use super::tree::Node;

/// Pre-order rendering of a tree: label, captured tokens, then children,
/// two spaces of indentation per level.
pub struct Preorder<'a>(pub &'a Node);

impl fmt::Display for Preorder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self.0, 0usize)];
        while let Some((node, level)) = stack.pop() {
            write_line(f, node, level)?;
            let children: Vec<&Node> = node.children().collect();
            stack.extend(children.into_iter().rev().map(|c| (c, level + 1)));
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, node: &Node, level: usize) -> fmt::Result {
    write!(f, "{:indent$}{}:", "", node.label(), indent = level * 2)?;
    for t in node.tokens() {
        write!(f, " {:?} = {}|", t.kind, t.lexeme)?;
    }
    writeln!(f)
}
