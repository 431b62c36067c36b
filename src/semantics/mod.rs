// src/semantics/mod.rs
// Static semantics: declarations are program-unique, uses must be in scope.
//
// Program-level `var`s are visible everywhere. A block's `var`s are visible
// from their declaration to the block's `stop`. The data section is flat, so a
// name may be declared only once in the whole program.

pub mod symbol_table;

use log::debug;

use crate::{
    error::{CompileResult, SemanticSnafu},
    lexer::tables::tokens::{Token, TokenKind},
    parser::tree::{Label, Node},
};
pub use symbol_table::SymbolTable;

/// Checks `tree` and returns the table of declared variables.
pub fn build_symbol_table(tree: &Node) -> CompileResult<SymbolTable> {
    let mut analyzer = Analyzer::default();
    analyzer.visit(tree)?;
    debug!("symbol table holds {} declared names", analyzer.table.len());
    Ok(analyzer.table)
}

#[derive(Default)]
struct Analyzer {
    table: SymbolTable,
    scopes: Vec<Vec<String>>,
}

impl Analyzer {
    fn visible(&self, name: &str) -> bool {
        self.scopes.iter().any(|s| s.iter().any(|n| n == name))
    }

    fn declare(&mut self, name: &Token, value: &Token) -> CompileResult<()> {
        let initial: i64 = value.lexeme.parse().map_err(|_| {
            SemanticSnafu {
                message: format!("initial value {} of '{}' is out of range", value.lexeme, name.lexeme),
                line: value.line,
            }
            .build()
        })?;
        if !self.table.declare(&name.lexeme, initial) {
            return SemanticSnafu {
                message: format!("'{}' is already declared", name.lexeme),
                line: name.line,
            }
            .fail();
        }
        self.scopes
            .last_mut()
            .expect("declarations only appear inside a scope")
            .push(name.lexeme.clone());
        Ok(())
    }

    fn check_use(&self, tok: &Token) -> CompileResult<()> {
        if tok.kind == TokenKind::Ident && !self.visible(&tok.lexeme) {
            return SemanticSnafu {
                message: format!("'{}' is not declared in this scope", tok.lexeme),
                line: tok.line,
            }
            .fail();
        }
        Ok(())
    }

    fn visit(&mut self, node: &Node) -> CompileResult<()> {
        match node.label() {
            Label::Program | Label::Block => {
                self.scopes.push(Vec::new());
                for child in node.children() {
                    self.visit(child)?;
                }
                self.scopes.pop();
                Ok(())
            }
            Label::Stats | Label::MStat => {
                let mut link = Some(node);
                while let Some(n) = link {
                    self.visit(n.expect_child(0))?;
                    link = n.child(1);
                }
                Ok(())
            }
            Label::VarList => {
                let mut entry = Some(node);
                while let Some(list) = entry {
                    self.declare(list.expect_token(0), list.expect_token(1))?;
                    entry = list.expect_child(0).child(0);
                }
                Ok(())
            }
            Label::Read | Label::Assign => {
                self.check_use(node.expect_token(0))?;
                node.children().try_for_each(|c| self.visit(c))
            }
            Label::R => {
                if node.child(0).is_none() {
                    self.check_use(node.expect_token(0))?;
                }
                node.children().try_for_each(|c| self.visit(c))
            }
            _ => node.children().try_for_each(|c| self.visit(c)),
        }
    }
}
