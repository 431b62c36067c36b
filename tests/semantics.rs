//! Static semantics: declaration uniqueness and scope visibility.

use kestrelc::{CompileError, build_symbol_table, parse};

fn check(src: &str) -> Result<kestrelc::SymbolTable, CompileError> {
    let tree = parse(src).unwrap_or_else(|e| panic!("parse failed on {src:?}: {e}"));
    build_symbol_table(&tree)
}

fn semantic_err(src: &str) -> CompileError {
    let e = match check(src) {
        Ok(_) => panic!("{src:?} should be rejected"),
        Err(e) => e,
    };
    assert!(e.is_semantic(), "{src:?}: {e}");
    e
}

#[test]
fn declared_names_and_initial_values() {
    let table = check("program var a , 3 b , 40 ; start var c , 0 ; print a + b + c ; stop").unwrap();
    let entries: Vec<(&str, i64)> = table.iter().collect();
    assert_eq!(entries, vec![("a", 3), ("b", 40), ("c", 0)]);
    assert_eq!(table.get("b"), Some(40));
    assert!(!table.contains("d"));
}

#[test]
fn program_without_declarations_has_empty_table() {
    let table = check("program start print 7 ; stop").unwrap();
    assert!(table.is_empty());
}

#[test]
fn undeclared_use_in_print() {
    let e = semantic_err("program start\nprint y ;\nstop");
    assert!(e.to_string().contains("'y' is not declared"), "{e}");
    assert_eq!(e.line(), Some(2));
}

#[test]
fn undeclared_read_and_assign_targets() {
    semantic_err("program start read q ; stop");
    semantic_err("program var x , 0 ; start set q x ; stop");
}

#[test]
fn undeclared_use_in_condition() {
    semantic_err("program var x , 0 ; start iff [ x .lt. z ] print x ; stop");
    semantic_err("program var x , 0 ; start iterate [ ( w ) ~ x ] print x ; stop");
}

#[test]
fn duplicate_in_same_list() {
    let e = semantic_err("program var a , 1 a , 2 ; start print a ; stop");
    assert!(e.to_string().contains("'a' is already declared"), "{e}");
}

#[test]
fn duplicate_across_scopes() {
    // storage is flat, so an inner block may not reuse an outer name
    semantic_err("program var a , 1 ; start var a , 2 ; print a ; stop");
    semantic_err(
        "program start start var t , 1 ; print t ; stop start var t , 2 ; print t ; stop stop",
    );
}

#[test]
fn block_names_end_at_stop() {
    let e = semantic_err("program start start var t , 1 ; print t ; stop print t ; stop");
    assert!(e.to_string().contains("'t' is not declared in this scope"), "{e}");
}

#[test]
fn program_names_are_visible_in_nested_blocks() {
    check(
        "program var g , 1 ; start start start print g ; stop stop \
         iff [ g ** 1 ] start var h , 2 ; set g g + h ; stop stop",
    )
    .unwrap();
}

#[test]
fn sibling_block_names_are_not_visible() {
    semantic_err("program start start var k , 1 ; print k ; stop start print k ; stop stop");
}

#[test]
fn keywords_as_names_do_not_reach_semantics() {
    assert!(parse("program var stop , 1 ; start print 1 ; stop").unwrap_err().is_parse());
}

#[test]
fn oversized_initial_value() {
    let e = semantic_err("program var a , 99999999999999999999999 ; start print a ; stop");
    assert!(e.to_string().contains("out of range"), "{e}");
}

#[test]
fn semantic_message_format() {
    let e = semantic_err("program start read y ; stop");
    assert_eq!(
        e.to_string(),
        "SEMANTIC ERROR: 'y' is not declared in this scope || Line: 1"
    );
}
