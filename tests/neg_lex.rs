//! Negative lexer tests: each source must fail with a lexical error.

use kestrelc::{CompileError, lexer::tokenize};

fn lex_err(src: &str) -> CompileError {
    match tokenize(src) {
        Ok(toks) => panic!("{src:?} should not lex, got {toks:?}"),
        Err(e) => {
            assert!(e.is_lexical(), "{src:?}: expected a lexical error, got {e}");
            e
        }
    }
}

#[test]
fn unterminated_comment() {
    let e = lex_err("x @@ never closed");
    assert!(e.to_string().contains("closing @"), "{e}");
}

#[test]
fn unterminated_comment_reports_last_line() {
    let e = lex_err("x\n@@ one\ntwo");
    assert_eq!(e.line(), Some(3));
}

#[test]
fn single_at_is_not_a_comment() {
    let e = lex_err("x @ y");
    assert!(e.to_string().contains("@@"), "{e}");
}

#[test]
fn lone_at_before_eof() {
    lex_err("x @");
}

#[test]
fn malformed_dotted_operator() {
    for src in [".lx.", ".le", ".q.", ". ", "a .gt b", "."] {
        lex_err(src);
    }
}

#[test]
fn single_star() {
    lex_err("*x");
    lex_err("a * b");
}

#[test]
fn integer_running_into_letter() {
    let e = lex_err("12ab");
    assert!(e.to_string().contains("integer"), "{e}");
    lex_err("7_");
}

#[test]
fn identifier_starting_with_underscore() {
    let e = lex_err("_x");
    assert!(e.to_string().contains("begin with a letter"), "{e}");
}

#[test]
fn first_error_wins() {
    // the second bad character is never reached
    let e = lex_err("ok\n$ \n#");
    assert_eq!(e.line(), Some(2));
}
