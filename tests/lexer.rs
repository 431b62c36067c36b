//! Lexer behaviour: token classes, keywords, maximal munch, comments, lines.

use kestrelc::{
    dev::generator::gen_valid_source,
    lexer::{
        Lexer,
        tables::{DFA, Keyword, TokenKind, io::dfa_to_json, load_dfa_json_bytes},
        print_tokens, tokenize,
    },
};
use rand::{SeedableRng, rngs::StdRng};

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src)
        .unwrap_or_else(|e| panic!("lex failed on {src:?}: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn lexemes(src: &str) -> Vec<String> {
    tokenize(src)
        .unwrap_or_else(|e| panic!("lex failed on {src:?}: {e}"))
        .into_iter()
        .map(|t| t.lexeme)
        .collect()
}

#[test]
fn var_declaration_tokens() {
    assert_eq!(
        kinds("var x , 5 ;"),
        vec![
            TokenKind::Keyword(Keyword::Var),
            TokenKind::Ident,
            TokenKind::Comma,
            TokenKind::Int,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
    assert_eq!(lexemes("var x , 5 ;"), vec!["var", "x", ",", "5", ";", "EOF"]);
}

#[test]
fn every_keyword_is_recognized() {
    for k in kestrelc::lexer::tables::KEYWORDS {
        let toks = tokenize(k.as_str()).unwrap();
        assert_eq!(toks[0].kind, TokenKind::Keyword(k), "{}", k.as_str());
    }
}

#[test]
fn keyword_match_is_exact() {
    use TokenKind::*;
    // prefix, suffix and case variants stay identifiers
    assert_eq!(kinds("iff2 Stop starts prog"), vec![Ident, Ident, Ident, Ident, Eof]);
    assert_eq!(lexemes("iff2")[0], "iff2");
}

#[test]
fn relational_operators() {
    use TokenKind::*;
    assert_eq!(
        kinds(".le. .ge. .lt. .gt. ~ **"),
        vec![LessEq, GreaterEq, Less, Greater, Tilde, StarStar, Eof]
    );
    // no whitespace needed around operators
    assert_eq!(kinds("a.lt.b"), vec![Ident, Less, Ident, Eof]);
    assert_eq!(kinds("3**4"), vec![Int, StarStar, Int, Eof]);
}

#[test]
fn single_character_operators() {
    use TokenKind::*;
    assert_eq!(
        kinds("= : ; + - / % ( ) , { } [ ]"),
        vec![
            Assign, Colon, Semicolon, Plus, Minus, Slash, Percent, LParen, RParen, Comma, LBrace,
            RBrace, LBracket, RBracket, Eof
        ]
    );
}

#[test]
fn identifiers_and_integers_use_maximal_munch() {
    assert_eq!(lexemes("abc_12 0042 x"), vec!["abc_12", "0042", "x", "EOF"]);
    assert_eq!(lexemes("x+1"), vec!["x", "+", "1", "EOF"]);
    assert_eq!(lexemes("(y)"), vec!["(", "y", ")", "EOF"]);
}

#[test]
fn long_identifier_is_kept_whole() {
    let toks = tokenize("averyveryverylongname").unwrap();
    assert_eq!(toks[0].kind, TokenKind::Ident);
    assert_eq!(toks[0].lexeme, "averyveryverylongname");
}

#[test]
fn line_numbers_follow_newlines() {
    let toks = tokenize("program\nvar x , 1 ;\n\nstart\n").unwrap();
    let lines: Vec<usize> = toks.iter().map(|t| t.line).collect();
    assert_eq!(lines, vec![1, 2, 2, 2, 2, 2, 4, 5]);
}

#[test]
fn comments_are_skipped_and_count_lines() {
    use TokenKind::*;
    assert_eq!(kinds("x @@ anything $ # goes\n here @ y"), vec![Ident, Ident, Eof]);
    let toks = tokenize("x @@ one\ntwo\n@ y").unwrap();
    assert_eq!(toks[1].lexeme, "y");
    assert_eq!(toks[1].line, 3);
}

#[test]
fn comment_ends_an_adjacent_token() {
    assert_eq!(lexemes("abc@@c@def"), vec!["abc", "def", "EOF"]);
    assert_eq!(lexemes("12@@c@34"), vec!["12", "34", "EOF"]);
}

#[test]
fn empty_and_blank_sources_yield_only_eof() {
    for src in ["", "   \n\t ", "@@only a comment@"] {
        let toks = tokenize(src).unwrap();
        assert_eq!(toks.len(), 1, "{src:?}");
        assert_eq!(toks[0].kind, TokenKind::Eof);
        assert_eq!(toks[0].lexeme, "EOF");
    }
}

#[test]
fn eof_repeats_once_reached() {
    let mut lx = Lexer::new("x");
    assert_eq!(lx.next_token().unwrap().kind, TokenKind::Ident);
    assert_eq!(lx.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lx.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn invalid_characters_report_their_line() {
    for bad in ['$', '#', '!', '"', '?', '&', '|', 'é', '€'] {
        let src = format!("x\ny {bad} z");
        let err = tokenize(&src).expect_err(&format!("{bad:?} should be rejected"));
        assert!(err.is_lexical(), "{bad:?}: {err}");
        assert_eq!(err.line(), Some(2), "{bad:?}");
        let msg = err.to_string();
        assert!(msg.starts_with("LEXICAL ERROR:"), "{msg}");
        assert!(msg.ends_with("|| Line: 2"), "{msg}");
    }
}

#[test]
fn invalid_character_directly_after_identifier() {
    let err = tokenize("abc$").unwrap_err();
    assert!(err.is_lexical());
    assert!(err.to_string().contains("'$'"), "{err}");
}

#[test]
fn inserting_comments_keeps_token_stream() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let src = gen_valid_source(&mut rng, 300);
        let plain: Vec<(TokenKind, String)> =
            tokenize(&src).unwrap().into_iter().map(|t| (t.kind, t.lexeme)).collect();

        // a comment next to every space
        let commented = src.replace(' ', " @@ c @ ");
        let with: Vec<(TokenKind, String)> = tokenize(&commented)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.lexeme))
            .collect();
        assert_eq!(plain, with);
    }
}

#[test]
fn lexing_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(99);
    let src = gen_valid_source(&mut rng, 2_000);
    assert_eq!(tokenize(&src).unwrap(), tokenize(&src).unwrap());
}

#[test]
fn dfa_json_round_trips() {
    let json = dfa_to_json(&DFA).unwrap();
    let back = load_dfa_json_bytes(json.as_bytes()).unwrap();
    assert_eq!(back, *DFA);
}

#[test]
fn dfa_json_rejects_wrong_layout() {
    let json = dfa_to_json(&DFA).unwrap();
    let mut v: serde_json::Value = serde_json::from_str(&json).unwrap();
    v["next"].as_array_mut().unwrap().pop();
    let err = load_dfa_json_bytes(v.to_string().as_bytes()).unwrap_err();
    assert!(err.contains("rows"), "{err}");
}

struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn token_table_listing() {
    let toks = tokenize("program\nstart").unwrap();
    let mut out = Vec::new();
    print_tokens(&toks, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[2].starts_with("2 "), "{text}");
    assert!(rows[3].ends_with("EOF"), "{text}");

    let err = print_tokens(&toks, &mut BrokenPipe).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
}
