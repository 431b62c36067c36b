//! Generated assembly, checked line for line.

use kestrelc::{
    codegen::{
        instruction::{Condition, Instruction, Operand},
        skip_conditions,
    },
    compile, compile_to,
    lexer::tables::TokenKind,
};

fn asm(src: &str) -> Vec<String> {
    compile(src)
        .unwrap_or_else(|e| panic!("compile failed on {src:?}: {e}"))
        .lines()
        .map(str::to_string)
        .collect()
}

fn lines(expected: &str) -> Vec<String> {
    expected.lines().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect()
}

#[test]
fn read_then_print() {
    assert_eq!(
        asm("program var x , 0 ; start read x ; print x ; stop"),
        lines(
            "READ x
             LOAD x
             STORE _0
             WRITE _0
             STOP
             x 0
             _0 -1"
        )
    );
}

#[test]
fn subtraction_spills_the_right_operand() {
    assert_eq!(
        asm("program var a , 1 b , 2 x , 0 ; start set x a - b ; stop"),
        lines(
            "LOAD b
             STORE _0
             LOAD a
             SUB _0
             STORE x
             STOP
             a 1
             b 2
             x 0
             _0 -1"
        )
    );
}

#[test]
fn right_associative_chain_evaluates_tail_first() {
    // a - b - c  ==  a - (b - c)
    assert_eq!(
        asm("program var a , 0 b , 0 c , 0 ; start print a - b - c ; stop"),
        lines(
            "LOAD c
             STORE _0
             LOAD b
             SUB _0
             STORE _1
             LOAD a
             SUB _1
             STORE _2
             WRITE _2
             STOP
             a 0
             b 0
             c 0
             _0 -1
             _1 -1
             _2 -1"
        )
    );
}

#[test]
fn multiply_divide_and_negate() {
    let out = asm("program var a , 6 b , 3 ; start print a % b ; print a / b ; print - a ; stop");
    let code: Vec<&str> = out.iter().map(String::as_str).take_while(|l| *l != "STOP").collect();
    assert_eq!(
        code,
        vec![
            "LOAD b", "STORE _0", "LOAD a", "MULT _0", "STORE _1", "WRITE _1",
            "LOAD b", "STORE _2", "LOAD a", "DIV _2", "STORE _3", "WRITE _3",
            "LOAD a", "MULT -1", "STORE _4", "WRITE _4",
        ]
    );
}

#[test]
fn integer_literals_keep_their_spelling() {
    let out = asm("program start print 007 ; stop");
    assert_eq!(out[0], "LOAD 007");
}

#[test]
fn cond_branches_past_its_body() {
    assert_eq!(
        asm("program start iff [ 5 .lt. 3 ] print 1 ; stop"),
        lines(
            "LOAD 3
             STORE _0
             LOAD 5
             SUB _0
             BRZPOS _B0
             LOAD 1
             STORE _1
             WRITE _1
             _B0: NOOP
             STOP
             _0 -1
             _1 -1"
        )
    );
}

#[test]
fn equality_uses_two_skip_branches() {
    let out = asm("program var a , 0 ; start iff [ a ** 2 ] print a ; stop");
    let pos = out.iter().position(|l| l == "BRPOS _B0").expect("BRPOS");
    assert_eq!(out[pos + 1], "BRNEG _B0");
}

#[test]
fn iter_loops_back_to_its_test() {
    assert_eq!(
        asm("program var i , 0 ; start iterate [ i .lt. 3 ] set i i + 1 ; stop"),
        lines(
            "_B0: NOOP
             LOAD 3
             STORE _0
             LOAD i
             SUB _0
             BRZPOS _B1
             LOAD 1
             STORE _1
             LOAD i
             ADD _1
             STORE i
             BR _B0
             _B1: NOOP
             STOP
             i 0
             _0 -1
             _1 -1"
        )
    );
}

#[test]
fn nested_loops_get_distinct_labels() {
    let out = asm(
        "program var i , 0 j , 0 ; start \
         iterate [ i .lt. 2 ] start set j 0 ; iterate [ j .lt. 2 ] set j j + 1 ; set i i + 1 ; stop \
         stop",
    );
    let defs: Vec<&String> = out.iter().filter(|l| l.ends_with(": NOOP")).collect();
    assert_eq!(defs.len(), 4);
    let back: Vec<&String> = out.iter().filter(|l| l.starts_with("BR _B")).collect();
    assert_eq!(back.len(), 2);
    let mut names: Vec<&str> = defs.iter().map(|l| l.trim_end_matches(": NOOP")).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 4);
}

#[test]
fn skip_branch_table() {
    use Condition::*;
    assert_eq!(skip_conditions(TokenKind::LessEq), &[Pos]);
    assert_eq!(skip_conditions(TokenKind::Less), &[ZeroPos]);
    assert_eq!(skip_conditions(TokenKind::GreaterEq), &[Neg]);
    assert_eq!(skip_conditions(TokenKind::Greater), &[ZeroNeg]);
    assert_eq!(skip_conditions(TokenKind::Tilde), &[Zero]);
    assert_eq!(skip_conditions(TokenKind::StarStar), &[Pos, Neg]);
}

#[test]
fn instruction_rendering() {
    assert_eq!(Instruction::Mult(Operand::Imm(-1)).to_string(), "MULT -1");
    assert_eq!(Instruction::Load(Operand::Literal("42".into())).to_string(), "LOAD 42");
    assert_eq!(Instruction::Label("_B3".into()).to_string(), "_B3: NOOP");
    assert_eq!(
        Instruction::Branch {
            cond: Condition::ZeroNeg,
            label: "_B1".into()
        }
        .to_string(),
        "BRZNEG _B1"
    );
    assert_eq!(Instruction::Stop.to_asm(), "STOP");
}

#[test]
fn numbering_restarts_for_each_compilation() {
    let src = "program var x , 1 ; start iff [ x ~ 0 ] print x + 1 ; stop";
    let first = compile(src).unwrap();
    let second = compile(src).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("_B0: NOOP"));
    assert!(first.lines().any(|l| l == "_0 -1"));
}

#[test]
fn compile_to_writes_nothing_on_failure() {
    let mut out = Vec::new();
    assert!(compile_to("program start print nope ; stop", &mut out).is_err());
    assert!(out.is_empty());

    compile_to("program start print 1 ; stop", &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().ends_with("STOP\n_0 -1\n"));
}
