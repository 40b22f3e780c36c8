use advcalc2ir::ir::{interpret, Instruction, MODULE_PROLOGUE};
use advcalc2ir::{compile_source, CompileError, Compiler};

fn run(source: &str) -> Vec<i32> {
    let module = compile_source(source).unwrap_or_else(|diagnostics| {
        panic!("{source:?} failed to compile: {diagnostics:?}");
    });
    interpret(&module).unwrap()
}

fn eval(expr: &str) -> i32 {
    match run(expr).as_slice() {
        [value] => *value,
        other => panic!("expected exactly one printed value, got {other:?}"),
    }
}

fn error_of(source: &str) -> CompileError {
    let mut diagnostics = compile_source(source).unwrap_err();
    assert_eq!(diagnostics.len(), 1);
    diagnostics.remove(0).error
}

#[test]
fn arithmetic_follows_precedence() {
    assert_eq!(eval("3 + 4 * 2"), 11);
    assert_eq!(eval("7 / 2"), 3);
    assert_eq!(eval("7 % 3 * 2"), 2);
    assert_eq!(eval("10 - 4 - 3"), 3);
    assert_eq!(eval("(1 + 2) * (3 + 4)"), 21);
    assert_eq!(eval("1 | 2 & 3"), 3);
    assert_eq!(eval("6 & 3 | 8"), 10);
    assert_eq!(eval("1 + 2 & 6"), 2);
    // no unary minus: negative values are written as a subtraction
    assert_eq!(eval("0 - 1 & 6"), 6);
}

#[test]
fn leading_minus_is_malformed() {
    assert_eq!(error_of("-1 & 6"), CompileError::MalformedExpression);
    assert_eq!(error_of("a = -1"), CompileError::MalformedExpression);
    assert_eq!(error_of("2 * -3"), CompileError::MalformedExpression);
}

#[test]
fn call_syntax_operators() {
    assert_eq!(eval("xor(12, 10)"), 6);
    assert_eq!(eval("ls(1, 4)"), 16);
    assert_eq!(eval("rs(0 - 16, 2)"), -4);
    assert_eq!(eval("xor(1, 3) * 5"), 10);
    assert_eq!(eval("ls(xor(1, 3), rs(8, 2)) + 1"), 9);
}

#[test]
fn arithmetic_wraps_at_32_bits() {
    assert_eq!(eval("2147483647 + 1"), i32::MIN);
    assert_eq!(eval("65536 * 65536"), 0);
    assert_eq!(eval("ls(1, 31)"), i32::MIN);
}

#[test]
fn rotates_match_bit_rotation() {
    for x in [0i32, 1, -1, 0x1234_5678, i32::MIN, -123_456_789] {
        for n in 0..32 {
            // the language has no negative literals
            let literal = if x >= 0 {
                x.to_string()
            } else {
                format!("0 - 1 - {}", !x)
            };
            let values = run(&format!("x = {literal}\nlr(x, {n})\nrr(x, {n})"));
            assert_eq!(values[0], x.rotate_left(n as u32), "lr({x}, {n})");
            assert_eq!(values[1], x.rotate_right(n as u32), "rr({x}, {n})");
        }
    }
}

#[test]
fn not_complements_values_and_groups() {
    assert_eq!(eval("not(0)"), -1);
    assert_eq!(eval("not(5)"), !5);
    assert_eq!(eval("not(1 + 2) & 255"), !3 & 255);
    assert_eq!(eval("not(not(7))"), 7);
    assert_eq!(eval("(not(3 * 3))"), !9);
    assert_eq!(eval("2 * not(xor(1, 2) | 4)"), 2 * !7);
}

#[test]
fn end_to_end_example() {
    let module = compile_source("a = 3 + 4\nb = a * 2\nb - 1\n").unwrap();
    assert_eq!(interpret(&module).unwrap(), vec![13]);

    let text = module.to_string();
    assert!(text.starts_with(MODULE_PROLOGUE));
    assert!(text.trim_end().ends_with("ret i32 0\n}"));
    assert!(text.contains("\tstore i32 %reg1, i32* %a\n"));
}

#[test]
fn reassignment_reuses_storage() {
    let module = compile_source("a = 1\na = a + 1\na = a * 10\na").unwrap();
    let allocas = module
        .instructions
        .iter()
        .filter(|inst| matches!(inst, Instruction::Alloca { .. }))
        .count();
    assert_eq!(allocas, 1);
    assert_eq!(interpret(&module).unwrap(), vec![20]);
}

#[test]
fn variables_must_be_assigned_before_use() {
    assert_eq!(
        error_of("b = a + 1"),
        CompileError::UndefinedVariable("a".to_string())
    );
    assert_eq!(run("a = 5\nb = a + 1\nb"), vec![6]);
    assert_eq!(run("a = 5\na = 9\na"), vec![9]);
}

#[test]
fn registers_are_never_reused() {
    let mut compiler = Compiler::new();
    for line in ["a = 1 + 2", "a + c", "b = a * a", "x = (1", "a - b"] {
        compiler.feed(line);
    }
    let defined: Vec<u32> = compiler
        .module()
        .instructions
        .iter()
        .filter_map(|inst| inst.out())
        .map(|reg| reg.index())
        .collect();
    assert!(defined.windows(2).all(|pair| pair[0] < pair[1]));
    // `a + c` loaded `a` into a register before failing
    assert!(!defined.contains(&2));
    assert_eq!(compiler.diagnostics().len(), 2);
}

#[test]
fn any_failing_line_fails_the_run() {
    let diagnostics = compile_source("a = 1\n1 +\na\nb $ 2\n").unwrap_err();
    assert_eq!(
        diagnostics.iter().map(|d| d.line).collect::<Vec<_>>(),
        vec![2, 4]
    );
    assert_eq!(diagnostics[1].error, CompileError::InvalidCharacter('$'));
    assert_eq!(
        diagnostics[0].to_string(),
        "Error on line 2: malformed expression"
    );
}

#[test]
fn structural_errors_are_classified() {
    assert_eq!(error_of("a = = 1"), CompileError::DuplicateAssignment);
    assert_eq!(error_of("1 = a"), CompileError::InvalidAssignment);
    assert_eq!(error_of("xor(1 2)"), CompileError::MalformedExpression);
    assert_eq!(error_of("xor((1, 2))"), CompileError::MisplacedComma);
    assert_eq!(error_of("(1 + 2"), CompileError::UnbalancedStructure);
}

#[test]
fn deep_nesting_evaluates() {
    let depth = 200;
    let parens = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(eval(&parens), 1);

    let mut calls = String::from("1");
    for _ in 0..depth {
        calls = format!("xor({calls}, 1)");
    }
    assert_eq!(eval(&calls), 1);

    let mut nots = String::from("5");
    for _ in 0..depth {
        nots = format!("not({nots})");
    }
    assert_eq!(eval(&nots), 5);

    let unbalanced = format!("{}1{}", "(".repeat(depth), ")".repeat(depth - 1));
    assert_eq!(error_of(&unbalanced), CompileError::UnbalancedStructure);
}

#[test]
fn very_deep_nesting_compiles() {
    let depth = 10_000;
    let parens = format!("{}1 + 2{} * 3", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(eval(&parens), 9);

    let nots = format!("{}5{}", "not(".repeat(depth), ")".repeat(depth));
    assert_eq!(eval(&nots), 5);

    let calls = format!("{}1{}", "xor(".repeat(depth), ", 1)".repeat(depth));
    assert_eq!(eval(&calls), 1);
}

#[test]
fn division_by_zero_is_left_to_the_backend() {
    let module = compile_source("1 / 0").unwrap();
    assert!(interpret(&module).is_err());
}
