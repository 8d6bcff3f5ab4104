use std::io::{self, Write};

use crate::{
    environment::prelude::{Fault, Value},
    parser::prelude::parse_module
};

use super::prelude::{binary, EvalConfig, EvalError, Evaluator, MAX_CALL_DEPTH_LIMIT};

const TEST_CONFIG: EvalConfig = EvalConfig { max_call_depth: 32 };

fn run(input: &str) -> (String, Result<(), EvalError>) {
    let parsed = parse_module(input).expect("program should parse");

    let mut evaluator = Evaluator::new(Vec::new(), TEST_CONFIG);
    let result = evaluator.run(&parsed.module.program);
    let output = String::from_utf8(evaluator.into_output()).expect("utf8 output");

    (output, result)
}

fn run_ok(input: &str) -> String {
    let (output, result) = run(input);

    if let Err(err) = result {
        panic!("program failed with {err:?}, output so far:\n{output}");
    }

    output
}

#[test]
fn test_sum_safe() {
    let input = r#"
⥀ §sum_safe a b
    ↜ ? a ≺ 0 ⇒
        λ! "negative parameter"
    ↯
    ⎋ a ⊞ b
⥁

* "start"
⛌
    r ≔ §sum_safe 5 10
    * r
    r ≔ §sum_safe -1 10
    * "unreachable"
⎁ e
    * "caught an error"
    * e
⎎
    * "finally"
⍰
* "end"
"#;

    assert_eq!(
        run_ok(input),
        "start\n15\ncaught an error\nnegative parameter\nfinally\nend\n"
    );
}

#[test]
fn test_arithmetic() {
    let input = r#"
* 5 ⊞ 10
* 10 ⊖ 3 ⊖ 2
* 1.5 ⊞ 1
* 2.5 ⊖ 0.5
x ≔ -4
* x ⊞ 4
"#;

    assert_eq!(run_ok(input), "15\n5\n2.5\n2\n0\n");
}

#[test]
fn test_comparisons() {
    let input = r#"
↜ ? 1 ≺ 2 ⇒ * "lt" ⇏ * "ge" ↯
↜ ? 3 ≺ 2 ⇒ * "lt" ⇏ * "ge" ↯
↜ "a" ≡ "a" ⇒ * "eq" ⇏ * "ne" ↯
↜ "abc" ≺ "abd" ⇒ * "before" ↯
↜ 2 ≡ 2.0 ⇒ * "numeric" ↯
↜ 1 ⊞ 1 ≡ 2 ⇒ * "sum first" ↯
"#;

    assert_eq!(run_ok(input), "lt\nge\neq\nbefore\nnumeric\nsum first\n");
}

#[test]
fn test_binary_operators() {
    use crate::parser::prelude::BinaryOperator;

    assert_eq!(
        binary(BinaryOperator::Add, Value::Integer(2), Value::Float(0.5)),
        Ok(Value::Float(2.5))
    );
    assert_eq!(
        binary(BinaryOperator::Equal, Value::Boolean(true), Value::Boolean(true)),
        Ok(Value::Boolean(true))
    );
    assert!(matches!(
        binary(BinaryOperator::Add, Value::String("a".into()), Value::String("b".into())),
        Err((Fault::Type, _))
    ));
    assert!(matches!(
        binary(BinaryOperator::Subtract, Value::Integer(i64::MIN), Value::Integer(1)),
        Err((Fault::Arithmetic, _))
    ));
    assert!(matches!(
        binary(BinaryOperator::LessThan, Value::Integer(1), Value::String("1".into())),
        Err((Fault::Type, _))
    ));
}

#[test]
fn test_finally_runs_once() {
    let input = r#"
⥀ §returns
    ⛌
        ⎋ 1
    ⎎
        * "finally after return"
    ⍰
    * "unreachable"
⥁

* §returns
⛌
    * "body"
⎎
    * "finally after body"
⍰
⛌
    λ! "boom"
⎁
    * "catch"
⎎
    * "finally after catch"
⍰
"#;

    assert_eq!(
        run_ok(input),
        "finally after return\n1\nbody\nfinally after body\ncatch\nfinally after catch\n"
    );
}

#[test]
fn test_finally_masks() {
    let input = r#"
⥀ §f
    ⛌
        λ! "body"
    ⎁ e
        ⎋ "from catch"
    ⎎
        ⎋ "from finally"
    ⍰
⥁

* §f
⛌
    ⛌
        λ! "inner"
    ⎎
        λ! "outer"
    ⍰
⎁ e
    * e
⍰
"#;

    assert_eq!(run_ok(input), "from finally\nouter\n");
}

#[test]
fn test_try_without_catch_propagates_after_finally() {
    let (output, result) = run("⛌\n    λ! \"escaped\"\n⎎\n    * \"cleanup\"\n⍰\n* \"unreachable\"\n");

    assert_eq!(output, "cleanup\n");
    assert!(matches!(
        result,
        Err(EvalError::Uncaught { value: Value::Error { kind: Fault::Thrown, .. }, .. })
    ));
}

#[test]
fn test_host_faults_are_catchable() {
    let input = r#"
⥀ §one a
    ⎋ a
⥁

⛌
    §missing
⎁ e
    * e
⍰
⛌
    §one 1 2
⎁ e
    * e
⍰
⛌
    * nope
⎁ e
    * e
⍰
⛌
    x ≔ "a" ⊞ "b"
⎁ e
    * e
⍰
⛌
    ↜ ? "1" ⇒ * "never" ↯
⎁ e
    * e
⍰
⛌
    x ≔ 9223372036854775807 ⊞ 1
⎁ e
    * e
⍰
⛌
    x ≔ 1 ≡ "1"
⎁ e
    * e
⍰
"#;

    assert_eq!(run_ok(input), [
        "NameError: undefined function §missing",
        "ArityError: §one expects 1 argument(s), got 2",
        "NameError: undefined variable nope",
        "TypeError: cannot apply ⊞ to String and String",
        "TypeError: condition must be a Boolean or a Number, got String",
        "ArithmeticError: integer overflow in 9223372036854775807 ⊞ 1",
        "TypeError: cannot apply ≡ to Integer and String",
        ""
    ].join("\n"));
}

#[test]
fn test_number_conditions() {
    let input = r#"
↜ ? 1 ⇒ * "one" ⇏ * "not one" ↯
↜ ? 0 ⇒ * "zero" ⇏ * "not zero" ↯
↜ ? 0.5 ⇒ * "half" ↯
↜ ? 0.0 ⇒ * "never" ↯
↜ ? 3 ⊖ 3 ⇒ * "never" ⇏ * "difference is zero" ↯
"#;

    assert_eq!(run_ok(input), "one\nnot zero\nhalf\ndifference is zero\n");
}

#[test]
fn test_functions_defined_in_blocks() {
    let input = r#"
* §early
↜ ? 1 ≺ 2 ⇒
    ⥀ §early
        ⎋ "hoisted from an if"
    ⥁
↯
⛌
    ⥀ §add a b
        ⎋ a ⊞ b
    ⥁
⎁ e
    ⥀ §unused
    ⥁
⎎
    * §add 2 3
⍰
↜ ? 2 ≺ 1 ⇒
    ⥀ §branch
        ⎋ "from a branch that never runs"
    ⥁
↯
* §branch
"#;

    assert_eq!(
        run_ok(input),
        "hoisted from an if\n5\nfrom a branch that never runs\n"
    );
}

#[test]
fn test_call_depth_is_capped() {
    let evaluator = Evaluator::new(Vec::new(), EvalConfig { max_call_depth: usize::MAX });
    assert_eq!(evaluator.config().max_call_depth, MAX_CALL_DEPTH_LIMIT);

    let evaluator = Evaluator::new(Vec::new(), TEST_CONFIG);
    assert_eq!(evaluator.config(), TEST_CONFIG);

    assert_eq!(EvalConfig::new(MAX_CALL_DEPTH_LIMIT + 1).max_call_depth, MAX_CALL_DEPTH_LIMIT);
    assert_eq!(EvalConfig::new(7).max_call_depth, 7);
}

#[test]
fn test_stack_overflow() {
    let input = r#"
⥀ §down n
    ⎋ §down n ⊞ 1
⥁

⛌
    §down 0
⎁ e
    * e
⍰
* "still running"
"#;

    let parsed = parse_module(input).expect("program should parse");

    let mut evaluator = Evaluator::new(Vec::new(), TEST_CONFIG);
    let result = evaluator.run(&parsed.module.program);

    assert_eq!(result, Ok(()));
    assert_eq!(evaluator.environment().depth(), 0);

    let output = String::from_utf8(evaluator.into_output()).expect("utf8 output");

    assert_eq!(
        output,
        "StackOverflowError: maximum call depth of 32 exceeded in §down\nstill running\n"
    );
}

#[test]
fn test_rethrow_keeps_error() {
    let (output, result) = run("⛌\n    §missing\n⎁ e\n    λ! e\n⍰\n");

    assert_eq!(output, "");

    match result {
        Err(err @ EvalError::Uncaught { .. }) => {
            assert_eq!(err.fault(), Some(Fault::Name));

            let EvalError::Uncaught { value, location } = err else { unreachable!() };
            assert_eq!(value, Value::fault(Fault::Name, "undefined function §missing"));
            // the rethrow is reported where it happened
            assert_eq!(location.start, "⛌\n    §missing\n⎁ e\n    ".len() as u32);
        },
        other => panic!("expected an uncaught error, got {other:?}")
    }
}

#[test]
fn test_uncaught_throw() {
    let (output, result) = run("* \"before\"\nλ! \"boom\"\n* \"after\"\n");

    assert_eq!(output, "before\n");
    assert_eq!(result, Err(EvalError::Uncaught {
        value: Value::String("boom".to_string()).into_error(),
        location: crate::utils::prelude::SrcSpan { start: 11, end: 21 }
    }));
    assert_eq!(result.unwrap_err().fault(), None);
}

#[test]
fn test_scoping() {
    let input = r#"
count ≔ 1
⥀ §bump
    count ≔ count ⊞ 1
    tmp ≔ 0
⥁
§bump
§bump
* count
"#;

    let parsed = parse_module(input).expect("program should parse");

    let mut evaluator = Evaluator::new(Vec::new(), TEST_CONFIG);
    assert_eq!(evaluator.run(&parsed.module.program), Ok(()));

    assert_eq!(evaluator.environment().get("count"), Some(&Value::Integer(3)));
    assert_eq!(evaluator.environment().get("tmp"), None);

    assert_eq!(String::from_utf8(evaluator.into_output()).expect("utf8 output"), "3\n");
}

#[test]
fn test_catch_variable_is_scoped() {
    let (output, result) = run("⛌\n    λ! 1\n⎁ e\n    * e\n⍰\n* e\n");

    assert_eq!(output, "1\n");
    assert!(matches!(
        result,
        Err(EvalError::Uncaught { value: Value::Error { kind: Fault::Name, .. }, .. })
    ));
}

#[test]
fn test_hoisting_and_redefinition() {
    let input = r#"
* §double 4
⥀ §double x
    ⎋ x ⊞ x
⥁
⥀ §f ⎋ 1 ⥁
⥀ §f ⎋ 2 ⥁
* §f
"#;

    assert_eq!(run_ok(input), "8\n2\n");
}

#[test]
fn test_unit_and_bare_calls() {
    let input = r#"
⥀ §nothing
⥁
⥀ §early
    ⎋
    * "unreachable"
⥁
⥀ §greet name
    * name
⥁
* §nothing
* §early
greet "hello"
"#;

    assert_eq!(run_ok(input), "\n\nhello\n");
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_output_failure() {
    let parsed = parse_module("* 1\n").expect("program should parse");

    let mut evaluator = Evaluator::new(ClosedPipe, EvalConfig::default());

    assert_eq!(
        evaluator.run(&parsed.module.program),
        Err(EvalError::Io { err: io::ErrorKind::BrokenPipe })
    );
}
