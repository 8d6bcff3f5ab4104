use std::{path::PathBuf, rc::Rc};

use crate::{
    parser::prelude::parse_module,
    utils::prelude::{
        ModuleWarningEmitter, NullWarningEmitterIO, VectorWarningEmitterIO, Warning as ModuleWarning,
        WarningEmitter
    }
};

use super::prelude::{ModuleAnalyzer, Warning};

fn analyze(input: &str) -> Vec<Warning> {
    let parsed = parse_module(input).unwrap();

    let warnings = Rc::new(VectorWarningEmitterIO::new());

    let emitter = ModuleWarningEmitter::new(
        PathBuf::from("test.obx"),
        input.to_string(),
        WarningEmitter::new(warnings.clone())
    );

    let count = ModuleAnalyzer::analyze(&parsed.module.program, &emitter);
    assert_eq!(count, emitter.count());

    warnings
        .take()
        .into_iter()
        .map(|ModuleWarning::Module { warning, .. }| warning)
        .collect()
}

#[test]
fn test_clean_program() {
    let input = r#"
⥀ §sum_safe a b
    ↜ ? a ≺ 0 ⇒
        λ! "negative parameter"
    ⇏
        ⎋ a ⊞ b
    ↯
⥁
⛌
    * §sum_safe 1 2
⎁ e
    * e
⍰
"#;

    assert_eq!(analyze(input), vec![]);
}

#[test]
fn test_function_redefinition() {
    let input = "⥀ §f\n    ⎋ 1\n⥁\n⥀ §g\n    ⎋ 2\n⥁\n⥀ §f\n    ⎋ 3\n⥁\n";

    let warnings = analyze(input);
    assert_eq!(warnings.len(), 1);

    let Warning::FunctionRedefinition { first, second, name } = &warnings[0] else {
        panic!("expected a redefinition, got {:?}", warnings[0])
    };

    assert_eq!(name, "f");
    assert!(first.start < second.start);
    assert_eq!(first.line_col(input), (1, 4));
    assert_eq!(second.line_col(input), (7, 4));
}

#[test]
fn test_unreachable_code() {
    let input = r#"⥀ §f
    ⎋ 1
    * "never"
    * "again"
⥁
* "top"
"#;

    let warnings = analyze(input);
    assert_eq!(warnings.len(), 1);

    let Warning::UnreachableCode { location } = warnings[0] else {
        panic!("expected unreachable code, got {:?}", warnings[0])
    };

    // both statements are reported as one span
    let text = &input[location.start as usize..location.end as usize];
    assert!(text.starts_with("* \"never\""), "{text}");
    assert!(text.ends_with("\"again\""), "{text}");
}

#[test]
fn test_unreachable_code_in_nested_blocks() {
    let input = r#"
↜ ? 1 ≺ 2 ⇒
    λ! "stop"
    * "after throw"
⇏
    * "fine"
↯
⛌
    * "fine"
⎁
    λ! "again"
    * "after rethrow"
⎎
    * "fine"
⍰
λ! "top"
* "after top throw"
"#;

    let warnings = analyze(input);
    assert_eq!(warnings.len(), 3);
    assert!(warnings.iter().all(|w| matches!(w, Warning::UnreachableCode { .. })));

    // reported in source order
    let lines = warnings
        .iter()
        .map(|w| w.location().line_col(input).0)
        .collect::<Vec<_>>();

    assert_eq!(lines, vec![4, 12, 17]);
}

#[test]
fn test_function_definitions_do_not_end_reachability() {
    let input = r#"
λ! "stop"
⥀ §f
    ⎋ 1
⥁
"#;

    let warnings = analyze(input);
    assert_eq!(warnings, vec![]);
}

#[test]
fn test_null_emitter_still_counts() {
    let input = "⎋ 1\n";
    assert!(parse_module(input).is_err());

    let input = "⥀ §f\n⥁\n⥀ §f\n⥁\n";
    let parsed = parse_module(input).unwrap();

    let emitter = ModuleWarningEmitter::new(
        PathBuf::new(),
        input.to_string(),
        WarningEmitter::new(Rc::new(NullWarningEmitterIO))
    );

    assert_eq!(ModuleAnalyzer::analyze(&parsed.module.program, &emitter), 1);
    assert_eq!(emitter.count(), 1);
}

#[test]
fn test_definitions_inside_blocks() {
    let input = r#"⥀ §f
    ⎋ 1
⥁
↜ ? 1 ⇒
    ⥀ §f
        ⎋ 2
        * "dead"
    ⥁
↯
"#;

    let warnings = analyze(input);
    assert_eq!(warnings.len(), 2);

    let Warning::FunctionRedefinition { first, second, name } = &warnings[0] else {
        panic!("expected a redefinition, got {:?}", warnings[0])
    };

    assert_eq!(name, "f");
    assert_eq!(first.line_col(input), (1, 4));
    assert_eq!(second.line_col(input), (5, 8));

    let Warning::UnreachableCode { location } = warnings[1] else {
        panic!("expected unreachable code, got {:?}", warnings[1])
    };

    assert_eq!(location.line_col(input), (7, 9));
}
