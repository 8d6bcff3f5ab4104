use std::collections::HashMap;

use log::debug;

use crate::{
    analyzer::prelude::{Problems, Warning},
    parser::prelude::{Program, Statement},
    utils::prelude::{SrcSpan, ModuleWarningEmitter}
};

#[derive(Debug)]
pub struct ModuleAnalyzer {
    problems: Problems,
    functions: HashMap<String, SrcSpan>,
}

impl ModuleAnalyzer {
    /// Reports non-fatal problems of `program` to `warnings` and returns how
    /// many were found.
    pub fn analyze(
        program: &Program,
        warnings: &ModuleWarningEmitter
    ) -> usize {
        let mut analyzer = ModuleAnalyzer {
            problems: Default::default(),
            functions: HashMap::new(),
        };

        analyzer.analyze_definitions(&program.statements);
        analyzer.analyze_block(&program.statements);

        analyzer.problems.sort();

        let found = analyzer.problems.take_warnings();
        let count = found.len();

        debug!(target: "obscurix::analyzer", "analysis found {count} warning(s)");

        for warning in found {
            warnings.emit(warning);
        }

        count
    }

    /// Visits definitions in source order, the same ones the evaluator hoists.
    fn analyze_definitions(&mut self, statements: &[Statement]) {
        for statement in statements {
            if let Statement::FunctionDef(def) = statement {
                let name = &def.name;

                if let Some(first) = self.functions.insert(name.value.clone(), name.location) {
                    self.problems.warning(Warning::FunctionRedefinition {
                        first,
                        second: name.location,
                        name: name.value.clone()
                    });
                }

                self.analyze_block(&def.body);
            }

            for block in statement.blocks() {
                self.analyze_definitions(block);
            }
        }
    }

    fn analyze_block(&mut self, statements: &[Statement]) {
        let mut terminated = false;
        let mut unreachable: Option<SrcSpan> = None;

        for statement in statements {
            // definitions are hoisted, so their position never matters
            if let Statement::FunctionDef(_) = statement {
                continue;
            }

            if terminated {
                let location = statement.location();

                unreachable = Some(match unreachable {
                    Some(span) => span.merge(location),
                    None => location
                });

                continue;
            }

            for block in statement.blocks() {
                self.analyze_block(block);
            }

            if matches!(statement, Statement::Return(_) | Statement::Throw(_)) {
                terminated = true;
            }
        }

        if let Some(location) = unreachable {
            self.problems.warning(Warning::UnreachableCode { location });
        }
    }
}
