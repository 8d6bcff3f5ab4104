use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Problems {
    warnings: Vec<Warning>,
}

impl Problems {
    pub fn warning(&mut self, warning: Warning) {
        self.warnings.push(warning)
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn sort(&mut self) {
        self.warnings.sort_by_key(|w| w.location().start);
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Warning {
    /// A top-level function is defined again under the same name.
    /// The later definition is the one that runs.
    ///
    /// Example:
    /// ```text
    /// ⥀ §f ⎋ 1 ⥁
    /// ⥀ §f ⎋ 2 ⥁ <- Function redefinition: `§f`
    /// ```
    FunctionRedefinition {
        first: SrcSpan,
        second: SrcSpan,
        name: String,
    },
    /// Statements that follow `⎋` or `λ!` in the same block.
    ///
    /// Example:
    /// ```text
    /// ⥀ §f
    ///     ⎋ 1
    ///     * "never" <- Unreachable code
    /// ⥁
    /// ```
    UnreachableCode {
        location: SrcSpan
    }
}

impl Warning {
    pub fn location(&self) -> SrcSpan {
        match self {
            Warning::FunctionRedefinition { second: location, .. }
            | Warning::UnreachableCode { location } => *location
        }
    }
}
