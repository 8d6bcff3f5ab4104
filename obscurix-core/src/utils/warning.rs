use std::{path::PathBuf, rc::Rc, sync::{atomic::{AtomicUsize, Ordering}, Arc, RwLock}};

use termcolor::Buffer;

use crate::analyzer::error::Warning as AnalyzerWarning;
use super::diagnostic::{Diagnostic, Label, Level, Location};

pub trait WarningEmitterIO {
    fn emit_warning(&self, warning: Warning);
}

#[derive(Debug, Clone, Copy)]
pub struct NullWarningEmitterIO;

impl WarningEmitterIO for NullWarningEmitterIO {
    fn emit_warning(&self, _warning: Warning) {}
}

#[derive(Debug, Default, Clone)]
pub struct VectorWarningEmitterIO {
    pub warnings: Arc<RwLock<Vec<Warning>>>
}

impl VectorWarningEmitterIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Warning> {
        match self.warnings.write() {
            Ok(mut warnings) => std::mem::take(&mut *warnings),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner())
        }
    }
}

impl WarningEmitterIO for VectorWarningEmitterIO {
    fn emit_warning(&self, warning: Warning) {
        match self.warnings.write() {
            Ok(mut warnings) => warnings.push(warning),
            Err(poisoned) => poisoned.into_inner().push(warning)
        }
    }
}

pub struct WarningEmitter {
    count: Arc<AtomicUsize>,
    emitter: Rc<dyn WarningEmitterIO>
}

impl WarningEmitter {
    pub fn new(emitter: Rc<dyn WarningEmitterIO>) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            emitter,
        }
    }

    pub fn null() -> Self {
        Self::new(Rc::new(NullWarningEmitterIO))
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn emit(&self, warning: Warning) {
        _ = self.count.fetch_add(1, Ordering::Relaxed);
        self.emitter.emit_warning(warning);
    }
}

/// Attaches the module's path and source to analyzer warnings.
pub struct ModuleWarningEmitter {
    module_path: PathBuf,
    module_src: String,
    emitter: WarningEmitter,
}

impl ModuleWarningEmitter {
    pub fn new(
        module_path: PathBuf,
        module_src: String,
        emitter: WarningEmitter
    ) -> Self {
        Self {
            module_path,
            module_src,
            emitter,
        }
    }

    pub fn null() -> Self {
        Self {
            module_path: PathBuf::new(),
            module_src: String::from(""),
            emitter: WarningEmitter::null(),
        }
    }

    pub fn count(&self) -> usize {
        self.emitter.count()
    }

    pub fn emit(&self, warning: AnalyzerWarning) {
        self.emitter.emit(Warning::Module {
            path: self.module_path.clone(),
            src: self.module_src.clone(),
            warning,
        });
    }
}

#[derive(Debug, Clone)]
pub enum Warning {
    Module {
        path: PathBuf,
        src: String,
        warning: AnalyzerWarning
    }
}

impl Warning {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8_lossy(&nocolor.into_inner()).into_owned()
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        if self.to_diagnostic().write(buf).is_ok() {
            let _ = buf.write_all(b"\n");
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Warning::Module {
                path,
                src,
                warning
            } => match warning {
                AnalyzerWarning::FunctionRedefinition { first, second, name } => {
                    Diagnostic {
                        title: "Function redefinition".into(),
                        code: None,
                        text: format!("`§{name}` is defined more than once, the last definition is used."),
                        level: Level::Warning,
                        location: Some(Location {
                            src,
                            path: path.to_path_buf(),
                            label: Label {
                                text: Some("Redefined here".into()),
                                span: *second,
                            },
                            extra_labels: vec![Label {
                                text: Some("First defined here".into()),
                                span: *first
                            }]
                        }),
                    }
                },
                AnalyzerWarning::UnreachableCode { location } => {
                    Diagnostic {
                        title: "Unreachable code".into(),
                        code: None,
                        text: "".into(),
                        level: Level::Warning,
                        location: Some(Location {
                            src,
                            path: path.to_path_buf(),
                            label: Label {
                                text: Some("This code never runs".into()),
                                span: *location,
                            },
                            extra_labels: vec![]
                        }),
                    }
                }
            }
        }
    }
}
