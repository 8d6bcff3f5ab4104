use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::EvalError,
    utils::prelude::SrcSpan,
    parser::prelude::{ParseError, ParseErrorType},
};
use super::diagnostic::{Diagnostic, Label, Level, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("program failed: {error}")]
    Runtime {
        path: PathBuf,
        src: String,
        error: EvalError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::StdIo { err: value.kind() }
    }
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8_lossy(&nocolor.into_inner()).into_owned()
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            if diagnostic.write(buf).is_err() || writeln!(buf).is_err() {
                break;
            }
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, error } => {
                let (label, extra) = error.details();
                let text = extra.join("\n");

                let adjusted_location = if matches!(error.error, ParseErrorType::UnexpectedEof) {
                    SrcSpan {
                        start: src.len() as u32,
                        end: src.len() as u32,
                    }
                } else {
                    error.span
                };

                let title = match error.error {
                    ParseErrorType::LexError { .. } => "Lexical error",
                    _ => "Syntax error"
                };

                vec![Diagnostic {
                    title: title.into(),
                    code: None,
                    text,
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: adjusted_location,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::Runtime { path, src, error } => {
                let (label, extra) = error.details();
                let text = extra.join("\n");

                match error {
                    EvalError::Uncaught { location, .. } => vec![Diagnostic {
                        title: "Uncaught error".into(),
                        code: error.fault().map(|kind| kind.prefix().to_string()),
                        text,
                        level: Level::Error,
                        location: Some(Location {
                            src,
                            path: path.clone(),
                            label: Label {
                                text: Some(label.to_string()),
                                span: *location,
                            },
                            extra_labels: vec![],
                        }),
                    }],
                    EvalError::Io { .. } => vec![Diagnostic {
                        title: label.into(),
                        code: None,
                        text,
                        level: Level::Error,
                        location: None,
                    }]
                }
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    code: None,
                    text: format!("{err}"),
                    level: Level::Error,
                    location: None,
                }]
            }
        }
    }
}
