use std::{fs::File, io::{BufReader, Write}, path::{Path, PathBuf}, rc::Rc};

use log::{debug, LevelFilter};
use utf8_chars::BufReadCharsExt;

use crate::{
    analyzer::prelude::ModuleAnalyzer,
    eval::prelude::{EvalConfig, Evaluator, DEFAULT_MAX_CALL_DEPTH},
    parser::prelude::{parse_module, Parsed},
    utils::prelude::{
        Error, ModuleWarningEmitter, NullWarningEmitterIO, WarningEmitter, WarningEmitterIO
    }
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub debug: bool,
    pub max_call_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            debug: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH
        }
    }
}

impl From<RuntimeConfig> for EvalConfig {
    fn from(value: RuntimeConfig) -> Self {
        EvalConfig::new(value.max_call_depth)
    }
}

/// Reads, checks and runs one source file.
pub struct Runtime {
    path: PathBuf,
    config: RuntimeConfig,
    warnings: Rc<dyn WarningEmitterIO>,
}

impl Runtime {
    pub fn new(path: impl Into<PathBuf>, debug: bool) -> Self {
        Self::with_config(path, RuntimeConfig { debug, ..Default::default() })
    }

    pub fn with_config(path: impl Into<PathBuf>, config: RuntimeConfig) -> Self {
        Self {
            path: path.into(),
            config,
            warnings: Rc::new(NullWarningEmitterIO),
        }
    }

    /// Routes analyzer warnings to `warnings` instead of dropping them.
    pub fn with_warnings(mut self, warnings: Rc<dyn WarningEmitterIO>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> RuntimeConfig {
        self.config
    }

    pub fn read_source(&self) -> Result<String, Error> {
        let file = File::open(&self.path)?;

        let file_size = file.metadata()?.len() as usize;

        let mut src = String::with_capacity(file_size);
        let mut reader = BufReader::new(file);

        for ch in reader.chars() {
            src.push(ch?);
        }

        debug!(target: "obscurix::runtime", "read {} bytes from {}", src.len(), self.path.display());

        Ok(src)
    }

    pub fn parse(&self, src: &str) -> Result<Parsed, Error> {
        parse_module(src).map_err(|error| Error::Parse {
            path: self.path.clone(),
            src: src.to_string(),
            error
        })
    }

    /// Parses `src` and reports analyzer warnings.
    pub fn check(&self, src: &str) -> Result<Parsed, Error> {
        let parsed = self.parse(src)?;

        let warnings = ModuleWarningEmitter::new(
            self.path.clone(),
            src.to_string(),
            WarningEmitter::new(self.warnings.clone())
        );

        ModuleAnalyzer::analyze(&parsed.module.program, &warnings);

        Ok(parsed)
    }

    pub fn run(&self) -> Result<(), Error> {
        self.run_with_output(std::io::stdout())
    }

    pub fn run_with_output<W: Write>(&self, output: W) -> Result<(), Error> {
        if self.config.debug {
            log::set_max_level(LevelFilter::Debug);
        }

        let src = self.read_source()?;
        let parsed = self.check(&src)?;

        let mut evaluator = Evaluator::new(output, self.config.into());

        match evaluator.run(&parsed.module.program) {
            Ok(()) => Ok(()),
            Err(error) => Err(Error::Runtime {
                path: self.path.clone(),
                src,
                error
            })
        }
    }
}
