//! Running the LaTeX engine on an assembled document.
//!
//! Engines exit non-zero for recoverable errors while still writing a PDF,
//! so the outcome is judged from the engine log rather than the exit code.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::PdfConfig;
use crate::error::{Error, Result};

/// Printed by TeX engines once the output file is complete.
pub const SUCCESS_MARKER: &str = "Output written on";

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const LOG_TAIL_LINES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    Succeeded,
    /// The engine reported errors but still wrote the output.
    SucceededWithWarnings,
    Failed,
}

/// Judge a run from its exit status and log text.
pub fn classify(exit_ok: bool, log: &str) -> CompileStatus {
    match (log.contains(SUCCESS_MARKER), exit_ok) {
        (true, true) => CompileStatus::Succeeded,
        (true, false) => CompileStatus::SucceededWithWarnings,
        (false, _) => CompileStatus::Failed,
    }
}

#[derive(Debug)]
pub struct CompileReport {
    pub status: CompileStatus,
    pub pdf_path: PathBuf,
    pub log: String,
}

#[derive(Debug, Clone)]
pub struct LatexCompiler {
    engine: String,
    passes: u8,
    timeout: Duration,
}

impl LatexCompiler {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            passes: 2,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(config.latex_engine.clone())
            .with_passes(config.passes)
            .with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_passes(mut self, passes: u8) -> Self {
        self.passes = passes.max(1);
        self
    }

    /// Time limit for each engine run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Whether `<engine> --version` runs successfully.
    pub fn is_available(&self) -> bool {
        Command::new(&self.engine)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Write `source` to `<work_dir>/<job_name>.tex` and compile it there.
    ///
    /// Succeeds when the engine log carries [`SUCCESS_MARKER`], even if the
    /// engine exited non-zero.
    pub fn compile(&self, source: &str, work_dir: &Path, job_name: &str) -> Result<CompileReport> {
        let tex_path = work_dir.join(format!("{job_name}.tex"));
        let log_path = work_dir.join(format!("{job_name}.log"));
        let pdf_path = work_dir.join(format!("{job_name}.pdf"));
        fs::write(&tex_path, source)?;

        let mut status = CompileStatus::Failed;
        let mut log = String::new();
        for pass in 1..=self.passes {
            log::debug!(
                "{} pass {}/{}: {}",
                self.engine,
                pass,
                self.passes,
                tex_path.display()
            );
            let exit_ok = self.run_once(work_dir, &tex_path)?;
            log = read_log(&log_path)?;
            status = classify(exit_ok, &log);
            if status == CompileStatus::Failed {
                break;
            }
        }

        match status {
            CompileStatus::Failed => Err(Error::CompileFailed {
                engine: self.engine.clone(),
                log_tail: log_tail(&log, LOG_TAIL_LINES),
            }),
            CompileStatus::SucceededWithWarnings => {
                log::warn!(
                    "{} reported errors; output may be incomplete (see {})",
                    self.engine,
                    log_path.display()
                );
                Ok(CompileReport { status, pdf_path, log })
            }
            CompileStatus::Succeeded => Ok(CompileReport { status, pdf_path, log }),
        }
    }

    fn run_once(&self, work_dir: &Path, tex_path: &Path) -> Result<bool> {
        let mut child = Command::new(&self.engine)
            .arg("-interaction=nonstopmode")
            .arg("-output-directory")
            .arg(work_dir)
            .arg(tex_path)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::CompilerUnavailable(self.engine.clone()),
                _ => Error::Io(e),
            })?;

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status.success());
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::CompileTimeout {
                    engine: self.engine.clone(),
                    seconds: self.timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Engine logs are not guaranteed to be UTF-8. A missing log reads as empty.
fn read_log(path: &Path) -> Result<String> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

fn log_tail(log: &str, lines: usize) -> String {
    let all: Vec<&str> = log.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
