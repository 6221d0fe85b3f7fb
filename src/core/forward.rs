//! Forward - one-shot external process invocation
//!
//! The child inherits stdin/stdout/stderr; only its exit status is captured.

use std::ffi::{OsStr, OsString};
use std::process::{Command, ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ForwardError {
    pub fn program(&self) -> &str {
        match self {
            ForwardError::Launch { program, .. } => program,
        }
    }

    /// True when the program does not exist on PATH
    pub fn is_not_found(&self) -> bool {
        match self {
            ForwardError::Launch { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
        }
    }
}

/// Program plus arguments, run synchronously
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Run to completion and return the exit code
    pub fn run(&self) -> Result<i32, ForwardError> {
        tracing::debug!(program = %self.program, args = ?self.args, "forwarding");

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| ForwardError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let code = exit_code(status);
        tracing::debug!(program = %self.program, code, "forwarded process exited");
        Ok(code)
    }
}

/// Exit code of a finished process. Signals map to `128 + signal` on unix.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_propagated() -> anyhow::Result<()> {
        let code = Invocation::new("sh").args(["-c", "exit 7"]).run()?;
        assert_eq!(code, 7);

        let code = Invocation::new("sh").arg("-c").arg("true").run()?;
        assert_eq!(code, 0);
        Ok(())
    }

    #[test]
    fn test_signal_maps_to_shell_convention() -> anyhow::Result<()> {
        let code = Invocation::new("sh").args(["-c", "kill -9 $$"]).run()?;
        assert_eq!(code, 128 + 9);
        Ok(())
    }

    #[test]
    fn test_missing_program() {
        let err = Invocation::new("aura-gemini-definitely-missing")
            .run()
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("aura-gemini-definitely-missing"));
    }
}
