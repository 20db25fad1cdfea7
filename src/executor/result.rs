//! Outcome of running one shell command

/// Result of command execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Return code; 0 on success
    pub rc: i32,

    /// The session should end
    pub quit: bool,
}

impl ExecutionResult {
    pub fn success() -> Self {
        Self::code(0)
    }

    pub fn failure() -> Self {
        Self::code(1)
    }

    pub fn code(rc: i32) -> Self {
        Self { rc, quit: false }
    }

    pub fn quit() -> Self {
        Self { rc: 0, quit: true }
    }

    pub fn is_success(&self) -> bool {
        self.rc == 0
    }
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self::success()
    }
}
