/// Process-level error: a message plus the exit code the binary should use.
///
/// Exit codes:
/// - 2: bad input/configuration
/// - 3: wallet gate (pool requires a connected wallet)
/// - 4: network or upstream-data failure
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Bad input or configuration.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Access denied by the wallet gate.
    pub fn gate(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Network or upstream-data failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
