use thiserror::Error;

/// Unified error type for git-deploy operations.
///
/// Git failures are classified into the specific variants by
/// [classify_git_failure]; anything the patterns do not recognize stays a
/// [DeployError::Process] carrying the raw exit code and stderr.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("The working tree has uncommitted or untracked changes")]
    DirtyWorkingTree,

    #[error("Not a git repository: {0}")]
    InvalidGitRepository(String),

    #[error("Branch does not exist: {0}")]
    InvalidGitBranch(String),

    #[error("Not a valid git reference: {0}")]
    InvalidGitReference(String),

    #[error("Connection to the remote repository was refused: {0}")]
    ConnectionRefused(String),

    #[error("Automatic merge failed")]
    MergeConflict,

    #[error("Message catalog compilation failed: {0}")]
    CompileTranslation(String),

    #[error("Command `{command}` failed (exit code {}): {stderr}", exit_code_label(.code))]
    Process {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-deploy
pub type Result<T> = std::result::Result<T, DeployError>;

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}

impl DeployError {
    /// Create a path error with context
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        DeployError::InvalidPath(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        DeployError::Config(msg.into())
    }

    /// Create a generic process failure
    pub fn process(command: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        DeployError::Process {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }
}

/// Maps a failed git invocation to its [DeployError] variant.
///
/// git does not expose machine-readable error kinds, so the classification
/// pattern-matches the captured output. The conflict notice is printed to
/// stdout rather than stderr, hence both streams are scanned for it.
pub fn classify_git_failure(
    command: &str,
    code: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> DeployError {
    if stdout.contains("Automatic merge failed") || stderr.contains("Automatic merge failed") {
        return DeployError::MergeConflict;
    }

    if stderr.contains("did not match any file(s) known to git") {
        return DeployError::InvalidGitBranch(stderr.to_string());
    }

    if stderr.contains("not a valid ref") {
        return DeployError::InvalidGitReference(stderr.to_string());
    }

    if stderr.contains("not a git repository") {
        return DeployError::InvalidGitRepository(stderr.to_string());
    }

    if stderr.contains("Connection refused") {
        return DeployError::ConnectionRefused(stderr.to_string());
    }

    DeployError::process(command, code, stderr)
}
