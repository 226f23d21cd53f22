/// Failure classes the assay pipeline can report.
///
/// Fit-time failures abort the whole run (no model means nothing downstream
/// is meaningful); per-sample failures during resolution are recorded and the
/// batch continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad invocation, unreadable files, or malformed input schema.
    Config,
    /// Fit impossible: insufficient standards or zero variance in absorbance.
    DegenerateInput,
    /// The shifted cubic has no real root for a sample's absorbance.
    NoRealRoot,
    /// The unknowns set contains no "Blank" entry.
    MissingBlank,
    /// Dilution factor is zero, negative, or non-finite.
    InvalidDilution,
    /// Corrected concentration is zero, so a required volume is undefined.
    DivisionByZero,
}

impl ErrorKind {
    /// Process exit code for this class of failure.
    ///
    /// 2 = config/file problems, 3 = bad data, 4 = computation failures.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config => 2,
            ErrorKind::DegenerateInput | ErrorKind::MissingBlank | ErrorKind::InvalidDilution => 3,
            ErrorKind::NoRealRoot | ErrorKind::DivisionByZero => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
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
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
