use std::fmt;

/// Errors produced when reading a rule document.
#[derive(Debug)]
pub struct DocumentError {
    source: serde_yaml::Error,
}

impl DocumentError {
    pub(crate) fn new(source: serde_yaml::Error) -> Self {
        Self { source }
    }

    /// Line and column of the error in the input, when known (1-based).
    #[must_use]
    pub fn location(&self) -> Option<(usize, usize)> {
        self.source.location().map(|l| (l.line(), l.column()))
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid rule document: {}", self.source)
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
