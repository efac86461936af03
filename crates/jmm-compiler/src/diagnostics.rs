//! Diagnostics collection for accumulating semantic errors.
//!
//! Semantic checks never abort a pass; every error is pushed here and the
//! driver decides the exit code from the final count. Rendering is fixed to
//! one line per error: `Error: <message> near line <N>.` (the line suffix is
//! omitted for errors that are not tied to a source line).

/// A single semantic error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, line: impl Into<Option<u32>>) -> Self {
        Self {
            line: line.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "Error: {} near line {}.", self.message, line),
            None => write!(f, "Error: {}.", self.message),
        }
    }
}

/// Collection of semantic errors from the analyzer.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Records an error tied to a source line.
    pub fn error_at(&mut self, line: u32, message: impl Into<String>) {
        self.0.push(Diagnostic::new(message, line));
    }

    /// Records an error with no line (the main-declaration checks).
    pub fn error(&mut self, message: impl Into<String>) {
        self.0.push(Diagnostic::new(message, None));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }

    /// True if any recorded message contains `needle`. Test convenience.
    pub fn mentions(&self, needle: &str) -> bool {
        self.0.iter().any(|d| d.message.contains(needle))
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for diag in &self.0 {
            writeln!(f, "{diag}")?;
        }
        Ok(())
    }
}
