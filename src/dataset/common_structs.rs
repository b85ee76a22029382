//! Frequently used structs shared by the dataset jobs

/// What to do when an image file exists but cannot be copied (permissions, disk full...).
/// A source file that does not exist is always skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Log the failure and keep going
    Tolerant,
    /// Abort the job on the first failure
    Strict,
}

impl Default for CopyPolicy {
    fn default() -> Self {
        CopyPolicy::Tolerant
    }
}

/// How the image files of a filtered dataset were carried over
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    /// file_name of every image whose source file does not exist
    pub missing: Vec<String>,
    /// file_name of every image whose copy failed under [`CopyPolicy::Tolerant`]
    pub failed: Vec<String>,
}

/// Counts reported once a filter job is done
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub categories: usize,
    pub images: usize,
    pub annotations: usize,
    pub copy: CopyReport,
}

impl std::fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Filtered dataset created:")?;
        writeln!(f, "  Classes: {}", self.categories)?;
        writeln!(f, "  Images: {}", self.images)?;
        write!(f, "  Annotations: {}", self.annotations)?;
        if !self.copy.missing.is_empty() {
            write!(f, "\n  Missing image files: {}", self.copy.missing.len())?;
        }
        if !self.copy.failed.is_empty() {
            write!(f, "\n  Failed image copies: {}", self.copy.failed.len())?;
        }
        Ok(())
    }
}
