use crate::dataset::common_structs::CopyPolicy;
use crate::dataset::splits::{DEFAULT_ANNOTATION_FILE, DEFAULT_SPLITS};
use anyhow::{ensure, Context};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Settings of a filter run, read from a JSON job file and completed from the
/// command line. Every field is optional in the file.
///
/// ```json
/// { "classes": ["white", "white-2"], "splits": ["train", "valid"], "strict_copy": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub classes: Vec<String>,
    pub splits: Vec<String>,
    pub strict_copy: bool,
    pub annotation_file: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            classes: vec![],
            splits: DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect(),
            strict_copy: false,
            annotation_file: DEFAULT_ANNOTATION_FILE.to_string(),
        }
    }
}

impl JobConfig {
    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<JobConfig, anyhow::Error> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("could not open config file {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Applies command line values on top of the file: classes are added to the
    /// file's classes (first occurrence kept), splits replace the file's splits when
    /// given, `strict_copy` can only be switched on.
    pub fn merge_cli(mut self, classes: &[String], splits: &[String], strict_copy: bool) -> JobConfig {
        for class in classes {
            let class = class.trim();
            if !class.is_empty() && !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        if !splits.is_empty() {
            self.splits = splits.to_vec();
        }
        self.strict_copy |= strict_copy;
        self
    }

    /// A run without classes is allowed, it produces empty documents
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.classes.is_empty() {
            warn!("no target classes given (--classes or a config file), every annotation will be dropped");
        }
        ensure!(!self.splits.is_empty(), "no splits given");
        ensure!(
            !self.annotation_file.is_empty(),
            "annotation_file must not be empty"
        );
        Ok(())
    }

    pub fn copy_policy(&self) -> CopyPolicy {
        if self.strict_copy {
            CopyPolicy::Strict
        } else {
            CopyPolicy::Tolerant
        }
    }
}
