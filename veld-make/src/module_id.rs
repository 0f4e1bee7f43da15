//! Module identifiers

use std::path::{Path, PathBuf};

/// Error type for module name parsing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModuleIdError {
    #[error("empty module name")]
    Empty,

    #[error("invalid module name: {0}")]
    InvalidName(String),

    #[error("empty component in module name: {0}")]
    EmptyComponent(String),
}

/// Module identifier
///
/// Represents a dotted module name like "Math.Utils" as components
/// ["Math", "Utils"]. The dotted form is the module's identity within a
/// build and names its artifact directory under the output root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId {
    /// Module name components: "Math.Utils" -> ["Math", "Utils"]
    pub components: Vec<String>,
}

impl ModuleId {
    /// Parse a dotted module name into a ModuleId
    ///
    /// # Examples
    /// ```
    /// use veld_make::ModuleId;
    ///
    /// let id = ModuleId::parse("Math").unwrap();
    /// assert_eq!(id.components, vec!["Math"]);
    ///
    /// let id = ModuleId::parse("Math.Utils").unwrap();
    /// assert_eq!(id.components, vec!["Math", "Utils"]);
    /// ```
    pub fn parse(s: &str) -> Result<Self, ModuleIdError> {
        if s.is_empty() {
            return Err(ModuleIdError::Empty);
        }

        if !s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
            return Err(ModuleIdError::InvalidName(s.to_string()));
        }

        let components: Vec<String> = s.split('.').map(|c| c.to_string()).collect();

        // Reject forms like "Math..Utils" or ".Math"
        if components.iter().any(|c| c.is_empty()) {
            return Err(ModuleIdError::EmptyComponent(s.to_string()));
        }

        Ok(Self { components })
    }

    /// Get the artifact directory for this module under an output root
    ///
    /// "Math.Utils" under "output" -> "output/Math.Utils"
    pub fn artifact_dir(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.to_string())
    }

    /// Get the module's short name (last component)
    pub fn name(&self) -> &str {
        self.components
            .last()
            .map(|c| c.as_str())
            .unwrap_or("")
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}
