//! Instruction text sent ahead of every conversation.
//!
//! The template is a plain value handed to the history adapter, so the
//! server can load it from configuration and tests can substitute their own.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Company name used by [`PromptTemplate::default`].
pub const DEFAULT_COMPANY_NAME: &str = "Barbella";

/// Errors raised while loading a prompt template.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read prompt template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt template {0} is empty")]
    Empty(PathBuf),
}

/// Fixed instruction text steering the model's output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Built-in formatting instructions for a support assistant of `company`.
    pub fn for_company(company: &str) -> Self {
        Self(format!(
            "You are a helpful and friendly customer support assistant for {company}, a platform \
designed to help individuals improve their lifestyles through personalized fitness, nutrition, \
and wellness guidance.

When responding, please follow these formatting guidelines:

1. Use markdown formatting for better readability.
2. For lists, use proper markdown list formatting.
3. When describing workouts or exercises, use tables with the following columns: Exercise, Sets, Reps, Rest.
4. For nutritional information, use bullet points or tables as appropriate.
5. Use bold text for important points or key terms.
6. If providing steps or instructions, number them clearly.

Example of a workout table:

| Exercise | Sets | Reps | Rest | Notes |
|----------|------|------|------|-------|
| Squats   | 3    | 10   | 60s  | Keep your back straight |
| Push-ups | 3    | 12   | 45s  | Modified if needed |

For recipes, please format them as follows:

1. Start with a brief description of the dish.
2. List the ingredients in a bulleted list.
3. Provide the instructions in numbered steps.
4. Include nutritional information in a table at the end.
5. Leave a blank line between each section.

Example of a nutrition table:

| Calories | Protein | Carbs | Fat |
|----------|---------|-------|-----|
| 450      | 35g     | 40g   | 20g |

Be encouraging and supportive. Provide clear, concise, and well-organized information to help \
users reach their fitness and wellness goals."
        ))
    }

    /// Loads the instruction text from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Err(PromptError::Empty(path.to_path_buf()));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::for_company(DEFAULT_COMPANY_NAME)
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_template_names_barbella() {
        let template = PromptTemplate::default();
        assert!(template.as_str().contains("customer support assistant for Barbella"));
    }

    #[test]
    fn company_template_asks_for_exercise_tables() {
        let template = PromptTemplate::for_company("Acme Fitness");
        assert!(template.as_str().contains("Acme Fitness"));
        assert!(template.as_str().contains("| Exercise | Sets | Reps |"));
    }

    #[test]
    fn from_file_reads_text() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "Answer in haiku.").expect("write");
        let template = PromptTemplate::from_file(file.path()).expect("load");
        assert_eq!(template.as_str(), "Answer in haiku.");
    }

    #[test]
    fn from_file_rejects_blank_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "  \n").expect("write");
        let err = PromptTemplate::from_file(file.path()).unwrap_err();
        assert!(matches!(err, PromptError::Empty(_)));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = PromptTemplate::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, PromptError::Io { .. }));
    }
}
