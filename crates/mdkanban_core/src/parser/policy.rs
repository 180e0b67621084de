//! Checklist recognition policy.
//!
//! Defaults are the strict literal-prefix rules: only lowercase `x` marks a
//! checked item and the marker must start at column zero.

use serde::{Deserialize, Serialize};

/// Case handling for the checked marker character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerCase {
    /// Only `- [x]` counts as checked; `- [X]` is ordinary text.
    #[default]
    Strict,
    /// Both `- [x]` and `- [X]` count as checked.
    IgnoreCase,
}

/// Leading whitespace handling before the checklist marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indentation {
    /// `  - [ ] foo` is not a task.
    #[default]
    Reject,
    /// Spaces/tabs before the marker are accepted; `raw` keeps them.
    Allow,
}

/// Knobs for one extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractPolicy {
    pub checked_marker: MarkerCase,
    pub indentation: Indentation,
    /// Drops a leading `---` YAML block before segmentation.
    pub strip_frontmatter: bool,
}

impl ExtractPolicy {
    /// Strict literal-prefix policy.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Accepts `X`, indented markers and skips frontmatter.
    pub fn lenient() -> Self {
        Self {
            checked_marker: MarkerCase::IgnoreCase,
            indentation: Indentation::Allow,
            strip_frontmatter: true,
        }
    }

    pub fn with_marker_case(mut self, value: MarkerCase) -> Self {
        self.checked_marker = value;
        self
    }

    pub fn with_indentation(mut self, value: Indentation) -> Self {
        self.indentation = value;
        self
    }

    pub fn with_strip_frontmatter(mut self, value: bool) -> Self {
        self.strip_frontmatter = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtractPolicy, Indentation, MarkerCase};

    #[test]
    fn default_policy_is_strict() {
        let policy = ExtractPolicy::default();
        assert_eq!(policy, ExtractPolicy::strict());
        assert_eq!(policy.checked_marker, MarkerCase::Strict);
        assert_eq!(policy.indentation, Indentation::Reject);
        assert!(!policy.strip_frontmatter);
    }

    #[test]
    fn policy_deserializes_snake_case_fields_with_defaults() {
        let policy: ExtractPolicy =
            serde_json::from_str(r#"{"checked_marker":"ignore_case"}"#).expect("policy json");
        assert_eq!(policy.checked_marker, MarkerCase::IgnoreCase);
        assert_eq!(policy.indentation, Indentation::Reject);
    }

    #[test]
    fn policy_rejects_unknown_fields() {
        let err = serde_json::from_str::<ExtractPolicy>(r#"{"fuzzy":true}"#)
            .expect_err("unknown field must fail");
        assert!(err.to_string().contains("fuzzy"));
    }
}
