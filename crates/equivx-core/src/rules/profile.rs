//! Declarative options profiles loaded from TOML.

use serde::{Deserialize, Serialize};

use crate::errors::{EquivError, Result};
use crate::rules::options::{
    CyclicReferenceHandling, EquivalencyOptions, ReportLimits, TypeSelection,
};

/// Serializable subset of [`EquivalencyOptions`]
///
/// Custom comparers and predicates have no declarative form and can only be
/// added through the builder.
///
/// ```toml
/// type_selection = "runtime"
/// cyclic_references = "ignore"
/// strict_ordering_for = ["Orders[*].Lines"]
/// excluding = ["Audit", "Customers[*].Id"]
/// max_differences = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsProfile {
    pub type_selection: TypeSelection,
    pub cyclic_references: CyclicReferenceHandling,
    pub exclude_missing_members: bool,
    pub strict_ordering: bool,
    pub strict_ordering_for: Vec<String>,
    pub loose_ordering_for: Vec<String>,
    pub excluding: Vec<String>,
    pub including: Vec<String>,
    pub root_type: Option<String>,
    pub max_differences: usize,
    pub max_value_chars: usize,
}

impl Default for OptionsProfile {
    fn default() -> Self {
        let limits = ReportLimits::default();
        Self {
            type_selection: TypeSelection::default(),
            cyclic_references: CyclicReferenceHandling::default(),
            exclude_missing_members: false,
            strict_ordering: false,
            strict_ordering_for: Vec::new(),
            loose_ordering_for: Vec::new(),
            excluding: Vec::new(),
            including: Vec::new(),
            root_type: None,
            max_differences: limits.max_differences,
            max_value_chars: limits.max_value_chars,
        }
    }
}

impl OptionsProfile {
    /// Parse a profile from TOML text
    ///
    /// # Errors
    ///
    /// `InvalidProfile` for malformed TOML, unknown keys, or zero limits.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let profile: OptionsProfile = toml::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read and parse a profile file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as for
    /// [`OptionsProfile::from_toml_str`].
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EquivError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.max_differences == 0 {
            return Err(EquivError::InvalidProfile {
                reason: "max_differences must be at least 1".to_string(),
            });
        }
        if self.max_value_chars == 0 {
            return Err(EquivError::InvalidProfile {
                reason: "max_value_chars must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Build fresh options from this profile
    ///
    /// # Errors
    ///
    /// `InvalidPathPattern` if any listed pattern does not parse.
    pub fn to_options(&self) -> Result<EquivalencyOptions> {
        self.apply_to(EquivalencyOptions::new())
    }

    /// Layer this profile over existing options
    ///
    /// Scalar settings replace the existing ones; pattern lists append rules
    /// in the order exclusions, inclusions, loose ordering, strict ordering.
    ///
    /// # Errors
    ///
    /// `InvalidPathPattern` if any listed pattern does not parse.
    pub fn apply_to(&self, options: EquivalencyOptions) -> Result<EquivalencyOptions> {
        let mut options = match self.type_selection {
            TypeSelection::Declared => options.respecting_declared_types(),
            TypeSelection::Runtime => options.respecting_runtime_types(),
        };
        if self.cyclic_references == CyclicReferenceHandling::Ignore {
            options = options.ignoring_cyclic_references();
        }
        if self.exclude_missing_members {
            options = options.excluding_missing_members();
        }
        if let Some(root) = &self.root_type {
            options = options.with_root_type(root.as_str());
        }
        for pattern in &self.excluding {
            options = options.excluding(pattern)?;
        }
        for pattern in &self.including {
            options = options.including(pattern)?;
        }
        for pattern in &self.loose_ordering_for {
            options = options.without_strict_ordering_for(pattern)?;
        }
        for pattern in &self.strict_ordering_for {
            options = options.with_strict_ordering_for(pattern)?;
        }
        if self.strict_ordering {
            options = options.with_strict_ordering();
        }
        Ok(options.with_limits(ReportLimits {
            max_differences: self.max_differences,
            max_value_chars: self.max_value_chars,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;

    #[test]
    fn test_empty_profile_matches_defaults() {
        let profile = OptionsProfile::from_toml_str("").unwrap();
        assert_eq!(profile, OptionsProfile::default());

        let options = profile.to_options().unwrap();
        assert_eq!(options.type_selection(), TypeSelection::Declared);
        assert_eq!(options.limits(), ReportLimits::default());
        assert!(options.rules().is_empty());
    }

    #[test]
    fn test_full_profile_builds_rules_in_order() {
        let profile = OptionsProfile::from_toml_str(
            r#"
type_selection = "runtime"
cyclic_references = "ignore"
exclude_missing_members = true
strict_ordering = true
strict_ordering_for = ["Orders[*].Lines"]
loose_ordering_for = ["Tags"]
excluding = ["Audit"]
including = ["Orders"]
max_differences = 5
max_value_chars = 40
"#,
        )
        .unwrap();
        let options = profile.to_options().unwrap();

        assert_eq!(options.type_selection(), TypeSelection::Runtime);
        assert_eq!(options.cyclic_references(), CyclicReferenceHandling::Ignore);
        assert!(options.excludes_missing_members());
        assert_eq!(options.limits().max_differences, 5);

        let kinds: Vec<&str> = options
            .rules()
            .iter()
            .map(|r| match r {
                Rule::Exclude(_) => "exclude",
                Rule::Include(_) => "include",
                Rule::LooseOrder(_) => "loose",
                Rule::StrictOrder(_) => "strict",
                Rule::CustomComparer { .. } => "custom",
            })
            .collect();
        assert_eq!(kinds, vec!["exclude", "include", "loose", "strict", "strict"]);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = OptionsProfile::from_toml_str("strict = true").unwrap_err();
        assert!(matches!(err, EquivError::InvalidProfile { .. }));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let err = OptionsProfile::from_toml_str("max_differences = 0").unwrap_err();
        assert!(matches!(err, EquivError::InvalidProfile { .. }));
    }

    #[test]
    fn test_bad_pattern_surfaces_as_path_error() {
        let profile = OptionsProfile::from_toml_str(r#"excluding = ["a..b"]"#).unwrap();
        let err = profile.to_options().unwrap_err();
        assert!(matches!(err, EquivError::InvalidPathPattern { .. }));
    }
}
