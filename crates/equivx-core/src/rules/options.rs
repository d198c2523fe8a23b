//! Comparison options and the builder DSL.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::catalog::MemberProvider;
use crate::errors::Result;
use crate::model::{PathPattern, TypeName};
use crate::rules::selector::{NodeInfo, Selector};
use crate::rules::{Rule, ValueComparer};

/// Which type drives member discovery for a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeSelection {
    /// The statically known type at the node
    #[default]
    Declared,
    /// The runtime type of the expectation
    Runtime,
}

/// What to do when a branch revisits one of its ancestors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclicReferenceHandling {
    /// Record a cyclic-reference difference
    #[default]
    Throw,
    /// Treat the revisited node as equivalent
    Ignore,
}

/// Bounds on the failure report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLimits {
    pub max_differences: usize,
    pub max_value_chars: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            max_differences: 25,
            max_value_chars: 256,
        }
    }
}

/// Immutable-during-a-run comparison configuration
///
/// Built fluently; methods that parse a path pattern return `Result`.
///
/// ```
/// use equivx_core::rules::EquivalencyOptions;
///
/// let options = EquivalencyOptions::new()
///     .excluding("Audit")?
///     .with_strict_ordering_for("Orders[*].Lines")?
///     .ignoring_cyclic_references();
/// assert_eq!(options.rules().len(), 2);
/// # Ok::<(), equivx_core::errors::EquivError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EquivalencyOptions {
    type_selection: TypeSelection,
    cyclic_references: CyclicReferenceHandling,
    exclude_missing_members: bool,
    root_type: Option<TypeName>,
    rules: Vec<Rule>,
    limits: ReportLimits,
}

impl EquivalencyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the node at `pattern` and everything below it
    ///
    /// # Errors
    ///
    /// `InvalidPathPattern` if the pattern does not parse.
    pub fn excluding(self, pattern: &str) -> Result<Self> {
        Ok(self.with_rule(Rule::Exclude(Selector::Path(PathPattern::parse(pattern)?))))
    }

    pub fn excluding_member(self, declaring_type: impl Into<TypeName>, name: &str) -> Self {
        self.with_rule(Rule::Exclude(Selector::Member {
            declaring_type: declaring_type.into(),
            name: name.to_string(),
        }))
    }

    pub fn excluding_when<F>(self, predicate: F) -> Self
    where
        F: Fn(&NodeInfo) -> bool + Send + Sync + 'static,
    {
        self.with_rule(Rule::Exclude(Selector::Predicate(Arc::new(predicate))))
    }

    /// Compare only members at, above, or below `pattern`
    ///
    /// Once any inclusion is registered, member nodes that are neither
    /// included, on the way to an included path, nor below one are skipped.
    ///
    /// # Errors
    ///
    /// `InvalidPathPattern` if the pattern does not parse.
    pub fn including(self, pattern: &str) -> Result<Self> {
        Ok(self.with_rule(Rule::Include(Selector::Path(PathPattern::parse(pattern)?))))
    }

    /// Don't report expectation members the subject does not have
    pub fn excluding_missing_members(mut self) -> Self {
        self.exclude_missing_members = true;
        self
    }

    pub fn with_strict_ordering(self) -> Self {
        self.with_rule(Rule::StrictOrder(Selector::Any))
    }

    /// # Errors
    ///
    /// `InvalidPathPattern` if the pattern does not parse.
    pub fn with_strict_ordering_for(self, pattern: &str) -> Result<Self> {
        Ok(self.with_rule(Rule::StrictOrder(Selector::Path(PathPattern::parse(pattern)?))))
    }

    /// # Errors
    ///
    /// `InvalidPathPattern` if the pattern does not parse.
    pub fn without_strict_ordering_for(self, pattern: &str) -> Result<Self> {
        Ok(self.with_rule(Rule::LooseOrder(Selector::Path(PathPattern::parse(pattern)?))))
    }

    /// Compare every node whose expectation has exactly the runtime type
    /// `type_name` with `comparer`; subtypes keep their own strategy
    pub fn using<C>(self, type_name: impl Into<TypeName>, comparer: C) -> Self
    where
        C: ValueComparer + 'static,
    {
        let type_name = type_name.into();
        self.with_rule(Rule::CustomComparer {
            selector: Selector::TypeIs(type_name.clone()),
            applicable_type: type_name,
            comparer: Arc::new(comparer),
        })
    }

    /// Compare the node at `pattern` with `comparer`
    ///
    /// # Errors
    ///
    /// `InvalidPathPattern` if the pattern does not parse.
    pub fn using_for_path<C>(
        self,
        pattern: &str,
        type_name: impl Into<TypeName>,
        comparer: C,
    ) -> Result<Self>
    where
        C: ValueComparer + 'static,
    {
        Ok(self.with_rule(Rule::CustomComparer {
            selector: Selector::Path(PathPattern::parse(pattern)?),
            applicable_type: type_name.into(),
            comparer: Arc::new(comparer),
        }))
    }

    pub fn ignoring_cyclic_references(mut self) -> Self {
        self.cyclic_references = CyclicReferenceHandling::Ignore;
        self
    }

    pub fn respecting_runtime_types(mut self) -> Self {
        self.type_selection = TypeSelection::Runtime;
        self
    }

    pub fn respecting_declared_types(mut self) -> Self {
        self.type_selection = TypeSelection::Declared;
        self
    }

    /// Declared type of the root node
    pub fn with_root_type(mut self, type_name: impl Into<TypeName>) -> Self {
        self.root_type = Some(type_name.into());
        self
    }

    pub fn with_limits(mut self, limits: ReportLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Append an arbitrary rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn type_selection(&self) -> TypeSelection {
        self.type_selection
    }

    pub fn cyclic_references(&self) -> CyclicReferenceHandling {
        self.cyclic_references
    }

    pub fn excludes_missing_members(&self) -> bool {
        self.exclude_missing_members
    }

    pub fn root_type(&self) -> Option<&TypeName> {
        self.root_type.as_ref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn limits(&self) -> ReportLimits {
        self.limits
    }

    pub fn has_inclusions(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Include(_)))
    }

    /// First matching exclusion. The root is never excluded.
    ///
    /// # Errors
    ///
    /// Propagates `UnknownType` from selector evaluation.
    pub fn is_excluded(&self, node: &NodeInfo, provider: &dyn MemberProvider) -> Result<bool> {
        if node.is_root() {
            return Ok(false);
        }
        for rule in &self.rules {
            if let Rule::Exclude(selector) = rule {
                if selector.matches(node, provider)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Whether the node falls under an inclusion
    ///
    /// # Errors
    ///
    /// Propagates `UnknownType` from selector evaluation.
    pub fn inclusion_of(&self, node: &NodeInfo, provider: &dyn MemberProvider) -> Result<Inclusion> {
        let mut on_the_way = false;
        for rule in &self.rules {
            if let Rule::Include(selector) = rule {
                if selector.covers(node, provider)? {
                    return Ok(Inclusion::Included);
                }
                on_the_way |= selector.leads_to(node);
            }
        }
        Ok(if on_the_way {
            Inclusion::OnTheWay
        } else {
            Inclusion::Outside
        })
    }

    /// First matching custom comparer
    ///
    /// # Errors
    ///
    /// Propagates `UnknownType` from selector evaluation.
    pub fn custom_comparer_for(
        &self,
        node: &NodeInfo,
        provider: &dyn MemberProvider,
    ) -> Result<Option<(TypeName, Arc<dyn ValueComparer>)>> {
        for rule in &self.rules {
            if let Rule::CustomComparer {
                selector,
                applicable_type,
                comparer,
            } = rule
            {
                if selector.matches(node, provider)? {
                    return Ok(Some((applicable_type.clone(), comparer.clone())));
                }
            }
        }
        Ok(None)
    }

    /// Strict ordering applies unless a loose-order rule matches; with no
    /// matching rule at all collections are unordered.
    ///
    /// # Errors
    ///
    /// Propagates `UnknownType` from selector evaluation.
    pub fn is_strictly_ordered(
        &self,
        node: &NodeInfo,
        provider: &dyn MemberProvider,
    ) -> Result<bool> {
        for rule in &self.rules {
            if let Rule::LooseOrder(selector) = rule {
                if selector.matches(node, provider)? {
                    return Ok(false);
                }
            }
        }
        for rule in &self.rules {
            if let Rule::StrictOrder(selector) = rule {
                if selector.matches(node, provider)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

/// Position of a member node relative to the inclusion rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Named by an inclusion, or below such a node
    Included,
    /// An ancestor of an included node
    OnTheWay,
    Outside,
}

/// One line per option, as listed under "With configuration:"
impl fmt::Display for EquivalencyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_selection {
            TypeSelection::Declared => writeln!(f, "- Use declared types and members")?,
            TypeSelection::Runtime => writeln!(f, "- Use runtime types and members")?,
        }
        if let Some(root) = &self.root_type {
            writeln!(f, "- Treat the expectation as a {}", root)?;
        }
        match self.cyclic_references {
            CyclicReferenceHandling::Throw => writeln!(f, "- Report cyclic references")?,
            CyclicReferenceHandling::Ignore => writeln!(f, "- Ignore cyclic references")?,
        }
        if self.exclude_missing_members {
            writeln!(f, "- Ignore members missing on the subject")?;
        }
        if !self.rules.iter().any(|r| matches!(r, Rule::StrictOrder(_))) {
            writeln!(f, "- Compare collections in any order")?;
        }
        for rule in &self.rules {
            writeln!(f, "- {}", rule)?;
        }
        Ok(())
    }
}
