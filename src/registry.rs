//! The ordered card type registry.
//!
//! Detection walks the registry front to back and stops at the first rule
//! whose pattern matches, so the order in which rules are registered is part
//! of the registry's meaning. A registry is assembled once with
//! [`RegistryBuilder`] and immutable afterwards; clones share the compiled
//! rules.

use crate::error::RuleError;
use crate::rule::{CardTypeRule, RuleConfig, BUILTIN_RULES};
use std::sync::Arc;

/// An immutable, ordered sequence of card type rules.
///
/// # Example
///
/// ```
/// use cardcheck::registry::Registry;
/// use cardcheck::rule::types;
///
/// let registry = Registry::builtin();
/// assert!(registry.contains(types::VISA));
/// assert_eq!(registry.first_match("4917300800000000").unwrap().card_type(), types::VISA_ELECTRON);
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    rules: Arc<[CardTypeRule]>,
}

impl Registry {
    /// Returns the built-in registry.
    pub fn builtin() -> Self {
        RegistryBuilder::builtin().build()
    }

    /// Starts a registry from the built-in rules.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::builtin()
    }

    /// Looks up a rule by type identifier.
    pub fn get(&self, card_type: &str) -> Option<&CardTypeRule> {
        self.rules.iter().find(|rule| rule.card_type() == card_type)
    }

    /// Returns true if the type identifier is registered.
    #[inline]
    pub fn contains(&self, card_type: &str) -> bool {
        self.get(card_type).is_some()
    }

    /// Returns the first rule, in registration order, whose pattern matches.
    pub fn first_match(&self, number: &str) -> Option<&CardTypeRule> {
        self.rules.iter().find(|rule| rule.matches(number))
    }

    /// Iterates over the rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &CardTypeRule> {
        self.rules.iter()
    }

    /// Iterates over the registered type identifiers in evaluation order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(CardTypeRule::card_type)
    }

    /// Returns the number of rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a CardTypeRule;
    type IntoIter = std::slice::Iter<'a, CardTypeRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Assembles a [`Registry`].
///
/// A rule whose type is already present replaces the existing rule at its
/// position; a new type is appended after every existing rule. Types added
/// this way therefore lose to any earlier rule with an overlapping prefix,
/// which is what the BIN cache is for.
///
/// # Example
///
/// ```
/// use cardcheck::registry::RegistryBuilder;
/// use cardcheck::rule::RuleConfig;
///
/// let registry = RegistryBuilder::builtin()
///     .with_config(&RuleConfig::new("testcard", "^123456", [16]).luhn(false))
///     .unwrap()
///     .build();
///
/// assert_eq!(registry.types().last(), Some("testcard"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    rules: Vec<CardTypeRule>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder holding the built-in rules.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(CardTypeRule::from_builtin)
            .collect::<Result<Vec<_>, _>>()
            .expect("built-in card patterns are valid");
        Self { rules }
    }

    /// Adds a compiled rule, replacing any rule with the same type.
    pub fn with_rule(mut self, rule: CardTypeRule) -> Self {
        match self
            .rules
            .iter_mut()
            .find(|existing| existing.card_type() == rule.card_type())
        {
            Some(existing) => {
                tracing::debug!(card_type = rule.card_type(), "replacing card type rule");
                *existing = rule;
            }
            None => {
                tracing::debug!(card_type = rule.card_type(), "appending card type rule");
                self.rules.push(rule);
            }
        }
        self
    }

    /// Compiles and adds a rule from configuration.
    pub fn with_config(self, config: &RuleConfig) -> Result<Self, RuleError> {
        let rule = CardTypeRule::compile(config)?;
        Ok(self.with_rule(rule))
    }

    /// Compiles and adds several rules, in order.
    pub fn with_configs<'a>(
        self,
        configs: impl IntoIterator<Item = &'a RuleConfig>,
    ) -> Result<Self, RuleError> {
        configs
            .into_iter()
            .try_fold(self, |builder, config| builder.with_config(config))
    }

    /// Removes a rule by type identifier.
    pub fn without(mut self, card_type: &str) -> Self {
        self.rules.retain(|rule| rule.card_type() != card_type);
        self
    }

    /// Finishes the registry.
    pub fn build(self) -> Registry {
        Registry {
            rules: self.rules.into(),
        }
    }
}
