use std::sync::Arc;

use once_cell::sync::Lazy;

use super::rules::{
    DurationRule, IntervalDatetimeRule, NonEmptyStringRule, UnreservedCharsRule, UuidOrNameRule,
    ValueTypeRule,
};
use super::{FieldValue, Siblings};

/// Process-wide registry with the standard custom rules, built on first use
pub static RULES: Lazy<RuleRegistry> = Lazy::new(RuleRegistry::standard);

/// A named semantic check layered on top of the structural rules
pub trait CustomRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_valid(&self, value: &FieldValue<'_>, siblings: &Siblings<'_>) -> bool;

    fn message(&self, label: &str) -> String;
}

/// Custom rules by name. Registration order is evaluation order within a
/// field. Immutable once built.
pub struct RuleRegistry {
    rules: Vec<Arc<dyn CustomRule>>,
}

impl RuleRegistry {
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder { rules: Vec::new() }
    }

    pub fn standard() -> Self {
        Self::builder()
            .register(DurationRule)
            .register(UuidOrNameRule)
            .register(NonEmptyStringRule)
            .register(ValueTypeRule)
            .register(UnreservedCharsRule)
            .register(IntervalDatetimeRule)
            .build()
    }

    /// Position and implementation of the rule called `name`
    pub(crate) fn lookup(&self, name: &str) -> Option<(usize, Arc<dyn CustomRule>)> {
        self.rules
            .iter()
            .position(|rule| rule.name() == name)
            .map(|idx| (idx, Arc::clone(&self.rules[idx])))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }
}

pub struct RuleRegistryBuilder {
    rules: Vec<Arc<dyn CustomRule>>,
}

impl RuleRegistryBuilder {
    /// Add a rule; a rule with the same name replaces the earlier one in place
    pub fn register(mut self, rule: impl CustomRule + 'static) -> Self {
        let rule: Arc<dyn CustomRule> = Arc::new(rule);
        match self.rules.iter().position(|r| r.name() == rule.name()) {
            Some(idx) => {
                log::warn!("Replacing custom validation rule '{}'", rule.name());
                self.rules[idx] = rule;
            }
            None => self.rules.push(rule),
        }
        self
    }

    pub fn build(self) -> RuleRegistry {
        log::debug!("Built validation rule registry with {} rule(s)", self.rules.len());
        RuleRegistry { rules: self.rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules;

    struct AlwaysFails;

    impl CustomRule for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        fn is_valid(&self, _: &FieldValue<'_>, _: &Siblings<'_>) -> bool {
            false
        }

        fn message(&self, label: &str) -> String {
            format!("{label} is never valid")
        }
    }

    #[test]
    fn test_standard_order() {
        let names: Vec<_> = RULES.names().collect();
        assert_eq!(
            names,
            vec![
                rules::DURATION,
                rules::UUID_OR_NAME,
                rules::NON_EMPTY_STRING,
                rules::VALUE_TYPE,
                rules::UNRESERVED_CHARS,
                rules::INTERVAL_DATETIME,
            ]
        );
    }

    #[test]
    fn test_register_replaces_by_name() {
        let registry = RuleRegistry::builder()
            .register(AlwaysFails)
            .register(DurationRule)
            .register(AlwaysFails)
            .build();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["always-fails", rules::DURATION]);
        assert_eq!(registry.lookup(rules::DURATION).map(|(idx, _)| idx), Some(1));
        assert!(!registry.contains("missing"));
    }
}
