use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use uuid::Uuid;

use super::{CustomRule, FieldValue, RuleRegistry, Siblings, ValidationError};

/// A validation rule as declared on a field
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    /// Field must not be empty
    Required,
    /// Field must not be empty when the named sibling is empty
    RequiredWithout(&'static str),
    /// Exact length of a string or collection, exact value of a number
    Len(usize),
    OneOf(&'static [&'static str]),
    /// Length of a string or collection, or the number itself, must exceed this
    GreaterThan(i64),
    /// Hyphenated RFC 4122 UUID
    Uuid,
    /// A rule from the registry, by name
    Custom(&'static str),
}

/// When a field skips its non-presence rules
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Omit {
    Never,
    /// Optional field left unset
    Absent,
    /// Zero value: `""`, `0`, `false`, empty list, or unset
    Zero,
}

impl Omit {
    fn skips(&self, value: &FieldValue<'_>) -> bool {
        match self {
            Omit::Never => false,
            Omit::Absent => value.is_absent(),
            Omit::Zero => value.is_empty(),
        }
    }
}

/// Declaration of one field: name, optional display label and ordered rules
#[derive(Clone, Debug)]
pub struct FieldSchema {
    name: &'static str,
    label: Option<&'static str>,
    omit: Omit,
    rules: Vec<Rule>,
    each: Vec<Rule>,
}

impl FieldSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            label: None,
            omit: Omit::Never,
            rules: Vec::new(),
            each: Vec::new(),
        }
    }

    /// Human-readable name used in error messages
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Skip all but the presence rules when an optional field is unset.
    /// A present but empty value is still checked.
    pub fn omit_empty(mut self) -> Self {
        self.omit = Omit::Absent;
        self
    }

    /// Skip all but the presence rules when the value is its zero value
    pub fn omit_zero(mut self) -> Self {
        self.omit = Omit::Zero;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Rule applied to every element of a list field
    pub fn each(mut self, rule: Rule) -> Self {
        self.each.push(rule);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn display_label(&self) -> &'static str {
        self.label.unwrap_or(self.name)
    }
}

/// Compiled, immutable field list of one record type
pub struct Schema {
    name: &'static str,
    fields: Vec<CompiledField>,
}

impl Schema {
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn fields(&self) -> &[CompiledField] {
        &self.fields
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields.iter().map(|field| field.name).collect_vec())
            .finish()
    }
}

pub struct SchemaBuilder {
    name: &'static str,
    fields: Vec<FieldSchema>,
}

impl SchemaBuilder {
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Resolve rule names and sibling references against `registry`
    pub fn build(self, registry: &RuleRegistry) -> Result<Schema, ValidationError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name) {
                return Err(self.error(format!("field '{}' is declared twice", field.name)));
            }
        }

        let fields = self
            .fields
            .iter()
            .map(|field| {
                let label = field.display_label();
                let (presence, checks) = self.compile_rules(field, &field.rules, registry)?;
                let (each_presence, each_checks) = self.compile_rules(field, &field.each, registry)?;
                if each_presence
                    .iter()
                    .any(|check| matches!(check, Check::RequiredWithout { .. }))
                {
                    return Err(self.error(format!(
                        "field '{}' uses a sibling rule on its elements",
                        field.name
                    )));
                }
                Ok(CompiledField {
                    name: field.name,
                    label,
                    omit: field.omit,
                    presence,
                    checks,
                    each: each_presence.into_iter().chain(each_checks).collect(),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        log::debug!("Compiled validation schema '{}' ({} fields)", self.name, fields.len());
        Ok(Schema {
            name: self.name,
            fields,
        })
    }

    /// Split rules into presence checks and the remaining checks, the latter
    /// being structural rules in declared order followed by custom rules in
    /// registry order
    fn compile_rules(
        &self,
        field: &FieldSchema,
        rules: &[Rule],
        registry: &RuleRegistry,
    ) -> Result<(Vec<Check>, Vec<Check>), ValidationError> {
        let mut presence = Vec::new();
        let mut structural = Vec::new();
        let mut custom = Vec::new();

        for rule in rules {
            match rule {
                Rule::Required => presence.push(Check::Required),
                Rule::RequiredWithout(sibling) => {
                    let sibling_field = self
                        .fields
                        .iter()
                        .find(|f| f.name == *sibling)
                        .ok_or_else(|| {
                            self.error(format!(
                                "field '{}' refers to unknown sibling '{}'",
                                field.name, sibling
                            ))
                        })?;
                    presence.push(Check::RequiredWithout {
                        sibling: *sibling,
                        sibling_label: sibling_field.display_label(),
                    });
                }
                Rule::Len(n) => structural.push(Check::Len(*n)),
                Rule::OneOf(allowed) => structural.push(Check::OneOf(*allowed)),
                Rule::GreaterThan(n) => structural.push(Check::GreaterThan(*n)),
                Rule::Uuid => structural.push(Check::Uuid),
                Rule::Custom(name) => {
                    let (position, rule) = registry.lookup(name).ok_or_else(|| {
                        self.error(format!(
                            "field '{}' uses unregistered rule '{}'",
                            field.name, name
                        ))
                    })?;
                    custom.push((position, rule));
                }
            }
        }

        custom.sort_by_key(|(position, _)| *position);
        structural.extend(custom.into_iter().map(|(_, rule)| Check::Custom(rule)));
        Ok((presence, structural))
    }

    fn error(&self, detail: String) -> ValidationError {
        ValidationError::Schema(format!("{}: {}", self.name, detail))
    }
}

pub(crate) struct CompiledField {
    pub(crate) name: &'static str,
    label: &'static str,
    omit: Omit,
    presence: Vec<Check>,
    checks: Vec<Check>,
    each: Vec<Check>,
}

impl CompiledField {
    /// Message of the first rule the value violates, if any
    pub(crate) fn check(&self, value: &FieldValue<'_>, siblings: &Siblings<'_>) -> Option<String> {
        if let Some(failed) = self.presence.iter().find(|c| !c.is_valid(value, siblings)) {
            return Some(failed.message(self.label));
        }
        if self.omit.skips(value) {
            return None;
        }
        self.checks
            .iter()
            .find(|c| !c.is_valid(value, siblings))
            .map(|failed| failed.message(self.label))
    }

    pub(crate) fn check_element(
        &self,
        value: &FieldValue<'_>,
        siblings: &Siblings<'_>,
    ) -> Option<String> {
        self.each
            .iter()
            .find(|c| !c.is_valid(value, siblings))
            .map(|failed| failed.message(self.label))
    }
}

enum Check {
    Required,
    RequiredWithout {
        sibling: &'static str,
        sibling_label: &'static str,
    },
    Len(usize),
    OneOf(&'static [&'static str]),
    GreaterThan(i64),
    Uuid,
    Custom(Arc<dyn CustomRule>),
}

impl Check {
    fn is_valid(&self, value: &FieldValue<'_>, siblings: &Siblings<'_>) -> bool {
        match self {
            Check::Required => !value.is_empty(),
            Check::RequiredWithout { sibling, .. } => {
                !siblings.value(sibling).is_empty() || !value.is_empty()
            }
            Check::Len(n) => value.magnitude() == Some(*n as f64),
            Check::OneOf(allowed) => match value {
                FieldValue::Text(s) => allowed.iter().any(|a| a == s),
                FieldValue::Int(i) => allowed.iter().any(|a| *a == i.to_string()),
                _ => false,
            },
            Check::GreaterThan(n) => value.magnitude().is_some_and(|m| m > *n as f64),
            Check::Uuid => value
                .as_text()
                .is_some_and(|s| s.len() == 36 && Uuid::parse_str(s).is_ok()),
            Check::Custom(rule) => rule.is_valid(value, siblings),
        }
    }

    fn message(&self, label: &str) -> String {
        match self {
            Check::Required => format!("{label} is required"),
            Check::RequiredWithout { sibling_label, .. } => {
                format!("{label} is required unless {sibling_label} is set")
            }
            Check::Len(n) => format!("{label} must have length {n}"),
            Check::OneOf(allowed) => format!("{label} must be one of {}", allowed.join(", ")),
            Check::GreaterThan(n) => format!("{label} must be greater than {n}"),
            Check::Uuid => format!("{label} must be a UUID"),
            Check::Custom(rule) => rule.message(label),
        }
    }
}
