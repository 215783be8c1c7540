use std::fmt;

use thiserror::Error;

use super::{FieldValue, Record, Siblings};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0}")]
    ContractInvalid(Violations),
    #[error("invalid schema: {0}")]
    Schema(String),
}

/// One failed field, addressed by its dotted path
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// All violations of one validation pass, in field declaration order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = itertools::join(self.0.iter().map(|v| &v.message), "; ");
        f.write_str(&joined)
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Check every declared field of `record`, descending into nested records and
/// list elements. Reports all failing fields, one message per field.
pub fn validate(record: &dyn Record) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    collect(record, "", &mut violations)?;
    if violations.is_empty() {
        Ok(())
    } else {
        log::debug!("Validation failed with {} violation(s)", violations.len());
        Err(ValidationError::ContractInvalid(Violations(violations)))
    }
}

fn collect(
    record: &dyn Record,
    prefix: &str,
    violations: &mut Vec<Violation>,
) -> Result<(), ValidationError> {
    let schema = record.schema()?;
    let siblings = Siblings::new(record);

    for field in schema.fields() {
        let path = format!("{prefix}{}", field.name);
        let value = record.field(field.name);

        if let Some(message) = field.check(&value, &siblings) {
            violations.push(Violation {
                field: path,
                message,
            });
            continue;
        }

        match value {
            FieldValue::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if let Some(message) = field.check_element(item, &siblings) {
                        violations.push(Violation {
                            field: format!("{path}[{idx}]"),
                            message,
                        });
                    }
                }
            }
            FieldValue::Record(nested) => collect(nested, &format!("{path}."), violations)?,
            FieldValue::Records(nested) => {
                for (idx, item) in nested.into_iter().enumerate() {
                    collect(item, &format!("{path}[{idx}]."), violations)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
