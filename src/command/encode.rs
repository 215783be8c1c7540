use anyhow::{anyhow, Result};
use contracts::values::{self, ValueKind};
use serde_json::Value;

use crate::argsets::EncodeArgs;

pub fn encode(args: EncodeArgs) -> Result<()> {
    let kind = ValueKind::normalize(&args.value_type)
        .ok_or_else(|| anyhow!("Unknown value type '{}'", args.value_type))?;
    let literal = if kind.is_array() {
        array_literal(&args.literal)
    } else {
        args.literal
    };
    let value = values::decode(kind, &literal)?;
    print!("{}", values::encode(kind, &value)?);
    Ok(())
}

/// Arrays may be given as JSON (`[1,2]`, `["a","b"]`) as well as in canonical
/// form; JSON input is rewritten to the canonical `[a, b]` before decoding.
fn array_literal(literal: &str) -> String {
    match serde_json::from_str::<Vec<Value>>(literal) {
        Ok(elements) => {
            let elements: Vec<String> = elements
                .into_iter()
                .map(|element| match element {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect();
            format!("[{}]", elements.join(", "))
        }
        Err(_) => literal.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_literal_accepts_json() {
        assert_eq!(array_literal("[1.5,2.0]"), "[1.5, 2.0]");
        assert_eq!(array_literal(r#"["a","b"]"#), "[a, b]");
        assert_eq!(array_literal("[]"), "[]");
        assert_eq!(array_literal("[on, off]"), "[on, off]");
    }
}
