use anyhow::Result;
use contracts::values::ValueKind;

pub fn value_types() -> Result<()> {
    for kind in ValueKind::ALL {
        println!("{kind}");
    }
    Ok(())
}
