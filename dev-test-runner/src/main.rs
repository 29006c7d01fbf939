//! Smoke runner: replays the mock API scenario against the built-in schemas.
use std::io::Write;

use anyhow::{Context, bail};
use json_adt::catalog::Catalog;
use json_adt::deserialize;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let catalog = Catalog::builtin()?;
    let result = catalog.get("result").context("missing `result` schema")?;
    let two_bits = catalog.get("two-bits").context("missing `two-bits` schema")?;

    let error_data = json!({
        "code": 1,
        "message": "invalid request"
    });
    let success_data = json!({
        "object": "ack",
        "data": {
            "a": "ok",
            "b": 1,
            "c": 3.5
        }
    });
    let invalid_data = json!({
        "bad": "wolf"
    });

    let mut stdout = std::io::stdout();

    deserialize(result, &error_data)?;
    write!(stdout, ".")?;

    let success = deserialize(result, &success_data)?;
    if !result.contains(&success) {
        bail!("{result} does not contain its own output {success:?}");
    }
    write!(stdout, ".")?;

    deserialize(two_bits, &json!([true, false]))?;
    write!(stdout, ".")?;

    match deserialize(result, &invalid_data) {
        Ok(value) => bail!("Nope!! {value:?}"),
        Err(_) => write!(stdout, ".")?,
    }

    writeln!(stdout, "Ok.")?;
    Ok(())
}
