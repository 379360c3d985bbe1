//! `lodge save` – write JSON input through the dispatcher.

use anyhow::{Context, Result};
use lodge_core::{save, NdArray, SaveOptions, Value};
use std::fs;
use std::io::{self, Read};

#[derive(Debug)]
pub struct SaveArgs {
    pub input: String,
    pub destination: String,
    pub array: bool,
    pub options: SaveOptions,
}

/// Parse JSON text into a value; with `array`, the input must be a
/// rectangular nest of numbers.
pub fn read_value(text: &str, array: bool) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(text).context("input is not valid JSON")?;
    let value = Value::from(json);
    if !array {
        return Ok(value);
    }
    let array = NdArray::from_nested(&value)
        .context("input is not a rectangular array of numbers")?;
    Ok(Value::Array(array))
}

pub fn run_save(args: &SaveArgs) -> Result<()> {
    let text = if args.input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.input).with_context(|| format!("reading {}", args.input))?
    };
    let value = read_value(&text, args.array)?;

    let outcome = save(&value, args.destination.as_str(), &args.options)?;
    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
    println!("{}", serde_json::to_string(&outcome.descriptor)?);
    Ok(())
}
