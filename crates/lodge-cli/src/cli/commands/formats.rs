//! `lodge formats` – list the registry.

use anyhow::Result;
use lodge_core::FormatRegistry;

pub fn run_formats() -> Result<()> {
    let registry = FormatRegistry::global();
    println!("{:<8} {}", "EXT", "DRIVER");
    for (token, driver) in registry.entries() {
        println!("{:<8} {}", token, driver);
    }
    Ok(())
}
