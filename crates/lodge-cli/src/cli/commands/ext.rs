//! `lodge ext` – resolve a destination without writing anything.

use anyhow::Result;
use lodge_core::extension::extension_token;
use lodge_core::Dispatcher;

pub fn run_ext(destination: &str) -> Result<()> {
    let driver = Dispatcher::default().resolve(destination)?;
    let token = extension_token(destination).unwrap_or_default();
    println!("{} -> {}", token, driver.name());
    Ok(())
}
