use ductwise_core::error::DuctError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), DuctError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
