use serde::Serialize;
use sift_core::error::SiftError;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), SiftError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
