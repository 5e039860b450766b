use sift_core::error::SiftError;
use sift_core::rank::synthesize_query;

pub fn run(persona: &str, task: &str) -> Result<(), SiftError> {
    println!("{}", synthesize_query(persona, task));
    Ok(())
}
