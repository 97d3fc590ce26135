//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials are configured before starting
//! operations that would otherwise fail midway. A missing credential is a
//! fatal startup condition reported to the operator, never a retryable
//! runtime error.

use crate::error::{Result, TychoError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Indexing a local CSV requires the embedding credential.
    IndexLocal,
    /// Indexing from the TechTransfer API also requires the NASA key.
    IndexRemote,
    /// Asking/chatting requires the embedding and generation credential.
    Query,
    /// Search requires the embedding credential only.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::IndexLocal | Operation::Query | Operation::Search => {
            check_gemini_key()?;
        }
        Operation::IndexRemote => {
            check_gemini_key()?;
            check_nasa_key()?;
        }
    }
    Ok(())
}

/// Check that the Gemini API key is configured.
fn check_gemini_key() -> Result<()> {
    crate::gemini::api_key().map(|_| ())
}

/// Check that the NASA API key is configured.
fn check_nasa_key() -> Result<()> {
    match std::env::var("NASA_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        _ => Err(TychoError::Config(
            "NASA_API_KEY not set. Get a key at https://api.nasa.gov and export it.".to_string(),
        )),
    }
}
