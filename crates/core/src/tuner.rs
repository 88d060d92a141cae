//! Tuner configuration rules.
//!
//! A tuning is a list of pitch names paired positionally with reference
//! frequencies: `notes[i]` sounds at `frequencies[i]` Hz.

use crate::error::CoreError;

/// Default tuning name for new configurations.
pub const DEFAULT_TUNING_NAME: &str = "Standard";

/// Upper bound for a reference frequency; anything above is a data-entry error.
pub const MAX_FREQUENCY_HZ: f64 = 20_000.0;

/// Validate that notes and frequencies form a positional pairing.
pub fn validate_pairing(notes: &[String], frequencies: &[f64]) -> Result<(), CoreError> {
    if notes.len() != frequencies.len() {
        return Err(CoreError::field(
            "frequencies",
            format!(
                "Expected {} frequencies to pair with {} notes, got {}",
                notes.len(),
                notes.len(),
                frequencies.len()
            ),
        ));
    }
    if let Some(i) = notes.iter().position(|n| n.trim().is_empty()) {
        return Err(CoreError::field(
            "notes",
            format!("Note at position {i} must not be empty"),
        ));
    }
    if let Some(i) = frequencies
        .iter()
        .position(|f| !f.is_finite() || *f <= 0.0 || *f > MAX_FREQUENCY_HZ)
    {
        return Err(CoreError::field(
            "frequencies",
            format!("Frequency at position {i} must be between 0 and {MAX_FREQUENCY_HZ} Hz"),
        ));
    }
    Ok(())
}
