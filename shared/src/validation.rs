//! Input validation for workout data
//!
//! Field-level checks used by the editing hooks before a value reaches the
//! in-memory workout. Whole-workout commit gating uses the `validator` derive
//! on [`crate::models::Workout`].

/// Validate a workout name
pub fn validate_workout_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Workout name cannot be empty".to_string());
    }
    if name.len() > 120 {
        return Err("Workout name too long".to_string());
    }
    Ok(())
}

/// Validate a set weight (unit-less beyond UI convention)
pub fn validate_weight(weight: f64) -> Result<(), String> {
    if weight.is_nan() || weight.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight < 0.0 {
        return Err("Weight cannot be negative".to_string());
    }
    if weight > 1000.0 {
        return Err("Weight unreasonably high".to_string());
    }
    Ok(())
}

/// Validate a rep count
pub fn validate_reps(reps: u32) -> Result<(), String> {
    if reps > 1000 {
        return Err("Rep count unreasonably high".to_string());
    }
    Ok(())
}

/// Validate a rest period in seconds
pub fn validate_breaktime(seconds: u32) -> Result<(), String> {
    if seconds > 3600 {
        // 1 hour
        return Err("Break time cannot exceed 1 hour".to_string());
    }
    Ok(())
}
