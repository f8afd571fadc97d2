//! Validation utilities for dashboard inputs

// ============================================================================
// Control Validations
// ============================================================================

/// Validate a month selector value
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

/// Validate the year selector: first supported year through the current year
pub fn validate_year(year: i32, start_year: i32, current_year: i32) -> Result<(), &'static str> {
    if year < start_year {
        return Err("Year is before the first available year");
    }
    if year > current_year {
        return Err("Year cannot be in the future");
    }
    Ok(())
}

/// Years offered by the year selector, oldest first
pub fn selectable_years(start_year: i32, current_year: i32) -> Vec<i32> {
    (start_year..=current_year).collect()
}

/// Validate a district name used as a path key
pub fn validate_district_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("District name cannot be empty");
    }
    if trimmed.len() > 64 {
        return Err("District name must be at most 64 characters");
    }
    Ok(())
}
