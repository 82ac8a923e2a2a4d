//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a required text field holds something other than whitespace.
pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(format!("The {field} field is required.").into());
        return Err(err);
    }
    Ok(())
}

/// Parses a release year submitted as form text.
///
/// # Examples
///
/// ```ignore
/// parse_release_year("1995")  // Ok(1995)
/// parse_release_year(" 1995 ") // Ok(1995)
/// parse_release_year("")      // Err - required
/// parse_release_year("199x")  // Err - not a number
/// ```
pub fn parse_release_year(value: &str) -> Result<i32, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("The ReleaseYear field is required.".into());
        return Err(err);
    }

    value.parse::<i32>().map_err(|_| {
        let mut err = ValidationError::new("release_year_format");
        err.message = Some(format!("The value '{value}' is not valid for ReleaseYear.").into());
        err
    })
}

/// Parses a numeric identifier submitted as form text.
pub fn parse_identifier(field: &'static str, value: &str) -> Result<i64, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(format!("The {field} field is required.").into());
        return Err(err);
    }

    value.parse::<i64>().map_err(|_| {
        let mut err = ValidationError::new("identifier_format");
        err.message = Some(format!("The value '{value}' is not valid for {field}.").into());
        err
    })
}
