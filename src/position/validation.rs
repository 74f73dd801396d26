use super::PositionReport;
use serde_json::Value;
use std::fmt;

/// Validation errors for inbound position reports
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NotAnObject,
    MissingId,
    InvalidId,
    EmptyId,
    MissingCoordinate(&'static str),
    NonNumericCoordinate(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAnObject => write!(f, "report must be a JSON object"),
            ValidationError::MissingId => write!(f, "id is required"),
            ValidationError::InvalidId => write!(f, "id must be a string"),
            ValidationError::EmptyId => write!(f, "id must not be empty"),
            ValidationError::MissingCoordinate(name) => write!(f, "{} is required", name),
            ValidationError::NonNumericCoordinate(name) => {
                write!(f, "{} must be a number", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates a raw report body.
///
/// Rules:
/// - Body must be a JSON object
/// - `id`: required string, not blank (the id is kept exactly as sent)
/// - `lat`, `lng`: required JSON numbers (numeric strings are rejected)
/// - Extra fields are ignored
///
/// Blank and non-string ids (`"  "`, `42`) are rejected. This is stricter
/// than a truthiness check on `id`, which would accept both.
pub fn validate_report(body: &Value) -> Result<PositionReport, ValidationError> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    let id = match obj.get("id") {
        None | Some(Value::Null) => return Err(ValidationError::MissingId),
        Some(Value::String(s)) => s,
        Some(_) => return Err(ValidationError::InvalidId),
    };
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }

    let lat = coordinate(obj, "lat")?;
    let lng = coordinate(obj, "lng")?;

    Ok(PositionReport {
        id: id.clone(),
        lat,
        lng,
    })
}

fn coordinate(
    obj: &serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<f64, ValidationError> {
    match obj.get(name) {
        None | Some(Value::Null) => Err(ValidationError::MissingCoordinate(name)),
        Some(v) => v.as_f64().ok_or(ValidationError::NonNumericCoordinate(name)),
    }
}
