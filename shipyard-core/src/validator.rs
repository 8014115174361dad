//! Domain validation for ship candidates.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ShipDraft;
use crate::error::{Result, ShipyardError};
use crate::rating::round_half_even;

/// Longest accepted name or planet, in characters.
pub const MAX_TEXT_LEN: usize = 50;
/// Earliest accepted production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// Latest accepted production year.
pub const MAX_PROD_YEAR: i32 = 3019;
/// Smallest accepted speed after rounding.
pub const MIN_SPEED: f64 = 0.01;
/// Largest accepted speed after rounding.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest accepted crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest accepted crew.
pub const MAX_CREW_SIZE: i32 = 9999;

/// Check every constrained field of `candidate`, failing on the first violation.
///
/// Fields are checked in a fixed order: name, planet, prodDate, speed,
/// crewSize. `shipType` and `isUsed` are not validator concerns.
pub fn validate(candidate: &ShipDraft) -> Result<()> {
    validate_text("name", candidate.name.as_deref())?;
    validate_text("planet", candidate.planet.as_deref())?;
    validate_prod_date(candidate.prod_date)?;
    validate_speed(candidate.speed)?;
    validate_crew_size(candidate.crew_size)
}

fn validate_text(field: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Err(ShipyardError::invalid(format!(
            "Ship {field} must not be null"
        )));
    };
    if value.is_empty() {
        return Err(ShipyardError::invalid(format!(
            "Ship {field} must not be empty"
        )));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ShipyardError::invalid(format!(
            "Ship {field} length must not be greater than {MAX_TEXT_LEN}"
        )));
    }
    Ok(())
}

fn validate_prod_date(prod_date: Option<DateTime<Utc>>) -> Result<()> {
    let Some(prod_date) = prod_date else {
        return Err(ShipyardError::invalid("Ship prodDate must not be null"));
    };
    if prod_date.timestamp_millis() < 0 {
        return Err(ShipyardError::invalid("Ship prodDate must not be negative"));
    }
    // The upper bound is midnight at the start of 31.12.3019.
    let (lower, upper) = prod_date_bounds()?;
    if prod_date < lower || prod_date > upper {
        return Err(ShipyardError::invalid(format!(
            "Ship prodDate must be between ({MIN_PROD_YEAR}..{MAX_PROD_YEAR})"
        )));
    }
    Ok(())
}

fn prod_date_bounds() -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let lower = Utc
        .with_ymd_and_hms(MIN_PROD_YEAR, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ShipyardError::invalid("invalid lower prodDate bound"))?;
    let upper = Utc
        .with_ymd_and_hms(MAX_PROD_YEAR, 12, 31, 0, 0, 0)
        .single()
        .ok_or_else(|| ShipyardError::invalid("invalid upper prodDate bound"))?;
    Ok((lower, upper))
}

fn validate_speed(speed: Option<f64>) -> Result<()> {
    let Some(speed) = speed else {
        return Err(ShipyardError::invalid("Ship speed must not be null"));
    };
    let out_of_range = || {
        ShipyardError::invalid(format!(
            "Ship speed must be between ({MIN_SPEED}..{MAX_SPEED})"
        ))
    };
    let rounded = round_half_even(speed, 2).ok_or_else(out_of_range)?;
    if !(MIN_SPEED..=MAX_SPEED).contains(&rounded) {
        return Err(out_of_range());
    }
    Ok(())
}

fn validate_crew_size(crew_size: Option<i32>) -> Result<()> {
    let Some(crew_size) = crew_size else {
        return Err(ShipyardError::invalid("Ship crewSize must not be null"));
    };
    if !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size) {
        return Err(ShipyardError::invalid(format!(
            "Ship crewSize must be between ({MIN_CREW_SIZE}..{MAX_CREW_SIZE})"
        )));
    }
    Ok(())
}
