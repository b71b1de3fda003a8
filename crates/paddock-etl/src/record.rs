//! Typed result records
//!
//! A [`ResultRecord`] is one normalized row that carries everything the
//! loader needs: the rider, season and race identity keys plus the
//! classification. Building one is the validation step; a row that lacks
//! an identity field never reaches the resolver.

use chrono::{DateTime, NaiveDate};
use paddock_common::types::SeasonId;
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::table::{CellValue, NormalizedRecord};

/// Canonical column names read by [`ResultRecord::from_row`]
pub mod columns {
    pub const RIDER_NAME: &str = "rider_name";
    pub const RIDER_SURNAME: &str = "rider_surname";
    pub const NATIONALITY: &str = "nationality";
    pub const BIRTH_DATE: &str = "birth_date";
    pub const CAREER_STATUS: &str = "career_status";
    pub const SEASON_YEAR: &str = "season_year";
    pub const CATEGORY: &str = "category";
    pub const CIRCUIT: &str = "circuit";
    pub const DATE: &str = "date";
    pub const POSITION: &str = "position";
    pub const POINTS: &str = "points";
}

/// Rider identity: `(name, surname)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RiderKey {
    pub name: String,
    pub surname: String,
}

impl std::fmt::Display for RiderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.name, self.surname)
    }
}

/// Season identity: `(year, category)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeasonKey {
    pub year: i32,
    pub category: String,
}

impl std::fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.year, self.category)
    }
}

/// Race identity: `(season, circuit, date)`; `None` is a date value of its own
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RaceKey {
    pub season_id: SeasonId,
    pub circuit: String,
    pub date: Option<NaiveDate>,
}

impl std::fmt::Display for RaceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.date {
            Some(date) => write!(f, "({}, {}, {})", self.season_id, self.circuit, date),
            None => write!(f, "({}, {}, no date)", self.season_id, self.circuit),
        }
    }
}

/// One validated result row
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Position of the source row in its batch
    pub row: usize,
    pub rider_name: String,
    pub rider_surname: String,
    pub nationality: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub career_status: Option<String>,
    pub season_year: i32,
    pub category: String,
    pub circuit: String,
    pub date: Option<NaiveDate>,
    pub position: Option<i32>,
    pub points: Option<f64>,
}

impl ResultRecord {
    /// Validate normalized row `row` of its batch
    pub fn from_row(row: usize, record: &NormalizedRecord) -> Result<Self, ValidationError> {
        Ok(Self {
            row,
            rider_name: required_text(row, record, columns::RIDER_NAME)?,
            rider_surname: required_text(row, record, columns::RIDER_SURNAME)?,
            nationality: optional_text(record.get(columns::NATIONALITY)),
            birth_date: optional_date(row, record, columns::BIRTH_DATE),
            career_status: optional_text(record.get(columns::CAREER_STATUS)),
            season_year: required_year(row, record)?,
            category: required_text(row, record, columns::CATEGORY)?,
            circuit: required_text(row, record, columns::CIRCUIT)?,
            date: optional_date(row, record, columns::DATE),
            position: position(row, record)?,
            points: points(record),
        })
    }

    pub fn rider_key(&self) -> RiderKey {
        RiderKey {
            name: self.rider_name.clone(),
            surname: self.rider_surname.clone(),
        }
    }

    pub fn season_key(&self) -> SeasonKey {
        SeasonKey {
            year: self.season_year,
            category: self.category.clone(),
        }
    }

    /// Race key once the record's season has been resolved
    pub fn race_key(&self, season_id: SeasonId) -> RaceKey {
        RaceKey {
            season_id,
            circuit: self.circuit.clone(),
            date: self.date,
        }
    }
}

fn cell_text(cell: &CellValue) -> Option<String> {
    let text = match cell {
        CellValue::Absent => return None,
        CellValue::Text(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn required_text(
    row: usize,
    record: &NormalizedRecord,
    field: &'static str,
) -> Result<String, ValidationError> {
    cell_text(record.get(field)).ok_or(ValidationError::MissingField { row, field })
}

fn optional_text(cell: &CellValue) -> Option<String> {
    cell_text(cell)
}

fn required_year(row: usize, record: &NormalizedRecord) -> Result<i32, ValidationError> {
    let field = columns::SEASON_YEAR;
    let invalid = |value: String| ValidationError::InvalidField { row, field, value };

    match record.get(field) {
        CellValue::Absent => Err(ValidationError::MissingField { row, field }),
        CellValue::Integer(i) => i32::try_from(*i).map_err(|_| invalid(i.to_string())),
        CellValue::Float(x) => integral(*x).ok_or_else(|| invalid(x.to_string())),
        CellValue::Text(s) => s.trim().parse().map_err(|_| invalid(s.clone())),
    }
}

/// Finishing position; text markers such as `DNF` or `DSQ` mean unclassified
fn position(row: usize, record: &NormalizedRecord) -> Result<Option<i32>, ValidationError> {
    let field = columns::POSITION;
    let invalid = |value: String| ValidationError::InvalidField { row, field, value };

    match record.get(field) {
        CellValue::Absent => Ok(None),
        CellValue::Integer(i) => i32::try_from(*i).map(Some).map_err(|_| invalid(i.to_string())),
        CellValue::Float(x) => integral(*x).map(Some).ok_or_else(|| invalid(x.to_string())),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i32>() {
                return Ok(Some(i));
            }
            match trimmed.parse::<f64>() {
                Ok(x) if x.is_finite() => integral(x).map(Some).ok_or_else(|| invalid(s.clone())),
                _ => {
                    debug!(row, marker = trimmed, "Unclassified position");
                    Ok(None)
                },
            }
        },
    }
}

fn points(record: &NormalizedRecord) -> Option<f64> {
    match record.get(columns::POINTS) {
        CellValue::Absent => None,
        CellValue::Integer(i) => Some(*i as f64),
        CellValue::Float(x) => Some(*x),
        CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
    }
}

fn optional_date(row: usize, record: &NormalizedRecord, field: &'static str) -> Option<NaiveDate> {
    let text = cell_text(record.get(field))?;
    let date = parse_date(&text);
    if date.is_none() {
        warn!(row, field, value = %text, "Unparseable date, treating as no date");
    }
    date
}

fn integral(x: f64) -> Option<i32> {
    if x.fract() == 0.0 && x >= f64::from(i32::MIN) && x <= f64::from(i32::MAX) {
        Some(x as i32)
    } else {
        None
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%d %B %Y",
    "%B %d, %Y",
];

/// Parse the calendar date formats seen in results sheets
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}
