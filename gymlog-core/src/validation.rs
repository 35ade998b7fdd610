//! Turns raw form text into exercise records.
//!
//! Nothing in here touches the store: a form either yields a record that is
//! safe to hand to the repository, or the first problem found, worded for the
//! user.

use chrono::NaiveDate;

use crate::errors::ValidationError;
use crate::exercise::{DATE_FORMAT, ExerciseRecord, MuscleGroup};

/// Form fields as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ExerciseForm<'a> {
    pub name: &'a str,
    pub muscle_group: &'a str,
    pub weight: &'a str,
    pub repetitions: &'a str,
    pub date: &'a str,
}

impl ExerciseForm<'_> {
    pub fn parse(&self) -> Result<ExerciseRecord, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankName);
        }

        let muscle_group = self.muscle_group.parse::<MuscleGroup>()?;
        let weight = parse_weight(self.weight)?;
        let repetitions = parse_repetitions(self.repetitions)?;
        let date = parse_date(self.date)?;

        let record = ExerciseRecord::new(name, muscle_group, weight, repetitions, date);
        record.validate()?;
        Ok(record)
    }
}

/// A new set of an exercise that is already in the history. Its muscle group
/// is inherited from the store, so it is only attached once every typed field
/// has been accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct SetEntry {
    pub name: String,
    pub weight: f64,
    pub repetitions: i32,
    pub date: Option<NaiveDate>,
}

impl SetEntry {
    pub fn parse(
        name: &str,
        weight: &str,
        repetitions: &str,
        date: &str,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankName);
        }
        Ok(SetEntry {
            name: name.to_string(),
            weight: parse_weight(weight)?,
            repetitions: parse_repetitions(repetitions)?,
            date: parse_date(date)?,
        })
    }

    pub fn into_record(self, muscle_group: MuscleGroup) -> ExerciseRecord {
        ExerciseRecord::new(
            self.name,
            muscle_group,
            self.weight,
            self.repetitions,
            self.date,
        )
    }
}

pub fn parse_weight(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(w) if w.is_finite() && w >= 0.0 => Ok(w),
        _ => Err(ValidationError::InvalidWeight),
    }
}

pub fn parse_repetitions(raw: &str) -> Result<i32, ValidationError> {
    let reps = raw
        .trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidRepetitions)?;
    if reps <= 0 {
        return Err(ValidationError::NonPositiveRepetitions);
    }
    Ok(reps)
}

/// An empty field, `-` or `no date` all mean undated.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" || raw.eq_ignore_ascii_case("no date") {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form<'a>(weight: &'a str, repetitions: &'a str, date: &'a str) -> ExerciseForm<'a> {
        ExerciseForm {
            name: " Bench Press ",
            muscle_group: "Chest",
            weight,
            repetitions,
            date,
        }
    }

    #[test]
    fn parses_a_complete_form() {
        let record = form("80.5", "8", "2024-03-01").parse().unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.name, "Bench Press");
        assert_eq!(record.muscle_group, MuscleGroup::Chest);
        assert_eq!(record.weight, 80.5);
        assert_eq!(record.repetitions, 8);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn blank_name_is_reported_first() {
        let mut f = form("abc", "0", "bad");
        f.name = "   ";
        assert_eq!(f.parse(), Err(ValidationError::BlankName));
    }

    #[test]
    fn rejects_non_positive_repetitions() {
        assert_eq!(
            form("80", "0", "").parse(),
            Err(ValidationError::NonPositiveRepetitions)
        );
        assert_eq!(
            form("80", "-3", "").parse(),
            Err(ValidationError::NonPositiveRepetitions)
        );
        assert_eq!(
            form("80", "five", "").parse(),
            Err(ValidationError::InvalidRepetitions)
        );
    }

    #[test]
    fn rejects_bad_weights() {
        assert_eq!(form("", "5", "").parse(), Err(ValidationError::InvalidWeight));
        assert_eq!(form("-1", "5", "").parse(), Err(ValidationError::InvalidWeight));
        assert_eq!(form("NaN", "5", "").parse(), Err(ValidationError::InvalidWeight));
        assert!(form("0", "5", "").parse().is_ok());
    }

    #[test]
    fn undated_markers_mean_no_date() {
        for raw in ["", "  ", "-", "No date"] {
            assert_eq!(parse_date(raw), Ok(None), "{raw:?}");
        }
        assert_eq!(parse_date("2024-13-01"), Err(ValidationError::InvalidDate));
        assert_eq!(parse_date("01/03/2024"), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn set_entry_checks_fields_without_a_group() {
        assert_eq!(
            SetEntry::parse("Squat", "100", "0", "2024-01-01"),
            Err(ValidationError::NonPositiveRepetitions)
        );
        assert_eq!(
            SetEntry::parse("Squat", "heavy", "5", ""),
            Err(ValidationError::InvalidWeight)
        );
        assert_eq!(
            SetEntry::parse("Squat", "100", "5", "tomorrow"),
            Err(ValidationError::InvalidDate)
        );
        assert_eq!(
            SetEntry::parse(" ", "100", "5", ""),
            Err(ValidationError::BlankName)
        );
    }

    #[test]
    fn set_entry_takes_the_inherited_group() {
        let record = SetEntry::parse(" Squat ", "102.5", "5", "2024-01-01")
            .unwrap()
            .into_record(MuscleGroup::Legs);
        assert_eq!(
            record,
            ExerciseRecord::new(
                "Squat",
                MuscleGroup::Legs,
                102.5,
                5,
                NaiveDate::from_ymd_opt(2024, 1, 1)
            )
        );
        assert_eq!(record.validate(), Ok(()));
    }

    #[test]
    fn unknown_group_is_rejected() {
        let mut f = form("80", "5", "");
        f.muscle_group = "Neck";
        assert_eq!(
            f.parse(),
            Err(ValidationError::UnknownGroup("Neck".to_string()))
        );
    }
}
