use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::db::models::ExerciseRow;
use crate::errors::{IntegrityError, ValidationError};

/// Format used for dates both in the store and on screen.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Arms,
    Shoulders,
    Core,
    Glutes,
    Other,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 8] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Legs,
        MuscleGroup::Arms,
        MuscleGroup::Shoulders,
        MuscleGroup::Core,
        MuscleGroup::Glutes,
        MuscleGroup::Other,
    ];

    /// The label written to the `muscle_group` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Core => "Core",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Other => "Other",
        }
    }

    /// Every column value that means this group, legacy labels included.
    pub fn stored_labels(&self) -> &'static [&'static str] {
        match self {
            MuscleGroup::Chest => &["Chest", "Pecho"],
            MuscleGroup::Back => &["Back", "Espalda"],
            MuscleGroup::Legs => &["Legs", "Piernas"],
            MuscleGroup::Arms => &["Arms", "Brazos"],
            MuscleGroup::Shoulders => &["Shoulders", "Hombros"],
            MuscleGroup::Core => &["Core"],
            MuscleGroup::Glutes => &["Glutes", "Glúteos", "Gluteos"],
            MuscleGroup::Other => &["Other", "Otro"],
        }
    }

    /// Reads a `muscle_group` column value. Only the exact labels in
    /// [`stored_labels`](Self::stored_labels) are accepted, so a row read as a
    /// group is also matched when filtering by that group.
    pub fn from_stored(value: &str) -> Option<MuscleGroup> {
        MuscleGroup::ALL
            .into_iter()
            .find(|group| group.stored_labels().iter().any(|label| *label == value))
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MuscleGroup {
    type Err = ValidationError;

    // Also accepts the Spanish labels older databases were written with.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let group = match s.trim().to_lowercase().as_str() {
            "chest" | "pecho" => MuscleGroup::Chest,
            "back" | "espalda" => MuscleGroup::Back,
            "legs" | "piernas" => MuscleGroup::Legs,
            "arms" | "brazos" => MuscleGroup::Arms,
            "shoulders" | "hombros" => MuscleGroup::Shoulders,
            "core" => MuscleGroup::Core,
            "glutes" | "glúteos" | "gluteos" => MuscleGroup::Glutes,
            "other" | "otro" => MuscleGroup::Other,
            _ => return Err(ValidationError::UnknownGroup(s.trim().to_string())),
        };
        Ok(group)
    }
}

/// One logged set of an exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseRecord {
    /// Assigned by the store; `None` until the record is persisted.
    pub id: Option<i32>,
    pub name: String,
    pub muscle_group: MuscleGroup,
    /// Kilograms.
    pub weight: f64,
    pub repetitions: i32,
    pub date: Option<NaiveDate>,
}

impl ExerciseRecord {
    pub fn new(
        name: impl Into<String>,
        muscle_group: MuscleGroup,
        weight: f64,
        repetitions: i32,
        date: Option<NaiveDate>,
    ) -> Self {
        ExerciseRecord {
            id: None,
            name: name.into(),
            muscle_group,
            weight,
            repetitions,
            date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(ValidationError::InvalidWeight);
        }
        if self.repetitions <= 0 {
            return Err(ValidationError::NonPositiveRepetitions);
        }
        Ok(())
    }

    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format(DATE_FORMAT).to_string())
    }
}

pub fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{:.1}", weight)
    } else {
        weight.to_string()
    }
}

impl fmt::Display for ExerciseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date_str = self.date_string().unwrap_or_else(|| "no date".to_string());
        write!(
            f,
            "{} - {} kg x {} reps ({})",
            self.name,
            format_weight(self.weight),
            self.repetitions,
            date_str
        )
    }
}

impl TryFrom<ExerciseRow> for ExerciseRecord {
    type Error = IntegrityError;

    fn try_from(row: ExerciseRow) -> Result<Self, IntegrityError> {
        let date = match row.date.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                let parsed = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
                    debug!("Failed to parse stored date {:?}: {}", raw, e);
                    IntegrityError::CorruptDate {
                        id: row.id,
                        value: raw.to_string(),
                    }
                })?;
                Some(parsed)
            }
        };

        let muscle_group =
            MuscleGroup::from_stored(&row.muscle_group).ok_or_else(|| {
                IntegrityError::UnknownGroup {
                    id: row.id,
                    value: row.muscle_group.clone(),
                }
            })?;

        Ok(ExerciseRecord {
            id: Some(row.id),
            name: row.name,
            muscle_group,
            weight: row.weight,
            repetitions: row.repetitions,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: Option<&str>, group: &str) -> ExerciseRow {
        ExerciseRow {
            id: 7,
            name: "Bench Press".to_string(),
            muscle_group: group.to_string(),
            weight: 80.0,
            repetitions: 8,
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn display_includes_date() {
        let record = ExerciseRecord::new(
            "Bench Press",
            MuscleGroup::Chest,
            80.0,
            8,
            NaiveDate::from_ymd_opt(2024, 3, 1),
        );
        assert_eq!(
            record.to_string(),
            "Bench Press - 80.0 kg x 8 reps (2024-03-01)"
        );
    }

    #[test]
    fn display_marks_undated_records() {
        let record = ExerciseRecord::new("Plank", MuscleGroup::Core, 0.0, 1, None);
        assert_eq!(record.to_string(), "Plank - 0.0 kg x 1 reps (no date)");
    }

    #[test]
    fn fractional_weight_keeps_its_digits() {
        assert_eq!(format_weight(82.25), "82.25");
        assert_eq!(format_weight(100.0), "100.0");
    }

    #[test]
    fn muscle_group_round_trips_through_its_label() {
        for group in MuscleGroup::ALL {
            assert_eq!(group.as_str().parse::<MuscleGroup>(), Ok(group));
        }
    }

    #[test]
    fn muscle_group_accepts_legacy_labels() {
        assert_eq!("Pecho".parse::<MuscleGroup>(), Ok(MuscleGroup::Chest));
        assert_eq!("Glúteos".parse::<MuscleGroup>(), Ok(MuscleGroup::Glutes));
        assert_eq!("otro".parse::<MuscleGroup>(), Ok(MuscleGroup::Other));
        assert_eq!(
            "Neck".parse::<MuscleGroup>(),
            Err(ValidationError::UnknownGroup("Neck".to_string()))
        );
    }

    #[test]
    fn validate_rejects_bad_records() {
        let mut record = ExerciseRecord::new("Squat", MuscleGroup::Legs, 100.0, 5, None);
        assert_eq!(record.validate(), Ok(()));

        record.repetitions = 0;
        assert_eq!(
            record.validate(),
            Err(ValidationError::NonPositiveRepetitions)
        );

        record.repetitions = 5;
        record.weight = -1.0;
        assert_eq!(record.validate(), Err(ValidationError::InvalidWeight));

        record.weight = 100.0;
        record.name = "   ".to_string();
        assert_eq!(record.validate(), Err(ValidationError::BlankName));
    }

    #[test]
    fn row_without_date_becomes_undated_record() {
        let record = ExerciseRecord::try_from(row(None, "Chest")).unwrap();
        assert_eq!(record.id, Some(7));
        assert_eq!(record.date, None);

        let record = ExerciseRecord::try_from(row(Some(""), "Chest")).unwrap();
        assert_eq!(record.date, None);
    }

    #[test]
    fn row_with_corrupt_date_is_an_integrity_error() {
        let err = ExerciseRecord::try_from(row(Some("01/03/2024"), "Chest")).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::CorruptDate {
                id: 7,
                value: "01/03/2024".to_string()
            }
        );
    }

    #[test]
    fn stored_date_is_read_verbatim() {
        let err = ExerciseRecord::try_from(row(Some(" 2024-01-01"), "Chest")).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::CorruptDate {
                id: 7,
                value: " 2024-01-01".to_string()
            }
        );
    }

    #[test]
    fn stored_group_must_match_a_label_exactly() {
        assert_eq!(MuscleGroup::from_stored("Pecho"), Some(MuscleGroup::Chest));
        assert_eq!(MuscleGroup::from_stored("Glutes"), Some(MuscleGroup::Glutes));
        assert_eq!(MuscleGroup::from_stored("chest"), None);
        assert_eq!(MuscleGroup::from_stored("Chest "), None);

        let err = ExerciseRecord::try_from(row(None, "CHEST")).unwrap_err();
        assert!(matches!(err, IntegrityError::UnknownGroup { id: 7, .. }));
    }

    #[test]
    fn row_with_unknown_group_is_an_integrity_error() {
        let err = ExerciseRecord::try_from(row(Some("2024-03-01"), "Neck")).unwrap_err();
        assert!(matches!(err, IntegrityError::UnknownGroup { id: 7, .. }));
    }
}
