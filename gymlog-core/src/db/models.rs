use diesel::{AsChangeset, Insertable, Queryable, Selectable};

use crate::db::schema;
use crate::exercise::ExerciseRecord;

/// One row of the `exercises` table exactly as stored.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::exercises)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExerciseRow {
    pub id: i32,
    pub name: String,
    pub muscle_group: String,
    pub weight: f64,
    pub repetitions: i32,
    pub date: Option<String>,
}

// Every column except `id`. Used for both insert and full-row update, so an
// absent date has to overwrite whatever was stored before.
#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = schema::exercises)]
#[diesel(treat_none_as_null = true)]
pub struct ExerciseChanges<'a> {
    pub name: &'a str,
    pub muscle_group: &'static str,
    pub weight: f64,
    pub repetitions: i32,
    pub date: Option<String>,
}

impl<'a> From<&'a ExerciseRecord> for ExerciseChanges<'a> {
    fn from(record: &'a ExerciseRecord) -> Self {
        ExerciseChanges {
            name: &record.name,
            muscle_group: record.muscle_group.as_str(),
            weight: record.weight,
            repetitions: record.repetitions,
            date: record.date_string(),
        }
    }
}
