use diesel::prelude::*;
use log::{debug, error, warn};

use crate::{
    db::Store,
    db::models::{ExerciseChanges, ExerciseRow},
    db::schema::exercises,
    errors::{IntegrityError, StoreError},
    exercise::{ExerciseRecord, MuscleGroup},
};

/// CRUD and history queries over the `exercises` table.
///
/// Write operations report success as a plain `bool` and read operations
/// return empty results when the store cannot be reached; the failure itself
/// is logged. Only integrity problems in stored rows are handed back to the
/// caller.
#[derive(Debug, Clone)]
pub struct ExerciseRepository {
    store: Store,
}

impl ExerciseRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // Writes

    /// Persists `record` and returns it with the id the store assigned.
    /// Any id already on `record` is ignored.
    pub fn create(&self, record: &ExerciseRecord) -> Result<ExerciseRecord, StoreError> {
        record.validate()?;

        let mut conn = self.store.connect()?;
        let id = diesel::insert_into(exercises::table)
            .values(&ExerciseChanges::from(record))
            .returning(exercises::id)
            .get_result::<i32>(&mut conn)?;
        debug!("Inserted exercise #{}: {}", id, record);

        Ok(ExerciseRecord {
            id: Some(id),
            ..record.clone()
        })
    }

    pub fn insert(&self, record: &ExerciseRecord) -> bool {
        match self.create(record) {
            Ok(_) => true,
            Err(StoreError::Invalid(e)) => {
                warn!("Refusing to insert {:?}: {}", record.name, e);
                false
            }
            Err(e) => {
                error!("Failed to insert exercise: {}", e);
                false
            }
        }
    }

    /// Replaces every column of the row with `record.id`.
    pub fn update(&self, record: &ExerciseRecord) -> bool {
        let Some(id) = record.id else {
            warn!("Cannot update {:?}: record was never persisted", record.name);
            return false;
        };
        if let Err(e) = record.validate() {
            warn!("Refusing to update exercise #{}: {}", id, e);
            return false;
        }

        let result = self.store.connect().and_then(|mut conn| {
            diesel::update(exercises::table.find(id))
                .set(&ExerciseChanges::from(record))
                .execute(&mut conn)
                .map_err(StoreError::from)
        });

        match result {
            Ok(0) => {
                debug!("No exercise #{} to update", id);
                false
            }
            Ok(_) => true,
            Err(e) => {
                error!("Failed to update exercise #{}: {}", id, e);
                false
            }
        }
    }

    pub fn delete(&self, id: i32) -> bool {
        let result = self.store.connect().and_then(|mut conn| {
            diesel::delete(exercises::table.find(id))
                .execute(&mut conn)
                .map_err(StoreError::from)
        });

        match result {
            Ok(0) => {
                debug!("No exercise #{} to delete", id);
                false
            }
            Ok(_) => true,
            Err(e) => {
                error!("Failed to delete exercise #{}: {}", id, e);
                false
            }
        }
    }

    // Reads

    /// Every record, newest date first. Undated records come last and ties
    /// fall back to the most recently inserted.
    pub fn find_all(&self) -> Result<Vec<ExerciseRecord>, IntegrityError> {
        recover("Failed to load exercises", self.load_records(None))
    }

    /// Same ordering as [`find_all`](Self::find_all), restricted to an exact
    /// name match.
    pub fn find_by_name(&self, name: &str) -> Result<Vec<ExerciseRecord>, IntegrityError> {
        recover(
            "Failed to load exercise history",
            self.load_records(Some(name)),
        )
    }

    pub fn find_by_id(&self, id: i32) -> Result<Option<ExerciseRecord>, IntegrityError> {
        let result = self.store.connect().and_then(|mut conn| {
            let row = exercises::table
                .find(id)
                .select(ExerciseRow::as_select())
                .first::<ExerciseRow>(&mut conn)
                .optional()?;
            Ok(row.map(ExerciseRecord::try_from).transpose()?)
        });
        recover("Failed to load exercise", result)
    }

    /// The most recent entry for `name`, if any.
    pub fn latest_by_name(&self, name: &str) -> Result<Option<ExerciseRecord>, IntegrityError> {
        Ok(self.find_by_name(name)?.into_iter().next())
    }

    /// The muscle group new entries for `name` should inherit.
    pub fn group_of(&self, name: &str) -> Result<MuscleGroup, IntegrityError> {
        Ok(self
            .latest_by_name(name)?
            .map(|r| r.muscle_group)
            .unwrap_or(MuscleGroup::Other))
    }

    pub fn distinct_names(&self) -> Result<Vec<String>, IntegrityError> {
        recover("Failed to load exercise names", self.load_names(None))
    }

    pub fn distinct_names_by_group(
        &self,
        group: MuscleGroup,
    ) -> Result<Vec<String>, IntegrityError> {
        recover(
            "Failed to load exercise names",
            self.load_names(Some(group)),
        )
    }

    fn load_records(&self, name: Option<&str>) -> Result<Vec<ExerciseRecord>, StoreError> {
        let mut conn = self.store.connect()?;

        let mut query = exercises::table
            .select(ExerciseRow::as_select())
            .into_boxed();
        if let Some(name) = name {
            query = query.filter(exercises::name.eq(name));
        }

        let rows = query
            .order(exercises::date.is_null())
            .then_order_by(exercises::date.desc())
            .then_order_by(exercises::id.desc())
            .load::<ExerciseRow>(&mut conn)?;

        rows.into_iter()
            .map(|row| ExerciseRecord::try_from(row).map_err(StoreError::from))
            .collect()
    }

    fn load_names(&self, group: Option<MuscleGroup>) -> Result<Vec<String>, StoreError> {
        let mut conn = self.store.connect()?;

        let mut query = exercises::table
            .select(exercises::name)
            .distinct()
            .into_boxed();
        if let Some(group) = group {
            query = query.filter(exercises::muscle_group.eq_any(group.stored_labels().to_vec()));
        }

        Ok(query
            .order(exercises::name.asc())
            .load::<String>(&mut conn)?)
    }
}

// Store-access failures degrade to an empty result; integrity failures do not.
fn recover<T: Default>(
    context: &str,
    result: Result<T, StoreError>,
) -> Result<T, IntegrityError> {
    match result {
        Ok(value) => Ok(value),
        Err(StoreError::Integrity(e)) => {
            error!("{}: {}", context, e);
            Err(e)
        }
        Err(e) => {
            error!("{}: {}", context, e);
            Ok(T::default())
        }
    }
}
