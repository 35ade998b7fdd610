pub mod db;
pub mod errors;
pub mod exercise;
pub mod logging;
pub mod validation;

pub use db::Store;
pub use db::operations::ExerciseRepository;
pub use errors::{IntegrityError, StoreError, ValidationError};
pub use exercise::{ExerciseRecord, MuscleGroup};
pub use validation::{ExerciseForm, SetEntry};
