diesel::table! {
    exercises (id) {
        id -> Integer,
        name -> Text,
        muscle_group -> Text,
        weight -> Double,
        repetitions -> Integer,
        date -> Nullable<Text>,
    }
}
