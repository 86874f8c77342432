// src/meal.rs

/// Column names of the CSV export, in record order.
pub const MEAL_FIELDS: [&str; 7] = [
    "mensa_id",
    "date",
    "meal_id",
    "name",
    "category",
    "price_student",
    "notes",
];

/// A single meal offered by a mensa on one day.
///
/// `M` is the mensa reference: the numeric API id right after fetching,
/// the display name once the whole set has been resolved.
#[derive(Debug, PartialEq, Clone)]
pub struct Meal<M = u32> {
    pub mensa_id: M,
    pub date: String,
    pub meal_id: u64,
    pub name: String,
    pub category: String,
    pub price_student: Option<f64>,
    pub notes: Vec<String>,
}

impl<M> Meal<M> {
    /// Swap the mensa reference, keeping every other field.
    pub fn with_mensa<N>(self, mensa_id: N) -> Meal<N> {
        Meal {
            mensa_id,
            date: self.date,
            meal_id: self.meal_id,
            name: self.name,
            category: self.category,
            price_student: self.price_student,
            notes: self.notes,
        }
    }
}
