mod aggregate;
mod repository;
mod value_objects;


pub use aggregate::{Meal, MealChanges};
pub use repository::MealRepository;
pub use value_objects::MealCounts;
