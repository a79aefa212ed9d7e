mod delete_meal_handler;
mod record_meal_handler;
mod update_meal_handler;

#[cfg(test)]
mod tests;

pub use delete_meal_handler::DeleteMealCommandHandler;
pub use record_meal_handler::RecordMealCommandHandler;
pub use update_meal_handler::UpdateMealCommandHandler;
