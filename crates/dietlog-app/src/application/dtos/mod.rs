mod meal_dto;
mod status_dto;
mod streak_dto;

pub use meal_dto::*;
pub use status_dto::*;
pub use streak_dto::*;
