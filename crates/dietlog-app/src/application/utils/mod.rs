mod ids;
mod result_ext;

pub use ids::{meal_id_from, user_id_from};
pub use result_ext::ResultExt;
