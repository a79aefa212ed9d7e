use dietlog_domain::shared::{DomainError, MealId, UserId};

pub fn user_id_from(raw: &str) -> Result<UserId, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput("User id cannot be empty".to_string()));
    }
    Ok(UserId::from_string(trimmed))
}

pub fn meal_id_from(raw: &str) -> Result<MealId, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput("Meal id cannot be empty".to_string()));
    }
    Ok(MealId::from_string(trimmed))
}
