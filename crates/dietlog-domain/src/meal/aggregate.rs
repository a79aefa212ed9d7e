use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, MealId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    id: MealId,
    user_id: UserId,
    name: String,
    description: String,
    eaten_at: DateTime<Utc>,
    within_diet: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

/// Partial update of a meal; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub eaten_at: Option<DateTime<Utc>>,
    pub within_diet: Option<bool>,
}

impl MealChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.eaten_at.is_none()
            && self.within_diet.is_none()
    }
}

impl Meal {
    pub fn new(
        user_id: UserId,
        name: String,
        description: String,
        eaten_at: DateTime<Utc>,
        within_diet: bool,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(&name)?;

        Ok(Self {
            id: MealId::new(),
            user_id,
            name,
            description: description.trim().to_string(),
            eaten_at,
            within_diet,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: MealId,
        user_id: UserId,
        name: String,
        description: String,
        eaten_at: DateTime<Utc>,
        within_diet: bool,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            description,
            eaten_at,
            within_diet,
            created_at,
            updated_at,
        }
    }

    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation(
                "Meal name cannot be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }

    pub fn id(&self) -> &MealId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn eaten_at(&self) -> DateTime<Utc> {
        self.eaten_at
    }

    pub fn is_within_diet(&self) -> bool {
        self.within_diet
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Apply a partial update.
    ///
    /// Streak history is not rewritten when `within_diet` changes; episodes
    /// reflect the meals as they were recorded.
    pub fn apply_changes(&mut self, changes: MealChanges) -> Result<(), DomainError> {
        if changes.is_empty() {
            return Err(DomainError::InvalidInput(
                "At least one field must be provided to update a meal".to_string(),
            ));
        }

        if let Some(name) = changes.name {
            self.name = Self::validate_name(&name)?;
        }
        if let Some(description) = changes.description {
            self.description = description.trim().to_string();
        }
        if let Some(eaten_at) = changes.eaten_at {
            self.eaten_at = eaten_at;
        }
        if let Some(within_diet) = changes.within_diet {
            self.within_diet = within_diet;
        }

        self.updated_at = Some(Utc::now());
        Ok(())
    }
}
