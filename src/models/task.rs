use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A task row as stored in the database and returned by the API.
/// Public JSON shapes are camelCase throughout; column names stay
/// snake_case (FromRow maps by field name, not by the serde rename).
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Identifier of the owning user. Always set server-side from the
    /// authenticated caller, never from the payload.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task. Description and completed carry the
/// documented defaults when omitted.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(
        min = 2,
        max = 200,
        message = "Title must be between 2 and 200 characters"
    ))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}

/// Payload for a partial task update. Every field is optional but at least
/// one must be present; omitted fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[validate(schema(function = "has_at_least_one_field", skip_on_field_errors = false))]
pub struct TaskUpdate {
    #[validate(length(
        min = 2,
        max = 200,
        message = "Title must be between 2 and 200 characters"
    ))]
    pub title: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}

fn has_at_least_one_field(update: &TaskUpdate) -> Result<(), ValidationError> {
    if update.title.is_none() && update.description.is_none() && update.completed.is_none() {
        let mut err = ValidationError::new("at_least_one_field");
        err.message = Some("At least one field must be provided".into());
        return Err(err);
    }
    Ok(())
}

impl Task {
    /// Builds a new `Task` owned by `user_id`, applying the creation
    /// defaults: empty description, not completed.
    pub fn new(input: TaskInput, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description.unwrap_or_default(),
            completed: input.completed.unwrap_or(false),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}
