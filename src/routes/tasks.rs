use crate::{
    auth::AuthUser,
    error::AppError,
    models::{Task, TaskInput, TaskUpdate},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Parses a path segment into a task id. The id is taken as a raw string so
/// a malformed value yields the documented 400 body instead of the framework's
/// generic path-extraction error.
fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid task id".into()))
}

/// Lists tasks visible to the caller, newest-created-first.
///
/// Admins see every task; regular users only their own.
///
/// ## Responses:
/// - `200 OK`: `{data: [Task]}`.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let tasks = if user.is_admin() {
        sqlx::query_as::<_, Task>(
            "SELECT id, title, description, completed, user_id, created_at, updated_at
             FROM tasks ORDER BY created_at DESC",
        )
        .fetch_all(&**pool)
        .await?
    } else {
        sqlx::query_as::<_, Task>(
            "SELECT id, title, description, completed, user_id, created_at, updated_at
             FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user.id)
        .fetch_all(&**pool)
        .await?
    };

    Ok(HttpResponse::Ok().json(json!({ "data": tasks })))
}

/// Creates a task owned by the caller.
///
/// The owner is always the authenticated user, never a payload value.
/// Description defaults to the empty string and completed to false.
///
/// ## Responses:
/// - `201 Created`: `{message, data: Task}`.
/// - `400 Bad Request`: validation failure.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user.id);

    let created = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (id, title, description, completed, user_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, title, description, completed, user_id, created_at, updated_at",
    )
    .bind(task.id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.completed)
    .bind(task.user_id)
    .bind(task.created_at)
    .bind(task.updated_at)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created",
        "data": created,
    })))
}

/// Partially updates a task.
///
/// Only the provided fields change; `completed` is only touched when
/// explicitly boolean in the payload. Owner or admin only.
///
/// ## Responses:
/// - `200 OK`: `{message, data: Task}`.
/// - `400 Bad Request`: malformed id or validation failure.
/// - `403 Forbidden`: caller is neither admin nor the owner.
/// - `404 Not Found`: no task with that id.
///
/// Registered through `web::resource` in `routes::config` rather than a
/// route macro so the delete route on the same path can carry its own
/// role-gate middleware.
pub async fn update_task(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    task_data: web::Json<TaskUpdate>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let task_id = parse_task_id(&path)?;
    task_data.validate()?;

    let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM tasks WHERE id = $1")
        .bind(task_id)
        .fetch_optional(&**pool)
        .await?;

    match owner {
        Some(owner_id) if !user.is_admin() && owner_id != user.id => {
            return Err(AppError::Forbidden("Not allowed to update this task".into()));
        }
        Some(_) => {}
        None => return Err(AppError::NotFound("Task not found".into())),
    }

    // No transaction around the read and this write: two authorized writers
    // racing on the same task resolve last-write-wins.
    let updated = sqlx::query_as::<_, Task>(
        "UPDATE tasks
         SET title = COALESCE($1, title),
             description = COALESCE($2, description),
             completed = COALESCE($3, completed),
             updated_at = now()
         WHERE id = $4
         RETURNING id, title, description, completed, user_id, created_at, updated_at",
    )
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(task_data.completed)
    .bind(task_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated",
        "data": updated,
    })))
}

/// Deletes a task.
///
/// The route itself is wrapped in `RequireRole::admin()`, so non-admins are
/// rejected with 403 before this handler runs; the owner-or-admin check here
/// stays as a second line of defense should the wiring ever change.
///
/// ## Responses:
/// - `200 OK`: `{message}`.
/// - `400 Bad Request`: malformed id.
/// - `403 Forbidden`: caller is not an admin.
/// - `404 Not Found`: no task with that id.
pub async fn delete_task(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let task_id = parse_task_id(&path)?;

    let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM tasks WHERE id = $1")
        .bind(task_id)
        .fetch_optional(&**pool)
        .await?;

    match owner {
        Some(owner_id) if !user.is_admin() && owner_id != user.id => {
            return Err(AppError::Forbidden("Not allowed to delete this task".into()));
        }
        Some(_) => {}
        None => return Err(AppError::NotFound("Task not found".into())),
    }

    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
