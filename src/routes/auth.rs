use crate::{
    auth::{hash_password, verify_password, AuthResponse, JwtKeys, LoginRequest, RegisterRequest},
    error::AppError,
    models::{User, UserSummary},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Normalizes the email, checks uniqueness, hashes the password, persists
/// the user, and returns a bearer token plus the user summary. The
/// unique index on `email` is the authoritative duplicate signal; the
/// pre-flight lookup only short-circuits the common case before hashing.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let email = register_data.email.to_lowercase();

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&**pool)
        .await?;
    if existing > 0 {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password)?;
    let role = register_data.role.unwrap_or_default();

    // A concurrent registration between the check above and this insert
    // shows up as a unique violation, which From<sqlx::Error> already maps
    // to the same 409.
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, email, password_hash, role, created_at",
    )
    .bind(&register_data.name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&**pool)
    .await?;

    let token = keys.issue(user.id, user.role)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered".into(),
        token,
        user: UserSummary::from(user),
    }))
}

/// Login user
///
/// Authenticates by normalized email and password. An unknown email and a
/// wrong password produce the identical 401 message so the response never
/// reveals which credential was wrong.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, role, created_at FROM users WHERE email = $1",
    )
    .bind(login_data.email.to_lowercase())
    .fetch_optional(&**pool)
    .await?;

    let user = match user {
        Some(user) => user,
        None => return Err(AppError::Unauthorized("Invalid email or password".into())),
    };

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    let token = keys.issue(user.id, user.role)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: UserSummary::from(user),
    }))
}
