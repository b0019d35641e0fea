//! Account service: registration, login and user administration on top of
//! the credential store, the password hasher and the token issuer.

use std::future::Future;
use std::time::Duration;

use anyhow::anyhow;
use axum::extract::FromRef;
use tokio::task;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::dto::{AuthResponse, PublicUser};
use crate::auth::jwt::JwtKeys;
use crate::auth::password;
use crate::auth::repo::User;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::state::AppState;

const DB_TIMEOUT: Duration = Duration::from_secs(5);
const HASH_TIMEOUT: Duration = Duration::from_secs(10);

/// Await a database round trip with a bounded deadline so a stalled
/// connection cannot hang the request forever.
async fn db<T>(fut: impl Future<Output = Result<T, sqlx::Error>>) -> AppResult<T> {
    match timeout(DB_TIMEOUT, fut).await {
        Ok(res) => res.map_err(AppError::from),
        Err(_) => Err(AppError::Internal(anyhow!("database round trip timed out"))),
    }
}

/// Run a CPU-bound hashing closure on the blocking pool, bounded by a
/// deadline. One slow hash must not stall unrelated requests.
async fn off_thread<T: Send + 'static>(
    f: impl FnOnce() -> anyhow::Result<T> + Send + 'static,
) -> AppResult<T> {
    match timeout(HASH_TIMEOUT, task::spawn_blocking(f)).await {
        Ok(Ok(res)) => res.map_err(AppError::Internal),
        Ok(Err(join)) => Err(AppError::Internal(anyhow!("hashing task failed: {join}"))),
        Err(_) => Err(AppError::Internal(anyhow!("password hashing timed out"))),
    }
}

/// Register a new account. The lookup here surfaces a clean conflict early;
/// the unique index on email is what actually guards against a concurrent
/// duplicate, and a unique violation from the insert maps to the same
/// conflict.
pub async fn register(
    state: &AppState,
    name: String,
    email: String,
    plain_password: String,
) -> AppResult<()> {
    if db(User::find_by_email(&state.db, &email)).await?.is_some() {
        warn!(%email, "registration with already used email");
        return Err(AppError::Conflict(
            "User with this email already exists".into(),
        ));
    }

    let digest = off_thread(move || password::hash_password(&plain_password)).await?;

    let user = match timeout(DB_TIMEOUT, User::create(&state.db, &email, &name, &digest)).await {
        Err(_) => return Err(AppError::Internal(anyhow!("database round trip timed out"))),
        Ok(Err(e)) if is_unique_violation(&e) => {
            warn!(%email, "lost registration race for email");
            return Err(AppError::Conflict(
                "User with this email already exists".into(),
            ));
        }
        Ok(Err(e)) => return Err(e.into()),
        Ok(Ok(user)) => user,
    };

    info!(user_id = %user.id, "user registered");
    Ok(())
}

/// Authenticate and issue a token. Unknown email and wrong password are
/// logged as distinct events but surface identically, so callers cannot
/// probe which emails have accounts.
pub async fn login(state: &AppState, email: String, plain_password: String) -> AppResult<AuthResponse> {
    let user = match db(User::find_by_email(&state.db, &email)).await? {
        Some(user) => user,
        None => {
            warn!(%email, "login with unknown email");
            return Err(AppError::Unauthorized("Invalid login credentials".into()));
        }
    };

    let digest = user.password_hash.clone();
    let matched = off_thread(move || password::verify_password(&plain_password, &digest)).await?;
    if !matched {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::Unauthorized("Invalid login credentials".into()));
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(&user).map_err(AppError::Internal)?;

    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse {
        token,
        user: PublicUser::from(user),
    })
}

pub async fn list_users(state: &AppState) -> AppResult<Vec<PublicUser>> {
    let users = db(User::list(&state.db)).await?;
    Ok(users.into_iter().map(PublicUser::from).collect())
}

pub async fn get_user(state: &AppState, id: Uuid) -> AppResult<PublicUser> {
    db(User::find_by_id(&state.db, id))
        .await?
        .map(PublicUser::from)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Irrevocable delete. Returns the removed identity, or NotFound when the id
/// is unknown (including a repeat delete of the same id).
pub async fn delete_user(state: &AppState, id: Uuid) -> AppResult<PublicUser> {
    let deleted = db(User::delete_by_id(&state.db, id))
        .await?
        .map(PublicUser::from)
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    info!(user_id = %id, "user deleted");
    Ok(deleted)
}
