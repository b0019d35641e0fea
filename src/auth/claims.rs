use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload carried by every issued token. Kept to non-sensitive identity
/// fields plus the timestamps jsonwebtoken validates against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,    // user ID
    pub email: String,
    pub name: String,
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
}
