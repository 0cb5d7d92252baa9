//! User model, roles and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Closed set of user roles. Checked once at the request boundary;
/// administrators pass every gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Librarian,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Librarian => "librarian",
            Role::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "librarian" => Ok(Role::Librarian),
            "student" => Ok(Role::Student),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// SQLx conversions: roles are stored as text
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Student self-registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Change role request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRole {
    pub role: Role,
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require librarian privileges (admins pass)
    pub fn require_librarian(&self) -> Result<(), AppError> {
        if self.role == Role::Librarian || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Librarian privileges required".to_string(),
            ))
        }
    }

    /// Require student privileges (admins pass)
    pub fn require_student(&self) -> Result<(), AppError> {
        if self.role == Role::Student || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Student privileges required".to_string(),
            ))
        }
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> UserClaims {
        UserClaims {
            sub: "test".to_string(),
            user_id: 1,
            role,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn librarian_gate() {
        assert!(claims(Role::Librarian).require_librarian().is_ok());
        assert!(claims(Role::Admin).require_librarian().is_ok());
        assert!(claims(Role::Student).require_librarian().is_err());
    }

    #[test]
    fn admin_gate() {
        assert!(claims(Role::Admin).require_admin().is_ok());
        assert!(claims(Role::Librarian).require_admin().is_err());
        assert!(claims(Role::Student).require_admin().is_err());
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Admin, Role::Librarian, Role::Student] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn token_round_trip() {
        let c = claims(Role::Librarian);
        let mut c = c;
        c.exp = chrono::Utc::now().timestamp() + 3600;
        let token = c.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 1);
        assert_eq!(parsed.role, Role::Librarian);
        assert!(UserClaims::from_token(&token, "wrong").is_err());
    }
}
