use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ModelError;
use crate::booking;

// Matches EMAIL_MAX_LEN so email-as-username registrations always fit.
pub const USERNAME_MAX_LEN: usize = 254;
pub const EMAIL_MAX_LEN: usize = 254;
pub const NAME_MAX_LEN: usize = 150;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub password_algorithm: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Booking,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Booking => Entity::has_many(booking::Entity).into() }
    }
}

impl Related<booking::Entity> for Entity {
    fn to() -> RelationDef { Relation::Booking.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Emails are compared case-insensitively; the stored form is trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.is_empty() { return Err(ModelError::Validation("email required".into())); }
    if email.len() > EMAIL_MAX_LEN { return Err(ModelError::Validation("email too long".into())); }
    if email.chars().any(char::is_whitespace) { return Err(ModelError::Validation("invalid email".into())); }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    let username = username.trim();
    if username.is_empty() { return Err(ModelError::Validation("username required".into())); }
    if username.chars().count() > USERNAME_MAX_LEN { return Err(ModelError::Validation("username too long".into())); }
    if username.chars().any(char::is_control) { return Err(ModelError::Validation("invalid username".into())); }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.chars().count() > NAME_MAX_LEN { return Err(ModelError::Validation("name too long".into())); }
    Ok(())
}

/// Column values for a new account row. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_algorithm: String,
    pub first_name: String,
    pub last_name: String,
}

/// Insert a new account in a single statement.
///
/// Duplicate usernames or emails surface as [`ModelError::UniqueViolation`]
/// from the unique indexes; there is deliberately no pre-insert lookup.
pub async fn create(db: &DatabaseConnection, new: NewAccount) -> Result<Model, ModelError> {
    validate_username(&new.username)?;
    validate_email(&new.email)?;
    validate_name(&new.first_name)?;
    validate_name(&new.last_name)?;
    if new.password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        username: Set(new.username.trim().to_string()),
        email: Set(normalize_email(&new.email)),
        password_hash: Set(new.password_hash),
        password_algorithm: Set(new.password_algorithm),
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    debug!(account_id = created.id, "account row inserted");
    Ok(created)
}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Username.eq(username.trim())).one(db).await?)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(normalize_email(email))).one(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("alice@x.com").is_ok());
        assert!(validate_email("  alice@x.com ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("alice@").is_err());
        assert!(validate_email("a b@x.com").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn username_validation() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Alice Doe").is_ok());
        assert!(validate_username("alice@x.com").is_ok());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"a".repeat(USERNAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email(" Alice@X.com "), "alice@x.com");
    }
}
