use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryOrder};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::account;

pub const DESTINATION_MAX_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub destination: String,
    pub date: Date,
    pub guests: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Owner }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(account::Entity)
                .from(Column::OwnerId)
                .to(account::Column::Id)
                .into(),
        }
    }
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_destination(d: &str) -> Result<(), ModelError> {
    if d.trim().is_empty() {
        return Err(ModelError::Validation("destination required".into()));
    }
    if d.chars().count() > DESTINATION_MAX_LEN {
        return Err(ModelError::Validation("destination too long".into()));
    }
    Ok(())
}

pub fn validate_guests(g: i32) -> Result<(), ModelError> {
    if g < 1 {
        return Err(ModelError::Validation("guests must be at least 1".into()));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` booking date and reject dates before `today`.
pub fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ModelError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ModelError::Validation("invalid date (expected YYYY-MM-DD)".into()))?;
    if date < today {
        return Err(ModelError::Validation("date must not be in the past".into()));
    }
    Ok(date)
}

pub async fn create(
    db: &DatabaseConnection,
    owner_id: i64,
    destination: &str,
    date: NaiveDate,
    guests: i32,
) -> Result<Model, ModelError> {
    validate_destination(destination)?;
    validate_guests(guests)?;
    let am = ActiveModel {
        owner_id: Set(owner_id),
        destination: Set(destination.trim().to_string()),
        date: Set(date),
        guests: Set(guests),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// All bookings of one owner, oldest first.
pub async fn list_by_owner(db: &DatabaseConnection, owner_id: i64) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Lookup by id restricted to `owner_id`; a foreign booking is indistinguishable from a missing one.
pub async fn find_owned(db: &DatabaseConnection, owner_id: i64, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Id.eq(id))
        .filter(Column::OwnerId.eq(owner_id))
        .one(db)
        .await?)
}

pub async fn update_owned(
    db: &DatabaseConnection,
    owner_id: i64,
    id: i64,
    destination: Option<&str>,
    date: Option<NaiveDate>,
    guests: Option<i32>,
) -> Result<Option<Model>, ModelError> {
    let Some(found) = find_owned(db, owner_id, id).await? else { return Ok(None) };
    let mut am: ActiveModel = found.into();
    if let Some(d) = destination {
        validate_destination(d)?;
        am.destination = Set(d.trim().to_string());
    }
    if let Some(d) = date { am.date = Set(d); }
    if let Some(g) = guests {
        validate_guests(g)?;
        am.guests = Set(g);
    }
    Ok(Some(am.update(db).await?))
}

pub async fn delete_owned(db: &DatabaseConnection, owner_id: i64, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::OwnerId.eq(owner_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
