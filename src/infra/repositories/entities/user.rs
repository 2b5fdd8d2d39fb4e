//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Profile, User};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub user_level: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[sea_orm(column_name = "address_1")]
    pub address_1: Option<String>,
    #[sea_orm(column_name = "address_2")]
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let user_level = model
            .user_level
            .parse()
            .map_err(|e| AppError::internal(format!("user {}: {}", model.id, e)))?;

        Ok(User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            user_level,
            profile: Profile {
                first_name: model.first_name,
                last_name: model.last_name,
                address_1: model.address_1,
                address_2: model.address_2,
                city: model.city,
                state: model.state,
                zip_code: model.zip_code,
                country: model.country,
                phone: model.phone,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
