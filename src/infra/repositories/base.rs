//! Base persistence traits shared by every mapped record.
//!
//! `BaseModel` turns a record into a column/value map. The repository traits
//! cover the rest of the record lifecycle (find, save, partial update,
//! delete) and delegate every statement to SeaORM. They add no validation,
//! retries or error translation: a `DbErr` surfaces as `AppError::Database`
//! and nothing else.

use std::collections::HashSet;
use std::fmt::Debug;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IdenStatic, IntoActiveModel, Iterable, ModelTrait, PaginatorTrait,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder, TryIntoModel,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::errors::AppResult;
use crate::types::PaginationParams;

type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Column name to value mapping of a record.
pub type ColumnMap = Map<String, JsonValue>;

/// Serialization of any mapped record to its columns.
pub trait BaseModel: ModelTrait + Serialize {
    /// Return the record as a map of column name to current value.
    ///
    /// Models are plain structs of column values with derived `Serialize`,
    /// which always serialize to a JSON object; the empty-map arm only
    /// covers a hand-written `Serialize` that does not.
    fn json(&self) -> ColumnMap {
        let mut fields = match serde_json::to_value(self) {
            Ok(JsonValue::Object(fields)) => fields,
            _ => Map::new(),
        };

        <<Self as ModelTrait>::Entity as EntityTrait>::Column::iter()
            .filter_map(|column| {
                let name = column.as_str();
                fields.remove(name).map(|value| (name.to_string(), value))
            })
            .collect()
    }
}

impl<M> BaseModel for M where M: ModelTrait + Serialize {}

/// Names of the primary key columns of `E`.
fn primary_key_columns<E: EntityTrait>() -> HashSet<String> {
    E::PrimaryKey::iter()
        .map(|pk| pk.into_column().as_str().to_string())
        .collect()
}

/// Read operations (Query)
#[async_trait]
pub trait ReadRepository<E, M>: Send + Sync
where
    E: EntityTrait<Model = M>,
    M: Send + Sync + FromQueryResult,
{
    /// Get database connection reference
    fn db(&self) -> &DatabaseConnection;

    /// Find entity by primary key, `None` when no row has that key
    async fn find_by_id(&self, id: PrimaryKeyOf<E>) -> AppResult<Option<M>>
    where
        PrimaryKeyOf<E>: Clone + Send,
    {
        E::find_by_id(id)
            .one(self.db())
            .await
            .map_err(Into::into)
    }

    /// Find all entities
    async fn find_all(&self) -> AppResult<Vec<M>> {
        E::find()
            .all(self.db())
            .await
            .map_err(Into::into)
    }

    /// Find entities with pagination, ordered by primary key
    async fn find_paginated(&self, params: &PaginationParams) -> AppResult<(Vec<M>, u64)> {
        let mut query = E::find();
        for pk in E::PrimaryKey::iter() {
            query = query.order_by_asc(pk.into_column());
        }
        let paginator = query.paginate(self.db(), params.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(params.page.saturating_sub(1)).await?;
        Ok((data, total))
    }

    /// Count all entities
    async fn count(&self) -> AppResult<u64> {
        E::find()
            .paginate(self.db(), 1)
            .num_items()
            .await
            .map_err(Into::into)
    }
}

/// Write operations (Command)
#[async_trait]
pub trait WriteRepository<E, M, A>: Send + Sync
where
    E: EntityTrait<Model = M>,
    M: ModelTrait<Entity = E> + FromQueryResult + IntoActiveModel<A> + Send + Sync,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
{
    /// Get database connection reference
    fn db(&self) -> &DatabaseConnection;

    /// Insert a new record
    async fn insert(&self, model: A) -> AppResult<M> {
        model
            .insert(self.db())
            .await
            .map_err(Into::into)
    }

    /// Insert the record when its primary key is unset, update it otherwise.
    async fn save(&self, model: A) -> AppResult<M>
    where
        A: TryIntoModel<M>,
    {
        let saved = model.save(self.db()).await?;
        saved.try_into_model().map_err(Into::into)
    }

    /// Apply a partial update to the row with primary key `id`.
    ///
    /// Every key of `data` must name a non-key column; any other key fails
    /// the whole update with `DbErr::Custom` before anything is written.
    /// A missing row is reported as `DbErr::RecordNotFound`.
    async fn update(&self, id: PrimaryKeyOf<E>, data: ColumnMap) -> AppResult<M>
    where
        PrimaryKeyOf<E>: Clone + Send + Debug,
        M: BaseModel + DeserializeOwned,
    {
        let current = E::find_by_id(id.clone())
            .one(self.db())
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("{:?}", id)))?;

        let keys = primary_key_columns::<E>();
        let mut row = current.json();
        let mut changed = Vec::new();
        for (name, value) in data {
            if keys.contains(&name) {
                let msg = format!("primary key column {} is read-only", name);
                return Err(DbErr::Custom(msg).into());
            }
            if !row.contains_key(&name) {
                return Err(DbErr::Custom(format!("unknown column {}", name)).into());
            }
            row.insert(name.clone(), value);
            changed.push(name);
        }

        let merged: M = serde_json::from_value(JsonValue::Object(row))
            .map_err(|e| DbErr::Json(e.to_string()))?;
        let mut active = merged.into_active_model();
        for column in E::Column::iter() {
            if changed.iter().any(|name| name == column.as_str()) {
                if let Some(value) = active.get(column).into_value() {
                    active.set(column, value);
                }
            }
        }

        active.update(self.db()).await.map_err(Into::into)
    }
}

/// Delete operations
#[async_trait]
pub trait DeleteRepository<E, M, A>: Send + Sync
where
    E: EntityTrait<Model = M>,
    M: IntoActiveModel<A> + Send + Sync + 'static,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
{
    /// Get database connection reference
    fn db(&self) -> &DatabaseConnection;

    /// Delete the record, returning the number of rows removed
    async fn delete(&self, model: M) -> AppResult<u64> {
        let result = model.into_active_model().delete(self.db()).await?;
        Ok(result.rows_affected)
    }

    /// Delete entity by primary key, returning the number of rows removed
    async fn delete_by_id(&self, id: PrimaryKeyOf<E>) -> AppResult<u64>
    where
        PrimaryKeyOf<E>: Clone + Send + Debug,
    {
        let result = E::delete_by_id(id).exec(self.db()).await?;
        Ok(result.rows_affected)
    }
}
