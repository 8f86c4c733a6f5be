use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
};

use crate::{entities::profile_statuses, state::DatabaseClient};

#[async_trait]
pub trait ProfileStatusesRepo: Send + Sync {
    async fn insert(
        &self,
        model: profile_statuses::ActiveModel,
    ) -> Result<profile_statuses::Model, sea_orm::DbErr>;
    async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<profile_statuses::Model>, sea_orm::DbErr>;
    /// Most recent first.
    async fn list(
        &self,
        profile_id: Option<&str>,
    ) -> Result<Vec<profile_statuses::Model>, sea_orm::DbErr>;
    async fn latest_for_profile(
        &self,
        profile_id: &str,
    ) -> Result<Option<profile_statuses::Model>, sea_orm::DbErr>;
    async fn update(
        &self,
        model: profile_statuses::ActiveModel,
    ) -> Result<profile_statuses::Model, sea_orm::DbErr>;
    async fn delete_by_id(&self, id: &str) -> Result<u64, sea_orm::DbErr>;
    async fn delete_by_profile_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        profile_id: &str,
    ) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmProfileStatusesRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmProfileStatusesRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStatusesRepo for SeaOrmProfileStatusesRepo {
    async fn insert(
        &self,
        model: profile_statuses::ActiveModel,
    ) -> Result<profile_statuses::Model, sea_orm::DbErr> {
        model.insert(self.db.conn()).await
    }

    async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<profile_statuses::Model>, sea_orm::DbErr> {
        profile_statuses::Entity::find_by_id(id.to_string())
            .one(self.db.conn())
            .await
    }

    async fn list(
        &self,
        profile_id: Option<&str>,
    ) -> Result<Vec<profile_statuses::Model>, sea_orm::DbErr> {
        let mut query = profile_statuses::Entity::find();
        if let Some(profile_id) = profile_id {
            query = query.filter(profile_statuses::Column::ProfileId.eq(profile_id));
        }
        query
            .order_by_desc(profile_statuses::Column::CreatedAt)
            .all(self.db.conn())
            .await
    }

    async fn latest_for_profile(
        &self,
        profile_id: &str,
    ) -> Result<Option<profile_statuses::Model>, sea_orm::DbErr> {
        profile_statuses::Entity::find()
            .filter(profile_statuses::Column::ProfileId.eq(profile_id))
            .order_by_desc(profile_statuses::Column::CreatedAt)
            .one(self.db.conn())
            .await
    }

    async fn update(
        &self,
        model: profile_statuses::ActiveModel,
    ) -> Result<profile_statuses::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, sea_orm::DbErr> {
        let result = profile_statuses::Entity::delete_by_id(id.to_string())
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_by_profile_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        profile_id: &str,
    ) -> Result<u64, sea_orm::DbErr> {
        let result = profile_statuses::Entity::delete_many()
            .filter(profile_statuses::Column::ProfileId.eq(profile_id))
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}
