use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
};

use crate::{
    entities::{accounts::Role, profiles},
    state::DatabaseClient,
};

#[async_trait]
pub trait ProfilesRepo: Send + Sync {
    async fn insert_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: profiles::ActiveModel,
    ) -> Result<profiles::Model, sea_orm::DbErr>;
    async fn find_by_id(&self, id: &str) -> Result<Option<profiles::Model>, sea_orm::DbErr>;
    async fn find_by_id_and_variant(
        &self,
        id: &str,
        variant: Role,
    ) -> Result<Option<profiles::Model>, sea_orm::DbErr>;
    async fn find_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Option<profiles::Model>, sea_orm::DbErr>;
    async fn find_by_account_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        account_id: &str,
    ) -> Result<Option<profiles::Model>, sea_orm::DbErr>;
    async fn list(
        &self,
        variant: Option<Role>,
        account_id: Option<&str>,
    ) -> Result<Vec<profiles::Model>, sea_orm::DbErr>;
    async fn update(
        &self,
        model: profiles::ActiveModel,
    ) -> Result<profiles::Model, sea_orm::DbErr>;
    async fn delete_by_account_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        account_id: &str,
    ) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmProfilesRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmProfilesRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfilesRepo for SeaOrmProfilesRepo {
    async fn insert_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: profiles::ActiveModel,
    ) -> Result<profiles::Model, sea_orm::DbErr> {
        model.insert(txn).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<profiles::Model>, sea_orm::DbErr> {
        profiles::Entity::find_by_id(id.to_string())
            .one(self.db.conn())
            .await
    }

    async fn find_by_id_and_variant(
        &self,
        id: &str,
        variant: Role,
    ) -> Result<Option<profiles::Model>, sea_orm::DbErr> {
        profiles::Entity::find_by_id(id.to_string())
            .filter(profiles::Column::Variant.eq(variant))
            .one(self.db.conn())
            .await
    }

    async fn find_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Option<profiles::Model>, sea_orm::DbErr> {
        profiles::Entity::find()
            .filter(profiles::Column::AccountId.eq(account_id))
            .one(self.db.conn())
            .await
    }

    async fn find_by_account_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        account_id: &str,
    ) -> Result<Option<profiles::Model>, sea_orm::DbErr> {
        profiles::Entity::find()
            .filter(profiles::Column::AccountId.eq(account_id))
            .one(txn)
            .await
    }

    async fn list(
        &self,
        variant: Option<Role>,
        account_id: Option<&str>,
    ) -> Result<Vec<profiles::Model>, sea_orm::DbErr> {
        let mut query = profiles::Entity::find();
        if let Some(variant) = variant {
            query = query.filter(profiles::Column::Variant.eq(variant));
        }
        if let Some(account_id) = account_id {
            query = query.filter(profiles::Column::AccountId.eq(account_id));
        }
        query
            .order_by_desc(profiles::Column::CreatedAt)
            .all(self.db.conn())
            .await
    }

    async fn update(
        &self,
        model: profiles::ActiveModel,
    ) -> Result<profiles::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_account_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        account_id: &str,
    ) -> Result<u64, sea_orm::DbErr> {
        let result = profiles::Entity::delete_many()
            .filter(profiles::Column::AccountId.eq(account_id))
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}
