use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, Condition, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::{entities::account_relationships, state::DatabaseClient};

#[async_trait]
pub trait AccountRelationshipsRepo: Send + Sync {
    /// `INSERT … ON CONFLICT (follower_id, following_id) DO NOTHING`. Returns whether a
    /// row was written.
    async fn insert_if_absent(
        &self,
        model: account_relationships::ActiveModel,
    ) -> Result<bool, DbErr>;
    async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<account_relationships::Model>, DbErr>;
    async fn find_pair(
        &self,
        follower_id: &str,
        following_id: &str,
    ) -> Result<Option<account_relationships::Model>, DbErr>;
    async fn delete_pair(&self, follower_id: &str, following_id: &str) -> Result<u64, DbErr>;
    /// Edges pointing at `account_id`, most recent first.
    async fn list_by_following(
        &self,
        account_id: &str,
    ) -> Result<Vec<account_relationships::Model>, DbErr>;
    /// Edges leaving `account_id`, most recent first.
    async fn list_by_follower(
        &self,
        account_id: &str,
    ) -> Result<Vec<account_relationships::Model>, DbErr>;
    async fn count_by_following(&self, account_id: &str) -> Result<u64, DbErr>;
    async fn count_by_follower(&self, account_id: &str) -> Result<u64, DbErr>;
    async fn delete_by_account_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        account_id: &str,
    ) -> Result<u64, DbErr>;
}

pub struct SeaOrmAccountRelationshipsRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmAccountRelationshipsRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRelationshipsRepo for SeaOrmAccountRelationshipsRepo {
    async fn insert_if_absent(
        &self,
        model: account_relationships::ActiveModel,
    ) -> Result<bool, DbErr> {
        let result = account_relationships::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    account_relationships::Column::FollowerId,
                    account_relationships::Column::FollowingId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(self.db.conn())
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<account_relationships::Model>, DbErr> {
        account_relationships::Entity::find_by_id(id.to_string())
            .one(self.db.conn())
            .await
    }

    async fn find_pair(
        &self,
        follower_id: &str,
        following_id: &str,
    ) -> Result<Option<account_relationships::Model>, DbErr> {
        account_relationships::Entity::find()
            .filter(account_relationships::Column::FollowerId.eq(follower_id))
            .filter(account_relationships::Column::FollowingId.eq(following_id))
            .one(self.db.conn())
            .await
    }

    async fn delete_pair(&self, follower_id: &str, following_id: &str) -> Result<u64, DbErr> {
        let result = account_relationships::Entity::delete_many()
            .filter(account_relationships::Column::FollowerId.eq(follower_id))
            .filter(account_relationships::Column::FollowingId.eq(following_id))
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected)
    }

    async fn list_by_following(
        &self,
        account_id: &str,
    ) -> Result<Vec<account_relationships::Model>, DbErr> {
        account_relationships::Entity::find()
            .filter(account_relationships::Column::FollowingId.eq(account_id))
            .order_by_desc(account_relationships::Column::CreatedAt)
            .all(self.db.conn())
            .await
    }

    async fn list_by_follower(
        &self,
        account_id: &str,
    ) -> Result<Vec<account_relationships::Model>, DbErr> {
        account_relationships::Entity::find()
            .filter(account_relationships::Column::FollowerId.eq(account_id))
            .order_by_desc(account_relationships::Column::CreatedAt)
            .all(self.db.conn())
            .await
    }

    async fn count_by_following(&self, account_id: &str) -> Result<u64, DbErr> {
        account_relationships::Entity::find()
            .filter(account_relationships::Column::FollowingId.eq(account_id))
            .count(self.db.conn())
            .await
    }

    async fn count_by_follower(&self, account_id: &str) -> Result<u64, DbErr> {
        account_relationships::Entity::find()
            .filter(account_relationships::Column::FollowerId.eq(account_id))
            .count(self.db.conn())
            .await
    }

    async fn delete_by_account_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        account_id: &str,
    ) -> Result<u64, DbErr> {
        let result = account_relationships::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(account_relationships::Column::FollowerId.eq(account_id))
                    .add(account_relationships::Column::FollowingId.eq(account_id)),
            )
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}
