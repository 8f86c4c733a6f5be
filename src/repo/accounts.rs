use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder,
};

use crate::{entities::accounts, state::DatabaseClient};

#[async_trait]
pub trait AccountsRepo: Send + Sync {
    async fn insert_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: accounts::ActiveModel,
    ) -> Result<accounts::Model, sea_orm::DbErr>;
    async fn find_by_id(&self, id: &str) -> Result<Option<accounts::Model>, sea_orm::DbErr>;
    async fn find_by_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        id: &str,
    ) -> Result<Option<accounts::Model>, sea_orm::DbErr>;
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<accounts::Model>, sea_orm::DbErr>;
    /// Accounts other than `exclude_id` holding any of the given unique values.
    async fn find_conflicting_with_txn(
        &self,
        txn: &DatabaseTransaction,
        username: &str,
        email: &str,
        phone_number: &str,
        exclude_id: Option<&str>,
    ) -> Result<Vec<accounts::Model>, sea_orm::DbErr>;
    async fn find_many(&self, ids: &[String]) -> Result<Vec<accounts::Model>, sea_orm::DbErr>;
    async fn list(&self) -> Result<Vec<accounts::Model>, sea_orm::DbErr>;
    async fn update_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: accounts::ActiveModel,
    ) -> Result<accounts::Model, sea_orm::DbErr>;
    async fn delete_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: accounts::Model,
    ) -> Result<(), sea_orm::DbErr>;
}

pub struct SeaOrmAccountsRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmAccountsRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountsRepo for SeaOrmAccountsRepo {
    async fn insert_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: accounts::ActiveModel,
    ) -> Result<accounts::Model, sea_orm::DbErr> {
        model.insert(txn).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<accounts::Model>, sea_orm::DbErr> {
        accounts::Entity::find_by_id(id.to_string())
            .one(self.db.conn())
            .await
    }

    async fn find_by_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        id: &str,
    ) -> Result<Option<accounts::Model>, sea_orm::DbErr> {
        accounts::Entity::find_by_id(id.to_string()).one(txn).await
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<accounts::Model>, sea_orm::DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .one(self.db.conn())
            .await
    }

    async fn find_conflicting_with_txn(
        &self,
        txn: &DatabaseTransaction,
        username: &str,
        email: &str,
        phone_number: &str,
        exclude_id: Option<&str>,
    ) -> Result<Vec<accounts::Model>, sea_orm::DbErr> {
        let mut query = accounts::Entity::find().filter(
            Condition::any()
                .add(accounts::Column::Username.eq(username))
                .add(accounts::Column::Email.eq(email))
                .add(accounts::Column::PhoneNumber.eq(phone_number)),
        );
        if let Some(id) = exclude_id {
            query = query.filter(accounts::Column::Id.ne(id));
        }
        query.all(txn).await
    }

    async fn find_many(&self, ids: &[String]) -> Result<Vec<accounts::Model>, sea_orm::DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.conn())
            .await
    }

    async fn list(&self) -> Result<Vec<accounts::Model>, sea_orm::DbErr> {
        accounts::Entity::find()
            .order_by_asc(accounts::Column::Username)
            .all(self.db.conn())
            .await
    }

    async fn update_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: accounts::ActiveModel,
    ) -> Result<accounts::Model, sea_orm::DbErr> {
        model.update(txn).await
    }

    async fn delete_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: accounts::Model,
    ) -> Result<(), sea_orm::DbErr> {
        model.delete(txn).await?;
        Ok(())
    }
}
