use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};

use crate::{entities::leagues, state::DatabaseClient};

#[async_trait]
pub trait LeaguesRepo: Send + Sync {
    async fn insert(&self, model: leagues::ActiveModel) -> Result<leagues::Model, sea_orm::DbErr>;
    /// Looks the league up by id first, then by slug.
    async fn find_by_key(&self, key: &str) -> Result<Option<leagues::Model>, sea_orm::DbErr>;
    async fn slug_taken(
        &self,
        slug: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, sea_orm::DbErr>;
    async fn list(&self) -> Result<Vec<leagues::Model>, sea_orm::DbErr>;
    async fn update(&self, model: leagues::ActiveModel) -> Result<leagues::Model, sea_orm::DbErr>;
    async fn delete_by_id(&self, id: &str) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmLeaguesRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmLeaguesRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LeaguesRepo for SeaOrmLeaguesRepo {
    async fn insert(&self, model: leagues::ActiveModel) -> Result<leagues::Model, sea_orm::DbErr> {
        model.insert(self.db.conn()).await
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<leagues::Model>, sea_orm::DbErr> {
        let conn = self.db.conn();
        if let Some(found) = leagues::Entity::find_by_id(key.to_string()).one(conn).await? {
            return Ok(Some(found));
        }
        leagues::Entity::find()
            .filter(leagues::Column::Slug.eq(key))
            .one(conn)
            .await
    }

    async fn slug_taken(
        &self,
        slug: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, sea_orm::DbErr> {
        let mut query = leagues::Entity::find().filter(leagues::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(leagues::Column::Id.ne(id));
        }
        Ok(query.one(self.db.conn()).await?.is_some())
    }

    async fn list(&self) -> Result<Vec<leagues::Model>, sea_orm::DbErr> {
        leagues::Entity::find()
            .order_by_desc(leagues::Column::CreatedAt)
            .all(self.db.conn())
            .await
    }

    async fn update(&self, model: leagues::ActiveModel) -> Result<leagues::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, sea_orm::DbErr> {
        let result = leagues::Entity::delete_by_id(id.to_string())
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected)
    }
}
