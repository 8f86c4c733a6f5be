use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};

use crate::{entities::clubs, state::DatabaseClient};

#[async_trait]
pub trait ClubsRepo: Send + Sync {
    async fn insert(&self, model: clubs::ActiveModel) -> Result<clubs::Model, sea_orm::DbErr>;
    /// Looks the club up by id first, then by slug.
    async fn find_by_key(&self, key: &str) -> Result<Option<clubs::Model>, sea_orm::DbErr>;
    async fn slug_taken(
        &self,
        slug: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, sea_orm::DbErr>;
    async fn list(&self) -> Result<Vec<clubs::Model>, sea_orm::DbErr>;
    async fn list_by_league(&self, league_id: &str) -> Result<Vec<clubs::Model>, sea_orm::DbErr>;
    async fn update(&self, model: clubs::ActiveModel) -> Result<clubs::Model, sea_orm::DbErr>;
    async fn delete_by_id(&self, id: &str) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmClubsRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmClubsRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClubsRepo for SeaOrmClubsRepo {
    async fn insert(&self, model: clubs::ActiveModel) -> Result<clubs::Model, sea_orm::DbErr> {
        model.insert(self.db.conn()).await
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<clubs::Model>, sea_orm::DbErr> {
        let conn = self.db.conn();
        if let Some(found) = clubs::Entity::find_by_id(key.to_string()).one(conn).await? {
            return Ok(Some(found));
        }
        clubs::Entity::find()
            .filter(clubs::Column::Slug.eq(key))
            .one(conn)
            .await
    }

    async fn slug_taken(
        &self,
        slug: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, sea_orm::DbErr> {
        let mut query = clubs::Entity::find().filter(clubs::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(clubs::Column::Id.ne(id));
        }
        Ok(query.one(self.db.conn()).await?.is_some())
    }

    async fn list(&self) -> Result<Vec<clubs::Model>, sea_orm::DbErr> {
        clubs::Entity::find()
            .order_by_asc(clubs::Column::Name)
            .all(self.db.conn())
            .await
    }

    async fn list_by_league(&self, league_id: &str) -> Result<Vec<clubs::Model>, sea_orm::DbErr> {
        clubs::Entity::find()
            .filter(clubs::Column::LeagueId.eq(league_id))
            .order_by_asc(clubs::Column::Name)
            .all(self.db.conn())
            .await
    }

    async fn update(&self, model: clubs::ActiveModel) -> Result<clubs::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, sea_orm::DbErr> {
        let result = clubs::Entity::delete_by_id(id.to_string())
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected)
    }
}
