use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;

use crate::{
    repo::{
        account_relationships::SeaOrmAccountRelationshipsRepo, accounts::SeaOrmAccountsRepo,
        clubs::SeaOrmClubsRepo, leagues::SeaOrmLeaguesRepo,
        profile_statuses::SeaOrmProfileStatusesRepo, profiles::SeaOrmProfilesRepo,
    },
    service::{
        accounts::{AccountsService, AccountsServiceImpl},
        catalog::{ClubsService, ClubsServiceImpl, LeaguesService, LeaguesServiceImpl},
        config::ConfigService,
        profiles::{ProfilesService, ProfilesServiceImpl},
        relationships::{RelationshipsService, RelationshipsServiceImpl},
        statuses::{StatusesService, StatusesServiceImpl},
    },
};

pub trait DatabaseClient: Send + Sync {
    fn conn(&self) -> &DatabaseConnection;
}

pub struct SeaOrmDatabaseClient {
    conn: DatabaseConnection,
}

impl SeaOrmDatabaseClient {
    /// Connects and brings the schema up to date.
    pub async fn connect(url: Option<&str>) -> Result<Self, DbErr> {
        let conn = crate::db::connect(url).await?;
        crate::schema::apply(&conn).await?;
        Ok(Self { conn })
    }
}

impl DatabaseClient for SeaOrmDatabaseClient {
    fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

pub struct AppState {
    db: Arc<dyn DatabaseClient>,
    accounts: Arc<dyn AccountsService>,
    profiles: Arc<dyn ProfilesService>,
    statuses: Arc<dyn StatusesService>,
    relationships: Arc<dyn RelationshipsService>,
    leagues: Arc<dyn LeaguesService>,
    clubs: Arc<dyn ClubsService>,
    config: Arc<dyn ConfigService>,
}

impl AppState {
    pub async fn new(config: Arc<dyn ConfigService>) -> Result<Arc<Self>, DbErr> {
        let db = SeaOrmDatabaseClient::connect(config.values().database_url.as_deref()).await?;
        Ok(Self::with_database(Arc::new(db), config))
    }

    pub fn with_database(db: Arc<dyn DatabaseClient>, config: Arc<dyn ConfigService>) -> Arc<Self> {
        let accounts_repo = Arc::new(SeaOrmAccountsRepo::new(db.clone()));
        let profiles_repo = Arc::new(SeaOrmProfilesRepo::new(db.clone()));
        let statuses_repo = Arc::new(SeaOrmProfileStatusesRepo::new(db.clone()));
        let relationships_repo = Arc::new(SeaOrmAccountRelationshipsRepo::new(db.clone()));
        let leagues_repo = Arc::new(SeaOrmLeaguesRepo::new(db.clone()));
        let clubs_repo = Arc::new(SeaOrmClubsRepo::new(db.clone()));

        let accounts = Arc::new(AccountsServiceImpl::new(
            db.clone(),
            accounts_repo.clone(),
            profiles_repo.clone(),
            statuses_repo.clone(),
            relationships_repo.clone(),
        ));
        let profiles = Arc::new(ProfilesServiceImpl::new(
            profiles_repo.clone(),
            relationships_repo.clone(),
        ));
        let statuses = Arc::new(StatusesServiceImpl::new(
            statuses_repo,
            profiles_repo,
        ));
        let relationships = Arc::new(RelationshipsServiceImpl::new(
            accounts_repo,
            relationships_repo,
        ));
        let leagues = Arc::new(LeaguesServiceImpl::new(leagues_repo.clone()));
        let clubs = Arc::new(ClubsServiceImpl::new(clubs_repo, leagues_repo));

        Arc::new(Self {
            db,
            accounts,
            profiles,
            statuses,
            relationships,
            leagues,
            clubs,
            config,
        })
    }

    pub fn db(&self) -> &dyn DatabaseClient {
        self.db.as_ref()
    }

    pub fn accounts(&self) -> &dyn AccountsService {
        self.accounts.as_ref()
    }

    pub fn profiles(&self) -> &dyn ProfilesService {
        self.profiles.as_ref()
    }

    pub fn statuses(&self) -> &dyn StatusesService {
        self.statuses.as_ref()
    }

    pub fn relationships(&self) -> &dyn RelationshipsService {
        self.relationships.as_ref()
    }

    pub fn leagues(&self) -> &dyn LeaguesService {
        self.leagues.as_ref()
    }

    pub fn clubs(&self) -> &dyn ClubsService {
        self.clubs.as_ref()
    }

    pub fn config(&self) -> &dyn ConfigService {
        self.config.as_ref()
    }
}
