use async_trait::async_trait;
use chrono::Utc;
use sea_orm::Set;
use std::sync::Arc;

use crate::{
    entities::{
        clubs,
        leagues::{self, Continent},
    },
    error::ApiError,
    ids,
    repo::{clubs::ClubsRepo, leagues::LeaguesRepo},
    validation,
};

const CLUB_FULL_NAME_MAX: usize = 155;
const CLUB_SHORT_NAME_MAX: usize = 55;

#[derive(Clone, Debug, Default)]
pub struct LeagueInput {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub logo: Option<String>,
    pub country: Option<String>,
    pub continent: Option<Continent>,
    pub description: Option<String>,
    pub year_established: Option<i16>,
}

#[derive(Clone, Debug, Default)]
pub struct ClubInput {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub short_name: Option<String>,
    pub logo: Option<String>,
    pub year_established: Option<i16>,
    /// League id or slug.
    pub league: Option<String>,
}

fn year(value: Option<i16>) -> Result<Option<i16>, ApiError> {
    match value {
        Some(year) if year <= 0 => Err(ApiError::validation(
            "year_established",
            "must be a positive year",
        )),
        other => Ok(other),
    }
}

fn slug_conflict(slug: &str) -> ApiError {
    ApiError::conflict("slug", format!("slug '{slug}' is already in use"))
}

#[async_trait]
pub trait LeaguesService: Send + Sync {
    async fn create(&self, input: LeagueInput) -> Result<leagues::Model, ApiError>;
    /// `key` is either the league id or its slug.
    async fn get(&self, key: &str) -> Result<leagues::Model, ApiError>;
    async fn list(&self) -> Result<Vec<leagues::Model>, ApiError>;
    async fn update(&self, key: &str, input: LeagueInput) -> Result<leagues::Model, ApiError>;
    async fn delete(&self, key: &str) -> Result<(), ApiError>;
}

pub struct LeaguesServiceImpl {
    leagues_repo: Arc<dyn LeaguesRepo>,
}

impl LeaguesServiceImpl {
    pub fn new(leagues_repo: Arc<dyn LeaguesRepo>) -> Self {
        Self { leagues_repo }
    }

    async fn slug_for(&self, name: &str, exclude_id: Option<&str>) -> Result<String, ApiError> {
        let slug = validation::slugify("name", name)?;
        if self.leagues_repo.slug_taken(&slug, exclude_id).await? {
            tracing::warn!(%slug, "league slug collision");
            return Err(slug_conflict(&slug));
        }
        Ok(slug)
    }
}

#[async_trait]
impl LeaguesService for LeaguesServiceImpl {
    async fn create(&self, input: LeagueInput) -> Result<leagues::Model, ApiError> {
        let name = validation::required_text("name", input.name.as_deref(), validation::TEXT_MAX)?;
        let short_name = validation::required_text(
            "short_name",
            input.short_name.as_deref(),
            validation::TEXT_MAX,
        )?;
        let country =
            validation::required_text("country", input.country.as_deref(), validation::TEXT_MAX)
                .and_then(|value| validation::country("country", &value))?;
        let logo = validation::optional_url("logo", input.logo)?;
        let description = input.description.filter(|value| !value.trim().is_empty());
        let year_established = year(input.year_established)?;
        let slug = self.slug_for(&name, None).await?;

        let now = Utc::now();
        let league = self
            .leagues_repo
            .insert(leagues::ActiveModel {
                id: Set(ids::short_id()),
                name: Set(name),
                slug: Set(slug),
                short_name: Set(short_name),
                logo: Set(logo),
                country: Set(country),
                continent: Set(input.continent.unwrap_or_default()),
                description: Set(description),
                year_established: Set(year_established),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            })
            .await?;
        tracing::info!(league_id = %league.id, slug = %league.slug, "league created");
        Ok(league)
    }

    async fn get(&self, key: &str) -> Result<leagues::Model, ApiError> {
        self.leagues_repo
            .find_by_key(key)
            .await?
            .ok_or(ApiError::not_found("league"))
    }

    async fn list(&self) -> Result<Vec<leagues::Model>, ApiError> {
        Ok(self.leagues_repo.list().await?)
    }

    async fn update(&self, key: &str, input: LeagueInput) -> Result<leagues::Model, ApiError> {
        let current = self.get(key).await?;
        let name = match input.name.as_deref() {
            Some(name) => validation::required_text("name", Some(name), validation::TEXT_MAX)?,
            None => current.name.clone(),
        };
        let slug = self.slug_for(&name, Some(&current.id)).await?;

        let mut active: leagues::ActiveModel = current.into();
        active.name = Set(name);
        active.slug = Set(slug);
        if let Some(short_name) = input.short_name.as_deref() {
            active.short_name = Set(validation::required_text(
                "short_name",
                Some(short_name),
                validation::TEXT_MAX,
            )?);
        }
        if let Some(country) = input.country.as_deref() {
            active.country = Set(validation::country("country", country)?);
        }
        if input.logo.is_some() {
            active.logo = Set(validation::optional_url("logo", input.logo)?);
        }
        if let Some(continent) = input.continent {
            active.continent = Set(continent);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description).filter(|value| !value.trim().is_empty()));
        }
        if input.year_established.is_some() {
            active.year_established = Set(year(input.year_established)?);
        }
        active.updated_at = Set(Utc::now().into());

        let league = self.leagues_repo.update(active).await?;
        tracing::info!(league_id = %league.id, slug = %league.slug, "league updated");
        Ok(league)
    }

    async fn delete(&self, key: &str) -> Result<(), ApiError> {
        let league = self.get(key).await?;
        self.leagues_repo.delete_by_id(&league.id).await?;
        tracing::info!(league_id = %league.id, "league deleted");
        Ok(())
    }
}

#[async_trait]
pub trait ClubsService: Send + Sync {
    async fn create(&self, input: ClubInput) -> Result<clubs::Model, ApiError>;
    async fn get(&self, key: &str) -> Result<clubs::Model, ApiError>;
    async fn list(&self) -> Result<Vec<clubs::Model>, ApiError>;
    async fn list_by_league(&self, league_key: &str) -> Result<Vec<clubs::Model>, ApiError>;
    async fn update(&self, key: &str, input: ClubInput) -> Result<clubs::Model, ApiError>;
    async fn delete(&self, key: &str) -> Result<(), ApiError>;
}

pub struct ClubsServiceImpl {
    clubs_repo: Arc<dyn ClubsRepo>,
    leagues_repo: Arc<dyn LeaguesRepo>,
}

impl ClubsServiceImpl {
    pub fn new(clubs_repo: Arc<dyn ClubsRepo>, leagues_repo: Arc<dyn LeaguesRepo>) -> Self {
        Self {
            clubs_repo,
            leagues_repo,
        }
    }

    async fn slug_for(&self, name: &str, exclude_id: Option<&str>) -> Result<String, ApiError> {
        let slug = validation::slugify("name", name)?;
        if self.clubs_repo.slug_taken(&slug, exclude_id).await? {
            tracing::warn!(%slug, "club slug collision");
            return Err(slug_conflict(&slug));
        }
        Ok(slug)
    }

    async fn league_id(&self, key: &str) -> Result<String, ApiError> {
        match self.leagues_repo.find_by_key(key).await? {
            Some(league) => Ok(league.id),
            None => Err(ApiError::validation("league", "unknown league")),
        }
    }
}

#[async_trait]
impl ClubsService for ClubsServiceImpl {
    async fn create(&self, input: ClubInput) -> Result<clubs::Model, ApiError> {
        let name = validation::required_text("name", input.name.as_deref(), validation::TEXT_MAX)?;
        let full_name = validation::required_text(
            "full_name",
            input.full_name.as_deref(),
            CLUB_FULL_NAME_MAX,
        )?;
        let short_name = validation::required_text(
            "short_name",
            input.short_name.as_deref(),
            CLUB_SHORT_NAME_MAX,
        )?;
        let logo = validation::optional_url("logo", input.logo)?;
        let year_established = year(input.year_established)?;
        let league_key =
            validation::required_text("league", input.league.as_deref(), validation::TEXT_MAX)?;
        let league_id = self.league_id(&league_key).await?;
        let slug = self.slug_for(&name, None).await?;

        let now = Utc::now();
        let club = self
            .clubs_repo
            .insert(clubs::ActiveModel {
                id: Set(ids::short_id()),
                name: Set(name),
                slug: Set(slug),
                full_name: Set(full_name),
                short_name: Set(short_name),
                logo: Set(logo),
                year_established: Set(year_established),
                league_id: Set(league_id),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            })
            .await?;
        tracing::info!(club_id = %club.id, slug = %club.slug, league_id = %club.league_id, "club created");
        Ok(club)
    }

    async fn get(&self, key: &str) -> Result<clubs::Model, ApiError> {
        self.clubs_repo
            .find_by_key(key)
            .await?
            .ok_or(ApiError::not_found("club"))
    }

    async fn list(&self) -> Result<Vec<clubs::Model>, ApiError> {
        Ok(self.clubs_repo.list().await?)
    }

    async fn list_by_league(&self, league_key: &str) -> Result<Vec<clubs::Model>, ApiError> {
        let league = self
            .leagues_repo
            .find_by_key(league_key)
            .await?
            .ok_or(ApiError::not_found("league"))?;
        Ok(self.clubs_repo.list_by_league(&league.id).await?)
    }

    async fn update(&self, key: &str, input: ClubInput) -> Result<clubs::Model, ApiError> {
        let current = self.get(key).await?;
        let name = match input.name.as_deref() {
            Some(name) => validation::required_text("name", Some(name), validation::TEXT_MAX)?,
            None => current.name.clone(),
        };
        let slug = self.slug_for(&name, Some(&current.id)).await?;
        let league_id = match input.league.as_deref() {
            Some(key) => Some(self.league_id(key).await?),
            None => None,
        };

        let mut active: clubs::ActiveModel = current.into();
        active.name = Set(name);
        active.slug = Set(slug);
        if let Some(full_name) = input.full_name.as_deref() {
            active.full_name = Set(validation::required_text(
                "full_name",
                Some(full_name),
                CLUB_FULL_NAME_MAX,
            )?);
        }
        if let Some(short_name) = input.short_name.as_deref() {
            active.short_name = Set(validation::required_text(
                "short_name",
                Some(short_name),
                CLUB_SHORT_NAME_MAX,
            )?);
        }
        if input.logo.is_some() {
            active.logo = Set(validation::optional_url("logo", input.logo)?);
        }
        if input.year_established.is_some() {
            active.year_established = Set(year(input.year_established)?);
        }
        if let Some(league_id) = league_id {
            active.league_id = Set(league_id);
        }
        active.updated_at = Set(Utc::now().into());

        let club = self.clubs_repo.update(active).await?;
        tracing::info!(club_id = %club.id, slug = %club.slug, "club updated");
        Ok(club)
    }

    async fn delete(&self, key: &str) -> Result<(), ApiError> {
        let club = self.get(key).await?;
        self.clubs_repo.delete_by_id(&club.id).await?;
        tracing::info!(club_id = %club.id, "club deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::memory_state;

    fn premier_league() -> LeagueInput {
        LeagueInput {
            name: Some("Kenyan Premier League".into()),
            short_name: Some("KPL".into()),
            country: Some("ke".into()),
            continent: Some(Continent::Africa),
            ..LeagueInput::default()
        }
    }

    #[tokio::test]
    async fn rename_recomputes_slug() {
        let state = memory_state().await;
        let league = state.leagues().create(premier_league()).await.unwrap();
        assert_eq!(league.slug, "kenyan-premier-league");
        assert_eq!(league.country, "KE");

        let renamed = state
            .leagues()
            .update(
                &league.slug,
                LeagueInput {
                    name: Some("FKF Premier League".into()),
                    ..LeagueInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.id, league.id);
        assert_eq!(renamed.slug, "fkf-premier-league");
        assert_eq!(renamed.short_name, "KPL");

        assert!(state.leagues().get("kenyan-premier-league").await.is_err());
        assert_eq!(
            state.leagues().get("fkf-premier-league").await.unwrap().id,
            league.id
        );
        assert_eq!(state.leagues().get(&league.id).await.unwrap().id, league.id);
    }

    #[tokio::test]
    async fn leagues_are_listed_newest_first() {
        let state = memory_state().await;
        let kenyan = state.leagues().create(premier_league()).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let ugandan = state
            .leagues()
            .create(LeagueInput {
                name: Some("Uganda Premier League".into()),
                short_name: Some("UPL".into()),
                country: Some("UG".into()),
                ..premier_league()
            })
            .await
            .unwrap();

        let listed = state.leagues().list().await.unwrap();
        assert_eq!(
            listed.iter().map(|league| league.id.as_str()).collect::<Vec<_>>(),
            vec![ugandan.id.as_str(), kenyan.id.as_str()]
        );
    }

    #[tokio::test]
    async fn slug_collision_is_a_conflict() {
        let state = memory_state().await;
        state.leagues().create(premier_league()).await.unwrap();

        let err = state
            .leagues()
            .create(LeagueInput {
                name: Some("Kenyan  Premier League!".into()),
                ..premier_league()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "conflict");
        assert_eq!(err.field(), Some("slug"));

        let other = state
            .leagues()
            .create(LeagueInput {
                name: Some("Tanzania Premier League".into()),
                country: Some("TZ".into()),
                ..premier_league()
            })
            .await
            .unwrap();
        let err = state
            .leagues()
            .update(
                &other.id,
                LeagueInput {
                    name: Some("Kenyan Premier League".into()),
                    ..LeagueInput::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "conflict");

        // Saving under its own name again is not a collision.
        state
            .leagues()
            .update(&other.id, LeagueInput::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn league_requires_a_valid_country() {
        let state = memory_state().await;
        let err = state
            .leagues()
            .create(LeagueInput {
                country: None,
                ..premier_league()
            })
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("country"));
    }

    #[tokio::test]
    async fn clubs_belong_to_a_league() {
        let state = memory_state().await;
        let league = state.leagues().create(premier_league()).await.unwrap();

        for name in ["Gor Mahia", "AFC Leopards"] {
            state
                .clubs()
                .create(ClubInput {
                    name: Some(name.into()),
                    full_name: Some(format!("{name} Football Club")),
                    short_name: Some(name.chars().take(3).collect()),
                    league: Some(league.slug.clone()),
                    ..ClubInput::default()
                })
                .await
                .unwrap();
        }

        let clubs = state.clubs().list_by_league(&league.id).await.unwrap();
        assert_eq!(
            clubs.iter().map(|club| club.slug.as_str()).collect::<Vec<_>>(),
            vec!["afc-leopards", "gor-mahia"]
        );

        let err = state
            .clubs()
            .create(ClubInput {
                name: Some("Tusker".into()),
                full_name: Some("Tusker FC".into()),
                short_name: Some("TFC".into()),
                league: Some("no-such-league".into()),
                ..ClubInput::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("league"));

        let renamed = state
            .clubs()
            .update(
                "gor-mahia",
                ClubInput {
                    name: Some("K'Ogalo".into()),
                    ..ClubInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.slug, "k-ogalo");

        state.leagues().delete(&league.id).await.unwrap();
        assert!(state.clubs().list().await.unwrap().is_empty());
        assert!(state.clubs().list_by_league(&league.id).await.is_err());
    }
}
