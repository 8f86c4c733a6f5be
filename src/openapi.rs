use utoipa::OpenApi;

use crate::{
    entities::{
        accounts::Role, leagues::Continent, profile_statuses::ModerationStatus,
        profiles::Language,
    },
    handler::{
        self,
        accounts::{AccountDetailResponse, AccountResponse, CreateAccount, UpdateAccount},
        clubs::{ClubPayload, ClubResponse},
        error::ErrorResponse,
        health::Health,
        leagues::{LeaguePayload, LeagueResponse},
        profiles::{ProfileResponse, UpdateProfile},
        relationships::{CreateRelationship, RelationshipResponse},
        statuses::{CreateStatus, StatusResponse, UpdateStatus},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::health::health,
        handler::accounts::create_account,
        handler::accounts::list_accounts,
        handler::accounts::get_account,
        handler::accounts::update_account,
        handler::accounts::delete_account,
        handler::accounts::follow,
        handler::accounts::unfollow,
        handler::accounts::followers,
        handler::accounts::following,
        handler::accounts::account_profile,
        handler::profiles::list_profiles,
        handler::profiles::get_profile,
        handler::profiles::update_profile,
        handler::statuses::list_statuses,
        handler::statuses::create_status,
        handler::statuses::get_status,
        handler::statuses::update_status,
        handler::statuses::delete_status,
        handler::relationships::list_relationships,
        handler::relationships::create_relationship,
        handler::relationships::get_relationship,
        handler::relationships::delete_relationship,
        handler::leagues::list_leagues,
        handler::leagues::create_league,
        handler::leagues::get_league,
        handler::leagues::update_league,
        handler::leagues::delete_league,
        handler::leagues::league_clubs,
        handler::clubs::list_clubs,
        handler::clubs::create_club,
        handler::clubs::get_club,
        handler::clubs::update_club,
        handler::clubs::delete_club
    ),
    components(schemas(
        Health,
        ErrorResponse,
        Role,
        Language,
        ModerationStatus,
        Continent,
        CreateAccount,
        UpdateAccount,
        AccountResponse,
        AccountDetailResponse,
        ProfileResponse,
        UpdateProfile,
        CreateStatus,
        UpdateStatus,
        StatusResponse,
        CreateRelationship,
        RelationshipResponse,
        LeaguePayload,
        LeagueResponse,
        ClubPayload,
        ClubResponse
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "accounts", description = "Accounts and the follow graph"),
        (name = "profiles", description = "Role-shaped profiles"),
        (name = "profile-statuses", description = "Moderation statuses"),
        (name = "catalog", description = "Leagues and clubs")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/health",
            "/api/v1/accounts/{id}/follow",
            "/api/v1/profiles/{id}",
            "/api/v1/profile-statuses/{id}",
            "/api/v1/relationships",
            "/api/v1/leagues/{key}/clubs",
            "/api/v1/clubs/{key}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
