use async_trait::async_trait;
use chrono::Utc;
use sea_orm::Set;
use std::{collections::HashMap, sync::Arc};

use crate::{
    domain::Caller,
    entities::{account_relationships, accounts},
    error::ApiError,
    ids,
    repo::{account_relationships::AccountRelationshipsRepo, accounts::AccountsRepo},
};

#[async_trait]
pub trait RelationshipsService: Send + Sync {
    /// Idempotent: following twice returns the edge created the first time.
    async fn follow(
        &self,
        follower_id: &str,
        target_id: &str,
    ) -> Result<account_relationships::Model, ApiError>;
    /// Removes the edge if present, no-op otherwise.
    async fn unfollow(&self, follower_id: &str, target_id: &str) -> Result<(), ApiError>;
    async fn list_followers(&self, account_id: &str) -> Result<Vec<accounts::Model>, ApiError>;
    async fn list_following(&self, account_id: &str) -> Result<Vec<accounts::Model>, ApiError>;
    async fn list_edges(
        &self,
        caller: &Caller,
    ) -> Result<Vec<account_relationships::Model>, ApiError>;
    async fn get_edge(
        &self,
        caller: &Caller,
        id: &str,
    ) -> Result<account_relationships::Model, ApiError>;
    async fn delete_edge(&self, caller: &Caller, id: &str) -> Result<(), ApiError>;
}

pub struct RelationshipsServiceImpl {
    accounts_repo: Arc<dyn AccountsRepo>,
    relationships_repo: Arc<dyn AccountRelationshipsRepo>,
}

impl RelationshipsServiceImpl {
    pub fn new(
        accounts_repo: Arc<dyn AccountsRepo>,
        relationships_repo: Arc<dyn AccountRelationshipsRepo>,
    ) -> Self {
        Self {
            accounts_repo,
            relationships_repo,
        }
    }

    async fn ensure_account(&self, id: &str) -> Result<(), ApiError> {
        match self.accounts_repo.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::not_found("account")),
        }
    }

    /// Loads `ids` keeping their order.
    async fn accounts_in_order(&self, ids: Vec<String>) -> Result<Vec<accounts::Model>, ApiError> {
        let mut by_id: HashMap<String, accounts::Model> = self
            .accounts_repo
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|account| (account.id.clone(), account))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn find_own_edge(
        &self,
        caller: &Caller,
        id: &str,
    ) -> Result<account_relationships::Model, ApiError> {
        match self.relationships_repo.find_by_id(id).await? {
            Some(edge) if edge.follower_id == caller.account_id => Ok(edge),
            _ => Err(ApiError::not_found("relationship")),
        }
    }
}

#[async_trait]
impl RelationshipsService for RelationshipsServiceImpl {
    async fn follow(
        &self,
        follower_id: &str,
        target_id: &str,
    ) -> Result<account_relationships::Model, ApiError> {
        if follower_id == target_id {
            return Err(ApiError::validation(
                "following",
                "an account cannot follow itself",
            ));
        }
        self.ensure_account(follower_id).await?;
        self.ensure_account(target_id).await?;

        let edge = account_relationships::Model {
            id: ids::short_id(),
            follower_id: follower_id.to_string(),
            following_id: target_id.to_string(),
            created_at: Utc::now().into(),
        };
        let created = self
            .relationships_repo
            .insert_if_absent(account_relationships::ActiveModel {
                id: Set(edge.id.clone()),
                follower_id: Set(edge.follower_id.clone()),
                following_id: Set(edge.following_id.clone()),
                created_at: Set(edge.created_at),
            })
            .await?;
        if created {
            tracing::info!(%follower_id, following_id = %target_id, "follow");
            return Ok(edge);
        }

        // Conflict path: the pair already existed.
        self.relationships_repo
            .find_pair(follower_id, target_id)
            .await?
            .ok_or(ApiError::not_found("relationship"))
    }

    async fn unfollow(&self, follower_id: &str, target_id: &str) -> Result<(), ApiError> {
        let removed = self
            .relationships_repo
            .delete_pair(follower_id, target_id)
            .await?;
        if removed > 0 {
            tracing::info!(%follower_id, following_id = %target_id, "unfollow");
        }
        Ok(())
    }

    async fn list_followers(&self, account_id: &str) -> Result<Vec<accounts::Model>, ApiError> {
        self.ensure_account(account_id).await?;
        let edges = self.relationships_repo.list_by_following(account_id).await?;
        let ids = edges.into_iter().map(|edge| edge.follower_id).collect();
        self.accounts_in_order(ids).await
    }

    async fn list_following(&self, account_id: &str) -> Result<Vec<accounts::Model>, ApiError> {
        self.ensure_account(account_id).await?;
        let edges = self.relationships_repo.list_by_follower(account_id).await?;
        let ids = edges.into_iter().map(|edge| edge.following_id).collect();
        self.accounts_in_order(ids).await
    }

    async fn list_edges(
        &self,
        caller: &Caller,
    ) -> Result<Vec<account_relationships::Model>, ApiError> {
        Ok(self
            .relationships_repo
            .list_by_follower(&caller.account_id)
            .await?)
    }

    async fn get_edge(
        &self,
        caller: &Caller,
        id: &str,
    ) -> Result<account_relationships::Model, ApiError> {
        self.find_own_edge(caller, id).await
    }

    async fn delete_edge(&self, caller: &Caller, id: &str) -> Result<(), ApiError> {
        let edge = self.find_own_edge(caller, id).await?;
        self.unfollow(&edge.follower_id, &edge.following_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::accounts::Role,
        service::accounts::CreateAccountInput,
        state::{testing::memory_state, AppState},
    };

    async fn account(state: &AppState, username: &str, n: u32) -> accounts::Model {
        state
            .accounts()
            .create(CreateAccountInput {
                username: Some(username.to_string()),
                email: Some(format!("{username}@example.com")),
                phone_number: Some(format!("+2547440{n:05}")),
                password: Some("pw".to_string()),
                role: Role::Regular,
                ..CreateAccountInput::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn alice_follows_bob_once() {
        let state = memory_state().await;
        let alice = account(&state, "alice", 1).await;
        let bob = account(&state, "bob", 2).await;

        let first = state.relationships().follow(&alice.id, &bob.id).await.unwrap();
        let second = state.relationships().follow(&alice.id, &bob.id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.follower_id, alice.id);
        assert_eq!(first.following_id, bob.id);

        let followers = state.relationships().list_followers(&bob.id).await.unwrap();
        assert_eq!(
            followers.iter().map(|a| a.username.as_str()).collect::<Vec<_>>(),
            vec!["alice"]
        );
        let following = state.relationships().list_following(&alice.id).await.unwrap();
        assert_eq!(following.len(), 1);
        assert!(state
            .relationships()
            .list_following(&bob.id)
            .await
            .unwrap()
            .is_empty());

        state.relationships().unfollow(&alice.id, &bob.id).await.unwrap();
        state.relationships().unfollow(&alice.id, &bob.id).await.unwrap();
        assert!(state
            .relationships()
            .list_followers(&bob.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn followers_are_listed_newest_first() {
        let state = memory_state().await;
        let target = account(&state, "target", 1).await;
        let mut fans = Vec::new();
        for (n, name) in ["amani", "baraka", "chege", "dalia"].into_iter().enumerate() {
            let fan = account(&state, name, n as u32 + 2).await;
            state.relationships().follow(&fan.id, &target.id).await.unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
            fans.push(fan.username);
        }
        fans.reverse();

        let followers = state.relationships().list_followers(&target.id).await.unwrap();
        assert_eq!(
            followers.into_iter().map(|a| a.username).collect::<Vec<_>>(),
            fans
        );
    }

    #[tokio::test]
    async fn following_and_edges_are_listed_newest_first() {
        let state = memory_state().await;
        let fan = account(&state, "fan", 1).await;
        let mut targets = Vec::new();
        for (n, name) in ["gor", "ingwe", "tusker"].into_iter().enumerate() {
            let target = account(&state, name, n as u32 + 2).await;
            state.relationships().follow(&fan.id, &target.id).await.unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
            targets.push(target);
        }
        targets.reverse();

        let following = state.relationships().list_following(&fan.id).await.unwrap();
        assert_eq!(
            following.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
            targets.iter().map(|a| a.id.as_str()).collect::<Vec<_>>()
        );

        let edges = state
            .relationships()
            .list_edges(&Caller::new(fan.id.clone(), false))
            .await
            .unwrap();
        assert_eq!(
            edges.iter().map(|e| e.following_id.as_str()).collect::<Vec<_>>(),
            targets.iter().map(|a| a.id.as_str()).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn new_edge_is_returned_as_stored() {
        let state = memory_state().await;
        let alice = account(&state, "alice", 1).await;
        let bob = account(&state, "bob", 2).await;

        let edge = state.relationships().follow(&alice.id, &bob.id).await.unwrap();
        let stored = state
            .relationships()
            .get_edge(&Caller::new(alice.id.clone(), false), &edge.id)
            .await
            .unwrap();
        assert_eq!(stored.id, edge.id);
        assert_eq!(stored.follower_id, alice.id);
        assert_eq!(stored.following_id, bob.id);
    }

    #[tokio::test]
    async fn self_follow_and_unknown_accounts_are_rejected() {
        let state = memory_state().await;
        let alice = account(&state, "alice", 1).await;

        let err = state
            .relationships()
            .follow(&alice.id, &alice.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");

        let err = state
            .relationships()
            .follow(&alice.id, "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { entity: "account" }));

        assert!(state.relationships().list_followers("ghost").await.is_err());
    }

    #[tokio::test]
    async fn edges_are_scoped_to_their_follower() {
        let state = memory_state().await;
        let alice = account(&state, "alice", 1).await;
        let bob = account(&state, "bob", 2).await;
        let carol = account(&state, "carol", 3).await;
        let edge = state.relationships().follow(&alice.id, &bob.id).await.unwrap();
        state.relationships().follow(&alice.id, &carol.id).await.unwrap();

        let as_alice = Caller::new(alice.id.clone(), false);
        let as_bob = Caller::new(bob.id.clone(), false);
        assert_eq!(state.relationships().list_edges(&as_alice).await.unwrap().len(), 2);
        assert!(state.relationships().list_edges(&as_bob).await.unwrap().is_empty());

        assert!(state.relationships().get_edge(&as_bob, &edge.id).await.is_err());
        assert!(state.relationships().delete_edge(&as_bob, &edge.id).await.is_err());

        state
            .relationships()
            .delete_edge(&as_alice, &edge.id)
            .await
            .unwrap();
        assert_eq!(state.relationships().list_edges(&as_alice).await.unwrap().len(), 1);
    }
}
