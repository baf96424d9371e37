//! Authorization Gate.
//!
//! Membership of a travel means being a listed member of the group that owns
//! the travel, or that group's creator. Every engine operation on travel data
//! goes through [`AuthorizationGate::require_member`].

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, QueryFilter, prelude::*};

use crate::{
    EngineError, ResultEngine, UserIdentity, group_members, travel_groups, travels, users,
};

/// The group that owns a travel, as seen by the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TravelGroup {
    pub travel_id: String,
    pub group_id: String,
    pub creator_id: String,
    pub members: HashSet<String>,
}

impl TravelGroup {
    /// `true` if `user_id` is a listed member or the creator.
    #[must_use]
    pub fn admits(&self, user_id: &str) -> bool {
        self.creator_id == user_id || self.members.contains(user_id)
    }
}

#[async_trait]
pub trait AuthorizationGate: Send + Sync {
    /// Resolves the owning group of `travel_id`; `None` if the travel does not exist.
    async fn resolve_travel_group(&self, travel_id: &str) -> ResultEngine<Option<TravelGroup>>;

    async fn is_member(&self, travel_id: &str, user_id: &str) -> ResultEngine<bool> {
        Ok(self
            .resolve_travel_group(travel_id)
            .await?
            .is_some_and(|group| group.admits(user_id)))
    }

    /// Resolves the travel and checks `user_id` against it.
    ///
    /// Fails with [`EngineError::KeyNotFound`] for an unknown travel and
    /// [`EngineError::Forbidden`] for a non-member.
    async fn require_member(&self, travel_id: &str, user_id: &str) -> ResultEngine<TravelGroup> {
        let group = self
            .resolve_travel_group(travel_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("travel not exists".to_string()))?;
        if !group.admits(user_id) {
            tracing::warn!(travel_id, user_id, "membership check denied");
            return Err(EngineError::Forbidden(
                "user is not a member of this travel group".to_string(),
            ));
        }
        Ok(group)
    }
}

/// Identity lookup used to enrich responses.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Returns the identities found among `user_ids`; unknown ids are skipped.
    async fn identities(&self, user_ids: &[String]) -> ResultEngine<HashMap<String, UserIdentity>>;

    async fn identity(&self, user_id: &str) -> ResultEngine<Option<UserIdentity>> {
        let mut found = self.identities(&[user_id.to_string()]).await?;
        Ok(found.remove(user_id))
    }
}

/// Gate and identity lookup backed by the travel, group and user tables.
#[derive(Clone, Debug)]
pub struct SqlTravelDirectory {
    database: DatabaseConnection,
}

impl SqlTravelDirectory {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl AuthorizationGate for SqlTravelDirectory {
    async fn resolve_travel_group(&self, travel_id: &str) -> ResultEngine<Option<TravelGroup>> {
        let Some(travel) = travels::Entity::find_by_id(travel_id.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        let group = travel_groups::Entity::find_by_id(travel.group_id.clone())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("travel group not exists".to_string()))?;
        let members = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group.id.clone()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|row| row.user_id)
            .collect();

        Ok(Some(TravelGroup {
            travel_id: travel.id,
            group_id: group.id,
            creator_id: group.created_by,
            members,
        }))
    }
}

#[async_trait]
impl IdentityLookup for SqlTravelDirectory {
    async fn identities(&self, user_ids: &[String]) -> ResultEngine<HashMap<String, UserIdentity>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids.iter().cloned()))
            .all(&self.database)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.id.clone(), UserIdentity::from(row)))
            .collect())
    }
}
