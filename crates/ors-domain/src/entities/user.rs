//! Users directory entity

use super::RemoteEntity;
use crate::constants::USER_UNAVAILABLE;
use crate::value_objects::EntityKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User as returned by `GET /user/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// User identifier
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Gender as recorded by the directory
    #[serde(default)]
    pub gender: Option<String>,
}

impl RemoteEntity for UserDto {
    const KIND: EntityKind = EntityKind::User;

    fn entity_id(&self) -> Uuid {
        self.user_id
    }

    fn unavailable() -> Self {
        Self {
            user_id: Uuid::nil(),
            email: Some(USER_UNAVAILABLE.to_string()),
            name: Some(USER_UNAVAILABLE.to_string()),
            gender: Some(USER_UNAVAILABLE.to_string()),
        }
    }
}
