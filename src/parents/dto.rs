use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request body for creating a parent account record. The id is the auth
/// identity when the caller already has one; otherwise one is generated.
#[derive(Debug, Deserialize)]
pub struct CreateParentRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub relationship: Option<String>,
    pub emergency_contact: Option<String>,
}

/// Request body for updating parent details. Email is immutable.
#[derive(Debug, Deserialize)]
pub struct UpdateParentRequest {
    pub name: String,
    pub relationship: Option<String>,
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParentResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub relationship: Option<String>,
    pub emergency_contact: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<crate::parents::repo::Parent> for ParentResponse {
    fn from(p: crate::parents::repo::Parent) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            relationship: p.relationship,
            emergency_contact: p.emergency_contact,
            created_at: p.created_at,
        }
    }
}
