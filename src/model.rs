//! Contact domain types shared by the store, service and HTTP layers.

use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Serialize, Serializer};
use std::fmt;

/// Store-assigned contact identifier (24 hex characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(ObjectId);

impl ContactId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Identifier syntax check. Returns `None` for anything that is not 24 hex characters.
    pub fn parse(s: &str) -> Option<Self> {
        ObjectId::parse_str(s).ok().map(Self)
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for ContactId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for ContactId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

/// A stored contact as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
}

impl Contact {
    pub fn from_new(id: ContactId, new: NewContact) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            favorite_color: new.favorite_color,
            birthday: new.birthday,
        }
    }

    /// Partial merge: only fields present in the patch change.
    pub fn apply(&mut self, patch: &ContactPatch) {
        if let Some(v) = &patch.first_name {
            self.first_name = v.clone();
        }
        if let Some(v) = &patch.last_name {
            self.last_name = v.clone();
        }
        if let Some(v) = &patch.email {
            self.email = v.clone();
        }
        if let Some(v) = &patch.favorite_color {
            self.favorite_color = Some(v.clone());
        }
        if let Some(v) = patch.birthday {
            self.birthday = Some(v);
        }
    }
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub favorite_color: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Validated update payload. At least one field is set once it leaves the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub favorite_color: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.favorite_color.is_none()
            && self.birthday.is_none()
    }
}
