use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Join mode of a club. Public clubs are joined directly; private clubs go
/// through a request/approval round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Private,
}

impl FromStr for Privacy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "public" => Ok(Privacy::Public),
            "private" => Ok(Privacy::Private),
            other => Err(AppError::ValidationError(format!(
                "privacy must be either 'public' or 'private', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privacy::Public => f.write_str("public"),
            Privacy::Private => f.write_str("private"),
        }
    }
}

/// A reading group.
///
/// Two invariants hold after every transition: the admin is always a
/// member, and nobody is in `members` and `invited_members` at once.
/// `invited_members` holds the pending join requests of a private club.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookClub {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub avatar: String,
    pub privacy: Privacy,
    pub admin: Uuid,
    pub members: Vec<Uuid>,
    pub invited_members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookClub {
    /// Creates a club with the creator installed as admin and sole member.
    pub fn new(
        name: String,
        description: String,
        avatar: String,
        privacy: Privacy,
        admin: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            description,
            avatar,
            privacy,
            admin,
            members: vec![admin],
            invited_members: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_member(&self, user: Uuid) -> bool {
        self.members.contains(&user)
    }

    pub fn is_invited(&self, user: Uuid) -> bool {
        self.invited_members.contains(&user)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Adds a member, rejecting duplicates. Any pending request by the same
    /// user is consumed so the two lists stay disjoint.
    pub fn add_member(&mut self, user: Uuid) -> Result<()> {
        if self.is_member(user) {
            return Err(AppError::Conflict("user is already a member".into()));
        }
        self.invited_members.retain(|u| *u != user);
        self.members.push(user);
        self.touch();
        Ok(())
    }

    /// Records a pending join request. Members and already-pending users
    /// are rejected.
    pub fn add_join_request(&mut self, user: Uuid) -> Result<()> {
        if self.is_member(user) || self.is_invited(user) {
            return Err(AppError::Conflict("user already requested or is a member".into()));
        }
        self.invited_members.push(user);
        self.touch();
        Ok(())
    }

    /// Approves a pending request: the user leaves the pending list and
    /// joins the members. Tolerated as a no-op for users with no pending
    /// request; an existing member is never duplicated.
    pub fn accept_join_request(&mut self, user: Uuid) {
        self.invited_members.retain(|u| *u != user);
        if !self.is_member(user) {
            self.members.push(user);
        }
        self.touch();
    }

    /// Discards a pending request. Tolerated as a no-op when none exists.
    pub fn deny_join_request(&mut self, user: Uuid) {
        self.invited_members.retain(|u| *u != user);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
