//! # Membership & invitation engine
//!
//! Orchestrates club membership state: fetch the aggregate, run the pure
//! transition on it, save the whole document back. Public clubs are joined
//! directly; private clubs go through request → accept/deny. Authority
//! checks (who may review requests) belong to the API layer, which calls
//! `assert_admin` before the transition.

use std::sync::Arc;

use domains::{AppError, BookClub, ClubRepo, Privacy, Result, UserRepo};
use tracing::info;
use uuid::Uuid;

use crate::views::{ClubDetail, ClubDirectoryEntry, ClubSummary, UserDirectory};

/// Input for club creation; privacy arrives as the raw client string.
#[derive(Debug, Clone)]
pub struct NewClub {
    pub name: String,
    pub description: String,
    pub avatar: String,
    pub privacy: String,
}

#[derive(Clone)]
pub struct MembershipService {
    clubs: Arc<dyn ClubRepo>,
    users: Arc<dyn UserRepo>,
}

impl MembershipService {
    pub fn new(clubs: Arc<dyn ClubRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self { clubs, users }
    }

    async fn require_club(&self, id: Uuid) -> Result<BookClub> {
        self.clubs
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("club".into(), id.to_string()))
    }

    /// Creates a club with the creator as admin and first member.
    pub async fn create_club(&self, creator: Uuid, input: NewClub) -> Result<BookClub> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("club name is required".into()));
        }
        let privacy: Privacy = input.privacy.parse()?;

        let club = BookClub::new(
            name.to_string(),
            input.description,
            input.avatar,
            privacy,
            creator,
        );
        self.clubs.insert(&club).await?;
        info!(club = %club.id, %creator, "club created");
        Ok(club)
    }

    /// Direct join, allowed only for public clubs.
    pub async fn join_public(&self, club_id: Uuid, user: Uuid) -> Result<()> {
        let mut club = self.require_club(club_id).await?;
        if club.privacy != Privacy::Public {
            return Err(AppError::PolicyViolation(
                "this club is private; send a join request instead".into(),
            ));
        }
        club.add_member(user)?;
        self.clubs.update(&club).await?;
        info!(club = %club_id, %user, "member joined");
        Ok(())
    }

    /// Files a join request, allowed only for private clubs.
    pub async fn request_to_join(&self, club_id: Uuid, user: Uuid) -> Result<()> {
        let mut club = self.require_club(club_id).await?;
        if club.privacy != Privacy::Private {
            return Err(AppError::PolicyViolation(
                "this club is public; join it directly".into(),
            ));
        }
        club.add_join_request(user)?;
        self.clubs.update(&club).await?;
        info!(club = %club_id, %user, "join requested");
        Ok(())
    }

    /// Guards the request-review endpoints: only the club admin passes.
    pub async fn assert_admin(&self, club_id: Uuid, user: Uuid) -> Result<()> {
        let club = self.require_club(club_id).await?;
        if club.admin != user {
            return Err(AppError::Forbidden(
                "only the club admin can review join requests".into(),
            ));
        }
        Ok(())
    }

    /// Approves a pending request; tolerated as a no-op when none exists.
    pub async fn accept_request(&self, club_id: Uuid, user: Uuid) -> Result<()> {
        let mut club = self.require_club(club_id).await?;
        club.accept_join_request(user);
        self.clubs.update(&club).await?;
        info!(club = %club_id, %user, "join request accepted");
        Ok(())
    }

    /// Discards a pending request; tolerated as a no-op when none exists.
    pub async fn deny_request(&self, club_id: Uuid, user: Uuid) -> Result<()> {
        let mut club = self.require_club(club_id).await?;
        club.deny_join_request(user);
        self.clubs.update(&club).await?;
        info!(club = %club_id, %user, "join request denied");
        Ok(())
    }

    /// Administrative direct add, bypassing the privacy mode. The target
    /// user reference is weak; existence is not checked.
    pub async fn add_member(&self, club_id: Uuid, user: Uuid) -> Result<()> {
        let mut club = self.require_club(club_id).await?;
        club.add_member(user)?;
        self.clubs.update(&club).await?;
        info!(club = %club_id, %user, "member added directly");
        Ok(())
    }

    /// Summary rows for the clubs the user belongs to.
    pub async fn clubs_for_user(&self, user: Uuid) -> Result<Vec<ClubSummary>> {
        let clubs = self.clubs.list_for_member(user).await?;
        Ok(clubs.iter().map(ClubSummary::from_club).collect())
    }

    /// Every club, annotated with the viewer's relationship to it.
    pub async fn directory(&self, viewer: Uuid) -> Result<Vec<ClubDirectoryEntry>> {
        let clubs = self.clubs.list_all().await?;
        Ok(clubs
            .iter()
            .map(|c| ClubDirectoryEntry::for_viewer(c, viewer))
            .collect())
    }

    /// Full club page with admin, members, and pending requests resolved.
    pub async fn club_detail(&self, club_id: Uuid) -> Result<ClubDetail> {
        let club = self.require_club(club_id).await?;

        let mut ids: Vec<Uuid> =
            Vec::with_capacity(1 + club.members.len() + club.invited_members.len());
        ids.push(club.admin);
        ids.extend(&club.members);
        ids.extend(&club.invited_members);
        let directory = UserDirectory::new(self.users.get_many(&ids).await?);

        Ok(ClubDetail {
            id: club.id,
            name: club.name.clone(),
            description: club.description.clone(),
            avatar: club.avatar.clone(),
            privacy: club.privacy,
            admin: directory.resolve(club.admin),
            members: club.members.iter().map(|m| directory.resolve(*m)).collect(),
            invited_members: club
                .invited_members
                .iter()
                .map(|m| directory.resolve(*m))
                .collect(),
            created_at: club.created_at,
        })
    }
}
