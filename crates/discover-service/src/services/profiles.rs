//! Profile service
//!
//! Profiles are created on first sign-in; every other operation works on the
//! viewer's own profile.

use discover_core::{UserKey, UserProfile};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::UpdateProfileRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, key: &UserKey) -> ServiceResult<UserProfile> {
        self.ctx
            .profile_repo()
            .find_by_key(key)
            .await?
            .ok_or_else(|| ServiceError::not_found("Profile", key))
    }

    /// Fetch the viewer's profile, creating it on first sign-in
    #[instrument(skip(self))]
    pub async fn ensure_profile(&self, key: &UserKey) -> ServiceResult<UserProfile> {
        if let Some(profile) = self.ctx.profile_repo().find_by_key(key).await? {
            return Ok(profile);
        }
        let profile = self.ctx.profile_repo().create_for(key).await?;
        info!(user = %key, numeric_id = profile.numeric_id, "Profile created");
        Ok(profile)
    }

    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        viewer: &UserKey,
        request: UpdateProfileRequest,
    ) -> ServiceResult<UserProfile> {
        request.validate()?;
        let mut profile = self.get_profile(viewer).await?;

        let mut changed = false;
        if let Some(title) = request.title {
            let title = title.trim().to_string();
            if title != profile.title {
                profile.title = title;
                changed = true;
            }
        }
        if let Some(avatar) = request.avatar {
            // Empty string clears the avatar
            let avatar = Some(avatar.trim().to_string()).filter(|a| !a.is_empty());
            if avatar != profile.avatar {
                profile.avatar = avatar;
                changed = true;
            }
        }

        if changed {
            profile.updated_at = chrono::Utc::now();
            self.ctx.profile_repo().update(&profile).await?;
            info!(user = %viewer, "Profile updated");
        }
        Ok(profile)
    }

    #[instrument(skip(self))]
    pub async fn add_connection(
        &self,
        viewer: &UserKey,
        other: &UserKey,
    ) -> ServiceResult<UserProfile> {
        if viewer == other {
            return Err(ServiceError::validation("Cannot connect to yourself"));
        }
        // The other side must exist
        self.get_profile(other).await?;

        let mut profile = self.get_profile(viewer).await?;
        if profile.add_connection(other.clone()) {
            self.ctx.profile_repo().update(&profile).await?;
            info!(user = %viewer, connection = %other, "Connection added");
        }
        Ok(profile)
    }

    #[instrument(skip(self))]
    pub async fn dismiss_request(
        &self,
        viewer: &UserKey,
        from: &UserKey,
    ) -> ServiceResult<UserProfile> {
        let mut profile = self.get_profile(viewer).await?;
        if profile.dismiss_request(from.clone()) {
            self.ctx.profile_repo().update(&profile).await?;
            info!(user = %viewer, from = %from, "Connection request dismissed");
        }
        Ok(profile)
    }
}
