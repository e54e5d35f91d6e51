//! User accounts and profiles.

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::error::TrackerError;
use crate::contract::model::{NewUser, Profile, User};

use super::{require_non_blank, storage_error, Service};

impl Service {
    #[instrument(
        name = "tracker.service.register_user",
        skip(self, new_user),
        fields(username = %new_user.username)
    )]
    pub async fn register_user(&self, new_user: NewUser) -> Result<User, TrackerError> {
        info!("Registering user");

        require_non_blank("username", &new_user.username)?;
        validate_email(&new_user.email)?;
        if new_user.password.len() < 8 {
            return Err(TrackerError::validation(
                "password",
                "must be at least 8 characters",
            ));
        }

        if self
            .users
            .username_exists(&new_user.username)
            .await
            .map_err(storage_error)?
        {
            return Err(TrackerError::conflict(format!(
                "username '{}' is already taken",
                new_user.username
            )));
        }

        let password_hash = authn::hash_password(&new_user.password)
            .map_err(|e| TrackerError::internal(e.to_string()))?;
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            created_at: Utc::now(),
        };

        self.users
            .insert(user.clone(), password_hash)
            .await
            .map_err(storage_error)?;

        info!("Registered user id={}", user.id);
        Ok(user)
    }

    /// Resolve a username/password pair to a user, or None. The caller must
    /// not distinguish "unknown user" from "wrong password" in its response.
    #[instrument(name = "tracker.service.verify_credentials", skip(self, password))]
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, TrackerError> {
        let Some((user, hash)) = self
            .users
            .find_for_login(username)
            .await
            .map_err(storage_error)?
        else {
            return Ok(None);
        };

        if authn::verify_password(password, &hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    #[instrument(name = "tracker.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, TrackerError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| TrackerError::not_found("User", id))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, TrackerError> {
        self.users.list().await.map_err(storage_error)
    }

    /// Delete a user. Owned projects go with their full task trees; tasks
    /// merely assigned to the user survive with the assignment cleared.
    #[instrument(name = "tracker.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> Result<(), TrackerError> {
        info!("Deleting user");
        let deleted = self.users.delete(id).await.map_err(storage_error)?;
        if !deleted {
            return Err(TrackerError::not_found("User", id));
        }
        Ok(())
    }

    #[instrument(name = "tracker.service.get_profile", skip(self), fields(user_id = %user_id))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, TrackerError> {
        // The profile is optional; reading an absent one yields an empty bio
        // rather than an error.
        debug!("Loading profile");
        match self
            .users
            .find_profile(user_id)
            .await
            .map_err(storage_error)?
        {
            Some(profile) => Ok(profile),
            None => Ok(Profile {
                id: Uuid::nil(),
                user_id,
                bio: String::new(),
                avatar_ref: None,
            }),
        }
    }

    #[instrument(name = "tracker.service.upsert_profile", skip(self, bio, avatar_ref))]
    pub async fn upsert_profile(
        &self,
        actor: Uuid,
        bio: String,
        avatar_ref: Option<String>,
    ) -> Result<Profile, TrackerError> {
        // Ensure the user still exists before attaching a profile.
        self.get_user(actor).await?;

        let existing = self
            .users
            .find_profile(actor)
            .await
            .map_err(storage_error)?;
        let profile = Profile {
            id: existing.map(|p| p.id).unwrap_or_else(Uuid::new_v4),
            user_id: actor,
            bio,
            avatar_ref,
        };
        self.users
            .upsert_profile(profile.clone())
            .await
            .map_err(storage_error)?;
        Ok(profile)
    }
}

fn validate_email(email: &str) -> Result<(), TrackerError> {
    if email.is_empty() || !email.contains('@') || !email.contains('.') {
        return Err(TrackerError::validation("email", "invalid email address"));
    }
    Ok(())
}
