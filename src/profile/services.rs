use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use tracing::{info, instrument, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo;
use crate::auth::validation::{is_valid_phone, MSG_PHONE, MSG_REQUIRED};
use crate::auth::{PublicUser, Session};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::storage::Store;

fn is_supported_image(content_type: &str) -> bool {
    matches!(
        content_type,
        "image/jpeg" | "image/jpg" | "image/png" | "image/webp" | "image/gif"
    )
}

/// Embeds image bytes as a `data:` URI.
pub fn avatar_data_uri(body: &[u8], content_type: &str) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(body))
}

/// Edits the signed-in user. Every change is written to both the session
/// record and the registry entry with the same id.
pub struct ProfileEditor {
    store: Store,
    session: Session,
    config: Arc<AppConfig>,
    user: PublicUser,
}

impl ProfileEditor {
    pub fn open(state: &AppState) -> AppResult<Self> {
        let session = Session::new(state.store.clone());
        let user = session.require()?;
        Ok(Self {
            store: state.store.clone(),
            session,
            config: state.config.clone(),
            user,
        })
    }

    pub fn user(&self) -> &PublicUser {
        &self.user
    }

    #[instrument(skip(self), fields(user_id = self.user.id))]
    pub fn update_info(&mut self, name: &str, phone: &str) -> AppResult<&PublicUser> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() {
            return Err(AppError::invalid("updateName", MSG_REQUIRED));
        }
        if !is_valid_phone(phone) {
            return Err(AppError::invalid("updatePhone", MSG_PHONE));
        }

        let updated = repo::modify(&self.store, self.user.id, |u| {
            u.name = name.to_string();
            u.phone = phone.to_string();
            Ok(())
        })?;
        self.user = PublicUser::from(&updated);
        self.session.sign_in(&self.user)?;
        info!("profile info updated");
        Ok(&self.user)
    }

    /// Only the registry gets the new hash; the session never holds one.
    #[instrument(skip_all, fields(user_id = self.user.id))]
    pub fn change_password(&mut self, current: &str, new: &str, confirm: &str) -> AppResult<()> {
        let stored = repo::find_by_id(&self.store, self.user.id)?.ok_or(AppError::NotAuthenticated)?;
        if !verify_password(current, &stored.password_hash)? {
            warn!("current password rejected");
            return Err(AppError::WrongPassword);
        }
        if new != confirm {
            return Err(AppError::PasswordMismatch);
        }
        let min = self.config.auth.min_password_len;
        if new.chars().count() < min {
            return Err(AppError::invalid(
                "newPassword",
                format!("Mật khẩu phải có ít nhất {} ký tự.", min),
            ));
        }

        let password_hash = hash_password(new)?;
        repo::modify(&self.store, self.user.id, |u| {
            u.password_hash = password_hash;
            Ok(())
        })?;
        info!("password changed");
        Ok(())
    }

    #[instrument(skip(self, body), fields(user_id = self.user.id, bytes = body.len()))]
    pub fn update_avatar(&mut self, body: Bytes, content_type: &str) -> AppResult<&PublicUser> {
        if !is_supported_image(content_type) {
            return Err(AppError::invalid("avatar-upload", "Unsupported image type"));
        }
        if body.is_empty() {
            return Err(AppError::invalid("avatar-upload", "Image file is empty"));
        }
        if body.len() > self.config.avatar_max_bytes {
            warn!(limit = self.config.avatar_max_bytes, "avatar too large");
            return Err(AppError::invalid(
                "avatar-upload",
                format!("Image exceeds {} bytes", self.config.avatar_max_bytes),
            ));
        }

        let avatar = avatar_data_uri(&body, content_type);
        let updated = repo::modify(&self.store, self.user.id, |u| {
            u.avatar = avatar;
            Ok(())
        })?;
        self.user = PublicUser::from(&updated);
        self.session.sign_in(&self.user)?;
        info!("avatar updated");
        Ok(&self.user)
    }

    pub fn logout(self) -> AppResult<()> {
        self.session.logout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthBackend, LocalAuth, NewUser};
    use crate::storage::SESSION_USER_KEY;

    async fn signed_in() -> (AppState, PublicUser) {
        let state = AppState::fake();
        let user = LocalAuth::from_state(&state)
            .register(NewUser {
                name: "Lê Minh".into(),
                email: "minh@x.com".into(),
                password: "Secret123!".into(),
                phone: String::new(),
            })
            .await
            .unwrap();
        Session::new(state.store.clone()).sign_in(&user).unwrap();
        (state, user)
    }

    #[test]
    fn open_requires_a_session() {
        let state = AppState::fake();
        assert!(matches!(ProfileEditor::open(&state), Err(AppError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn info_edits_reach_session_and_registry() {
        let (state, user) = signed_in().await;
        let mut editor = ProfileEditor::open(&state).unwrap();
        editor.update_info("  Lê Văn Minh ", "0912345678").unwrap();

        let session = Session::new(state.store.clone()).require().unwrap();
        assert_eq!(session.name, "Lê Văn Minh");
        assert_eq!(session.phone, "0912345678");
        let stored = repo::find_by_id(&state.store, user.id).unwrap().unwrap();
        assert_eq!(stored.name, "Lê Văn Minh");
        assert_eq!(stored.email, user.email);

        assert!(matches!(editor.update_info(" ", ""), Err(AppError::ValidationFailed(_))));
        assert!(matches!(editor.update_info("Minh", "123"), Err(AppError::ValidationFailed(_))));
        assert_eq!(editor.user().name, "Lê Văn Minh");
    }

    #[tokio::test]
    async fn password_change_checks_current_confirmation_and_length() {
        let (state, user) = signed_in().await;
        let mut editor = ProfileEditor::open(&state).unwrap();

        let err = editor.change_password("nope", "NewSecret1!", "NewSecret1!").unwrap_err();
        assert!(matches!(err, AppError::WrongPassword));
        let err = editor.change_password("Secret123!", "NewSecret1!", "Other").unwrap_err();
        assert!(matches!(err, AppError::PasswordMismatch));
        let err = editor.change_password("Secret123!", "short", "short").unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(_)));

        editor.change_password("Secret123!", "NewSecret1!", "NewSecret1!").unwrap();

        let auth = LocalAuth::from_state(&state);
        assert!(matches!(
            auth.login(&user.email, "Secret123!").await,
            Err(AppError::WrongPassword)
        ));
        auth.login(&user.email, "NewSecret1!").await.unwrap();

        let raw: serde_json::Value = state.store.load(SESSION_USER_KEY).unwrap();
        let raw = raw.to_string().to_lowercase();
        assert!(!raw.contains("password"));
        assert!(!raw.contains("newsecret1!"));
    }

    #[tokio::test]
    async fn avatar_is_embedded_as_data_uri() {
        let (state, user) = signed_in().await;
        let mut editor = ProfileEditor::open(&state).unwrap();

        let png = Bytes::from_static(&[0x89, b'P', b'N', b'G']);
        let updated = editor.update_avatar(png, "image/png").unwrap();
        assert_eq!(updated.avatar, "data:image/png;base64,iVBORw==");

        let stored = repo::find_by_id(&state.store, user.id).unwrap().unwrap();
        assert_eq!(stored.avatar, "data:image/png;base64,iVBORw==");

        let err = editor
            .update_avatar(Bytes::from_static(b"%PDF"), "application/pdf")
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(_)));

        let too_big = Bytes::from(vec![0_u8; state.config.avatar_max_bytes + 1]);
        assert!(editor.update_avatar(too_big, "image/jpeg").is_err());
    }

    #[tokio::test]
    async fn logout_clears_only_the_session() {
        let (state, user) = signed_in().await;
        ProfileEditor::open(&state).unwrap().logout().unwrap();
        assert!(Session::new(state.store.clone()).current().unwrap().is_none());
        assert!(repo::find_by_id(&state.store, user.id).unwrap().is_some());
        assert!(ProfileEditor::open(&state).is_err());
    }
}
