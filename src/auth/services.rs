use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::ids::fresh_id;
use crate::state::AppState;
use crate::storage::Store;
use crate::view::FormFeedback;

use super::password::{hash_password, verify_password};
use super::repo;
use super::repo_types::{NewUser, PublicUser, User, DEFAULT_AVATAR};
use super::session::Session;
use super::validation::{LoginForm, RegisterForm};

/// Boundary to whatever holds the user registry. Results arrive
/// asynchronously so a remote backend can replace [`LocalAuth`].
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn register(&self, new_user: NewUser) -> AppResult<PublicUser>;
    async fn login(&self, email: &str, password: &str) -> AppResult<PublicUser>;
}

/// Registry kept in the local store, answering after a fixed delay.
#[derive(Clone)]
pub struct LocalAuth {
    store: Store,
    delay: Duration,
}

impl LocalAuth {
    pub fn new(store: Store, delay: Duration) -> Self {
        Self { store, delay }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.config.auth.delay())
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Runs argon2 work off the async executor.
async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    let value = tokio::task::spawn_blocking(f)
        .await
        .context("password hashing task")??;
    Ok(value)
}

#[async_trait]
impl AuthBackend for LocalAuth {
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn register(&self, new_user: NewUser) -> AppResult<PublicUser> {
        self.simulate_latency().await;

        if repo::find_by_email(&self.store, &new_user.email)?.is_some() {
            warn!(email = %new_user.email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password = new_user.password.clone();
        let password_hash = run_blocking(move || hash_password(&password)).await?;
        let now = OffsetDateTime::now_utc();
        let user = repo::insert_unique(&self.store, &new_user.email, |users| {
            Ok(User {
                id: fresh_id(now, |id| users.iter().any(|u| u.id == id)),
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                password_hash,
                phone: new_user.phone.clone(),
                join_date: now.date(),
                avatar: DEFAULT_AVATAR.to_string(),
            })
        })
        .map_err(|e| {
            if matches!(e, AppError::DuplicateEmail) {
                warn!(email = %new_user.email, "email already registered");
            }
            e
        })?;

        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(PublicUser::from(&user))
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> AppResult<PublicUser> {
        self.simulate_latency().await;

        let Some(user) = repo::find_by_email(&self.store, email)? else {
            warn!(email, "login unknown email");
            return Err(AppError::UnknownEmail);
        };
        let (candidate, hash) = (password.to_string(), user.password_hash.clone());
        if !run_blocking(move || verify_password(&candidate, &hash)).await? {
            warn!(email, user_id = user.id, "login invalid password");
            return Err(AppError::WrongPassword);
        }

        info!(user_id = user.id, email = %user.email, "user logged in");
        Ok(PublicUser::from(&user))
    }
}

/// Register/login screens: validate the form, call the backend, start the
/// session, and report the outcome to the form.
pub struct AuthFlow<B: AuthBackend> {
    backend: B,
    session: Session,
}

impl AuthFlow<LocalAuth> {
    pub fn local(state: &AppState) -> Self {
        Self::new(LocalAuth::from_state(state), Session::new(state.store.clone()))
    }
}

impl<B: AuthBackend> AuthFlow<B> {
    pub fn new(backend: B, session: Session) -> Self {
        Self { backend, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn register<F: FormFeedback>(
        &self,
        form: &RegisterForm,
        feedback: &mut F,
    ) -> AppResult<PublicUser> {
        let result = match form.validate() {
            Ok(new_user) => self.backend.register(new_user).await,
            Err(e) => Err(e),
        };
        self.finish(result, "Đăng ký thành công! Chuyển hướng...", feedback)
    }

    pub async fn login<F: FormFeedback>(
        &self,
        form: &LoginForm,
        feedback: &mut F,
    ) -> AppResult<PublicUser> {
        let result = match form.validate() {
            Ok(email) => self.backend.login(&email, &form.password).await,
            Err(e) => Err(e),
        };
        self.finish(result, "Đăng nhập thành công! Chuyển hướng...", feedback)
    }

    fn finish<F: FormFeedback>(
        &self,
        result: AppResult<PublicUser>,
        success: &str,
        feedback: &mut F,
    ) -> AppResult<PublicUser> {
        match result.and_then(|user| self.session.sign_in(&user).map(|_| user)) {
            Ok(user) => {
                feedback.show_success(success);
                Ok(user)
            }
            Err(e) => {
                feedback.report(&e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Feedback {
        errors: Vec<String>,
        successes: Vec<String>,
    }

    impl FormFeedback for Feedback {
        fn show_error(&mut self, field: &str, message: &str) {
            self.errors.push(format!("{}: {}", field, message));
        }

        fn show_success(&mut self, message: &str) {
            self.successes.push(message.to_string());
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Nguyễn An".into(),
            email: email.into(),
            password: "Secret123!".into(),
            phone: String::new(),
        }
    }

    fn register_form(email: &str) -> RegisterForm {
        RegisterForm {
            name: "Nguyễn An".into(),
            email: email.into(),
            password: "Secret123!".into(),
            confirm_password: "Secret123!".into(),
            phone: String::new(),
            agree_terms: true,
        }
    }

    #[tokio::test]
    async fn registering_same_email_twice_keeps_one_record() {
        let state = AppState::fake();
        let auth = LocalAuth::from_state(&state);

        let first = auth.register(new_user("user@x.com")).await.unwrap();
        assert!(first.id > 0);
        let err = auth.register(new_user("user@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let users = repo::list(&state.store).unwrap();
        assert_eq!(users.iter().filter(|u| u.email == "user@x.com").count(), 1);
        assert_ne!(users[0].password_hash, "Secret123!");
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_the_first_password() {
        let state = AppState::fake();
        let auth = LocalAuth::from_state(&state);
        auth.register(new_user("user@x.com")).await.unwrap();
        let stored = repo::find_by_email(&state.store, "user@x.com").unwrap().unwrap();

        let mut again = new_user("user@x.com");
        again.password = "Another456!".into();
        let err = auth.register(again).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let after = repo::find_by_email(&state.store, "user@x.com").unwrap().unwrap();
        assert_eq!(after.password_hash, stored.password_hash);
        auth.login("user@x.com", "Secret123!").await.unwrap();
        assert!(auth.login("user@x.com", "Another456!").await.is_err());
    }

    #[tokio::test]
    async fn login_checks_email_then_password() {
        let state = AppState::fake();
        let auth = LocalAuth::from_state(&state);
        let registered = auth.register(new_user("user@x.com")).await.unwrap();

        let err = auth.login("nobody@x.com", "Secret123!").await.unwrap_err();
        assert!(matches!(err, AppError::UnknownEmail));

        let err = auth.login("user@x.com", "wrongpw").await.unwrap_err();
        assert!(matches!(err, AppError::WrongPassword));

        let user = auth.login("user@x.com", "Secret123!").await.unwrap();
        assert_eq!(user, registered);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn backend_answers_after_configured_delay() {
        let state = AppState::fake();
        let auth = LocalAuth::new(state.store.clone(), Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        let err = auth.login("user@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, AppError::UnknownEmail));
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn concurrent_registrations_of_one_email_admit_one() {
        let state = AppState::fake();
        let auth = LocalAuth::from_state(&state);
        let (a, b) = tokio::join!(
            auth.register(new_user("race@x.com")),
            auth.register(new_user("race@x.com"))
        );
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(repo::list(&state.store).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn flow_starts_session_on_success_only() {
        let state = AppState::fake();
        let flow = AuthFlow::local(&state);
        let mut feedback = Feedback::default();

        let user = flow.register(&register_form("user@x.com"), &mut feedback).await.unwrap();
        assert_eq!(flow.session().require().unwrap(), user);
        assert_eq!(feedback.successes.len(), 1);

        flow.session().logout().unwrap();
        let bad = LoginForm {
            email: "user@x.com".into(),
            password: "wrongpw".into(),
        };
        assert!(flow.login(&bad, &mut feedback).await.is_err());
        assert!(flow.session().current().unwrap().is_none());
        assert_eq!(feedback.errors, vec!["form: Wrong password".to_string()]);

        let good = LoginForm {
            email: "user@x.com".into(),
            password: "Secret123!".into(),
        };
        flow.login(&good, &mut feedback).await.unwrap();
        assert_eq!(flow.session().require().unwrap().email, "user@x.com");
    }

    #[tokio::test]
    async fn flow_rejects_invalid_forms_before_the_backend() {
        let state = AppState::fake();
        let flow = AuthFlow::local(&state);
        let mut feedback = Feedback::default();

        let mut form = register_form("user@x.com");
        form.agree_terms = false;
        let err = flow.register(&form, &mut feedback).await.unwrap_err();
        assert!(matches!(err, AppError::TermsNotAccepted));
        assert!(repo::list(&state.store).unwrap().is_empty());
        assert!(feedback.errors[0].starts_with("agreeTerms"));
    }
}
