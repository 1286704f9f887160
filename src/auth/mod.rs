pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod session;
pub mod validation;

pub use repo_types::{NewUser, PublicUser, User};
pub use services::{AuthBackend, AuthFlow, LocalAuth};
pub use session::Session;
pub use validation::{LoginForm, RegisterForm};
