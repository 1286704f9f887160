use crate::error::{AppError, AppResult};
use crate::storage::{Store, REGISTERED_USERS_KEY};

use super::repo_types::User;

pub fn list(store: &Store) -> AppResult<Vec<User>> {
    store.load(REGISTERED_USERS_KEY)
}

/// Find a user by exact email.
pub fn find_by_email(store: &Store, email: &str) -> AppResult<Option<User>> {
    Ok(list(store)?.into_iter().find(|u| u.email == email))
}

pub fn find_by_id(store: &Store, id: i64) -> AppResult<Option<User>> {
    Ok(list(store)?.into_iter().find(|u| u.id == id))
}

/// Append a user built by `make`, unless the email is taken. The check and
/// the write happen under one store lock.
pub fn insert_unique<F>(store: &Store, email: &str, make: F) -> AppResult<User>
where
    F: FnOnce(&[User]) -> AppResult<User>,
{
    store.update(REGISTERED_USERS_KEY, |users: &mut Vec<User>| {
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }
        let user = make(users.as_slice())?;
        users.push(user.clone());
        Ok(user)
    })
}

/// Apply `f` to the user with `id` and store the registry.
pub fn modify<F>(store: &Store, id: i64, f: F) -> AppResult<User>
where
    F: FnOnce(&mut User) -> AppResult<()>,
{
    store.update(REGISTERED_USERS_KEY, |users: &mut Vec<User>| {
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotAuthenticated)?;
        f(user)?;
        Ok(user.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::DEFAULT_AVATAR;
    use time::macros::date;

    fn user(id: i64, email: &str) -> User {
        User {
            id,
            name: "Minh".into(),
            email: email.into(),
            password_hash: "hash".into(),
            phone: String::new(),
            join_date: date!(2024-01-01),
            avatar: DEFAULT_AVATAR.into(),
        }
    }

    #[test]
    fn insert_rejects_taken_email_and_keeps_one_record() {
        let store = Store::in_memory();
        insert_unique(&store, "a@x.com", |_| Ok(user(1, "a@x.com"))).unwrap();
        let err = insert_unique(&store, "a@x.com", |_| Ok(user(2, "a@x.com"))).unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let users = list(&store).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 1);
    }

    #[test]
    fn email_lookup_is_exact() {
        let store = Store::in_memory();
        insert_unique(&store, "a@x.com", |_| Ok(user(1, "a@x.com"))).unwrap();
        assert!(find_by_email(&store, "a@x.com").unwrap().is_some());
        assert!(find_by_email(&store, "A@x.com").unwrap().is_none());
        assert!(find_by_id(&store, 1).unwrap().is_some());
    }

    #[test]
    fn modify_unknown_id_fails() {
        let store = Store::in_memory();
        let err = modify(&store, 9, |_| Ok(())).unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));
    }
}
