use actix_web::web;
use chrono::NaiveDateTime;
use log::{debug, info};

use super::{new_id, now};
use crate::{app::AppError, auth::password, database::store::Store, schema::users};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Insertable, AsChangeset)]
#[table_name = "users"]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// bcrypt hash, see [password::hash]
    pub password: String,
    pub blog_ids: Vec<String>,
    pub comment_ids: Vec<String>,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn new(name: &str, email: &str, password_hash: &str) -> User {
        User {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            blog_ids: Vec::new(),
            comment_ids: Vec::new(),
            created_at: now(),
        }
    }

    /// Registers a new user, the password is only ever stored hashed.
    ///
    /// # Errors
    /// - `InvalidInput` if name, email or password is empty
    /// - `AlreadyExists` if the email is taken
    pub async fn signup(
        store: &Store,
        name: String,
        email: String,
        password: String,
    ) -> Result<User, AppError> {
        let name = name.trim().to_string();
        let email = email.trim().to_string();

        if name.is_empty() {
            return Err(AppError::InvalidInput("name must not be empty"));
        }
        if email.is_empty() {
            return Err(AppError::InvalidInput("email must not be empty"));
        }
        if password.is_empty() {
            return Err(AppError::InvalidInput("password must not be empty"));
        }

        let hashed = web::block(move || password::hash(&password)).await??;
        let user = User::new(&name, &email, &hashed);
        let created = store
            .transaction(move |c| {
                if c.user_by_email(&user.email)?.is_some() {
                    return Err(AppError::AlreadyExists);
                }
                c.insert_user(&user)?;
                Ok(user)
            })
            .await;

        if let Ok(user) = &created {
            info!("User {} signed up", user.id);
        }
        created
    }

    /// Returns the user registered with `email` if `password` matches.
    ///
    /// # Errors
    /// - `NotFound` if no user has that email
    /// - `InvalidCredentials` if the password does not match
    pub async fn login(store: &Store, email: String, password: String) -> Result<User, AppError> {
        let email = email.trim().to_string();

        let user = store
            .run(move |c| c.user_by_email(&email))
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let stored = user.password.clone();
        if !web::block(move || password::verify(&password, &stored)).await? {
            debug!("Password mismatch for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find_by_id(store: &Store, user_id: String) -> Result<Option<User>, AppError> {
        store.run(move |c| c.user_by_id(&user_id)).await
    }

    pub async fn all(store: &Store) -> Result<Vec<User>, AppError> {
        store.run(|c| c.users()).await
    }
}
