use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    app::AppError,
    database::{
        models::{blog::Blog, comment::Comment, user::User},
        store::Collections,
    },
};

/// In-process store used when no database is configured, and as an
/// isolated store instance in tests.
///
/// A transaction works on a copy of the documents and only replaces the
/// shared set when it succeeds, so a failed one leaves nothing behind.
/// The lock is held for the whole scope, which serializes transactions.
#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<Mutex<Documents>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, Documents>, AppError> {
        self.documents
            .lock()
            .map_err(|_| AppError::TransactionFailure(String::from("memory store lock poisoned")))
    }

    pub fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut dyn Collections) -> Result<T, AppError>,
    {
        let mut documents = self.lock()?;

        op(&mut *documents)
    }

    pub fn transaction<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut dyn Collections) -> Result<T, AppError>,
    {
        let mut documents = self.lock()?;
        // Copies every document, fine for dev and tests, not for large data sets.
        let mut working = documents.clone();

        let result = op(&mut working)?;
        *documents = working;

        Ok(result)
    }
}

#[derive(Clone, Default)]
struct Documents {
    users: HashMap<String, User>,
    blogs: HashMap<String, Blog>,
    comments: HashMap<String, Comment>,
}

/// Collects matching documents in creation order, the order postgres listings use.
fn sorted<'a, T, I, K>(documents: I, key: K) -> Vec<T>
where
    T: Clone + 'a,
    I: Iterator<Item = &'a T>,
    K: Fn(&T) -> (chrono::NaiveDateTime, String),
{
    let mut found: Vec<T> = documents.cloned().collect();
    found.sort_by_key(|document| key(document));
    found
}

fn user_key(user: &User) -> (chrono::NaiveDateTime, String) {
    (user.created_at, user.id.clone())
}

fn blog_key(blog: &Blog) -> (chrono::NaiveDateTime, String) {
    (blog.created_at, blog.id.clone())
}

fn comment_key(comment: &Comment) -> (chrono::NaiveDateTime, String) {
    (comment.created_at, comment.id.clone())
}

impl Collections for Documents {
    fn users(&mut self) -> Result<Vec<User>, AppError> {
        Ok(sorted(self.users.values(), user_key))
    }

    fn user_by_id(&mut self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(user_id).cloned())
    }

    fn user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.values().find(|user| user.email == email).cloned())
    }

    fn insert_user(&mut self, user: &User) -> Result<(), AppError> {
        // mirrors the unique index on users.email
        if self.users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::AlreadyExists);
        }
        if self.users.contains_key(&user.id) {
            return Err(AppError::TransactionFailure(format!(
                "duplicate user id {}",
                user.id
            )));
        }
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn save_user(&mut self, user: &User) -> Result<(), AppError> {
        let stored = self
            .users
            .get_mut(&user.id)
            .ok_or(AppError::NotFound("User"))?;
        *stored = user.clone();
        Ok(())
    }

    fn blogs(&mut self) -> Result<Vec<Blog>, AppError> {
        Ok(sorted(self.blogs.values(), blog_key))
    }

    fn blog_by_id(&mut self, blog_id: &str) -> Result<Option<Blog>, AppError> {
        Ok(self.blogs.get(blog_id).cloned())
    }

    fn blogs_by_user(&mut self, user_id: &str) -> Result<Vec<Blog>, AppError> {
        Ok(sorted(
            self.blogs.values().filter(|blog| blog.user_id == user_id),
            blog_key,
        ))
    }

    fn insert_blog(&mut self, blog: &Blog) -> Result<(), AppError> {
        if self.blogs.contains_key(&blog.id) {
            return Err(AppError::TransactionFailure(format!(
                "duplicate blog id {}",
                blog.id
            )));
        }
        self.blogs.insert(blog.id.clone(), blog.clone());
        Ok(())
    }

    fn save_blog(&mut self, blog: &Blog) -> Result<(), AppError> {
        let stored = self
            .blogs
            .get_mut(&blog.id)
            .ok_or(AppError::NotFound("Blog"))?;
        *stored = blog.clone();
        Ok(())
    }

    fn delete_blog(&mut self, blog_id: &str) -> Result<bool, AppError> {
        Ok(self.blogs.remove(blog_id).is_some())
    }

    fn comments(&mut self) -> Result<Vec<Comment>, AppError> {
        Ok(sorted(self.comments.values(), comment_key))
    }

    fn comment_by_id(&mut self, comment_id: &str) -> Result<Option<Comment>, AppError> {
        Ok(self.comments.get(comment_id).cloned())
    }

    fn comments_by_user(&mut self, user_id: &str) -> Result<Vec<Comment>, AppError> {
        Ok(sorted(
            self.comments
                .values()
                .filter(|comment| comment.user_id == user_id),
            comment_key,
        ))
    }

    fn comments_by_blog(&mut self, blog_id: &str) -> Result<Vec<Comment>, AppError> {
        Ok(sorted(
            self.comments
                .values()
                .filter(|comment| comment.blog_id == blog_id),
            comment_key,
        ))
    }

    fn insert_comment(&mut self, comment: &Comment) -> Result<(), AppError> {
        if self.comments.contains_key(&comment.id) {
            return Err(AppError::TransactionFailure(format!(
                "duplicate comment id {}",
                comment.id
            )));
        }
        self.comments.insert(comment.id.clone(), comment.clone());
        Ok(())
    }

    fn delete_comment(&mut self, comment_id: &str) -> Result<bool, AppError> {
        Ok(self.comments.remove(comment_id).is_some())
    }
}
