use actix_web::web;
use log::debug;

use crate::{
    app::AppError,
    database::{
        db_utils::{psql_connect_to_db, PgPool},
        memory::MemoryStore,
        models::{blog::Blog, comment::Comment, user::User},
        pg::PgStore,
    },
};

/// CRUD over the three document collections.
///
/// Every method works on whole documents: `save_*` overwrites the stored
/// document with the given one, back-reference lists included.
pub trait Collections {
    fn users(&mut self) -> Result<Vec<User>, AppError>;
    fn user_by_id(&mut self, user_id: &str) -> Result<Option<User>, AppError>;
    fn user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError>;
    fn insert_user(&mut self, user: &User) -> Result<(), AppError>;
    fn save_user(&mut self, user: &User) -> Result<(), AppError>;

    fn blogs(&mut self) -> Result<Vec<Blog>, AppError>;
    fn blog_by_id(&mut self, blog_id: &str) -> Result<Option<Blog>, AppError>;
    fn blogs_by_user(&mut self, user_id: &str) -> Result<Vec<Blog>, AppError>;
    fn insert_blog(&mut self, blog: &Blog) -> Result<(), AppError>;
    fn save_blog(&mut self, blog: &Blog) -> Result<(), AppError>;
    /// Returns whether a document was removed
    fn delete_blog(&mut self, blog_id: &str) -> Result<bool, AppError>;

    fn comments(&mut self) -> Result<Vec<Comment>, AppError>;
    fn comment_by_id(&mut self, comment_id: &str) -> Result<Option<Comment>, AppError>;
    fn comments_by_user(&mut self, user_id: &str) -> Result<Vec<Comment>, AppError>;
    fn comments_by_blog(&mut self, blog_id: &str) -> Result<Vec<Comment>, AppError>;
    fn insert_comment(&mut self, comment: &Comment) -> Result<(), AppError>;
    /// Returns whether a document was removed
    fn delete_comment(&mut self, comment_id: &str) -> Result<bool, AppError>;
}

/// Handle to the document store, cloned into every request.
#[derive(Clone)]
pub enum Store {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl Store {
    pub fn postgres(database_url: &str, pool_size: u32) -> Result<Store, AppError> {
        let pool: PgPool = psql_connect_to_db(database_url, pool_size)?;

        Ok(Store::Postgres(PgStore::new(pool)))
    }

    pub fn memory() -> Store {
        Store::Memory(MemoryStore::default())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }

    /// Runs `op` against the store without a transaction scope,
    /// for reads and single document writes.
    pub async fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Collections) -> Result<T, AppError> + Send + 'static,
    {
        let store = self.clone();

        web::block(move || match &store {
            Store::Postgres(pg) => pg.run(op),
            Store::Memory(mem) => mem.run(op),
        })
        .await?
    }

    /// Runs `op` inside a transaction scope.
    /// The writes of `op` commit only when it returns `Ok`, any `Err` aborts them all.
    pub async fn transaction<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Collections) -> Result<T, AppError> + Send + 'static,
    {
        let store = self.clone();

        let result = web::block(move || match &store {
            Store::Postgres(pg) => pg.transaction(op),
            Store::Memory(mem) => mem.transaction(op),
        })
        .await?;

        if let Err(err) = &result {
            debug!("transaction aborted: {}", err);
        }

        result
    }
}
