use diesel::{pg::PgConnection, prelude::*};

use crate::{
    app::AppError,
    database::{
        db_utils::PgPool,
        models::{blog::Blog, comment::Comment, user::User},
        store::Collections,
    },
    schema::{blogs, comments, users},
};

/// PostgreSQL backed store, one pooled connection per call
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut dyn Collections) -> Result<T, AppError>,
    {
        let pooled = self.pool.get()?;

        op(&mut PgCollections {
            conn: &pooled,
            lock_rows: false,
        })
    }

    /// Diesel rolls the transaction back whenever the closure returns `Err`.
    ///
    /// Users and blogs read by id are locked (`FOR UPDATE`) until commit, so
    /// concurrent scopes touching the same document run one after the other
    /// instead of overwriting each other's back-reference lists. Scopes take
    /// blog locks before user locks.
    pub fn transaction<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut dyn Collections) -> Result<T, AppError>,
    {
        let pooled = self.pool.get()?;
        let conn: &PgConnection = &pooled;

        conn.transaction::<T, AppError, _>(|| {
            op(&mut PgCollections {
                conn,
                lock_rows: true,
            })
        })
    }
}

struct PgCollections<'a> {
    conn: &'a PgConnection,
    /// Set inside a transaction scope
    lock_rows: bool,
}

impl Collections for PgCollections<'_> {
    fn users(&mut self) -> Result<Vec<User>, AppError> {
        Ok(users::table
            .order((users::created_at.asc(), users::id.asc()))
            .load::<User>(self.conn)?)
    }

    fn user_by_id(&mut self, user_id: &str) -> Result<Option<User>, AppError> {
        let query = users::table.find(user_id);
        let found = if self.lock_rows {
            query.for_update().get_result::<User>(self.conn)
        } else {
            query.get_result::<User>(self.conn)
        };
        Ok(found.optional()?)
    }

    fn user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        Ok(users::table
            .filter(users::email.eq(email))
            .first::<User>(self.conn)
            .optional()?)
    }

    fn insert_user(&mut self, user: &User) -> Result<(), AppError> {
        diesel::insert_into(users::table)
            .values(user)
            .execute(self.conn)?;
        Ok(())
    }

    fn save_user(&mut self, user: &User) -> Result<(), AppError> {
        let updated = diesel::update(users::table.find(&user.id))
            .set(user)
            .execute(self.conn)?;
        if updated == 0 {
            return Err(AppError::NotFound("User"));
        }
        Ok(())
    }

    fn blogs(&mut self) -> Result<Vec<Blog>, AppError> {
        Ok(blogs::table
            .order((blogs::created_at.asc(), blogs::id.asc()))
            .load::<Blog>(self.conn)?)
    }

    fn blog_by_id(&mut self, blog_id: &str) -> Result<Option<Blog>, AppError> {
        let query = blogs::table.find(blog_id);
        let found = if self.lock_rows {
            query.for_update().get_result::<Blog>(self.conn)
        } else {
            query.get_result::<Blog>(self.conn)
        };
        Ok(found.optional()?)
    }

    fn blogs_by_user(&mut self, user_id: &str) -> Result<Vec<Blog>, AppError> {
        Ok(blogs::table
            .filter(blogs::user_id.eq(user_id))
            .order((blogs::created_at.asc(), blogs::id.asc()))
            .load::<Blog>(self.conn)?)
    }

    fn insert_blog(&mut self, blog: &Blog) -> Result<(), AppError> {
        diesel::insert_into(blogs::table)
            .values(blog)
            .execute(self.conn)?;
        Ok(())
    }

    fn save_blog(&mut self, blog: &Blog) -> Result<(), AppError> {
        let updated = diesel::update(blogs::table.find(&blog.id))
            .set(blog)
            .execute(self.conn)?;
        if updated == 0 {
            return Err(AppError::NotFound("Blog"));
        }
        Ok(())
    }

    fn delete_blog(&mut self, blog_id: &str) -> Result<bool, AppError> {
        let deleted = diesel::delete(blogs::table.find(blog_id)).execute(self.conn)?;
        Ok(deleted > 0)
    }

    fn comments(&mut self) -> Result<Vec<Comment>, AppError> {
        Ok(comments::table
            .order((comments::created_at.asc(), comments::id.asc()))
            .load::<Comment>(self.conn)?)
    }

    fn comment_by_id(&mut self, comment_id: &str) -> Result<Option<Comment>, AppError> {
        Ok(comments::table
            .find(comment_id)
            .first::<Comment>(self.conn)
            .optional()?)
    }

    fn comments_by_user(&mut self, user_id: &str) -> Result<Vec<Comment>, AppError> {
        Ok(comments::table
            .filter(comments::user_id.eq(user_id))
            .order((comments::created_at.asc(), comments::id.asc()))
            .load::<Comment>(self.conn)?)
    }

    fn comments_by_blog(&mut self, blog_id: &str) -> Result<Vec<Comment>, AppError> {
        Ok(comments::table
            .filter(comments::blog_id.eq(blog_id))
            .order((comments::created_at.asc(), comments::id.asc()))
            .load::<Comment>(self.conn)?)
    }

    fn insert_comment(&mut self, comment: &Comment) -> Result<(), AppError> {
        diesel::insert_into(comments::table)
            .values(comment)
            .execute(self.conn)?;
        Ok(())
    }

    fn delete_comment(&mut self, comment_id: &str) -> Result<bool, AppError> {
        let deleted = diesel::delete(comments::table.find(comment_id)).execute(self.conn)?;
        Ok(deleted > 0)
    }
}
