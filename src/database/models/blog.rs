use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use log::info;

use super::{new_id, now, pull_id, push_id};
use crate::{
    app::AppError,
    database::store::{Collections, Store},
    schema::blogs,
};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Insertable, AsChangeset)]
#[table_name = "blogs"]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Client supplied, stored as given
    pub date: String,
    /// Owner
    pub user_id: String,
    pub comment_ids: Vec<String>,
    pub created_at: NaiveDateTime,
}

fn check_fields(title: &str, content: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput("title must not be empty"));
    }
    if content.trim().is_empty() {
        return Err(AppError::InvalidInput("content must not be empty"));
    }
    Ok(())
}

impl Blog {
    pub fn new(title: &str, content: &str, date: &str, user_id: &str) -> Blog {
        Blog {
            id: new_id(),
            title: title.to_string(),
            content: content.to_string(),
            date: date.to_string(),
            user_id: user_id.to_string(),
            comment_ids: Vec::new(),
            created_at: now(),
        }
    }

    /** Creates a blog owned by `user_id` and records it in the owner's blog list */
    pub async fn create(
        store: &Store,
        title: String,
        content: String,
        date: String,
        user_id: String,
    ) -> Result<Blog, AppError> {
        check_fields(&title, &content)?;

        let blog = store
            .transaction(move |c| {
                let mut owner = c.user_by_id(&user_id)?.ok_or(AppError::NotFound("User"))?;
                let blog = Blog::new(&title, &content, &date, &owner.id);

                push_id(&mut owner.blog_ids, &blog.id);
                c.insert_blog(&blog)?;
                c.save_user(&owner)?;

                Ok(blog)
            })
            .await?;

        info!("Blog {} created by user {}", blog.id, blog.user_id);
        Ok(blog)
    }

    /** Replaces title and content, id, owner and comments stay the same */
    pub async fn update(
        store: &Store,
        blog_id: String,
        title: String,
        content: String,
    ) -> Result<Blog, AppError> {
        check_fields(&title, &content)?;

        let blog = store
            .transaction(move |c| {
                let mut blog = c.blog_by_id(&blog_id)?.ok_or(AppError::NotFound("Blog"))?;
                blog.title = title;
                blog.content = content;
                c.save_blog(&blog)?;

                Ok(blog)
            })
            .await?;

        info!("Blog {} updated", blog.id);
        Ok(blog)
    }

    /** Deletes a blog together with its comments, returns the deleted blog */
    pub async fn delete(store: &Store, blog_id: String) -> Result<Blog, AppError> {
        let blog = store
            .transaction(move |c| Blog::remove(c, &blog_id))
            .await?;

        info!("Blog {} deleted", blog.id);
        Ok(blog)
    }

    /// Removes the blog from its owner's list, deletes every comment on it
    /// (pulling each from its author's list) and then the blog itself.
    ///
    /// Has to run inside a transaction scope, it persists documents one by one.
    /// Users are loaded in id order so concurrent removals lock them in the same order.
    pub fn remove(c: &mut dyn Collections, blog_id: &str) -> Result<Blog, AppError> {
        let blog = c.blog_by_id(blog_id)?.ok_or(AppError::NotFound("Blog"))?;
        let comments = c.comments_by_blog(&blog.id)?;

        let mut user_ids: Vec<&str> = comments
            .iter()
            .map(|comment| comment.user_id.as_str())
            .collect();
        user_ids.push(blog.user_id.as_str());
        user_ids.sort_unstable();
        user_ids.dedup();

        let mut users = BTreeMap::new();
        for user_id in user_ids {
            if let Some(user) = c.user_by_id(user_id)? {
                users.insert(user.id.clone(), user);
            }
        }

        let owner = users
            .get_mut(&blog.user_id)
            .ok_or(AppError::NotFound("User"))?;
        pull_id(&mut owner.blog_ids, &blog.id);

        for comment in &comments {
            if let Some(author) = users.get_mut(&comment.user_id) {
                pull_id(&mut author.comment_ids, &comment.id);
            }
            c.delete_comment(&comment.id)?;
        }

        for user in users.values() {
            c.save_user(user)?;
        }
        if !c.delete_blog(&blog.id)? {
            return Err(AppError::NotFound("Blog"));
        }

        Ok(blog)
    }

    pub async fn find_by_id(store: &Store, blog_id: String) -> Result<Option<Blog>, AppError> {
        store.run(move |c| c.blog_by_id(&blog_id)).await
    }

    pub async fn find_by_user(store: &Store, user_id: String) -> Result<Vec<Blog>, AppError> {
        store.run(move |c| c.blogs_by_user(&user_id)).await
    }

    pub async fn all(store: &Store) -> Result<Vec<Blog>, AppError> {
        store.run(|c| c.blogs()).await
    }
}
