use chrono::NaiveDateTime;
use log::info;

use super::{new_id, now, pull_id, push_id};
use crate::{app::AppError, database::store::Store, schema::comments};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Insertable)]
#[table_name = "comments"]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub date: String,
    /// Author
    pub user_id: String,
    pub blog_id: String,
    pub created_at: NaiveDateTime,
}

impl Comment {
    pub fn new(text: &str, date: &str, user_id: &str, blog_id: &str) -> Comment {
        Comment {
            id: new_id(),
            text: text.to_string(),
            date: date.to_string(),
            user_id: user_id.to_string(),
            blog_id: blog_id.to_string(),
            created_at: now(),
        }
    }

    /** Creates a comment on the blog specified, recording it on both the blog and its author */
    pub async fn create(
        store: &Store,
        blog_id: String,
        user_id: String,
        text: String,
        date: String,
    ) -> Result<Comment, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput("text must not be empty"));
        }

        let comment = store
            .transaction(move |c| {
                let mut blog = c.blog_by_id(&blog_id)?.ok_or(AppError::NotFound("Blog"))?;
                let mut author = c.user_by_id(&user_id)?.ok_or(AppError::NotFound("User"))?;
                let comment = Comment::new(&text, &date, &author.id, &blog.id);

                push_id(&mut author.comment_ids, &comment.id);
                push_id(&mut blog.comment_ids, &comment.id);
                c.insert_comment(&comment)?;
                c.save_blog(&blog)?;
                c.save_user(&author)?;

                Ok(comment)
            })
            .await?;

        info!("Comment {} added to blog {}", comment.id, comment.blog_id);
        Ok(comment)
    }

    /** Deletes a comment and removes it from its blog and author, returns the deleted comment */
    pub async fn delete(store: &Store, comment_id: String) -> Result<Comment, AppError> {
        let comment = store
            .transaction(move |c| {
                let comment = c
                    .comment_by_id(&comment_id)?
                    .ok_or(AppError::NotFound("Comment"))?;
                let mut blog = c
                    .blog_by_id(&comment.blog_id)?
                    .ok_or(AppError::NotFound("Blog"))?;
                let mut author = c
                    .user_by_id(&comment.user_id)?
                    .ok_or(AppError::NotFound("User"))?;

                pull_id(&mut author.comment_ids, &comment.id);
                pull_id(&mut blog.comment_ids, &comment.id);
                c.save_user(&author)?;
                c.save_blog(&blog)?;
                // Lost a race with another delete of the same comment
                if !c.delete_comment(&comment.id)? {
                    return Err(AppError::NotFound("Comment"));
                }

                Ok(comment)
            })
            .await?;

        info!("Comment {} deleted", comment.id);
        Ok(comment)
    }

    /** Returns all comments with the user specified */
    pub async fn find_by_user(store: &Store, user_id: String) -> Result<Vec<Comment>, AppError> {
        store.run(move |c| c.comments_by_user(&user_id)).await
    }

    /** Returns all comments posted in a blog */
    pub async fn find_by_blog(store: &Store, blog_id: String) -> Result<Vec<Comment>, AppError> {
        store.run(move |c| c.comments_by_blog(&blog_id)).await
    }

    pub async fn all(store: &Store) -> Result<Vec<Comment>, AppError> {
        store.run(|c| c.comments()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{blog::Blog, user::User};

    async fn seed(store: &Store) -> (User, Blog) {
        let usr = User::signup(
            store,
            String::from("Test user123"),
            String::from("test@example.com"),
            String::from("asd123"),
        )
        .await
        .unwrap();
        let blog = Blog::create(
            store,
            String::from("Test title"),
            String::from("Test body"),
            String::from("2022-08-04"),
            usr.id.clone(),
        )
        .await
        .unwrap();

        (usr, blog)
    }

    async fn new_comment(store: &Store, usr: &User, blog: &Blog) -> Comment {
        Comment::create(
            store,
            blog.id.clone(),
            usr.id.clone(),
            String::from("Test comment"),
            String::from("2022-08-12"),
        )
        .await
        .unwrap()
    }

    #[actix_rt::test]
    async fn test_new_comment() {
        let store = Store::memory();
        let (usr, blog) = seed(&store).await;

        let comment = new_comment(&store, &usr, &blog).await;

        assert_eq!(comment.user_id, usr.id);
        assert_eq!(comment.blog_id, blog.id);
        let usr = User::find_by_id(&store, usr.id).await.unwrap().unwrap();
        let blog = Blog::find_by_id(&store, blog.id).await.unwrap().unwrap();
        assert_eq!(usr.comment_ids, vec![comment.id.clone()]);
        assert_eq!(blog.comment_ids, vec![comment.id.clone()]);
        assert_eq!(
            Comment::find_by_blog(&store, blog.id).await.unwrap(),
            vec![comment.clone()]
        );
        assert_eq!(
            Comment::find_by_user(&store, usr.id).await.unwrap(),
            vec![comment]
        );
    }

    #[actix_rt::test]
    async fn test_new_comment_on_missing_blog() {
        let store = Store::memory();
        let (usr, _) = seed(&store).await;

        let err = Comment::create(
            &store,
            String::from("missing"),
            usr.id.clone(),
            String::from("Test comment"),
            String::from("2022-08-12"),
        )
        .await
        .unwrap_err();

        assert_eq!(err, AppError::NotFound("Blog"));
        assert!(Comment::all(&store).await.unwrap().is_empty());
        let usr = User::find_by_id(&store, usr.id).await.unwrap().unwrap();
        assert!(usr.comment_ids.is_empty());
    }

    #[actix_rt::test]
    async fn test_new_comment_by_missing_user() {
        let store = Store::memory();
        let (_, blog) = seed(&store).await;

        let err = Comment::create(
            &store,
            blog.id.clone(),
            String::from("missing"),
            String::from("Test comment"),
            String::from("2022-08-12"),
        )
        .await
        .unwrap_err();

        assert_eq!(err, AppError::NotFound("User"));
        let blog = Blog::find_by_id(&store, blog.id).await.unwrap().unwrap();
        assert!(blog.comment_ids.is_empty());
    }

    #[actix_rt::test]
    async fn test_delete_comment() {
        let store = Store::memory();
        let (usr, blog) = seed(&store).await;
        let comment = new_comment(&store, &usr, &blog).await;
        let kept = new_comment(&store, &usr, &blog).await;

        let deleted = Comment::delete(&store, comment.id.clone()).await.unwrap();

        assert_eq!(deleted, comment);
        assert_eq!(Comment::all(&store).await.unwrap(), vec![kept.clone()]);
        let usr = User::find_by_id(&store, usr.id).await.unwrap().unwrap();
        let blog = Blog::find_by_id(&store, blog.id).await.unwrap().unwrap();
        assert_eq!(usr.comment_ids, vec![kept.id.clone()]);
        assert_eq!(blog.comment_ids, vec![kept.id]);
    }

    #[actix_rt::test]
    async fn test_delete_missing_comment() {
        let store = Store::memory();

        let err = Comment::delete(&store, String::from("missing"))
            .await
            .unwrap_err();

        assert_eq!(err, AppError::NotFound("Comment"));
    }
}
