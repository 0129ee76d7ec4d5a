//! GraphQL mutation resolvers.
//!
//! Every failure leaves through the GraphQL error channel with a `code`
//! extension, see [crate::app::AppError::code].

use async_graphql::{Context, Object, Result, ID};

use super::{
    operation_error,
    types::{BlogType, CommentType, UserType},
};
use crate::database::{
    models::{blog::Blog, comment::Comment, user::User},
    store::Store,
};

/// Root mutation type for the GraphQL schema.
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn signup(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        password: String,
    ) -> Result<UserType> {
        let store = ctx.data::<Store>()?;
        let user = User::signup(store, name, email, password)
            .await
            .map_err(|err| operation_error("signup", err))?;

        Ok(user.into())
    }

    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<UserType> {
        let store = ctx.data::<Store>()?;
        let user = User::login(store, email, password)
            .await
            .map_err(|err| operation_error("login", err))?;

        Ok(user.into())
    }

    async fn add_blog(
        &self,
        ctx: &Context<'_>,
        title: String,
        content: String,
        date: String,
        user: ID,
    ) -> Result<BlogType> {
        let store = ctx.data::<Store>()?;
        let blog = Blog::create(store, title, content, date, user.to_string())
            .await
            .map_err(|err| operation_error("addBlog", err))?;

        Ok(blog.into())
    }

    async fn update_blog(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: String,
        content: String,
    ) -> Result<BlogType> {
        let store = ctx.data::<Store>()?;
        let blog = Blog::update(store, id.to_string(), title, content)
            .await
            .map_err(|err| operation_error("updateBlog", err))?;

        Ok(blog.into())
    }

    /// Deletes the blog and every comment on it, returns the deleted blog.
    async fn delete_blog(&self, ctx: &Context<'_>, id: ID) -> Result<BlogType> {
        let store = ctx.data::<Store>()?;
        let blog = Blog::delete(store, id.to_string())
            .await
            .map_err(|err| operation_error("deleteBlog", err))?;

        Ok(blog.into())
    }

    async fn add_comment_to_blog(
        &self,
        ctx: &Context<'_>,
        blog: ID,
        user: ID,
        text: String,
        date: String,
    ) -> Result<CommentType> {
        let store = ctx.data::<Store>()?;
        let comment = Comment::create(store, blog.to_string(), user.to_string(), text, date)
            .await
            .map_err(|err| operation_error("addCommentToBlog", err))?;

        Ok(comment.into())
    }

    /// Returns the deleted comment.
    async fn delete_comment(&self, ctx: &Context<'_>, id: ID) -> Result<CommentType> {
        let store = ctx.data::<Store>()?;
        let comment = Comment::delete(store, id.to_string())
            .await
            .map_err(|err| operation_error("deleteComment", err))?;

        Ok(comment.into())
    }
}
