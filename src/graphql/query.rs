//! GraphQL query resolvers.
//!
//! Read-only lookups, each one going straight to the store.

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use super::types::{BlogType, CommentType, UserType};
use crate::database::{
    models::{blog::Blog, comment::Comment, user::User},
    store::Store,
};

/// Root query type for the GraphQL schema.
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserType>> {
        let store = ctx.data::<Store>()?;
        let users = User::all(store).await.map_err(|err| err.extend())?;

        Ok(users.into_iter().map(UserType::from).collect())
    }

    /// A user by id, null if there is none.
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<UserType>> {
        let store = ctx.data::<Store>()?;
        let user = User::find_by_id(store, id.to_string())
            .await
            .map_err(|err| err.extend())?;

        Ok(user.map(UserType::from))
    }

    async fn blogs(&self, ctx: &Context<'_>) -> Result<Vec<BlogType>> {
        let store = ctx.data::<Store>()?;
        let blogs = Blog::all(store).await.map_err(|err| err.extend())?;

        Ok(blogs.into_iter().map(BlogType::from).collect())
    }

    /// A blog by id, null if there is none.
    async fn blog(&self, ctx: &Context<'_>, id: ID) -> Result<Option<BlogType>> {
        let store = ctx.data::<Store>()?;
        let blog = Blog::find_by_id(store, id.to_string())
            .await
            .map_err(|err| err.extend())?;

        Ok(blog.map(BlogType::from))
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentType>> {
        let store = ctx.data::<Store>()?;
        let comments = Comment::all(store).await.map_err(|err| err.extend())?;

        Ok(comments.into_iter().map(CommentType::from).collect())
    }
}
