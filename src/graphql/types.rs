//! GraphQL object types.
//!
//! These are the shapes clients see. They are built from the persisted
//! documents and never carry credential material: a stored password hash
//! has no field to go into.

use async_graphql::{ComplexObject, Context, ErrorExtensions, Result, SimpleObject, ID};

use crate::database::{
    models::{blog::Blog, comment::Comment, user::User},
    store::Store,
};

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "User", complex)]
pub struct UserType {
    pub id: ID,
    pub name: String,
    pub email: String,
}

#[ComplexObject]
impl UserType {
    /// Blogs owned by this user.
    async fn blogs(&self, ctx: &Context<'_>) -> Result<Vec<BlogType>> {
        let store = ctx.data::<Store>()?;
        let blogs = Blog::find_by_user(store, self.id.to_string())
            .await
            .map_err(|err| err.extend())?;

        Ok(blogs.into_iter().map(BlogType::from).collect())
    }

    /// Comments written by this user.
    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentType>> {
        let store = ctx.data::<Store>()?;
        let comments = Comment::find_by_user(store, self.id.to_string())
            .await
            .map_err(|err| err.extend())?;

        Ok(comments.into_iter().map(CommentType::from).collect())
    }
}

impl From<User> for UserType {
    fn from(user: User) -> Self {
        UserType {
            id: ID(user.id),
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Blog", complex)]
pub struct BlogType {
    pub id: ID,
    pub title: String,
    pub content: String,
    pub date: String,
    #[graphql(skip)]
    pub user_id: String,
}

#[ComplexObject]
impl BlogType {
    /// Owner of the blog.
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        let store = ctx.data::<Store>()?;
        let user = User::find_by_id(store, self.user_id.clone())
            .await
            .map_err(|err| err.extend())?;

        Ok(user.map(UserType::from))
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentType>> {
        let store = ctx.data::<Store>()?;
        let comments = Comment::find_by_blog(store, self.id.to_string())
            .await
            .map_err(|err| err.extend())?;

        Ok(comments.into_iter().map(CommentType::from).collect())
    }
}

impl From<Blog> for BlogType {
    fn from(blog: Blog) -> Self {
        BlogType {
            id: ID(blog.id),
            title: blog.title,
            content: blog.content,
            date: blog.date,
            user_id: blog.user_id,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Comment", complex)]
pub struct CommentType {
    pub id: ID,
    pub text: String,
    pub date: String,
    #[graphql(skip)]
    pub user_id: String,
    #[graphql(skip)]
    pub blog_id: String,
}

#[ComplexObject]
impl CommentType {
    /// Author of the comment.
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        let store = ctx.data::<Store>()?;
        let user = User::find_by_id(store, self.user_id.clone())
            .await
            .map_err(|err| err.extend())?;

        Ok(user.map(UserType::from))
    }

    /// Blog the comment was posted on.
    async fn blog(&self, ctx: &Context<'_>) -> Result<Option<BlogType>> {
        let store = ctx.data::<Store>()?;
        let blog = Blog::find_by_id(store, self.blog_id.clone())
            .await
            .map_err(|err| err.extend())?;

        Ok(blog.map(BlogType::from))
    }
}

impl From<Comment> for CommentType {
    fn from(comment: Comment) -> Self {
        CommentType {
            id: ID(comment.id),
            text: comment.text,
            date: comment.date,
            user_id: comment.user_id,
            blog_id: comment.blog_id,
        }
    }
}
