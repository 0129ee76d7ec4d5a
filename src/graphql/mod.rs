//! GraphQL schema definition.
//!
//! - [`types`] - exposed object types (User, Blog, Comment)
//! - [`query`] - query resolvers (users, user, blogs, blog, comments)
//! - [`mutation`] - mutation resolvers (signup, login, addBlog, ...)

mod mutation;
mod query;
mod types;

use async_graphql::{EmptySubscription, ErrorExtensions, Schema};
use log::warn;

use crate::{app::AppError, database::store::Store};

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::*;

/// Relationship fields are cyclic (user -> blogs -> user -> ...)
const MAX_QUERY_DEPTH: usize = 16;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema with `store` as the handle every resolver uses.
pub fn build_schema(store: Store) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .limit_depth(MAX_QUERY_DEPTH)
        .finish()
}

fn operation_error(operation: &str, err: AppError) -> async_graphql::Error {
    warn!("{} failed: {}", operation, err);
    err.extend()
}

#[cfg(test)]
mod tests {
    use async_graphql::{Request, Response, Variables};
    use serde_json::{json, Value};

    use super::*;

    async fn execute(schema: &AppSchema, query: &str, variables: Value) -> Response {
        schema
            .execute(Request::new(query).variables(Variables::from_json(variables)))
            .await
    }

    fn data(response: Response) -> Value {
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    fn error_code(response: &Response) -> Value {
        let body = serde_json::to_value(response).unwrap();
        body["errors"][0]["extensions"]["code"].clone()
    }

    const SIGNUP: &str = "mutation($name: String!, $email: String!, $password: String!) {
        signup(name: $name, email: $email, password: $password) { id name email }
    }";
    const LOGIN: &str = "mutation($email: String!, $password: String!) {
        login(email: $email, password: $password) { id email }
    }";
    const ADD_BLOG: &str = "mutation($title: String!, $content: String!, $date: String!, $user: ID!) {
        addBlog(title: $title, content: $content, date: $date, user: $user) { id title user { id } }
    }";
    const ADD_COMMENT: &str = "mutation($blog: ID!, $user: ID!, $text: String!, $date: String!) {
        addCommentToBlog(blog: $blog, user: $user, text: $text, date: $date) { id text }
    }";

    async fn signup(schema: &AppSchema, email: &str) -> String {
        let body = data(
            execute(
                schema,
                SIGNUP,
                json!({ "name": "Test user", "email": email, "password": "test_password123" }),
            )
            .await,
        );
        body["signup"]["id"].as_str().unwrap().to_string()
    }

    async fn add_blog(schema: &AppSchema, user: &str) -> String {
        let body = data(
            execute(
                schema,
                ADD_BLOG,
                json!({ "title": "T", "content": "C", "date": "D", "user": user }),
            )
            .await,
        );
        body["addBlog"]["id"].as_str().unwrap().to_string()
    }

    async fn add_comment(schema: &AppSchema, blog: &str, user: &str) -> String {
        let body = data(
            execute(
                schema,
                ADD_COMMENT,
                json!({ "blog": blog, "user": user, "text": "Nice post", "date": "D" }),
            )
            .await,
        );
        body["addCommentToBlog"]["id"].as_str().unwrap().to_string()
    }

    #[actix_rt::test]
    async fn test_signup_then_login_returns_same_user() {
        let schema = build_schema(Store::memory());
        let id = signup(&schema, "test@example.com").await;

        for _ in 0..2 {
            let body = data(
                execute(
                    &schema,
                    LOGIN,
                    json!({ "email": "test@example.com", "password": "test_password123" }),
                )
                .await,
            );
            assert_eq!(body["login"]["id"], json!(id));
        }
    }

    #[actix_rt::test]
    async fn test_password_is_not_queryable() {
        let schema = build_schema(Store::memory());
        signup(&schema, "test@example.com").await;

        let response = execute(
            &schema,
            "mutation { login(email: \"test@example.com\", password: \"test_password123\") { id password } }",
            json!({}),
        )
        .await;

        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].message.contains("password"));
        assert_eq!(response.data, async_graphql::Value::Null);
    }

    #[actix_rt::test]
    async fn test_duplicate_signup_is_an_error() {
        let schema = build_schema(Store::memory());
        signup(&schema, "test@example.com").await;

        let response = execute(
            &schema,
            SIGNUP,
            json!({ "name": "Other", "email": "test@example.com", "password": "x" }),
        )
        .await;

        assert_eq!(error_code(&response), json!("ALREADY_EXISTS"));
        let body = data(execute(&schema, "{ users { id } }", json!({})).await);
        assert_eq!(body["users"].as_array().unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn test_login_errors() {
        let schema = build_schema(Store::memory());
        signup(&schema, "test@example.com").await;

        let wrong_password = execute(
            &schema,
            LOGIN,
            json!({ "email": "test@example.com", "password": "nope" }),
        )
        .await;
        assert_eq!(error_code(&wrong_password), json!("INVALID_CREDENTIALS"));
        assert_eq!(wrong_password.data, async_graphql::Value::Null);

        let unknown = execute(
            &schema,
            LOGIN,
            json!({ "email": "nobody@example.com", "password": "nope" }),
        )
        .await;
        assert_eq!(error_code(&unknown), json!("NOT_FOUND"));
    }

    #[actix_rt::test]
    async fn test_add_blog_links_both_ways() {
        let schema = build_schema(Store::memory());
        let user = signup(&schema, "test@example.com").await;

        let body = data(
            execute(
                &schema,
                ADD_BLOG,
                json!({ "title": "T", "content": "C", "date": "D", "user": user }),
            )
            .await,
        );
        let blog = body["addBlog"]["id"].clone();
        assert_eq!(body["addBlog"]["user"]["id"], json!(user));

        let body = data(
            execute(
                &schema,
                "query($id: ID!) { user(id: $id) { blogs { id title content date } } }",
                json!({ "id": user }),
            )
            .await,
        );
        assert_eq!(
            body["user"]["blogs"],
            json!([{ "id": blog, "title": "T", "content": "C", "date": "D" }])
        );
    }

    #[actix_rt::test]
    async fn test_add_blog_for_unknown_user() {
        let schema = build_schema(Store::memory());

        let response = execute(
            &schema,
            ADD_BLOG,
            json!({ "title": "T", "content": "C", "date": "D", "user": "missing" }),
        )
        .await;

        assert_eq!(error_code(&response), json!("NOT_FOUND"));
        let body = data(execute(&schema, "{ blogs { id } }", json!({})).await);
        assert_eq!(body["blogs"], json!([]));
    }

    #[actix_rt::test]
    async fn test_update_blog() {
        let schema = build_schema(Store::memory());
        let user = signup(&schema, "test@example.com").await;
        let blog = add_blog(&schema, &user).await;
        let update = "mutation($id: ID!) {
            updateBlog(id: $id, title: \"T2\", content: \"C2\") { id title content user { id } }
        }";

        let body = data(execute(&schema, update, json!({ "id": blog })).await);
        assert_eq!(
            body["updateBlog"],
            json!({ "id": blog, "title": "T2", "content": "C2", "user": { "id": user } })
        );

        let missing = execute(&schema, update, json!({ "id": "missing" })).await;
        assert_eq!(error_code(&missing), json!("NOT_FOUND"));
        let body = data(execute(&schema, "{ blogs { id title } }", json!({})).await);
        assert_eq!(body["blogs"], json!([{ "id": blog, "title": "T2" }]));
    }

    #[actix_rt::test]
    async fn test_delete_blog() {
        let schema = build_schema(Store::memory());
        let user = signup(&schema, "test@example.com").await;
        let blog = add_blog(&schema, &user).await;
        add_comment(&schema, &blog, &user).await;

        let body = data(
            execute(
                &schema,
                "mutation($id: ID!) { deleteBlog(id: $id) { id title } }",
                json!({ "id": blog }),
            )
            .await,
        );
        assert_eq!(body["deleteBlog"], json!({ "id": blog, "title": "T" }));

        let body = data(
            execute(
                &schema,
                "query($blog: ID!, $user: ID!) {
                    blog(id: $blog) { id }
                    user(id: $user) { blogs { id } comments { id } }
                    comments { id }
                }",
                json!({ "blog": blog, "user": user }),
            )
            .await,
        );
        assert_eq!(body["blog"], Value::Null);
        assert_eq!(body["user"]["blogs"], json!([]));
        assert_eq!(body["user"]["comments"], json!([]));
        assert_eq!(body["comments"], json!([]));
    }

    #[actix_rt::test]
    async fn test_add_then_delete_comment() {
        let schema = build_schema(Store::memory());
        let owner = signup(&schema, "owner@example.com").await;
        let reader = signup(&schema, "reader@example.com").await;
        let blog = add_blog(&schema, &owner).await;
        let comment = add_comment(&schema, &blog, &reader).await;

        let body = data(
            execute(
                &schema,
                "query($blog: ID!) { blog(id: $blog) { comments { id user { id } blog { id } } } }",
                json!({ "blog": blog }),
            )
            .await,
        );
        assert_eq!(
            body["blog"]["comments"],
            json!([{ "id": comment, "user": { "id": reader }, "blog": { "id": blog } }])
        );

        let body = data(
            execute(
                &schema,
                "mutation($id: ID!) { deleteComment(id: $id) { id text } }",
                json!({ "id": comment }),
            )
            .await,
        );
        assert_eq!(
            body["deleteComment"],
            json!({ "id": comment, "text": "Nice post" })
        );

        let body = data(
            execute(
                &schema,
                "query($blog: ID!, $user: ID!) {
                    blog(id: $blog) { comments { id } }
                    user(id: $user) { comments { id } }
                }",
                json!({ "blog": blog, "user": reader }),
            )
            .await,
        );
        assert_eq!(body["blog"]["comments"], json!([]));
        assert_eq!(body["user"]["comments"], json!([]));

        let again = execute(
            &schema,
            "mutation($id: ID!) { deleteComment(id: $id) { id } }",
            json!({ "id": comment }),
        )
        .await;
        assert_eq!(error_code(&again), json!("NOT_FOUND"));
    }

    #[actix_rt::test]
    async fn test_query_depth_is_limited() {
        let schema = build_schema(Store::memory());
        let mut selection = String::from("id");
        for _ in 0..10 {
            selection = format!("blogs {{ user {{ {} }} }}", selection);
        }

        let response = execute(&schema, &format!("{{ users {{ {} }} }}", selection), json!({})).await;

        assert!(!response.errors.is_empty());
    }
}
