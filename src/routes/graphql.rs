use actix_web::{route, web::Data};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::app::AppState;

/// Pipe for running GraphQL queries and mutations
/// - url: `{domain}/graphql`
///
/// # HTTP request requirements
/// ## POST body
/// - json formatted string with a `query` key and optional `variables` and `operationName` keys
/// ## GET
/// - the same keys as query string parameters
///
/// # Example
/// ```
/// let data = "{ \"query\": \"{ blogs { id title } }\" }";
/// let request = actix_web::test::TestRequest::post()
///     .uri("localhost/graphql")
///     .insert_header(ContentType::json())
///     .set_payload(data)
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// - json formatted GraphQL result, failed operations are listed under `errors`
/// ```
/// {
///     "data": null,
///     "errors": [
///         {
///             "message": "Blog not found",
///             "locations": [{ "line": 1, "column": 12 }],
///             "path": ["deleteBlog"],
///             "extensions": { "code": "NOT_FOUND" }
///         }
///     ]
/// }
/// ```
/// ## Error
/// - Bad request (body is not a GraphQL request)
#[route("/graphql", method = "GET", method = "POST")]
pub async fn graphql(app_state: Data<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    app_state.schema.execute(req.into_inner()).await.into()
}
