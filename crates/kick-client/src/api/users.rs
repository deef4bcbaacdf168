use super::*;

impl KickClient {
    /// Look up users by id. An empty filter returns the authenticated user.
    pub async fn get_users(&self, filter: &UserListFilter) -> Result<Response<Vec<User>>, KickError> {
        self.get_data(&format!("/public/v1/users{}", filter.to_query_string()))
            .await
    }

    /// Inspect the bearer token currently in use.
    pub async fn token_introspect(&self) -> Result<Response<TokenIntrospection>, KickError> {
        self.dispatch(Method::POST, "/public/v1/token/introspect", StatusCode::OK, None)
            .await
    }
}
