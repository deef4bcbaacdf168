use super::*;

impl KickClient {
    /// Search categories by name.
    pub async fn get_categories(
        &self,
        filter: &CategoryListFilter,
    ) -> Result<Response<Vec<Category>>, KickError> {
        let path = format!("/public/v1/categories{}", filter.to_query_string());
        self.get_data(&path).await
    }

    pub async fn get_category(&self, category_id: u64) -> Result<Response<Category>, KickError> {
        self.get_data(&format!("/public/v1/categories/{category_id}"))
            .await
    }
}
