use super::*;

impl KickClient {
    pub async fn get_livestreams(
        &self,
        filter: &LivestreamListFilter,
    ) -> Result<Response<Vec<Livestream>>, KickError> {
        self.get_data(&format!("/public/v1/livestreams{}", filter.to_query_string()))
            .await
    }
}
