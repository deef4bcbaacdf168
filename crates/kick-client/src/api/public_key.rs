use super::*;

impl KickClient {
    /// Fetch the PEM key the platform signs webhook deliveries with.
    pub async fn get_public_key(&self) -> Result<Response<PublicKey>, KickError> {
        self.get_data("/public/v1/public-key").await
    }
}
