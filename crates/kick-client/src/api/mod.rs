//! Kick public REST endpoints.
//!
//! Thin typed wrappers over [`KickClient::dispatch`]: each one supplies the
//! method, path, expected status and body, and names the payload type.

mod categories;
mod channels;
mod chat;
mod events;
mod livestreams;
mod moderation;
mod public_key;
mod users;


pub mod filters;
pub mod models;

pub use filters::{
    CategoryListFilter, ChannelListFilter, LivestreamListFilter, QueryParams,
    SubscriptionToDeleteFilter, UserListFilter,
};
pub use models::{
    Category, Channel, ChannelReward, ChannelStream, ChatMessageSent, CreatedSubscription,
    EventSubscription, Livestream, LivestreamCategory, PublicKey, SubscriptionRequest,
    TokenIntrospection, User,
};

use reqwest::{Method, StatusCode};
use serde::Serialize;

use crate::{EmptyResponse, KickClient, KickError, Response};

impl KickClient {
    /// Bodiless request expecting `200 OK`.
    async fn get_data<T>(&self, path: &str) -> Result<Response<T>, KickError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        self.dispatch(Method::GET, path, StatusCode::OK, None).await
    }

    /// JSON request whose response payload is ignored.
    async fn send_without_data<B>(
        &self,
        method: Method,
        path: &str,
        expected: StatusCode,
        body: &B,
    ) -> Result<(), KickError>
    where
        B: Serialize + ?Sized,
    {
        let _: Response<EmptyResponse> = self.dispatch_json(method, path, expected, body).await?;
        Ok(())
    }
}
