use super::*;
use crate::SubscriptionMethod;

const SUBSCRIPTIONS_PATH: &str = "/public/v1/events/subscriptions";

#[derive(Serialize)]
struct CreateSubscriptionsBody<'a> {
    method: SubscriptionMethod,
    events: &'a [SubscriptionRequest],
    #[serde(skip_serializing_if = "Option::is_none")]
    broadcaster_user_id: Option<u64>,
}

impl KickClient {
    pub async fn get_subscriptions(&self) -> Result<Response<Vec<EventSubscription>>, KickError> {
        self.get_data(SUBSCRIPTIONS_PATH).await
    }

    /// Subscribe to webhook events. The response reports each event
    /// separately; a per-event failure shows up in its `error` field.
    pub async fn create_subscriptions(
        &self,
        method: SubscriptionMethod,
        events: &[SubscriptionRequest],
        broadcaster_user_id: Option<u64>,
    ) -> Result<Response<Vec<CreatedSubscription>>, KickError> {
        let body = CreateSubscriptionsBody {
            method,
            events,
            broadcaster_user_id,
        };
        self.dispatch_json(Method::POST, SUBSCRIPTIONS_PATH, StatusCode::OK, &body)
            .await
    }

    pub async fn delete_subscriptions(
        &self,
        filter: &SubscriptionToDeleteFilter,
    ) -> Result<(), KickError> {
        let path = format!("{SUBSCRIPTIONS_PATH}{}", filter.to_query_string());
        let _: Response<EmptyResponse> = self
            .dispatch(Method::DELETE, &path, StatusCode::NO_CONTENT, None)
            .await?;
        Ok(())
    }
}
