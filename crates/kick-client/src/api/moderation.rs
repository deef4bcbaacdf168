use super::*;

const BANS_PATH: &str = "/public/v1/moderation/bans";

#[derive(Serialize)]
struct BanBody<'a> {
    broadcaster_user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    user_id: u64,
}

impl KickClient {
    /// Ban a user from a channel. `duration` is in minutes; without it the
    /// ban is permanent.
    pub async fn ban_user(
        &self,
        broadcaster_user_id: u64,
        user_id: u64,
        duration: Option<u32>,
        reason: Option<&str>,
    ) -> Result<(), KickError> {
        let body = BanBody {
            broadcaster_user_id,
            duration,
            reason,
            user_id,
        };
        self.send_without_data(Method::POST, BANS_PATH, StatusCode::OK, &body)
            .await
    }

    /// Lift a ban or timeout.
    pub async fn unban_user(&self, broadcaster_user_id: u64, user_id: u64) -> Result<(), KickError> {
        let body = BanBody {
            broadcaster_user_id,
            duration: None,
            reason: None,
            user_id,
        };
        self.send_without_data(Method::DELETE, BANS_PATH, StatusCode::OK, &body)
            .await
    }
}
