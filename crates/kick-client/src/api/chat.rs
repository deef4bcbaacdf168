use super::*;
use crate::MessageType;

#[derive(Serialize)]
struct ChatMessageBody<'a> {
    broadcaster_user_id: u64,
    content: &'a str,
    #[serde(rename = "type")]
    message_type: MessageType,
}

impl KickClient {
    /// Post a chat message as the authenticated user or as the app's bot.
    pub async fn send_chat_message(
        &self,
        broadcaster_user_id: u64,
        content: &str,
        message_type: MessageType,
    ) -> Result<Response<ChatMessageSent>, KickError> {
        let body = ChatMessageBody {
            broadcaster_user_id,
            content,
            message_type,
        };
        self.dispatch_json(Method::POST, "/public/v1/chat", StatusCode::OK, &body)
            .await
    }
}
