use super::*;

const CHANNELS_PATH: &str = "/public/v1/channels";

#[derive(Serialize)]
struct StreamTitleUpdate<'a> {
    stream_title: &'a str,
}

#[derive(Serialize)]
struct StreamCategoryUpdate {
    category_id: u64,
}

#[derive(Serialize)]
struct CustomTagsUpdate<'a> {
    custom_tags: &'a [String],
}

impl KickClient {
    /// Look up channels by broadcaster id or slug. An empty filter returns
    /// the channel of the authenticated user.
    pub async fn get_channels(
        &self,
        filter: &ChannelListFilter,
    ) -> Result<Response<Vec<Channel>>, KickError> {
        self.get_data(&format!("{CHANNELS_PATH}{}", filter.to_query_string()))
            .await
    }

    pub async fn update_stream_title(&self, title: &str) -> Result<(), KickError> {
        self.update_channel(&StreamTitleUpdate {
            stream_title: title,
        })
        .await
    }

    pub async fn update_stream_category(&self, category_id: u64) -> Result<(), KickError> {
        self.update_channel(&StreamCategoryUpdate { category_id })
            .await
    }

    pub async fn update_custom_tags(&self, tags: &[String]) -> Result<(), KickError> {
        self.update_channel(&CustomTagsUpdate { custom_tags: tags })
            .await
    }

    pub async fn get_channel_rewards(&self) -> Result<Response<Vec<ChannelReward>>, KickError> {
        self.get_data(&format!("{CHANNELS_PATH}/rewards")).await
    }

    async fn update_channel(&self, body: &impl Serialize) -> Result<(), KickError> {
        self.send_without_data(Method::PATCH, CHANNELS_PATH, StatusCode::NO_CONTENT, body)
            .await
    }
}
