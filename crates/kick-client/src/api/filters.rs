//! Query-string builders for the list endpoints.

use std::collections::BTreeMap;

use crate::enums::LivestreamSort;

/// Multi-valued query parameters, encoded with keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    /// Replace every value of `key`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), vec![value.into()]);
    }

    /// Append a value to `key`.
    pub fn add(&mut self, key: &str, value: impl Into<String>) {
        self.0.entry(key.to_string()).or_default().push(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `""` when empty, otherwise `?` followed by the form-encoded pairs.
    pub fn to_query_string(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }

        let mut serializer = url::form_urlencoded::Serializer::new(String::from("?"));
        for (key, values) in &self.0 {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

macro_rules! query_filter {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            params: QueryParams,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn to_query_string(&self) -> String {
                self.params.to_query_string()
            }
        }
    };
}

query_filter! {
    /// Filter for GET `/public/v1/categories`.
    CategoryListFilter
}

impl CategoryListFilter {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.params.set("q", query);
        self
    }
}

query_filter! {
    /// Filter for GET `/public/v1/channels`.
    ChannelListFilter
}

impl ChannelListFilter {
    pub fn broadcaster_user_ids(mut self, ids: &[u64]) -> Self {
        for id in ids {
            self.params.add("broadcaster_user_id", id.to_string());
        }
        self
    }

    pub fn slugs<S: AsRef<str>>(mut self, slugs: &[S]) -> Self {
        for slug in slugs {
            self.params.add("slug", slug.as_ref());
        }
        self
    }
}

query_filter! {
    /// Filter for GET `/public/v1/livestreams`.
    LivestreamListFilter
}

impl LivestreamListFilter {
    pub fn broadcaster_user_id(mut self, id: u64) -> Self {
        self.params.add("broadcaster_user_id", id.to_string());
        self
    }

    pub fn category_id(mut self, id: u64) -> Self {
        self.params.set("category_id", id.to_string());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.params.set("language", language);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.params.set("limit", limit.to_string());
        self
    }

    pub fn sort(mut self, sort: LivestreamSort) -> Self {
        self.params.set("sort", sort.as_str());
        self
    }
}

query_filter! {
    /// Filter for GET `/public/v1/users`.
    UserListFilter
}

impl UserListFilter {
    pub fn id(mut self, id: u64) -> Self {
        self.params.set("id", id.to_string());
        self
    }

    pub fn ids(mut self, ids: &[u64]) -> Self {
        for id in ids {
            self.params.add("id", id.to_string());
        }
        self
    }
}

query_filter! {
    /// Subscription ids for DELETE `/public/v1/events/subscriptions`.
    SubscriptionToDeleteFilter
}

impl SubscriptionToDeleteFilter {
    pub fn ids<S: AsRef<str>>(mut self, ids: &[S]) -> Self {
        for id in ids {
            self.params.add("id", id.as_ref());
        }
        self
    }
}
