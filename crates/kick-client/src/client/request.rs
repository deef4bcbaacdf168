use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{KickClient, Response};
use crate::{ApiError, KickError};

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// REST error body: `{"message": .., "data": ..}`.
#[derive(Debug, Deserialize)]
struct RestErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
}

/// OAuth error body: `{"error": .., "error_description": .., "message": ..}`.
#[derive(Debug, Deserialize)]
struct AuthErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
struct SuccessEnvelope<T> {
    #[serde(default)]
    data: T,
}

/// A fully built request that can be sent more than once.
#[derive(Debug, Clone)]
pub(crate) struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub content_type: &'static str,
    pub body: Option<Vec<u8>>,
}

impl KickClient {
    /// Send one request against the REST host and decode the `data` envelope.
    ///
    /// `expected` is the status that counts as success. A 204 always yields
    /// `T::default()` without reading the body.
    pub async fn dispatch<T>(
        &self,
        method: Method,
        path: &str,
        expected: StatusCode,
        body: Option<Vec<u8>>,
    ) -> Result<Response<T>, KickError>
    where
        T: DeserializeOwned + Default,
    {
        let request = PreparedRequest {
            url: build_url(&self.api_base_url, path)?,
            method,
            content_type: JSON_CONTENT_TYPE,
            body,
        };

        tracing::debug!(method = %request.method, url = %request.url, "Dispatching Kick API request");
        let response = self.execute(&request).await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Response::default());
        }

        let bytes = read_body(response, status).await?;
        if status != expected {
            let envelope: RestErrorEnvelope = serde_json::from_slice(&bytes).map_err(|source| {
                KickError::ErrorEnvelopeUndecodable {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                    source,
                }
            })?;
            tracing::debug!(status = status.as_u16(), url = %request.url, "Kick API returned an error");
            return Err(ApiError::new(status.as_u16(), envelope.message.unwrap_or_default()).into());
        }

        let envelope: SuccessEnvelope<T> = serde_json::from_slice(&bytes).map_err(|source| {
            KickError::SuccessEnvelopeUndecodable {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
                source,
            }
        })?;

        Ok(Response {
            result: envelope.data,
        })
    }

    /// [`KickClient::dispatch`] with a JSON-serialized request body.
    pub async fn dispatch_json<B, T>(
        &self,
        method: Method,
        path: &str,
        expected: StatusCode,
        body: &B,
    ) -> Result<Response<T>, KickError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| KickError::RequestConstruction(format!("failed to marshal body: {e}")))?;
        self.dispatch(method, path, expected, Some(bytes)).await
    }

    /// POST a form to the identity host and decode the bare JSON body.
    ///
    /// Never attaches a bearer token and never triggers a refresh.
    pub(crate) async fn dispatch_auth<T>(
        &self,
        path: &str,
        expected: StatusCode,
        form: &[(&str, &str)],
    ) -> Result<T, KickError>
    where
        T: DeserializeOwned + Default,
    {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let request = PreparedRequest {
            url: build_url(&self.auth_base_url, path)?,
            method: Method::POST,
            content_type: FORM_CONTENT_TYPE,
            body: Some(encoded.into_bytes()),
        };

        tracing::debug!(url = %request.url, "Dispatching Kick OAuth request");
        let response = self.send_once(&request, None).await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(T::default());
        }

        let bytes = read_body(response, status).await?;
        if status != expected {
            let envelope: AuthErrorEnvelope = serde_json::from_slice(&bytes).map_err(|source| {
                KickError::ErrorEnvelopeUndecodable {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                    source,
                }
            })?;
            return Err(auth_error(status, envelope).into());
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }

        serde_json::from_slice(&bytes).map_err(|source| KickError::SuccessEnvelopeUndecodable {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
            source,
        })
    }

    /// Issue a single HTTP call with the given bearer token.
    pub(super) async fn send_once(
        &self,
        request: &PreparedRequest,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, KickError> {
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .header(CONTENT_TYPE, request.content_type);

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        builder.send().await.map_err(|e| {
            if e.is_builder() {
                KickError::RequestConstruction(e.to_string())
            } else {
                KickError::Transport(e)
            }
        })
    }
}

fn build_url(base: &str, path: &str) -> Result<Url, KickError> {
    Url::parse(&format!("{base}{path}"))
        .map_err(|e| KickError::RequestConstruction(format!("invalid URL {base}{path}: {e}")))
}

async fn read_body(response: reqwest::Response, status: StatusCode) -> Result<Vec<u8>, KickError> {
    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|source| KickError::ResponseBodyUnreadable {
            status: status.as_u16(),
            source,
        })
}

/// Prefer `message`; otherwise use `error` with `error_description` attached.
fn auth_error(status: StatusCode, envelope: AuthErrorEnvelope) -> ApiError {
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

    if let Some(message) = non_empty(envelope.message) {
        return ApiError::new(status.as_u16(), message);
    }

    let error = non_empty(envelope.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
    ApiError::new(status.as_u16(), error)
        .with_description(non_empty(envelope.error_description).unwrap_or_default())
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn envelope(json: &str) -> AuthErrorEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn auth_error_prefers_message() {
        let err = auth_error(
            StatusCode::BAD_REQUEST,
            envelope(r#"{"error":"invalid_grant","error_description":"expired","message":"Token expired"}"#),
        );
        assert_eq!(err.code(), 400);
        assert_eq!(err.message(), "Token expired");
        assert_eq!(err.description(), None);
    }

    #[test]
    fn auth_error_composes_error_and_description() {
        let err = auth_error(
            StatusCode::BAD_REQUEST,
            envelope(r#"{"error":"invalid_grant","error_description":"refresh token expired"}"#),
        );
        assert_eq!(err.message(), "invalid_grant");
        assert_eq!(err.description(), Some("refresh token expired"));
        assert_eq!(err.to_string(), "Error 400: invalid_grant (refresh token expired)");
    }

    #[test]
    fn auth_error_falls_back_to_status_reason() {
        let err = auth_error(StatusCode::UNAUTHORIZED, envelope(r#"{"error":null}"#));
        assert_eq!(err.message(), "Unauthorized");
    }

    #[test]
    fn build_url_concatenates_base_and_path() {
        let url = build_url("http://127.0.0.1:1234", "/public/v1/categories?q=mu").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:1234/public/v1/categories?q=mu");
        assert!(matches!(
            build_url("not a url", "/x"),
            Err(KickError::RequestConstruction(_))
        ));
    }
}
