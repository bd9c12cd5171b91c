use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::error::{ApiError, ErrorBody};
use crate::models::quiz::{Quiz, QuizPayload};
use crate::models::settings::{AppearanceSettings, LogoSize, SelectedFile, StoredSettings};

/// Admin endpoints of the remote quiz API.
mod endpoints {
    pub const GET_QUIZZES: &str = "/quiz/admin/get-quizzes";
    pub const ADD_QUIZ: &str = "/quiz/admin/add-quiz";
    pub const EDIT_QUIZ: &str = "/quiz/admin/edit-quiz";
    pub const REMOVE_QUIZ: &str = "/quiz/admin/remove-quiz";

    pub const GET_SETTINGS: &str = "/settings/admin/get-settings";
    pub const UPDATE_SETTINGS: &str = "/settings/admin/update-settings";
    pub const UPDATE_LOGO_SIZE: &str = "/settings/admin/update-logo-size";
    pub const UPLOAD_LOGO: &str = "/settings/admin/upload-logo";
    pub const GET_LOGO: &str = "/settings/admin/get-logo";
    pub const UPLOAD_BACKGROUND: &str = "/settings/admin/upload-background";
    pub const GET_BACKGROUND: &str = "/settings/admin/get-background";
}

/// Every response carries `success`; callers branch on it, never on the
/// HTTP status (non-2xx never reaches them — it becomes an `ApiError`).
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizListResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Quiz>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<StoredSettings>,
}

/// Logo responses put the stored path either at the top level or under
/// `data`; the top level wins when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct LogoResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    data: Option<LogoData>,
}

#[derive(Debug, Clone, Deserialize)]
struct LogoData {
    #[serde(default)]
    image: Option<String>,
}

impl LogoResponse {
    pub fn image_path(&self) -> Option<&str> {
        self.image
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.image.as_deref()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "backgroundImage")]
    pub background_image: Option<String>,
    #[serde(default)]
    data: Option<BackgroundData>,
}

#[derive(Debug, Clone, Deserialize)]
struct BackgroundData {
    #[serde(default, rename = "backgroundImage")]
    background_image: Option<String>,
}

impl BackgroundResponse {
    pub fn image_path(&self) -> Option<&str> {
        self.background_image
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.background_image.as_deref()))
    }
}

/// Quiz collection endpoints, as a seam so the list controller can be
/// exercised against a recording fake in tests.
#[async_trait]
pub trait QuizApi {
    async fn list_quizzes(&self) -> Result<QuizListResponse, ApiError>;
    async fn add_quiz(&self, payload: &QuizPayload) -> Result<StatusResponse, ApiError>;
    async fn edit_quiz(&self, payload: &QuizPayload) -> Result<StatusResponse, ApiError>;
    async fn remove_quiz(&self, id: &str) -> Result<StatusResponse, ApiError>;
}

/// Appearance, logo and background endpoints.
#[async_trait]
pub trait SettingsApi {
    async fn get_settings(&self) -> Result<SettingsResponse, ApiError>;
    async fn update_settings(
        &self,
        settings: &AppearanceSettings,
    ) -> Result<StatusResponse, ApiError>;
    async fn update_logo_size(&self, size: &LogoSize) -> Result<StatusResponse, ApiError>;
    async fn get_logo(&self) -> Result<LogoResponse, ApiError>;
    async fn upload_logo(&self, file: &SelectedFile) -> Result<LogoResponse, ApiError>;
    async fn get_background(&self) -> Result<BackgroundResponse, ApiError>;
    async fn upload_background(&self, file: &SelectedFile)
        -> Result<BackgroundResponse, ApiError>;
}

/// Typed client for the remote quiz API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        field_name: &'static str,
        file: &SelectedFile,
    ) -> Result<T, ApiError> {
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part(field_name, part);

        let response = self
            .http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Non-2xx responses become `ApiError::Server`, carrying the `msg`
    /// field of the error body when the server sent one.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.msg);
            return Err(ApiError::Server { status, message });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl QuizApi for ApiClient {
    async fn list_quizzes(&self) -> Result<QuizListResponse, ApiError> {
        self.get_json(endpoints::GET_QUIZZES).await
    }

    async fn add_quiz(&self, payload: &QuizPayload) -> Result<StatusResponse, ApiError> {
        self.post_json(endpoints::ADD_QUIZ, payload).await
    }

    async fn edit_quiz(&self, payload: &QuizPayload) -> Result<StatusResponse, ApiError> {
        self.post_json(endpoints::EDIT_QUIZ, payload).await
    }

    async fn remove_quiz(&self, id: &str) -> Result<StatusResponse, ApiError> {
        self.post_json(endpoints::REMOVE_QUIZ, &json!({ "selID": id }))
            .await
    }
}

#[async_trait]
impl SettingsApi for ApiClient {
    async fn get_settings(&self) -> Result<SettingsResponse, ApiError> {
        self.get_json(endpoints::GET_SETTINGS).await
    }

    async fn update_settings(
        &self,
        settings: &AppearanceSettings,
    ) -> Result<StatusResponse, ApiError> {
        self.post_json(endpoints::UPDATE_SETTINGS, settings).await
    }

    async fn update_logo_size(&self, size: &LogoSize) -> Result<StatusResponse, ApiError> {
        self.post_json(endpoints::UPDATE_LOGO_SIZE, size).await
    }

    async fn get_logo(&self) -> Result<LogoResponse, ApiError> {
        self.get_json(endpoints::GET_LOGO).await
    }

    async fn upload_logo(&self, file: &SelectedFile) -> Result<LogoResponse, ApiError> {
        self.post_multipart(endpoints::UPLOAD_LOGO, "logo", file)
            .await
    }

    async fn get_background(&self) -> Result<BackgroundResponse, ApiError> {
        self.get_json(endpoints::GET_BACKGROUND).await
    }

    async fn upload_background(
        &self,
        file: &SelectedFile,
    ) -> Result<BackgroundResponse, ApiError> {
        self.post_multipart(endpoints::UPLOAD_BACKGROUND, "background", file)
            .await
    }
}
