use crate::api::{BackgroundResponse, LogoResponse, SettingsApi, SettingsResponse};
use crate::error::ApiError;
use crate::models::settings::{
    is_hex_color, AppearanceSettings, LogoSize, SelectedFile, DEFAULT_LOGO_HEIGHT,
    DEFAULT_LOGO_WIDTH, MAX_UPLOAD_BYTES,
};
use crate::notify::Notifier;

/// The appearance settings screen: three logically separate resources
/// (settings record, logo image, background image) sharing one view.
/// Each resource loads and saves independently; a failure in one never
/// blocks or rolls back the others.
pub struct SettingsAggregator<A, N> {
    api: A,
    notifier: N,
    upload_base_url: String,

    pub settings: AppearanceSettings,
    pub logo_width: u32,
    pub logo_height: u32,
    current_logo: Option<String>,
    current_background: Option<String>,

    loading: bool,
    saving: bool,
    saving_logo_size: bool,
    uploading_logo: bool,
    uploading_background: bool,
    alert: Option<String>,
}

impl<A: SettingsApi, N: Notifier> SettingsAggregator<A, N> {
    pub fn new(api: A, notifier: N, upload_base_url: impl Into<String>) -> Self {
        Self {
            api,
            notifier,
            upload_base_url: upload_base_url.into(),
            settings: AppearanceSettings::default(),
            logo_width: DEFAULT_LOGO_WIDTH,
            logo_height: DEFAULT_LOGO_HEIGHT,
            current_logo: None,
            current_background: None,
            loading: false,
            saving: false,
            saving_logo_size: false,
            uploading_logo: false,
            uploading_background: false,
            alert: None,
        }
    }

    /// Display URL of the stored logo, if any.
    pub fn current_logo(&self) -> Option<&str> {
        self.current_logo.as_deref()
    }

    pub fn current_background(&self) -> Option<&str> {
        self.current_background.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Fetch settings, logo and background concurrently. Completion order
    /// is unspecified and failures are isolated per resource: a failed
    /// settings fetch falls back to the hardcoded defaults, missing images
    /// simply stay absent, and none of it is surfaced as an error toast.
    pub async fn load_all(&mut self) {
        self.loading = true;
        let (settings, logo, background) = tokio::join!(
            self.api.get_settings(),
            self.api.get_logo(),
            self.api.get_background(),
        );
        self.apply_settings(settings);
        self.apply_logo(logo);
        self.apply_background(background);
        self.loading = false;
    }

    fn apply_settings(&mut self, result: Result<SettingsResponse, ApiError>) {
        match result {
            Ok(response) => match (response.success, response.data) {
                (true, Some(stored)) => {
                    self.settings = stored.appearance;
                    self.logo_width = stored.logo_width.unwrap_or(DEFAULT_LOGO_WIDTH);
                    self.logo_height = stored.logo_height.unwrap_or(DEFAULT_LOGO_HEIGHT);
                }
                (_, _) => {
                    self.notifier.warning(
                        response
                            .message
                            .as_deref()
                            .unwrap_or("Failed to load settings"),
                    );
                }
            },
            Err(err) => {
                tracing::warn!("failed to load settings: {err}");
                self.settings = AppearanceSettings::default();
                self.logo_width = DEFAULT_LOGO_WIDTH;
                self.logo_height = DEFAULT_LOGO_HEIGHT;
            }
        }
    }

    fn apply_logo(&mut self, result: Result<LogoResponse, ApiError>) {
        match result {
            Ok(response) if response.success => {
                if let Some(path) = response.image_path() {
                    self.current_logo = Some(join_upload_url(&self.upload_base_url, path));
                }
            }
            Ok(_) => {}
            // the logo is optional; absence is a valid state
            Err(err) => tracing::warn!("failed to load logo: {err}"),
        }
    }

    fn apply_background(&mut self, result: Result<BackgroundResponse, ApiError>) {
        match result {
            Ok(response) if response.success => {
                if let Some(path) = response.image_path() {
                    self.current_background = Some(join_upload_url(&self.upload_base_url, path));
                }
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("failed to load background: {err}"),
        }
    }

    /// Validate and persist the color/font settings. Logo dimensions are
    /// not part of this payload; they travel through `save_logo_size`.
    pub async fn save_appearance(&mut self) {
        if !is_hex_color(&self.settings.background_color) {
            self.alert = Some("Please enter a valid background color (hex format)".into());
            return;
        }
        if !is_hex_color(&self.settings.text_color) {
            self.alert = Some("Please enter a valid text color (hex format)".into());
            return;
        }
        if self.settings.font_family.trim().is_empty() {
            self.alert = Some("Please select a font family".into());
            return;
        }

        self.saving = true;
        match self.api.update_settings(&self.settings).await {
            Ok(response) if response.success => {
                self.notifier.success("Settings updated successfully!");
                self.alert = None;
            }
            Ok(response) => {
                self.notifier.warning(
                    response
                        .message
                        .as_deref()
                        .unwrap_or("Failed to update settings"),
                );
            }
            Err(err) => {
                self.notifier
                    .error(&server_message_or(&err, "Failed to update settings. Please try again."));
            }
        }
        self.saving = false;
    }

    /// Persist the logo dimensions through their own endpoint. Either
    /// dimension at zero is rejected locally without a network call.
    pub async fn save_logo_size(&mut self, width: u32, height: u32) {
        self.logo_width = width;
        self.logo_height = height;

        if width == 0 || height == 0 {
            self.notifier
                .error("The Logo width or height should be bigger than 0");
            return;
        }

        self.saving_logo_size = true;
        let size = LogoSize {
            logo_width: width,
            logo_height: height,
        };
        match self.api.update_logo_size(&size).await {
            Ok(response) if response.success => {
                self.notifier.success("Logo size updated successfully!");
                self.alert = None;
            }
            Ok(response) => {
                self.notifier.warning(
                    response
                        .message
                        .as_deref()
                        .unwrap_or("Failed to update logo size"),
                );
            }
            Err(err) => {
                self.notifier.error(&server_message_or(
                    &err,
                    "Failed to update logo size. Please try again.",
                ));
            }
        }
        self.saving_logo_size = false;
    }

    /// Upload a replacement logo. MIME type and size are checked before
    /// anything goes on the wire; on success the returned path becomes the
    /// new preview URL.
    pub async fn upload_logo(&mut self, file: SelectedFile) {
        if !self.accept_image(&file) {
            return;
        }

        self.uploading_logo = true;
        match self.api.upload_logo(&file).await {
            Ok(response) if response.success => {
                self.notifier.success("Logo uploaded successfully!");
                self.alert = None;
                if let Some(path) = response.image_path() {
                    self.current_logo = Some(join_upload_url(&self.upload_base_url, path));
                }
            }
            Ok(response) => {
                self.notifier.warning(
                    response
                        .message
                        .as_deref()
                        .unwrap_or("Failed to upload logo"),
                );
            }
            Err(err) => {
                self.notifier
                    .error(&server_message_or(&err, "Failed to upload logo. Please try again."));
            }
        }
        self.uploading_logo = false;
    }

    /// Upload a replacement background image. Fully independent from the
    /// logo flow.
    pub async fn upload_background(&mut self, file: SelectedFile) {
        if !self.accept_image(&file) {
            return;
        }

        self.uploading_background = true;
        match self.api.upload_background(&file).await {
            Ok(response) if response.success => {
                self.notifier.success("Background image uploaded successfully!");
                self.alert = None;
                if let Some(path) = response.image_path() {
                    self.current_background = Some(join_upload_url(&self.upload_base_url, path));
                }
            }
            Ok(response) => {
                self.notifier.warning(
                    response
                        .message
                        .as_deref()
                        .unwrap_or("Failed to upload background image"),
                );
            }
            Err(err) => {
                self.notifier.error(&server_message_or(
                    &err,
                    "Failed to upload background image. Please try again.",
                ));
            }
        }
        self.uploading_background = false;
    }

    fn accept_image(&mut self, file: &SelectedFile) -> bool {
        if !file.is_image() {
            self.alert = Some("Please select a valid image file".into());
            return false;
        }
        if file.size() > MAX_UPLOAD_BYTES {
            self.alert = Some("Image size should be less than 5MB".into());
            return false;
        }
        true
    }
}

/// The API returns relative paths; displayable URLs are the configured
/// upload base plus the path.
fn join_upload_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn server_message_or(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Server {
            message: Some(msg), ..
        } => msg.clone(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bytes::Bytes;
    use reqwest::StatusCode;

    use super::*;
    use crate::api::StatusResponse;
    use crate::models::settings::StoredSettings;
    use crate::notify::{MemoryNotifier, Notice};

    #[derive(Clone, Default)]
    struct FakeSettingsApi {
        calls: Arc<Mutex<Vec<&'static str>>>,
        settings_responses: Arc<Mutex<VecDeque<Result<SettingsResponse, ApiError>>>>,
        logo_responses: Arc<Mutex<VecDeque<Result<LogoResponse, ApiError>>>>,
        background_responses: Arc<Mutex<VecDeque<Result<BackgroundResponse, ApiError>>>>,
        status_responses: Arc<Mutex<VecDeque<Result<StatusResponse, ApiError>>>>,
    }

    impl FakeSettingsApi {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn next_status(&self) -> Result<StatusResponse, ApiError> {
            self.status_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(StatusResponse {
                    success: true,
                    message: None,
                }))
        }
    }

    #[async_trait]
    impl SettingsApi for FakeSettingsApi {
        async fn get_settings(&self) -> Result<SettingsResponse, ApiError> {
            self.calls.lock().unwrap().push("get_settings");
            self.settings_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(SettingsResponse {
                    success: true,
                    message: None,
                    data: None,
                }))
        }

        async fn update_settings(
            &self,
            _settings: &AppearanceSettings,
        ) -> Result<StatusResponse, ApiError> {
            self.calls.lock().unwrap().push("update_settings");
            self.next_status()
        }

        async fn update_logo_size(&self, _size: &LogoSize) -> Result<StatusResponse, ApiError> {
            self.calls.lock().unwrap().push("update_logo_size");
            self.next_status()
        }

        async fn get_logo(&self) -> Result<LogoResponse, ApiError> {
            self.calls.lock().unwrap().push("get_logo");
            self.logo_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(serde_json::from_str(r#"{"success":true}"#).unwrap())
                })
        }

        async fn upload_logo(&self, _file: &SelectedFile) -> Result<LogoResponse, ApiError> {
            self.calls.lock().unwrap().push("upload_logo");
            self.logo_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(serde_json::from_str(r#"{"success":true,"image":"/uploads/logo.png"}"#)
                        .unwrap())
                })
        }

        async fn get_background(&self) -> Result<BackgroundResponse, ApiError> {
            self.calls.lock().unwrap().push("get_background");
            self.background_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(serde_json::from_str(r#"{"success":true}"#).unwrap())
                })
        }

        async fn upload_background(
            &self,
            _file: &SelectedFile,
        ) -> Result<BackgroundResponse, ApiError> {
            self.calls.lock().unwrap().push("upload_background");
            self.background_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(serde_json::from_str(
                        r#"{"success":true,"backgroundImage":"/uploads/bg.jpg"}"#,
                    )
                    .unwrap())
                })
        }
    }

    fn aggregator() -> (
        SettingsAggregator<FakeSettingsApi, MemoryNotifier>,
        FakeSettingsApi,
        MemoryNotifier,
    ) {
        let api = FakeSettingsApi::default();
        let notifier = MemoryNotifier::new();
        let aggregator =
            SettingsAggregator::new(api.clone(), notifier.clone(), "http://cdn.example.com/");
        (aggregator, api, notifier)
    }

    fn stored(background: &str, text: &str, width: Option<u32>) -> StoredSettings {
        StoredSettings {
            appearance: AppearanceSettings {
                background_color: background.into(),
                text_color: text.into(),
                font_family: "OpalOrbit, sans-serif".into(),
            },
            logo_width: width,
            logo_height: Some(90),
        }
    }

    fn image_file(len: usize) -> SelectedFile {
        SelectedFile {
            file_name: "picture.png".into(),
            content_type: "image/png".into(),
            data: Bytes::from(vec![0u8; len]),
        }
    }

    fn server_error() -> ApiError {
        ApiError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        }
    }

    #[tokio::test]
    async fn load_all_fetches_all_three_resources() {
        let (mut aggregator, api, _) = aggregator();
        aggregator.load_all().await;

        let mut calls = api.calls();
        calls.sort();
        assert_eq!(calls, vec!["get_background", "get_logo", "get_settings"]);
        assert!(!aggregator.is_loading());
    }

    #[tokio::test]
    async fn load_all_applies_stored_settings_and_sizes() {
        let (mut aggregator, api, notifier) = aggregator();
        api.settings_responses
            .lock()
            .unwrap()
            .push_back(Ok(SettingsResponse {
                success: true,
                message: None,
                data: Some(stored("#123abc", "#fff", Some(200))),
            }));
        api.logo_responses.lock().unwrap().push_back(Ok(
            serde_json::from_str(r#"{"success":true,"image":"/uploads/logo.png"}"#).unwrap(),
        ));

        aggregator.load_all().await;

        assert_eq!(aggregator.settings.background_color, "#123abc");
        assert_eq!(aggregator.logo_width, 200);
        assert_eq!(aggregator.logo_height, 90);
        assert_eq!(
            aggregator.current_logo(),
            Some("http://cdn.example.com/uploads/logo.png")
        );
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn background_failure_does_not_block_settings() {
        let (mut aggregator, api, notifier) = aggregator();
        api.settings_responses
            .lock()
            .unwrap()
            .push_back(Ok(SettingsResponse {
                success: true,
                message: None,
                data: Some(stored("#222222", "#eeeeee", None)),
            }));
        api.background_responses
            .lock()
            .unwrap()
            .push_back(Err(server_error()));

        aggregator.load_all().await;

        assert_eq!(aggregator.settings.background_color, "#222222");
        assert_eq!(aggregator.logo_width, DEFAULT_LOGO_WIDTH);
        assert!(aggregator.current_background().is_none());
        // image fetch failures are logged, never surfaced to the operator
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn settings_transport_failure_falls_back_to_defaults() {
        let (mut aggregator, api, notifier) = aggregator();
        aggregator.settings.background_color = "#999999".into();
        api.settings_responses
            .lock()
            .unwrap()
            .push_back(Err(server_error()));

        aggregator.load_all().await;

        assert_eq!(aggregator.settings, AppearanceSettings::default());
        assert_eq!(aggregator.logo_width, DEFAULT_LOGO_WIDTH);
        assert_eq!(aggregator.logo_height, DEFAULT_LOGO_HEIGHT);
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn settings_rejection_surfaces_a_warning() {
        let (mut aggregator, api, notifier) = aggregator();
        api.settings_responses
            .lock()
            .unwrap()
            .push_back(Ok(SettingsResponse {
                success: false,
                message: Some("no settings yet".into()),
                data: None,
            }));

        aggregator.load_all().await;

        assert_eq!(
            notifier.entries(),
            vec![Notice::Warning("no settings yet".into())]
        );
    }

    #[tokio::test]
    async fn invalid_background_color_blocks_the_save() {
        let (mut aggregator, api, notifier) = aggregator();
        aggregator.settings.background_color = "ffffff".into();

        aggregator.save_appearance().await;

        assert_eq!(
            aggregator.alert(),
            Some("Please enter a valid background color (hex format)")
        );
        assert!(api.calls().is_empty());
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn invalid_text_color_is_checked_after_background() {
        let (mut aggregator, api, _) = aggregator();
        aggregator.settings.text_color = "#ffff".into();

        aggregator.save_appearance().await;

        assert_eq!(
            aggregator.alert(),
            Some("Please enter a valid text color (hex format)")
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_font_family_blocks_the_save() {
        let (mut aggregator, api, _) = aggregator();
        aggregator.settings.font_family = "   ".into();

        aggregator.save_appearance().await;

        assert_eq!(aggregator.alert(), Some("Please select a font family"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_save_notifies_and_clears_the_alert() {
        let (mut aggregator, api, notifier) = aggregator();
        aggregator.settings.background_color = "#abc".into();
        aggregator.save_appearance().await;

        assert_eq!(api.calls(), vec!["update_settings"]);
        assert!(aggregator.alert().is_none());
        assert!(!aggregator.is_saving());
        assert_eq!(
            notifier.entries(),
            vec![Notice::Success("Settings updated successfully!".into())]
        );
    }

    #[tokio::test]
    async fn save_failure_prefers_server_message_over_fallback() {
        let (mut aggregator, api, notifier) = aggregator();
        api.status_responses
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Server {
                status: StatusCode::BAD_REQUEST,
                message: Some("unsupported font".into()),
            }));

        aggregator.save_appearance().await;

        assert_eq!(
            notifier.entries(),
            vec![Notice::Error("unsupported font".into())]
        );
    }

    #[tokio::test]
    async fn zero_logo_dimension_is_rejected_locally() {
        let (mut aggregator, api, notifier) = aggregator();

        aggregator.save_logo_size(0, 100).await;

        assert!(api.calls().is_empty());
        assert_eq!(
            notifier.entries(),
            vec![Notice::Error(
                "The Logo width or height should be bigger than 0".into()
            )]
        );
    }

    #[tokio::test]
    async fn logo_size_save_goes_through_its_own_endpoint() {
        let (mut aggregator, api, notifier) = aggregator();

        aggregator.save_logo_size(300, 120).await;

        assert_eq!(api.calls(), vec!["update_logo_size"]);
        assert_eq!(aggregator.logo_width, 300);
        assert_eq!(aggregator.logo_height, 120);
        assert_eq!(
            notifier.entries(),
            vec![Notice::Success("Logo size updated successfully!".into())]
        );
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_any_network_call() {
        let (mut aggregator, api, notifier) = aggregator();

        aggregator.upload_logo(image_file(6 * 1024 * 1024)).await;

        assert_eq!(aggregator.alert(), Some("Image size should be less than 5MB"));
        assert!(api.calls().is_empty());
        assert!(notifier.is_empty());
        assert!(aggregator.current_logo().is_none());
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected_before_any_network_call() {
        let (mut aggregator, api, _) = aggregator();
        let file = SelectedFile {
            file_name: "notes.txt".into(),
            content_type: "text/plain".into(),
            data: Bytes::from_static(b"not an image"),
        };

        aggregator.upload_background(file).await;

        assert_eq!(aggregator.alert(), Some("Please select a valid image file"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn upload_at_exactly_the_limit_is_accepted() {
        let (mut aggregator, api, _) = aggregator();

        aggregator.upload_logo(image_file(MAX_UPLOAD_BYTES)).await;

        assert_eq!(api.calls(), vec!["upload_logo"]);
    }

    #[tokio::test]
    async fn successful_logo_upload_updates_the_preview() {
        let (mut aggregator, api, notifier) = aggregator();

        aggregator.upload_logo(image_file(1024)).await;

        assert_eq!(api.calls(), vec!["upload_logo"]);
        assert_eq!(
            aggregator.current_logo(),
            Some("http://cdn.example.com/uploads/logo.png")
        );
        assert!(aggregator.current_background().is_none());
        assert_eq!(
            notifier.entries(),
            vec![Notice::Success("Logo uploaded successfully!".into())]
        );
    }

    #[tokio::test]
    async fn background_upload_never_touches_the_logo() {
        let (mut aggregator, api, _) = aggregator();
        aggregator.upload_logo(image_file(10)).await;
        let logo_before = aggregator.current_logo().map(str::to_string);

        aggregator.upload_background(image_file(10)).await;

        assert_eq!(aggregator.current_logo(), logo_before.as_deref());
        assert_eq!(
            aggregator.current_background(),
            Some("http://cdn.example.com/uploads/bg.jpg")
        );
        assert_eq!(api.calls(), vec!["upload_logo", "upload_background"]);
    }

    #[tokio::test]
    async fn rejected_upload_surfaces_the_server_message_as_warning() {
        let (mut aggregator, api, notifier) = aggregator();
        api.logo_responses.lock().unwrap().push_back(Ok(
            serde_json::from_str(r#"{"success":false,"message":"disk full"}"#).unwrap(),
        ));

        aggregator.upload_logo(image_file(10)).await;

        assert_eq!(notifier.entries(), vec![Notice::Warning("disk full".into())]);
        assert!(aggregator.current_logo().is_none());
    }

    #[test]
    fn upload_urls_join_without_double_slashes() {
        assert_eq!(
            join_upload_url("http://cdn.example.com/", "/uploads/a.png"),
            "http://cdn.example.com/uploads/a.png"
        );
        assert_eq!(
            join_upload_url("http://cdn.example.com", "uploads/a.png"),
            "http://cdn.example.com/uploads/a.png"
        );
    }
}
