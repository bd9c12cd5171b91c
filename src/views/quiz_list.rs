use crate::api::QuizApi;
use crate::models::quiz::{Quiz, QuizPayload};
use crate::notify::Notifier;
use crate::views::quiz_form::QuizForm;

/// The quiz management screen: the in-memory collection plus the editor
/// and delete-confirmation state around it.
///
/// Consistency model: every mutating operation ends with a full
/// `refresh()`, which replaces the whole list — there is no incremental
/// merge, so concurrent changes from elsewhere become visible on the next
/// refresh.
pub struct QuizListController<A, N> {
    api: A,
    notifier: N,
    pub form: QuizForm,
    quizzes: Vec<Quiz>,
    editing: Option<Quiz>,
    editor_open: bool,
    pending_delete: Option<Quiz>,
    loading: bool,
    alert: Option<String>,
}

impl<A: QuizApi, N: Notifier> QuizListController<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            form: QuizForm::new(),
            quizzes: Vec::new(),
            editing: None,
            editor_open: false,
            pending_delete: None,
            loading: false,
            alert: None,
        }
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    pub fn editing(&self) -> Option<&Quiz> {
        self.editing.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&Quiz> {
        self.pending_delete.as_ref()
    }

    /// Blocking form message, set by client-side validation.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|quiz| quiz.id == id)
    }

    /// Fetch the collection and replace the in-memory list wholesale.
    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.api.list_quizzes().await {
            Ok(response) if response.success => {
                self.quizzes = response.data.unwrap_or_default();
            }
            Ok(response) => {
                self.notifier.warning(
                    response
                        .message
                        .as_deref()
                        .unwrap_or("Failed to load quizzes"),
                );
            }
            Err(err) => self.notifier.error(&err.user_message()),
        }
        self.loading = false;
    }

    /// Open the editor on a fresh form.
    pub fn open_create(&mut self) {
        self.form.reset();
        self.editing = None;
        self.alert = None;
        self.editor_open = true;
    }

    /// Open the editor on an existing record. Returns false when the id is
    /// not in the current list.
    pub fn start_edit(&mut self, id: &str) -> bool {
        let Some(quiz) = self.find(id).cloned() else {
            return false;
        };
        self.form.load_for_edit(&quiz);
        self.editing = Some(quiz);
        self.alert = None;
        self.editor_open = true;
        true
    }

    pub fn close_editor(&mut self) {
        self.editor_open = false;
        self.editing = None;
        self.form.reset();
    }

    /// Validate and post the form, creating or updating depending on the
    /// editing context. Client-side validation failures set the alert and
    /// send nothing.
    pub async fn submit(&mut self) {
        if let Err(reason) = self.form.validate() {
            self.alert = Some(reason.to_string());
            return;
        }
        self.alert = None;

        let payload = self.form.build_payload(self.editing.as_ref());
        let result = if self.editing.is_some() {
            self.api.edit_quiz(&payload).await
        } else {
            self.api.add_quiz(&payload).await
        };

        match result {
            Ok(response) if response.success => {
                self.notifier.success(
                    response
                        .message
                        .as_deref()
                        .unwrap_or("Quiz saved successfully!"),
                );
                self.editor_open = false;
                self.editing = None;
                self.form.reset();
                self.refresh().await;
            }
            Ok(response) => {
                self.notifier
                    .warning(response.message.as_deref().unwrap_or("Failed to save quiz"));
            }
            Err(err) => self.notifier.error(&err.user_message()),
        }
    }

    /// Stage a record for deletion; nothing is sent until
    /// `confirm_delete()`. Returns false when the id is unknown.
    pub fn request_delete(&mut self, id: &str) -> bool {
        match self.find(id).cloned() {
            Some(quiz) => {
                self.pending_delete = Some(quiz);
                true
            }
            None => false,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Post the staged deletion. The confirmation context is cleared in
    /// every outcome where the call completed.
    pub async fn confirm_delete(&mut self) {
        let Some(target) = self.pending_delete.take() else {
            return;
        };

        match self.api.remove_quiz(&target.id).await {
            Ok(response) if response.success => {
                self.notifier.success(
                    response
                        .message
                        .as_deref()
                        .unwrap_or("Quiz removed successfully!"),
                );
                self.refresh().await;
            }
            Ok(response) => {
                self.notifier.warning(
                    response
                        .message
                        .as_deref()
                        .unwrap_or("Failed to delete quiz"),
                );
            }
            Err(err) => self.notifier.error(&err.user_message()),
        }
    }

    /// Flip a record's active flag by resubmitting the entire record —
    /// every hint and the answer exactly as stored — through the edit
    /// endpoint. The backing API expects the full shape, so this must not
    /// be optimized into a partial update.
    pub async fn toggle_active(&mut self, id: &str) {
        let Some(quiz) = self.find(id).cloned() else {
            self.notifier.error("Quiz not found");
            return;
        };
        let new_status = !quiz.is_active;

        let payload = QuizPayload {
            sel_id: Some(quiz.id.clone()),
            title: quiz.title.clone(),
            description: quiz.description.clone().unwrap_or_default(),
            is_active: new_status,
            questions: quiz.questions.clone(),
            answer: quiz.answer.clone(),
        };

        match self.api.edit_quiz(&payload).await {
            Ok(response) if response.success => {
                let verb = if new_status { "activated" } else { "deactivated" };
                self.notifier
                    .success(&format!("Quiz {verb} successfully!"));
                self.refresh().await;
            }
            Ok(response) => {
                self.notifier.warning(
                    response
                        .message
                        .as_deref()
                        .unwrap_or("Failed to update quiz status"),
                );
            }
            Err(err) => self.notifier.error(&err.user_message()),
        }
    }
}
