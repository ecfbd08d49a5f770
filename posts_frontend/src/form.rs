//! Post form session: field values, touched flags, per-field errors and the
//! submit gate.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{Post, PostFormData};
use crate::validation::{self, FieldError, PostField};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Clean,
    Editing,
    Valid,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Default)]
pub struct FieldState {
    pub value: String,
    pub touched: bool,
    pub error: Option<String>,
}

impl FieldState {
    fn prefilled(value: String) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostForm {
    session: u64,
    mode: FormMode,
    title: FieldState,
    body: FieldState,
    submitting: bool,
    submitted: bool,
}

impl PostForm {
    pub fn create() -> Self {
        Self::with_values(FormMode::Create, FieldState::default(), FieldState::default())
    }

    /// Pre-fills from a loaded post and validates immediately so a valid post
    /// can be resubmitted without touching every field.
    pub fn edit(post: &Post) -> Self {
        let data = PostFormData::from(post);
        let mut form = Self::with_values(
            FormMode::Edit,
            FieldState::prefilled(data.title),
            FieldState::prefilled(data.body),
        );
        for field in PostField::ALL {
            form.revalidate(field);
        }
        form
    }

    fn with_values(mode: FormMode, title: FieldState, body: FieldState) -> Self {
        Self {
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            mode,
            title,
            body,
            submitting: false,
            submitted: false,
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn field(&self, field: PostField) -> &FieldState {
        match field {
            PostField::Title => &self.title,
            PostField::Body => &self.body,
        }
    }

    fn field_mut(&mut self, field: PostField) -> &mut FieldState {
        match field {
            PostField::Title => &mut self.title,
            PostField::Body => &mut self.body,
        }
    }

    /// Error to show next to a field. Create forms keep quiet about fields
    /// the user has not reached yet.
    pub fn visible_error(&self, field: PostField) -> Option<&str> {
        let state = self.field(field);
        if state.touched || self.mode == FormMode::Edit {
            state.error.as_deref()
        } else {
            None
        }
    }

    pub fn set_value(&mut self, field: PostField, value: impl Into<String>) {
        if self.is_locked() {
            return;
        }
        let state = self.field_mut(field);
        state.value = value.into();
        state.touched = true;
        self.revalidate(field);
    }

    pub fn touch(&mut self, field: PostField) {
        if self.is_locked() {
            return;
        }
        self.field_mut(field).touched = true;
        self.revalidate(field);
    }

    fn revalidate(&mut self, field: PostField) {
        let state = self.field_mut(field);
        state.error = validation::validate_field(field, &state.value)
            .err()
            .map(|err| err.message);
    }

    fn is_locked(&self) -> bool {
        self.submitting || self.submitted
    }

    pub fn phase(&self) -> FormPhase {
        if self.submitted {
            return FormPhase::Submitted;
        }
        if self.submitting {
            return FormPhase::Submitting;
        }
        let fields = [&self.title, &self.body];
        let no_errors = fields.iter().all(|state| state.error.is_none());
        let all_touched = fields.iter().all(|state| state.touched);
        let any_touched = fields.iter().any(|state| state.touched);
        let reached = match self.mode {
            FormMode::Create => all_touched,
            FormMode::Edit => true,
        };
        if no_errors && reached {
            FormPhase::Valid
        } else if any_touched {
            FormPhase::Editing
        } else {
            FormPhase::Clean
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase() == FormPhase::Valid
    }

    pub fn data(&self) -> PostFormData {
        PostFormData {
            title: self.title.value.clone(),
            body: self.body.value.clone(),
        }
    }

    /// Validates the whole form. On success the form is locked in
    /// `Submitting` and the trimmed values are returned for sending.
    pub fn begin_submit(&mut self) -> Result<PostFormData, Vec<FieldError>> {
        if self.is_locked() {
            return Err(Vec::new());
        }
        for field in PostField::ALL {
            self.field_mut(field).touched = true;
            self.revalidate(field);
        }
        let data = self.data();
        validation::validate(&data)?;
        self.submitting = true;
        Ok(PostFormData {
            title: data.title.trim().to_string(),
            body: data.body.trim().to_string(),
        })
    }

    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }

    pub fn submit_succeeded(&mut self) {
        self.submitting = false;
        self.submitted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post() -> Post {
        Post {
            id: 3,
            user_id: 1,
            title: "Existing".into(),
            body: "Existing body".into(),
        }
    }

    #[test]
    fn create_form_needs_every_field_touched() {
        let mut form = PostForm::create();
        assert_eq!(form.phase(), FormPhase::Clean);
        assert!(!form.can_submit());

        form.set_value(PostField::Title, "Hello");
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(!form.can_submit());

        form.set_value(PostField::Body, "World");
        assert_eq!(form.phase(), FormPhase::Valid);
        assert!(form.can_submit());
    }

    #[test]
    fn errors_show_once_touched() {
        let mut form = PostForm::create();
        assert_eq!(form.visible_error(PostField::Title), None);
        form.touch(PostField::Title);
        assert_eq!(form.visible_error(PostField::Title), Some("Title is required"));
        assert_eq!(form.phase(), FormPhase::Editing);

        form.set_value(PostField::Title, "x".repeat(201));
        assert_eq!(
            form.visible_error(PostField::Title),
            Some("Title must be at most 200 characters")
        );
    }

    #[test]
    fn edit_form_is_valid_on_mount() {
        let mut form = PostForm::edit(&post());
        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.phase(), FormPhase::Valid);

        let data = form.begin_submit().expect("pre-filled values are valid");
        assert_eq!(data.title, "Existing");
        assert_eq!(form.phase(), FormPhase::Submitting);
        assert!(!form.can_submit());
    }

    #[test]
    fn edit_form_with_invalid_prefill_is_not_submittable() {
        let mut invalid = post();
        invalid.body = "   ".into();
        let form = PostForm::edit(&invalid);
        assert_eq!(form.phase(), FormPhase::Clean);
        assert_eq!(form.visible_error(PostField::Body), Some("Content is required"));
    }

    #[test]
    fn submit_trims_and_locks_until_settled() {
        let mut form = PostForm::create();
        form.set_value(PostField::Title, "  Title  ");
        form.set_value(PostField::Body, " body ");
        let data = form.begin_submit().unwrap();
        assert_eq!(
            data,
            PostFormData {
                title: "Title".into(),
                body: "body".into()
            }
        );

        form.set_value(PostField::Title, "ignored while submitting");
        assert_eq!(form.field(PostField::Title).value, "  Title  ");

        form.submit_failed();
        assert_eq!(form.phase(), FormPhase::Valid);

        form.begin_submit().unwrap();
        form.submit_succeeded();
        assert_eq!(form.phase(), FormPhase::Submitted);
    }

    #[test]
    fn failed_submit_marks_everything_touched() {
        let mut form = PostForm::create();
        let errors = form.begin_submit().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.visible_error(PostField::Body), Some("Content is required"));
    }

    #[test]
    fn sessions_are_distinct() {
        assert_ne!(PostForm::create().session(), PostForm::create().session());
    }
}
