use std::time::{Duration, Instant};

use crate::form::PostForm;
use crate::routes::Route;

/// How long a notification stays in the banner.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

pub enum ViewState {
    List(ListState),
    Create(PostForm),
    Edit(EditState),
    Detail(u64),
}

impl ViewState {
    /// Fresh page state for a route; form sessions start here.
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::List => ViewState::List(ListState::default()),
            Route::Create => ViewState::Create(PostForm::create()),
            Route::Edit(id) => ViewState::Edit(EditState { id, form: None }),
            Route::Detail(id) => ViewState::Detail(id),
        }
    }

    pub fn form(&self) -> Option<&PostForm> {
        match self {
            ViewState::Create(form) => Some(form),
            ViewState::Edit(state) => state.form.as_ref(),
            ViewState::List(_) | ViewState::Detail(_) => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut PostForm> {
        match self {
            ViewState::Create(form) => Some(form),
            ViewState::Edit(state) => state.form.as_mut(),
            ViewState::List(_) | ViewState::Detail(_) => None,
        }
    }
}

pub struct ListState {
    pub page: u32,
    /// Post waiting for the user to confirm deletion.
    pub confirm_delete: Option<u64>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            page: 1,
            confirm_delete: None,
        }
    }
}

pub struct EditState {
    pub id: u64,
    /// Built once the post has loaded.
    pub form: Option<PostForm>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, text)
    }

    fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= NOTIFICATION_TTL
    }
}

/// User intents collected while drawing a frame and applied afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Navigate(Route),
    Back,
    Retry,
    SetPage(u32),
    AskDelete(u64),
    CancelDelete,
    ConfirmDelete(u64),
    Submit,
}
