use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use chrono::Utc;
use eframe::egui::{self, Context};
use log::{debug, error, info};

use crate::api::ApiClient;
use crate::cache::{QueryCache, QueryData, QueryKey};
use crate::config::FrontendConfig;
use crate::form::PostForm;
use crate::models::{CreatePostInput, UpdatePostInput};
use crate::routes::{Route, Router};
use crate::theme::{ThemeMode, ThemeStore};

mod messages;
mod state;
mod tasks;
mod ui;

pub use messages::AppMessage;
pub use state::{EditState, ListState, Notification, NotificationKind, PageAction, ViewState};

const REPAINT_WHILE_BUSY: Duration = Duration::from_millis(100);

pub struct PostsApp {
    api: ApiClient,
    config: FrontendConfig,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    cache: QueryCache<QueryData>,
    router: Router,
    view: ViewState,
    /// Posts with a delete request in flight.
    deleting: HashSet<u64>,
    /// Spawned tasks whose message has not been processed yet.
    in_flight: usize,
    theme: ThemeStore,
    applied_theme: Option<ThemeMode>,
    notification: Option<Notification>,
    base_url_input: String,
}

impl PostsApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        api: ApiClient,
        config: FrontendConfig,
        theme: ThemeStore,
    ) -> Self {
        let mut app = Self::with_parts(api, config, theme);
        app.apply_theme(&cc.egui_ctx);
        app
    }

    /// Builds the app without a window and starts loading the first page.
    pub fn with_parts(api: ApiClient, config: FrontendConfig, theme: ThemeStore) -> Self {
        let (tx, rx) = mpsc::channel();
        let router = Router::default();
        let mut app = Self {
            base_url_input: api.base_url().to_string(),
            api,
            cache: QueryCache::new(config.stale_time),
            config,
            tx,
            rx,
            view: ViewState::for_route(router.current()),
            router,
            deleting: HashSet::new(),
            in_flight: 0,
            theme,
            applied_theme: None,
            notification: None,
        };
        app.load_current();
        app
    }

    pub fn route(&self) -> Route {
        self.router.current()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn cache(&self) -> &QueryCache<QueryData> {
        &self.cache
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.mode()
    }

    pub fn is_deleting(&self, id: u64) -> bool {
        self.deleting.contains(&id)
    }

    pub fn navigate(&mut self, route: Route) {
        if self.router.navigate(route) {
            debug!("navigate to {route}");
            self.view = ViewState::for_route(route);
        }
        self.load_current();
    }

    pub fn back(&mut self) {
        let route = self.router.back();
        debug!("back to {route}");
        self.view = ViewState::for_route(route);
        self.load_current();
    }

    /// Issues the reads the current page depends on. Fresh or in-flight keys
    /// are left alone by the cache.
    pub fn load_current(&mut self) {
        match &self.view {
            ViewState::List(state) => {
                let page = state.page;
                self.request_page(page);
            }
            ViewState::Edit(state) => {
                let id = state.id;
                self.request_post(id);
                self.sync_edit_form();
            }
            ViewState::Detail(id) => {
                let id = *id;
                self.request_post(id);
            }
            ViewState::Create(_) => {}
        }
    }

    fn page_key(&self, page: u32) -> QueryKey {
        QueryKey::Posts {
            page,
            limit: self.config.page_size,
        }
    }

    fn request_page(&mut self, page: u32) {
        let key = self.page_key(page);
        if let Some(generation) = self.cache.begin_fetch(key, Utc::now()) {
            self.in_flight += 1;
            tasks::load_posts(
                self.api.clone(),
                self.tx.clone(),
                key,
                generation,
                page,
                self.config.page_size,
            );
        }
    }

    fn request_post(&mut self, id: u64) {
        let key = QueryKey::Post { id };
        if let Some(generation) = self.cache.begin_fetch(key, Utc::now()) {
            self.in_flight += 1;
            tasks::load_post(self.api.clone(), self.tx.clone(), id, generation);
        }
    }

    /// Mounts the edit form once its post is available.
    fn sync_edit_form(&mut self) {
        if let ViewState::Edit(state) = &mut self.view {
            if state.form.is_some() {
                return;
            }
            if let Some(post) = self
                .cache
                .value(&QueryKey::Post { id: state.id })
                .and_then(QueryData::as_post)
            {
                state.form = Some(PostForm::edit(post));
            }
        }
    }

    /// Retries the current page's reads, even ones that are still fresh.
    fn retry(&mut self) {
        let key = match &self.view {
            ViewState::List(state) => self.page_key(state.page),
            ViewState::Edit(state) => QueryKey::Post { id: state.id },
            ViewState::Detail(id) => QueryKey::Post { id: *id },
            ViewState::Create(_) => return,
        };
        if self.cache.is_fetching(&key) {
            return;
        }
        self.cache.invalidate_key(&key);
        self.load_current();
    }

    pub fn set_page(&mut self, page: u32) {
        if let ViewState::List(state) = &mut self.view {
            state.page = page.max(1);
            state.confirm_delete = None;
        }
        self.load_current();
    }

    pub fn submit(&mut self) {
        match &mut self.view {
            ViewState::Create(form) => match form.begin_submit() {
                Ok(data) => {
                    let session = form.session();
                    self.in_flight += 1;
                    tasks::create_post(
                        self.api.clone(),
                        self.tx.clone(),
                        session,
                        CreatePostInput::from_form(data),
                    );
                }
                Err(errors) => debug!("create form rejected: {errors:?}"),
            },
            ViewState::Edit(state) => {
                let Some(form) = state.form.as_mut() else {
                    return;
                };
                let Some(post) = self
                    .cache
                    .value(&QueryKey::Post { id: state.id })
                    .and_then(QueryData::as_post)
                    .cloned()
                else {
                    self.notification = Some(Notification::error("Failed to load post"));
                    return;
                };
                match form.begin_submit() {
                    Ok(data) => {
                        let session = form.session();
                        self.in_flight += 1;
                        tasks::update_post(
                            self.api.clone(),
                            self.tx.clone(),
                            session,
                            UpdatePostInput::from_form(&post, data),
                        );
                    }
                    Err(errors) => debug!("edit form rejected: {errors:?}"),
                }
            }
            ViewState::List(_) | ViewState::Detail(_) => {}
        }
    }

    pub fn ask_delete(&mut self, id: u64) {
        if let ViewState::List(state) = &mut self.view {
            state.confirm_delete = Some(id);
        }
    }

    pub fn cancel_delete(&mut self) {
        if let ViewState::List(state) = &mut self.view {
            state.confirm_delete = None;
        }
    }

    /// Sends the delete. Repeated deletes of one id are not merged; the
    /// server's answer to each is reported.
    pub fn delete_post(&mut self, id: u64) {
        if let ViewState::List(state) = &mut self.view {
            state.confirm_delete = None;
        }
        self.deleting.insert(id);
        self.in_flight += 1;
        tasks::delete_post(self.api.clone(), self.tx.clone(), id);
    }

    pub fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(mode) => info!("theme switched to {mode}"),
            Err(err) => {
                error!("failed to persist theme: {err}");
                self.notify(Notification::error(format!("Failed to save theme: {err}")));
            }
        }
    }

    pub fn apply_base_url(&mut self) {
        match self.api.set_base_url(self.base_url_input.clone()) {
            Ok(()) => {
                info!("API base URL set to {}", self.api.base_url());
                self.base_url_input = self.api.base_url().to_string();
                self.cache.clear();
                self.notify(Notification::success("API URL updated"));
                self.load_current();
            }
            Err(err) => {
                self.notify(Notification::error(format!("Failed to update URL: {err}")));
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    pub fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        messages::handle_message(self, message);
    }

    pub fn apply(&mut self, action: PageAction) {
        match action {
            PageAction::Navigate(route) => self.navigate(route),
            PageAction::Back => self.back(),
            PageAction::Retry => self.retry(),
            PageAction::SetPage(page) => self.set_page(page),
            PageAction::AskDelete(id) => self.ask_delete(id),
            PageAction::CancelDelete => self.cancel_delete(),
            PageAction::ConfirmDelete(id) => self.delete_post(id),
            PageAction::Submit => self.submit(),
        }
    }

    fn apply_theme(&mut self, ctx: &Context) {
        let mode = self.theme.mode();
        if self.applied_theme != Some(mode) {
            ctx.set_visuals(mode.visuals());
            self.applied_theme = Some(mode);
        }
    }
}

impl eframe::App for PostsApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();
        self.apply_theme(ctx);
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.expired(Instant::now()))
        {
            self.notification = None;
        }

        self.render_top_bar(ctx);

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            actions = self.render_page(ui);
        });
        for action in actions {
            self.apply(action);
        }

        if self.in_flight > 0 || self.notification.is_some() {
            ctx.request_repaint_after(REPAINT_WHILE_BUSY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::form::FormPhase;
    use crate::models::{Post, PostsPage};
    use crate::storage::ClientStorage;
    use crate::validation::PostField;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    // Nothing listens on the discard port, so background requests fail
    // quietly; tests feed results in through `handle_message`.
    fn test_app() -> (PostsApp, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = FrontendConfig {
            api_url: "http://127.0.0.1:9".into(),
            ..FrontendConfig::default()
        };
        let api = ApiClient::from_config(&config).unwrap();
        let theme = ThemeStore::load(ClientStorage::open(dir.path().join("storage.json")));
        (PostsApp::with_parts(api, config, theme), dir)
    }

    fn post(id: u64, title: &str) -> Post {
        Post {
            id,
            user_id: 1,
            title: title.into(),
            body: "Some body".into(),
        }
    }

    fn fill_create_form(app: &mut PostsApp) -> u64 {
        app.navigate(Route::Create);
        let form = app.view.form_mut().unwrap();
        form.set_value(PostField::Title, "Hello");
        form.set_value(PostField::Body, "World");
        form.session()
    }

    fn first_page_key(app: &PostsApp) -> QueryKey {
        app.page_key(1)
    }

    #[test]
    fn starts_on_list_and_requests_first_page() {
        let (app, _dir) = test_app();
        assert_eq!(app.route(), Route::List);
        assert!(app.cache().is_fetching(&first_page_key(&app)));
    }

    #[test]
    fn created_post_returns_to_list_and_refetches() {
        let (mut app, _dir) = test_app();
        let key = first_page_key(&app);
        let session = fill_create_form(&mut app);
        app.submit();
        assert_eq!(app.view().form().unwrap().phase(), FormPhase::Submitting);

        app.handle_message(AppMessage::PostCreated {
            session,
            result: Ok(post(101, "Hello")),
        });

        assert_eq!(app.route(), Route::List);
        let note = app.notification().unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(note.text, "Post created successfully");
        let entry = app.cache().entry(&key).unwrap();
        assert_eq!(entry.generation(), 1);
        assert!(entry.fetching);
    }

    #[test]
    fn result_for_abandoned_form_does_not_navigate() {
        let (mut app, _dir) = test_app();
        let session = fill_create_form(&mut app);
        app.submit();
        app.navigate(Route::Detail(3));

        app.handle_message(AppMessage::PostCreated {
            session,
            result: Ok(post(101, "Hello")),
        });

        assert_eq!(app.route(), Route::Detail(3));
        assert_eq!(
            app.notification().map(|n| n.kind),
            Some(NotificationKind::Success)
        );
    }

    #[test]
    fn failed_create_keeps_the_form_for_resubmission() {
        let (mut app, _dir) = test_app();
        let session = fill_create_form(&mut app);
        app.submit();

        app.handle_message(AppMessage::PostCreated {
            session,
            result: Err(ApiError::Network("connection refused".into())),
        });

        assert_eq!(app.route(), Route::Create);
        let form = app.view().form().unwrap();
        assert_eq!(form.phase(), FormPhase::Valid);
        assert_eq!(form.field(PostField::Title).value, "Hello");
        let note = app.notification().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
        assert!(note.text.starts_with("Failed to create post"));
    }

    #[test]
    fn edit_form_mounts_valid_and_updates() {
        let (mut app, _dir) = test_app();
        app.navigate(Route::Edit(7));
        assert!(app.view().form().is_none());

        let generation = app
            .cache()
            .entry(&QueryKey::Post { id: 7 })
            .unwrap()
            .generation();
        app.handle_message(AppMessage::PostLoaded {
            id: 7,
            generation,
            result: Ok(post(7, "Existing")),
        });

        let form = app.view().form().unwrap();
        assert_eq!(form.phase(), FormPhase::Valid);
        let session = form.session();

        app.submit();
        assert_eq!(app.view().form().unwrap().phase(), FormPhase::Submitting);

        app.handle_message(AppMessage::PostUpdated {
            session,
            id: 7,
            result: Ok(post(7, "Existing")),
        });
        assert_eq!(app.route(), Route::List);
        assert_eq!(
            app.notification().map(|n| n.text.as_str()),
            Some("Post updated successfully")
        );
        assert!(app
            .cache()
            .entry(&QueryKey::Post { id: 7 })
            .unwrap()
            .invalidated);
    }

    #[test]
    fn deleting_a_missing_post_reports_an_error() {
        let (mut app, _dir) = test_app();
        app.ask_delete(5);
        app.delete_post(5);
        assert!(app.is_deleting(5));

        app.handle_message(AppMessage::PostDeleted {
            id: 5,
            result: Err(ApiError::NotFound {
                resource: "post",
                id: 5,
            }),
        });

        assert!(!app.is_deleting(5));
        assert_eq!(app.route(), Route::List);
        let note = app.notification().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
        assert_eq!(note.text, "Failed to delete post: post 5 not found");
    }

    #[test]
    fn retry_refetches_a_failed_page() {
        let (mut app, _dir) = test_app();
        let key = first_page_key(&app);
        app.handle_message(AppMessage::PageLoaded {
            key,
            generation: 0,
            result: Err(ApiError::Network("down".into())),
        });
        assert!(!app.cache().is_fetching(&key));

        app.apply(PageAction::Retry);
        let entry = app.cache().entry(&key).unwrap();
        assert!(entry.fetching);
        assert_eq!(entry.generation(), 1);
    }

    #[test]
    fn page_from_previous_base_url_is_not_served_fresh() {
        let (mut app, _dir) = test_app();
        let key = first_page_key(&app);
        app.base_url_input = "http://127.0.0.1:10".into();
        app.apply_base_url();
        assert_eq!(app.api.base_url(), "http://127.0.0.1:10");
        assert!(app.cache().is_fetching(&key));

        app.handle_message(AppMessage::PageLoaded {
            key,
            generation: 0,
            result: Ok(PostsPage {
                posts: vec![post(1, "From the old server")],
                total: 1,
            }),
        });

        assert!(!app.cache().is_fresh(&key, Utc::now()));
        assert!(app.cache().is_fetching(&key));
    }

    #[test]
    fn theme_toggle_persists() {
        let (mut app, dir) = test_app();
        assert_eq!(app.theme_mode(), ThemeMode::Light);
        app.toggle_theme();
        assert_eq!(app.theme_mode(), ThemeMode::Dark);

        let reloaded = ThemeStore::load(ClientStorage::open(dir.path().join("storage.json")));
        assert_eq!(reloaded.mode(), ThemeMode::Dark);
    }
}
