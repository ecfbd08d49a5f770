use chrono::Utc;
use log::{info, warn};

use crate::cache::{Mutation, QueryData, QueryKey};
use crate::error::ApiError;
use crate::models::{Post, PostsPage};
use crate::routes::Route;

use super::state::Notification;
use super::PostsApp;

pub enum AppMessage {
    PageLoaded {
        key: QueryKey,
        generation: u64,
        result: Result<PostsPage, ApiError>,
    },
    PostLoaded {
        id: u64,
        generation: u64,
        result: Result<Post, ApiError>,
    },
    PostCreated {
        session: u64,
        result: Result<Post, ApiError>,
    },
    PostUpdated {
        session: u64,
        id: u64,
        result: Result<Post, ApiError>,
    },
    PostDeleted {
        id: u64,
        result: Result<(), ApiError>,
    },
}

pub(super) fn process_messages(app: &mut PostsApp) {
    while let Ok(message) = app.rx.try_recv() {
        handle_message(app, message);
    }
}

pub(super) fn handle_message(app: &mut PostsApp, message: AppMessage) {
    app.in_flight = app.in_flight.saturating_sub(1);
    match message {
        AppMessage::PageLoaded {
            key,
            generation,
            result,
        } => {
            if let Err(err) = &result {
                warn!("loading {key:?} failed: {err}");
            }
            app.cache
                .complete(key, generation, result.map(QueryData::Page), Utc::now());
        }
        AppMessage::PostLoaded {
            id,
            generation,
            result,
        } => {
            if let Err(err) = &result {
                warn!("loading post {id} failed: {err}");
            }
            app.cache.complete(
                QueryKey::Post { id },
                generation,
                result.map(QueryData::Post),
                Utc::now(),
            );
            app.sync_edit_form();
        }
        AppMessage::PostCreated { session, result } => match result {
            Ok(post) => {
                info!("created post {}", post.id);
                app.cache.invalidate(&Mutation::Create);
                app.notify(Notification::success("Post created successfully"));
                if settle_form(app, session, true) {
                    app.navigate(Route::List);
                } else {
                    app.load_current();
                }
            }
            Err(err) => {
                app.notify(Notification::error(format!("Failed to create post: {err}")));
                settle_form(app, session, false);
            }
        },
        AppMessage::PostUpdated {
            session,
            id,
            result,
        } => match result {
            Ok(_) => {
                info!("updated post {id}");
                app.cache.invalidate(&Mutation::Update { id });
                app.notify(Notification::success("Post updated successfully"));
                if settle_form(app, session, true) {
                    app.navigate(Route::List);
                } else {
                    app.load_current();
                }
            }
            Err(err) => {
                app.notify(Notification::error(format!("Failed to update post: {err}")));
                settle_form(app, session, false);
            }
        },
        AppMessage::PostDeleted { id, result } => {
            app.deleting.remove(&id);
            match result {
                Ok(()) => {
                    info!("deleted post {id}");
                    app.cache.invalidate(&Mutation::Delete { id });
                    app.notify(Notification::success("Post deleted successfully"));
                    app.load_current();
                }
                Err(err) => {
                    app.notify(Notification::error(format!("Failed to delete post: {err}")));
                }
            }
        }
    }
}

/// Finishes the submit of the form that started it. Returns false when the
/// user has since left that form, so the result must not drive navigation.
fn settle_form(app: &mut PostsApp, session: u64, succeeded: bool) -> bool {
    let Some(form) = app
        .view
        .form_mut()
        .filter(|form| form.session() == session)
    else {
        return false;
    };
    if succeeded {
        form.submit_succeeded();
    } else {
        form.submit_failed();
    }
    true
}
