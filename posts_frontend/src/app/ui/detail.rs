use eframe::egui::{self, RichText};

use crate::cache::{QueryCache, QueryData};
use crate::pages::{self, PageState};
use crate::routes::Route;

use super::super::state::PageAction;
use super::error_panel;

pub(super) fn render_detail(
    ui: &mut egui::Ui,
    cache: &QueryCache<QueryData>,
    id: u64,
    actions: &mut Vec<PageAction>,
) {
    match pages::post_state(cache, id) {
        PageState::Loading | PageState::Empty => {
            ui.add(egui::Spinner::new());
        }
        PageState::Error {
            message,
            description,
        } => error_panel(ui, &message, &description, actions),
        PageState::Ready(post) => {
            ui.horizontal(|ui| {
                ui.heading(&post.title);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Edit").clicked() {
                        actions.push(PageAction::Navigate(Route::Edit(post.id)));
                    }
                });
            });
            ui.label(RichText::new(format!("Post #{} by user {}", post.id, post.user_id)).weak());
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(&post.body);
            });
        }
    }
}

/// Shown on the edit page until the post has loaded.
pub(super) fn render_post_placeholder(
    ui: &mut egui::Ui,
    cache: &QueryCache<QueryData>,
    id: u64,
    actions: &mut Vec<PageAction>,
) {
    match pages::post_state(cache, id) {
        PageState::Error {
            message,
            description,
        } => error_panel(ui, &message, &description, actions),
        _ => {
            ui.add(egui::Spinner::new());
        }
    }
}
