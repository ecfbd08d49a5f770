use std::collections::HashSet;

use eframe::egui::{self, Align2, RichText};

use crate::cache::{QueryCache, QueryData, QueryKey};
use crate::models::Post;
use crate::pages::{self, PageState};
use crate::routes::Route;

use super::super::state::{ListState, PageAction};
use super::error_panel;

const PREVIEW_CHARS: usize = 160;

pub(super) fn render_list(
    ui: &mut egui::Ui,
    cache: &QueryCache<QueryData>,
    state: &ListState,
    page_size: u32,
    deleting: &HashSet<u64>,
    actions: &mut Vec<PageAction>,
) {
    ui.horizontal(|ui| {
        ui.heading("Posts");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Create Post").clicked() {
                actions.push(PageAction::Navigate(Route::Create));
            }
        });
    });
    ui.add_space(8.0);

    let key = QueryKey::Posts {
        page: state.page,
        limit: page_size,
    };
    match pages::list_state(cache, &key) {
        PageState::Loading => {
            ui.add(egui::Spinner::new());
        }
        PageState::Error {
            message,
            description,
        } => error_panel(ui, &message, &description, actions),
        PageState::Empty => {
            ui.label("No posts yet.");
            if ui.button("Create Post").clicked() {
                actions.push(PageAction::Navigate(Route::Create));
            }
            if state.page > 1 {
                pagination(ui, state.page, 0, page_size, actions);
            }
        }
        PageState::Ready(page) => {
            if cache.is_fetching(&key) {
                ui.add(egui::Spinner::new());
            }
            egui::ScrollArea::vertical()
                .max_height((ui.available_height() - 40.0).max(120.0))
                .show(ui, |ui| {
                    for post in &page.posts {
                        post_card(ui, post, deleting.contains(&post.id), actions);
                    }
                });
            pagination(ui, state.page, page.total, page_size, actions);
        }
    }

    if let Some(id) = state.confirm_delete {
        confirm_delete_dialog(ui.ctx(), id, actions);
    }
}

fn post_card(ui: &mut egui::Ui, post: &Post, deleting: bool, actions: &mut Vec<PageAction>) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                if ui
                    .link(RichText::new(&post.title).strong())
                    .clicked()
                {
                    actions.push(PageAction::Navigate(Route::Detail(post.id)));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if deleting {
                        ui.add(egui::Spinner::new());
                        ui.label("Deleting…");
                    } else {
                        if ui.button("Delete").clicked() {
                            actions.push(PageAction::AskDelete(post.id));
                        }
                        if ui.button("Edit").clicked() {
                            actions.push(PageAction::Navigate(Route::Edit(post.id)));
                        }
                    }
                    ui.label(RichText::new(format!("#{}", post.id)).monospace().size(10.0));
                });
            });
            ui.label(preview(&post.body));
        });
    ui.add_space(4.0);
}

fn preview(body: &str) -> String {
    if body.chars().count() <= PREVIEW_CHARS {
        return body.to_string();
    }
    let mut text: String = body.chars().take(PREVIEW_CHARS).collect();
    text.push('…');
    text
}

fn pagination(
    ui: &mut egui::Ui,
    page: u32,
    total: u64,
    page_size: u32,
    actions: &mut Vec<PageAction>,
) {
    let last = pages::page_count(total, page_size).max(page);
    ui.horizontal(|ui| {
        if ui.add_enabled(page > 1, egui::Button::new("‹ Prev")).clicked() {
            actions.push(PageAction::SetPage(page - 1));
        }
        ui.label(format!("Page {page} of {last}"));
        if ui
            .add_enabled(page < last, egui::Button::new("Next ›"))
            .clicked()
        {
            actions.push(PageAction::SetPage(page + 1));
        }
        ui.label(format!("{total} posts"));
    });
}

fn confirm_delete_dialog(ctx: &egui::Context, id: u64, actions: &mut Vec<PageAction>) {
    egui::Window::new("Delete Post")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label("Are you sure you want to delete this post?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    actions.push(PageAction::ConfirmDelete(id));
                }
                if ui.button("No").clicked() {
                    actions.push(PageAction::CancelDelete);
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_bodies() {
        let body = "x".repeat(PREVIEW_CHARS + 5);
        let text = preview(&body);
        assert_eq!(text.chars().count(), PREVIEW_CHARS + 1);
        assert!(text.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }
}
