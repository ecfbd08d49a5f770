use eframe::egui;

use super::state::{PageAction, ViewState};
use super::PostsApp;

mod detail;
mod form;
mod layout;
mod list;

impl PostsApp {
    /// Draws the page for the current route and returns what the user asked
    /// for. Actions are applied after the frame so drawing never mutates the
    /// cache it reads from.
    pub(crate) fn render_page(&mut self, ui: &mut egui::Ui) -> Vec<PageAction> {
        let mut actions = Vec::new();
        let cache = &self.cache;
        let page_size = self.config.page_size;
        let deleting = &self.deleting;
        match &mut self.view {
            ViewState::List(state) => {
                list::render_list(ui, cache, state, page_size, deleting, &mut actions);
            }
            ViewState::Create(post_form) => {
                ui.heading("Create Post");
                ui.add_space(8.0);
                form::render_form(ui, post_form, &mut actions);
            }
            ViewState::Edit(state) => {
                ui.heading("Edit Post");
                ui.add_space(8.0);
                match state.form.as_mut() {
                    Some(post_form) => form::render_form(ui, post_form, &mut actions),
                    None => detail::render_post_placeholder(ui, cache, state.id, &mut actions),
                }
            }
            ViewState::Detail(id) => {
                detail::render_detail(ui, cache, *id, &mut actions);
            }
        }
        actions
    }
}

fn error_panel(ui: &mut egui::Ui, message: &str, description: &str, actions: &mut Vec<PageAction>) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            ui.colored_label(egui::Color32::LIGHT_RED, egui::RichText::new(message).strong());
            ui.label(description);
            if ui.button("Retry").clicked() {
                actions.push(PageAction::Retry);
            }
        });
}
