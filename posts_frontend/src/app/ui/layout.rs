use eframe::egui::{self, Color32, Context};

use crate::routes::Route;

use super::super::state::{NotificationKind, PageAction};
use super::super::PostsApp;

impl PostsApp {
    pub(crate) fn render_top_bar(&mut self, ctx: &Context) {
        let mut action: Option<PageAction> = None;
        let mut toggle_theme = false;
        let mut apply_url = false;
        let route = self.router.current();
        let can_go_back = self.router.can_go_back();

        egui::TopBottomPanel::top("top_controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.selectable_label(route == Route::List, "Home").clicked() {
                    action = Some(PageAction::Navigate(Route::List));
                }
                if ui
                    .selectable_label(route == Route::Create, "Create Post")
                    .clicked()
                {
                    action = Some(PageAction::Navigate(Route::Create));
                }
                ui.separator();
                if can_go_back && ui.button("← Back").clicked() {
                    action = Some(PageAction::Back);
                }
                ui.label(route.title());
                ui.weak(route.path());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = format!("Theme: {}", self.theme.mode());
                    if ui.button(label).clicked() {
                        toggle_theme = true;
                    }
                    if ui.button("Apply").clicked() {
                        apply_url = true;
                    }
                    ui.add(
                        egui::TextEdit::singleline(&mut self.base_url_input).desired_width(260.0),
                    );
                    ui.label("API Base URL");
                });
            });

            if let Some(notification) = self.notification.clone() {
                let mut dismiss = false;
                let color = match notification.kind {
                    NotificationKind::Success => Color32::LIGHT_GREEN,
                    NotificationKind::Error => Color32::LIGHT_RED,
                };
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(color, notification.text.as_str());
                            if ui.button("Dismiss").clicked() {
                                dismiss = true;
                            }
                        });
                    });
                if dismiss {
                    self.notification = None;
                }
            }
        });

        if toggle_theme {
            self.toggle_theme();
        }
        if apply_url {
            self.apply_base_url();
        }
        if let Some(action) = action {
            self.apply(action);
        }
    }
}
