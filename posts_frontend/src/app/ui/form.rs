use eframe::egui::{self, Color32};

use crate::form::{FormMode, FormPhase, PostForm};
use crate::validation::PostField;

use super::super::state::PageAction;

pub(super) fn render_form(ui: &mut egui::Ui, form: &mut PostForm, actions: &mut Vec<PageAction>) {
    let locked = form.phase() == FormPhase::Submitting;
    for field in PostField::ALL {
        ui.label(field.label());
        let mut value = form.field(field).value.clone();
        let editor = match field {
            PostField::Title => egui::TextEdit::singleline(&mut value).hint_text("Enter post title"),
            PostField::Body => egui::TextEdit::multiline(&mut value)
                .desired_rows(8)
                .hint_text("Enter post content"),
        };
        let response = ui.add_enabled(!locked, editor.desired_width(f32::INFINITY));
        if response.changed() {
            form.set_value(field, value);
        }
        if response.lost_focus() {
            form.touch(field);
        }
        if let Some(err) = form.visible_error(field) {
            ui.colored_label(Color32::LIGHT_RED, err);
        }
        ui.add_space(8.0);
    }

    let label = match form.mode() {
        FormMode::Create => "Create",
        FormMode::Edit => "Update",
    };
    ui.horizontal(|ui| {
        if locked {
            ui.add(egui::Spinner::new());
        } else if ui
            .add_enabled(form.can_submit(), egui::Button::new(label))
            .clicked()
        {
            actions.push(PageAction::Submit);
        }
        if ui.add_enabled(!locked, egui::Button::new("Cancel")).clicked() {
            actions.push(PageAction::Back);
        }
    });
}
