use crate::app::{ColorTarget, TrackerApp};
use crate::model::{Grade, SortField};
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};
use egui_phosphor::regular as icons;

/// Render the "Add / Edit Assignment" dialog.
pub fn show_assignment_dialog(app: &mut TrackerApp, ctx: &Context) {
    let unit_codes = app.list.unit_codes();
    let Some(draft) = app.draft.as_mut() else {
        return;
    };
    let title = if draft.editing.is_some() {
        "Edit Assignment"
    } else {
        "Add Assignment"
    };

    let mut submit = false;
    let mut cancel = false;
    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);

            egui::Grid::new("assignment_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Unit Code").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        ui.add_sized(
                            [180.0, 24.0],
                            egui::TextEdit::singleline(&mut draft.unit_code).hint_text("e.g. CS101"),
                        );
                        if !unit_codes.is_empty() {
                            ui.menu_button(icons::CARET_DOWN, |ui| {
                                for code in &unit_codes {
                                    if ui.button(code).clicked() {
                                        draft.unit_code = code.clone();
                                        ui.close_menu();
                                    }
                                }
                            });
                        }
                    });
                    ui.end_row();

                    ui.label(RichText::new("Task Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut draft.task_name).hint_text("Task name..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Task Grade").color(theme::TEXT_SECONDARY));
                    egui::ComboBox::from_id_salt("dlg_grade")
                        .selected_text(draft.grade.label())
                        .show_ui(ui, |ui| {
                            for grade in Grade::ALL {
                                ui.selectable_value(&mut draft.grade, grade, grade.label());
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new(SortField::StartDate.header()).color(theme::TEXT_SECONDARY));
                    ui.add(
                        egui_extras::DatePickerButton::new(&mut draft.start_date).id_salt("dlg_dp_start"),
                    );
                    ui.end_row();

                    ui.label(RichText::new(SortField::DueDate.header()).color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut draft.due_date).id_salt("dlg_dp_due"));
                    ui.end_row();

                    ui.label(RichText::new("Reminder").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        ui.checkbox(&mut draft.reminder_enabled, "");
                        ui.add_enabled(
                            draft.reminder_enabled,
                            egui_extras::DatePickerButton::new(&mut draft.reminder_date)
                                .id_salt("dlg_dp_reminder"),
                        );
                    });
                    ui.end_row();

                    ui.label(RichText::new("Notes").color(theme::TEXT_SECONDARY));
                    ui.add(
                        egui::TextEdit::multiline(&mut draft.notes)
                            .desired_rows(3)
                            .desired_width(220.0),
                    );
                    ui.end_row();
                });

            if draft.due_date < draft.start_date {
                ui.label(
                    RichText::new("Due date is before the start date")
                        .size(11.0)
                        .color(theme::WARNING),
                );
            }
            if let Some(error) = &draft.error {
                ui.label(RichText::new(error).color(theme::ERROR));
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let label = if draft.editing.is_some() { "Save" } else { "Create" };
                let ok_btn = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], ok_btn).clicked() {
                    submit = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    cancel = true;
                }
            });
            ui.add_space(2.0);
        });

    if cancel || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.draft = None;
    } else if submit {
        app.commit_draft();
    }
}

/// Render the unit / grade color picker.
pub fn show_color_dialog(app: &mut TrackerApp, ctx: &Context) {
    let Some((target, mut color)) = app.color_edit.clone() else {
        return;
    };
    let title = match &target {
        ColorTarget::Unit(code) => format!("Colour for {}", code),
        ColorTarget::Grade(grade) => format!("Colour for {}", grade),
    };

    let mut apply = false;
    let mut close = false;
    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::color_picker::color_picker_color32(
                ui,
                &mut color,
                egui::color_picker::Alpha::Opaque,
            );
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], egui::Button::new("Apply")).clicked() {
                    apply = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    close = true;
                }
            });
        });

    if apply {
        app.recolor(&target, color);
        app.color_edit = None;
    } else if close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.color_edit = None;
    } else {
        app.color_edit = Some((target, color));
    }
}

/// Render the queue of fired reminders.
pub fn show_reminders_window(app: &mut TrackerApp, ctx: &Context) {
    let mut open = true;
    let mut dismiss: Option<usize> = None;
    let mut dismiss_all = false;

    Window::new(RichText::new(format!("{}  Reminders", icons::BELL)).strong().size(14.0))
        .open(&mut open)
        .collapsible(false)
        .default_size([420.0, 260.0])
        .show(ctx, |ui| {
            if app.notifications.is_empty() {
                ui.label(RichText::new("No reminders.").color(theme::TEXT_DIM));
                return;
            }
            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                for (i, note) in app.notifications.iter().enumerate() {
                    ui.horizontal(|ui| {
                        if ui
                            .small_button(icons::X)
                            .on_hover_text("Dismiss")
                            .clicked()
                        {
                            dismiss = Some(i);
                        }
                        ui.vertical(|ui| {
                            ui.label(RichText::new(note.text()).color(theme::TEXT_PRIMARY));
                            ui.label(
                                RichText::new(note.fired_at.format("%d/%m/%Y %H:%M").to_string())
                                    .font(theme::font_small())
                                    .color(theme::TEXT_DIM),
                            );
                        });
                    });
                    ui.separator();
                }
            });
            if ui.button("Dismiss all").clicked() {
                dismiss_all = true;
            }
        });

    if let Some(i) = dismiss {
        app.notifications.remove(i);
    }
    if dismiss_all {
        app.notifications.clear();
    }
    if !open || dismiss_all {
        app.show_reminders = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TrackerApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Assignment Tracker").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Track assignments, due dates and reminders.");
                ui.label(
                    RichText::new(app.settings.data_file.display().to_string())
                        .font(theme::font_small())
                        .color(theme::TEXT_DIM),
                );
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
