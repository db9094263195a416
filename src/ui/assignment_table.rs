use crate::app::{now, ColorTarget, TrackerApp};
use crate::model::{Assignment, Grade, SortDirection, SortField, Status};
use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular as icons;
use uuid::Uuid;

/// Actions that the table can request.
enum TableAction {
    Sort(SortField),
    Select { id: Uuid, extend: bool },
    Edit(Uuid),
    Duplicate(Uuid),
    Copy(Uuid),
    Delete(Uuid),
    SetStatus(Uuid, Status),
    Recolor(ColorTarget),
}

/// Render the sortable assignment list.
pub fn show_assignment_table(app: &mut TrackerApp, ui: &mut Ui) {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Assignments")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let btn = egui::Button::new(
                RichText::new(format!("{}  Add Assignment", icons::PLUS))
                    .color(Color32::WHITE)
                    .size(12.0),
            )
            .fill(theme::ACCENT)
            .rounding(egui::Rounding::same(5.0));
            if ui.add(btn).clicked() {
                app.open_add_dialog();
            }
        });
    });
    ui.add_space(4.0);

    let now = now();
    let view = app.list.sorted_view(app.sort, now);
    if view.is_empty() {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            let text = if app.list.is_empty() {
                "No assignments yet. Add one or import a CSV file."
            } else {
                "No assignments match the current filter."
            };
            ui.label(RichText::new(text).color(theme::TEXT_DIM));
        });
        return;
    }

    let extend = ui.input(|i| i.modifiers.command || i.modifiers.shift);
    let table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(80.0))
        .column(Column::initial(180.0).at_least(100.0).clip(true))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::remainder().clip(true));

    table
        .header(theme::TABLE_ROW_HEIGHT, |mut header| {
            for field in SortField::ALL {
                header.col(|ui| {
                    let arrow = match app.sort {
                        Some(spec) if spec.field == field => match spec.direction {
                            SortDirection::Ascending => format!(" {}", icons::CARET_UP),
                            SortDirection::Descending => format!(" {}", icons::CARET_DOWN),
                        },
                        _ => String::new(),
                    };
                    let label = RichText::new(format!("{}{}", field.header(), arrow))
                        .font(theme::font_header())
                        .color(theme::TEXT_SECONDARY)
                        .strong();
                    if ui.add(egui::Button::new(label).frame(false)).clicked() {
                        action = Some(TableAction::Sort(field));
                    }
                });
            }
            header.col(|ui| {
                ui.label(
                    RichText::new("Notes")
                        .font(theme::font_header())
                        .color(theme::TEXT_SECONDARY)
                        .strong(),
                );
            });
        })
        .body(|body| {
            body.rows(theme::TABLE_ROW_HEIGHT, view.len(), |mut row| {
                let record: &Assignment = view[row.index()];
                row.set_selected(app.selection.contains(&record.id));

                row.col(|ui| {
                    color_chip(ui, &record.unit_code, record.unit_code_color);
                });
                row.col(|ui| {
                    ui.add(egui::Label::new(&record.task_name).truncate());
                    if record.reminder_date.is_some() {
                        ui.label(RichText::new(icons::BELL).size(10.0).color(theme::TEXT_DIM));
                    }
                });
                row.col(|ui| {
                    color_chip(ui, record.grade.label(), record.grade_color);
                });
                row.col(|ui| {
                    ui.label(record.start_date.format("%d/%m/%Y").to_string());
                });
                row.col(|ui| {
                    ui.label(record.due_date.format("%d/%m/%Y").to_string());
                });
                row.col(|ui| {
                    ui.label(record.days_until_start(now).to_string());
                });
                row.col(|ui| {
                    let days = record.days_until_due(now);
                    let color = if record.status == Status::Completed {
                        theme::TEXT_SECONDARY
                    } else if days < 0 {
                        theme::ERROR
                    } else if days <= app.settings.urgent_days {
                        theme::WARNING
                    } else {
                        theme::TEXT_PRIMARY
                    };
                    ui.label(RichText::new(days.to_string()).color(color));
                });
                row.col(|ui| {
                    let mut status = record.status;
                    egui::ComboBox::from_id_salt(("status", record.id))
                        .selected_text(status.label())
                        .width(96.0)
                        .show_ui(ui, |ui| {
                            for s in Status::ALL {
                                ui.selectable_value(&mut status, s, s.label());
                            }
                        });
                    if status != record.status {
                        action = Some(TableAction::SetStatus(record.id, status));
                    }
                });
                row.col(|ui| {
                    ui.add(
                        egui::Label::new(RichText::new(&record.notes).color(theme::TEXT_SECONDARY))
                            .truncate(),
                    );
                });

                let response = row.response();
                if response.double_clicked() {
                    action = Some(TableAction::Edit(record.id));
                } else if response.clicked() {
                    action = Some(TableAction::Select {
                        id: record.id,
                        extend,
                    });
                }
                response.context_menu(|ui| {
                    if let Some(a) = row_menu(ui, record) {
                        action = Some(a);
                    }
                });
            });
        });

    if let Some(action) = action {
        apply(app, action);
    }
}

fn row_menu(ui: &mut Ui, record: &Assignment) -> Option<TableAction> {
    let mut action = None;
    if ui.button(format!("{}  Edit", icons::PENCIL_SIMPLE)).clicked() {
        action = Some(TableAction::Edit(record.id));
    }
    if ui.button(format!("{}  Duplicate", icons::COPY_SIMPLE)).clicked() {
        action = Some(TableAction::Duplicate(record.id));
    }
    if ui.button(format!("{}  Copy", icons::COPY)).clicked() {
        action = Some(TableAction::Copy(record.id));
    }
    ui.menu_button("Status", |ui| {
        for status in Status::ALL {
            if ui.radio(record.status == status, status.label()).clicked() {
                action = Some(TableAction::SetStatus(record.id, status));
                ui.close_menu();
            }
        }
    });
    ui.separator();
    if ui.button(format!("Set colour for {}...", record.unit_code)).clicked() {
        action = Some(TableAction::Recolor(ColorTarget::Unit(record.unit_code.clone())));
    }
    if ui.button(format!("Set colour for {}...", record.grade)).clicked() {
        action = Some(TableAction::Recolor(ColorTarget::Grade(record.grade)));
    }
    ui.separator();
    if ui.button(format!("{}  Delete", icons::TRASH)).clicked() {
        action = Some(TableAction::Delete(record.id));
    }
    if action.is_some() {
        ui.close_menu();
    }
    action
}

fn apply(app: &mut TrackerApp, action: TableAction) {
    match action {
        TableAction::Sort(field) => app.sort_by(field),
        TableAction::Select { id, extend } => app.toggle_selection(id, extend),
        TableAction::Edit(id) => app.open_edit_dialog(id),
        TableAction::Duplicate(id) => app.duplicate(id),
        TableAction::Copy(id) => {
            app.selection = vec![id];
            app.copy_selected();
        }
        TableAction::Delete(id) => {
            app.selection = vec![id];
            app.delete_selected();
        }
        TableAction::SetStatus(id, status) => app.set_status(id, status),
        TableAction::Recolor(target) => app.begin_recolor(target),
    }
}

/// Text on a rounded background in `color`.
fn color_chip(ui: &mut Ui, text: &str, color: Color32) {
    egui::Frame::none()
        .fill(color)
        .rounding(egui::Rounding::same(3.0))
        .inner_margin(egui::Margin::symmetric(6.0, 1.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).size(12.0).color(theme::text_on(color)));
        });
}

/// Legend swatch for a grade, shared with the dashboard.
pub fn grade_chip(ui: &mut Ui, grade: Grade, color: Color32) {
    color_chip(ui, grade.label(), color);
}
