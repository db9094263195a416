use crate::app::{Tab, TrackerApp};
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TrackerApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Add Assignment    Ctrl+N", icons::PLUS)).clicked() {
                app.open_add_dialog();
                ui.close_menu();
            }
            if ui.button(format!("{}  Import CSV...", icons::FILE_CSV)).clicked() {
                app.import_csv();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Save                Ctrl+S", icons::FLOPPY_DISK)).clicked() {
                app.save();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open Data Folder", icons::FOLDER_OPEN)).clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Edit  ").font(theme::font_menu()), |ui| {
            let has_selection = !app.selection.is_empty();
            if ui
                .add_enabled(has_selection, egui::Button::new("  Copy      Ctrl+C"))
                .clicked()
            {
                app.copy_selected();
                ui.close_menu();
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("  Cut        Ctrl+X"))
                .clicked()
            {
                app.cut_selected();
                ui.close_menu();
            }
            if ui
                .add_enabled(!app.clipboard.is_empty(), egui::Button::new("  Paste     Ctrl+V"))
                .clicked()
            {
                app.paste();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(has_selection, egui::Button::new("  Delete     Del"))
                .clicked()
            {
                app.delete_selected();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.radio_value(&mut app.tab, Tab::List, "Assignments").clicked() {
                ui.close_menu();
            }
            if ui.radio_value(&mut app.tab, Tab::Dashboard, "Dashboard").clicked() {
                ui.close_menu();
            }
            ui.separator();
            let label = format!("{}  Reminders ({})", icons::BELL, app.notifications.len());
            if ui.button(label).clicked() {
                app.show_reminders = true;
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.add_space(16.0);
        ui.selectable_value(&mut app.tab, Tab::List, format!("{} Assignments", icons::LIST_CHECKS));
        ui.selectable_value(&mut app.tab, Tab::Dashboard, format!("{} Dashboard", icons::CHART_BAR_HORIZONTAL));

        // Right-aligned data file and unsaved marker
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.is_dirty() { " (unsaved)" } else { "" };
            let name = app
                .settings
                .data_file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(RichText::new(format!("{}{}", name, modified)).size(11.0).weak());
        });
    });
}

/// Render the bottom status bar.
pub fn show_status_bar(app: &TrackerApp, ui: &mut Ui) {
    ui.horizontal_centered(|ui| {
        ui.label(
            RichText::new(&app.status_message)
                .size(11.0)
                .color(theme::TEXT_SECONDARY),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(format!(
                    "Showing {} of {}",
                    app.list.filtered_len(),
                    app.list.len()
                ))
                .size(10.5)
                .color(theme::TEXT_DIM),
            );
            if !app.selection.is_empty() {
                ui.label(RichText::new(" · ").size(10.5).color(theme::TEXT_DIM));
                ui.label(
                    RichText::new(format!("{} selected", app.selection.len()))
                        .size(10.5)
                        .color(theme::TEXT_DIM),
                );
            }
        });
    });
}
