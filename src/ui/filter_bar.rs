use crate::app::TrackerApp;
use crate::model::{FilterCriteria, Status};
use crate::ui::theme;
use egui::{RichText, Ui};
use egui_phosphor::regular as icons;

/// Id of the search field, so shortcuts can stand aside while it has focus.
pub fn search_id() -> egui::Id {
    egui::Id::new("filter_search")
}

/// Search box plus status and unit-code filters above the list.
pub fn show_filter_bar(app: &mut TrackerApp, ui: &mut Ui) {
    let mut criteria: FilterCriteria = app.list.criteria().clone();
    let unit_codes = app.list.unit_codes();

    ui.horizontal(|ui| {
        ui.label(RichText::new(icons::MAGNIFYING_GLASS).color(theme::TEXT_DIM));
        ui.add(
            egui::TextEdit::singleline(&mut criteria.search)
                .id(search_id())
                .hint_text("Search task or unit...")
                .desired_width(220.0),
        );

        ui.add_space(8.0);
        ui.label(RichText::new("Status").color(theme::TEXT_SECONDARY));
        egui::ComboBox::from_id_salt("filter_status")
            .selected_text(criteria.status.map_or("All", Status::label))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut criteria.status, None, "All");
                for status in Status::ALL {
                    ui.selectable_value(&mut criteria.status, Some(status), status.label());
                }
            });

        ui.add_space(8.0);
        ui.label(RichText::new("Unit").color(theme::TEXT_SECONDARY));
        egui::ComboBox::from_id_salt("filter_unit")
            .selected_text(criteria.unit_code.as_deref().unwrap_or("All"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut criteria.unit_code, None, "All");
                for code in &unit_codes {
                    ui.selectable_value(&mut criteria.unit_code, Some(code.clone()), code);
                }
            });

        if !criteria.is_empty() {
            ui.add_space(8.0);
            if ui
                .button(format!("{} Clear", icons::X))
                .on_hover_text("Show every assignment")
                .clicked()
            {
                criteria = FilterCriteria::default();
            }
        }
    });

    app.list.set_criteria(criteria);
}
