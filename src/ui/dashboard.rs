use crate::app::{ColorTarget, TrackerApp};
use crate::model::timeline::grade_counts_for_week;
use crate::model::{FocusedWeek, TimelineLayout};
use crate::ui::assignment_table::grade_chip;
use crate::ui::theme;
use chrono::NaiveDate;
use egui::{Align2, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use egui_phosphor::regular as icons;

/// Render the dashboard tab: week selector, grade summary, legend and the
/// week-scaled timeline of the filtered assignments.
pub fn show_dashboard(app: &mut TrackerApp, ui: &mut Ui) {
    let today = app.today();
    show_week_selector(app, today, ui);
    ui.add_space(4.0);
    show_grade_summary(app, ui);
    ui.add_space(4.0);
    show_legend(app, ui);
    ui.add_space(6.0);
    ui.separator();

    let metrics = app.settings.timeline_metrics(ui.available_width());
    let layout = TimelineLayout::compute(app.list.filtered(), app.week, metrics);
    if layout.is_empty() {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Nothing to chart.").color(theme::TEXT_DIM));
        });
        return;
    }

    if let Some(date) = show_timeline(app, &layout, today, ui) {
        app.week = FocusedWeek::containing(date);
    }
}

fn show_week_selector(app: &mut TrackerApp, today: NaiveDate, ui: &mut Ui) {
    ui.horizontal(|ui| {
        if ui
            .button(icons::ARROW_LEFT)
            .on_hover_text("Previous week")
            .clicked()
        {
            app.week.previous();
        }

        let mut selected = app.week.start();
        egui::ComboBox::from_id_salt("week_selector")
            .selected_text(app.week.range_label())
            .width(200.0)
            .show_ui(ui, |ui| {
                for monday in FocusedWeek::options_around(today) {
                    let label = FocusedWeek::containing(monday).range_label();
                    ui.selectable_value(&mut selected, monday, label);
                }
            });
        if selected != app.week.start() {
            app.week = FocusedWeek::containing(selected);
        }

        if ui
            .button(icons::ARROW_RIGHT)
            .on_hover_text("Next week")
            .clicked()
        {
            app.week.next();
        }
        if ui.button("This week").clicked() {
            app.week = FocusedWeek::containing(today);
        }
    });
}

fn show_grade_summary(app: &TrackerApp, ui: &mut Ui) {
    let counts = grade_counts_for_week(app.list.filtered(), app.week);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Due this week:").color(theme::TEXT_SECONDARY));
        if counts.is_empty() {
            ui.label(RichText::new("None").color(theme::TEXT_DIM));
        }
        for (grade, n) in counts {
            grade_chip(ui, grade, app.colors.grade_color(grade));
            ui.label(format!("× {}", n));
            ui.add_space(6.0);
        }
    });
}

fn show_legend(app: &mut TrackerApp, ui: &mut Ui) {
    let mut recolor = None;
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new("Units:").color(theme::TEXT_SECONDARY));
        for (code, color) in app.colors.legend() {
            let (rect, response) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::click());
            ui.painter().rect_filled(rect, 2.0, *color);
            if response
                .on_hover_text("Click to change colour")
                .clicked()
            {
                recolor = Some(ColorTarget::Unit(code.clone()));
            }
            ui.label(RichText::new(code).size(11.0));
            ui.add_space(6.0);
        }
    });
    if let Some(target) = recolor {
        app.begin_recolor(target);
    }
}

/// Paint the timeline. Returns the date under a click on empty chart space.
fn show_timeline(
    app: &TrackerApp,
    layout: &TimelineLayout,
    today: NaiveDate,
    ui: &mut Ui,
) -> Option<NaiveDate> {
    let header = theme::CHART_HEADER_HEIGHT;
    let row_height = app.settings.row_height;
    let mut clicked_date = None;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let size = Vec2::new(layout.width, header + layout.height + 20.0);
            let (response, painter) = ui.allocate_painter(size, Sense::click());
            let origin = response.rect.min;
            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            // Focused week band
            if let Some(band) = layout.focus_band {
                painter.rect_filled(
                    Rect::from_min_size(
                        Pos2::new(origin.x + band.x, origin.y),
                        Vec2::new(band.width, size.y),
                    ),
                    0.0,
                    theme::WEEK_BAND,
                );
            }

            // Weekly gridlines with their Monday labels
            for line in &layout.gridlines {
                let x = origin.x + line.x;
                painter.line_segment(
                    [Pos2::new(x, origin.y + header), Pos2::new(x, origin.y + size.y)],
                    Stroke::new(1.0, theme::GRID_LINE),
                );
                painter.text(
                    Pos2::new(x + 3.0, origin.y + header * 0.5),
                    Align2::LEFT_CENTER,
                    &line.label,
                    theme::font_small(),
                    theme::TEXT_DIM,
                );
            }

            if let Some(x) = layout.date_to_x(today) {
                let x = origin.x + x;
                painter.line_segment(
                    [Pos2::new(x, origin.y + header), Pos2::new(x, origin.y + size.y)],
                    Stroke::new(1.5, theme::TODAY_LINE),
                );
            }

            let mut bar_hovered = false;
            for bar in &layout.bars {
                let rect = Rect::from_min_size(
                    Pos2::new(origin.x + bar.x, origin.y + header + bar.y),
                    Vec2::new(bar.width.max(2.0), row_height),
                );
                let color = app.colors.unit_color_or_fallback(&bar.unit_code);
                painter.rect_filled(rect, theme::BAR_ROUNDING, color);
                painter.text(
                    Pos2::new(rect.right() + 4.0, rect.center().y),
                    Align2::LEFT_CENTER,
                    &bar.task_name,
                    theme::font_small(),
                    theme::TEXT_SECONDARY,
                );

                let bar_response = ui.interact(
                    rect,
                    ui.make_persistent_id(("timeline-bar", bar.id)),
                    Sense::hover(),
                );
                if bar_response.hovered() {
                    bar_hovered = true;
                    painter.rect_stroke(rect, theme::BAR_ROUNDING, Stroke::new(1.0, theme::TEXT_PRIMARY));
                }
                bar_response.on_hover_ui(|ui| {
                    ui.strong(&bar.task_name);
                    ui.label(RichText::new(&bar.unit_code).color(theme::TEXT_SECONDARY));
                    ui.label(format!("Start: {}", bar.start.format("%d/%m/%Y")));
                    ui.label(format!("Due: {}", bar.due.format("%d/%m/%Y")));
                });
            }

            if response.clicked() && !bar_hovered {
                clicked_date = response
                    .interact_pointer_pos()
                    .and_then(|pos| layout.x_to_date(pos.x - origin.x));
            }
        });

    clicked_date
}
