use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use egui::Color32;
use uuid::Uuid;

use crate::config::Settings;
use crate::model::reminder::due_soon;
use crate::model::{
    Assignment, AssignmentDraft, AssignmentList, ColorAssignments, FocusedWeek, Grade,
    Notification, ReminderEvaluator, SortField, SortSpec, Status,
};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    List,
    Dashboard,
}

/// What the color dialog is recoloring.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorTarget {
    Unit(String),
    Grade(Grade),
}

/// Main application state.
pub struct TrackerApp {
    pub list: AssignmentList,
    pub colors: ColorAssignments,
    pub settings: Settings,
    pub reminders: ReminderEvaluator,
    pub notifications: Vec<Notification>,

    pub tab: Tab,
    pub sort: Option<SortSpec>,
    pub week: FocusedWeek,
    pub selection: Vec<Uuid>,
    pub clipboard: Vec<Assignment>,

    // Dialog state
    pub draft: Option<AssignmentDraft>,
    pub color_edit: Option<(ColorTarget, Color32)>,
    pub show_about: bool,
    pub show_reminders: bool,

    // Status message
    pub status_message: String,

    saved_revision: u64,
    /// Revision whose save last failed; autosave waits for the next change.
    failed_revision: Option<u64>,
}

impl TrackerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let records = crate::io::file::load_or_empty(&settings.data_file);
        Self::with_records(records, settings)
    }

    /// State over already-loaded records, without touching the UI context.
    pub fn with_records(mut records: Vec<Assignment>, settings: Settings) -> Self {
        let colors = ColorAssignments::from_records(&records);
        colors.apply(&mut records);
        let list = AssignmentList::new(records);
        let now = now();

        let notifications = due_soon(
            list.records(),
            now,
            settings.urgent_days,
            settings.due_soon_days,
        );
        let status_message = format!("Loaded {} assignments", list.len());

        Self {
            saved_revision: list.revision(),
            failed_revision: None,
            list,
            colors,
            reminders: ReminderEvaluator::new(settings.reminder_config()),
            show_reminders: !notifications.is_empty(),
            notifications,
            settings,
            tab: Tab::List,
            sort: None,
            week: FocusedWeek::containing(now.date()),
            selection: Vec::new(),
            clipboard: Vec::new(),
            draft: None,
            color_edit: None,
            show_about: false,
            status_message,
        }
    }

    pub fn today(&self) -> NaiveDate {
        now().date()
    }

    // --- File operations ---

    pub fn save(&mut self) {
        match crate::io::file::save_assignments(self.list.records(), &self.settings.data_file) {
            Ok(()) => {
                self.saved_revision = self.list.revision();
                self.failed_revision = None;
                self.status_message = "Saved".to_string();
                tracing::debug!(path = %self.settings.data_file.display(), "saved assignments");
            }
            Err(e) => {
                tracing::error!(error = %e, "save failed");
                self.failed_revision = Some(self.list.revision());
                self.status_message = format!("Error saving: {}", e);
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.list.revision() != self.saved_revision
    }

    fn autosave(&mut self) {
        let retry = self.failed_revision != Some(self.list.revision());
        if self.settings.autosave && self.is_dirty() && retry {
            self.save();
        }
    }

    pub fn import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };
        match crate::io::csv_import::import_csv(&path) {
            Ok((records, skipped)) => {
                let count = records.len();
                for record in records {
                    self.add_record(record);
                }
                self.status_message = if skipped > 0 {
                    format!("Imported {} assignments ({} rows skipped)", count, skipped)
                } else {
                    format!("Imported {} assignments", count)
                };
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "csv import failed");
                self.status_message = format!("CSV import failed: {}", e);
            }
        }
    }

    pub fn open_data_folder(&mut self) {
        let dir = self
            .settings
            .data_file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(crate::config::data_dir);
        if let Err(e) = open::that(&dir) {
            self.status_message = format!("Could not open {}: {}", dir.display(), e);
        }
    }

    // --- Record operations ---

    /// Common add path for the dialog, paste and import: colors come from the
    /// color map, and a new unit code gets the default color.
    pub fn add_record(&mut self, mut record: Assignment) -> Uuid {
        if self.colors.ensure_unit(&record.unit_code) {
            tracing::debug!(unit = %record.unit_code, "new unit code");
        }
        record.unit_code_color = self.colors.unit_color_or_fallback(&record.unit_code);
        record.grade_color = self.colors.grade_color(record.grade);
        self.list.add(record)
    }

    pub fn open_add_dialog(&mut self) {
        self.draft = Some(AssignmentDraft::new(self.today()));
    }

    pub fn open_edit_dialog(&mut self, id: Uuid) {
        if let Some(record) = self.list.get(id) {
            self.draft = Some(AssignmentDraft::from_assignment(record));
        }
    }

    /// Validate and commit the open dialog. On failure the error stays in the
    /// dialog and nothing changes.
    pub fn commit_draft(&mut self) {
        let Some(mut draft) = self.draft.take() else {
            return;
        };
        if let Err(e) = draft.validate() {
            draft.error = Some(e.to_string());
            self.draft = Some(draft);
            return;
        }

        match draft.editing {
            Some(id) => {
                let unit_code = draft.unit_code.trim().to_string();
                self.colors.ensure_unit(&unit_code);
                let unit_color = self.colors.unit_color_or_fallback(&unit_code);
                let grade_color = self.colors.grade_color(draft.grade);
                let result = self.list.update(id, |record| {
                    draft.apply_to(record);
                    record.unit_code_color = unit_color;
                    record.grade_color = grade_color;
                });
                match result {
                    Ok(()) => self.status_message = "Assignment updated".to_string(),
                    Err(e) => self.status_message = e.to_string(),
                }
            }
            None => match draft.build() {
                Ok(record) => {
                    let id = self.add_record(record);
                    self.selection = vec![id];
                    self.status_message = "Assignment added".to_string();
                }
                Err(e) => {
                    draft.error = Some(e.to_string());
                    self.draft = Some(draft);
                }
            },
        }
    }

    pub fn set_status(&mut self, id: Uuid, status: Status) {
        if let Err(e) = self.list.update_status(id, status) {
            self.status_message = e.to_string();
        }
    }

    pub fn duplicate(&mut self, id: Uuid) {
        match self.list.duplicate(id) {
            Ok(copy) => {
                self.selection = vec![copy];
                self.status_message = "Assignment duplicated".to_string();
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn delete_selected(&mut self) {
        let mut removed = 0;
        for id in std::mem::take(&mut self.selection) {
            match self.list.remove(id) {
                Ok(_) => removed += 1,
                Err(e) => tracing::warn!(error = %e, "delete skipped"),
            }
        }
        if removed > 0 {
            self.status_message = format!("Deleted {} assignments", removed);
        }
    }

    /// Deep copies of the selected records, in collection order.
    pub fn copy_selected(&mut self) {
        self.clipboard = self
            .list
            .records()
            .iter()
            .filter(|a| self.selection.contains(&a.id))
            .cloned()
            .collect();
        if !self.clipboard.is_empty() {
            self.status_message = format!("Copied {} assignments", self.clipboard.len());
        }
    }

    pub fn cut_selected(&mut self) {
        self.copy_selected();
        self.delete_selected();
    }

    /// Insert fresh copies of everything on the clipboard, then empty it.
    pub fn paste(&mut self) {
        if self.clipboard.is_empty() {
            return;
        }
        let pasted: Vec<Uuid> = std::mem::take(&mut self.clipboard)
            .into_iter()
            .map(|a| self.add_record(a.duplicate()))
            .collect();
        self.status_message = format!("Pasted {} assignments", pasted.len());
        self.selection = pasted;
    }

    pub fn toggle_selection(&mut self, id: Uuid, extend: bool) {
        if extend {
            match self.selection.iter().position(|s| *s == id) {
                Some(pos) => {
                    self.selection.remove(pos);
                }
                None => self.selection.push(id),
            }
        } else {
            self.selection = vec![id];
        }
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.sort = Some(SortSpec::toggled(self.sort, field));
    }

    pub fn begin_recolor(&mut self, target: ColorTarget) {
        let current = match &target {
            ColorTarget::Unit(code) => self.colors.unit_color_or_fallback(code),
            ColorTarget::Grade(grade) => self.colors.grade_color(*grade),
        };
        self.color_edit = Some((target, current));
    }

    pub fn recolor(&mut self, target: &ColorTarget, color: Color32) {
        match target {
            ColorTarget::Unit(code) => self.colors.set_unit_color(code, color),
            ColorTarget::Grade(grade) => self.colors.set_grade_color(*grade, color),
        }
        self.list.apply_colors(&self.colors);
    }

    // --- Reminders ---

    fn run_reminders(&mut self, ctx: &egui::Context) {
        let tick = Instant::now();
        if self.reminders.poll(tick) {
            let snapshot = self.list.snapshot();
            let pass = self.reminders.evaluate(&snapshot, now());
            self.list.consume_reminders(&pass.consumed);
            if !pass.notifications.is_empty() {
                self.notifications.extend(pass.notifications);
                self.show_reminders = true;
            }
        }
        ctx.request_repaint_after(self.reminders.until_next(Instant::now()));
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Leave keys to the search field and dialogs while they are in use.
        let typing = ctx.memory(|m| m.focused() == Some(ui::filter_bar::search_id()));
        if typing || self.draft.is_some() || self.color_edit.is_some() {
            return;
        }

        let (copy, cut, paste) = ctx.input(|i| {
            let mut flags = (false, false, false);
            for event in &i.events {
                match event {
                    egui::Event::Copy => flags.0 = true,
                    egui::Event::Cut => flags.1 = true,
                    egui::Event::Paste(_) => flags.2 = true,
                    _ => {}
                }
            }
            // An empty system clipboard yields no Paste event.
            flags.2 |= i.modifiers.command && i.key_pressed(egui::Key::V);
            flags
        });
        let delete =
            ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace));
        let add = ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::N));
        let save = ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S));
        let switch_tab = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Tab));

        if copy {
            self.copy_selected();
            if !self.clipboard.is_empty() {
                ctx.copy_text(clipboard_text(&self.clipboard));
            }
        }
        if cut {
            let before = self.selection.len();
            self.cut_selected();
            if before > 0 {
                ctx.copy_text(clipboard_text(&self.clipboard));
            }
        }
        if paste {
            self.paste();
        }
        if delete {
            self.delete_selected();
        }
        if add {
            self.open_add_dialog();
        }
        if save {
            self.save();
        }
        if switch_tab {
            self.tab = match self.tab {
                Tab::List => Tab::Dashboard,
                Tab::Dashboard => Tab::List,
            };
        }
    }
}

/// Local wall-clock time.
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Tab-separated text of copied records for the system clipboard.
fn clipboard_text(records: &[Assignment]) -> String {
    records
        .iter()
        .map(|a| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                a.unit_code,
                a.task_name,
                a.grade,
                a.start_date.format("%d/%m/%Y"),
                a.due_date.format("%d/%m/%Y")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        self.run_reminders(ctx);

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui::toolbar::show_status_bar(self, ui);
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_DARK)
                    .inner_margin(egui::Margin::same(8.0)),
            )
            .show(ctx, |ui| match self.tab {
                Tab::List => {
                    ui::filter_bar::show_filter_bar(self, ui);
                    ui.add_space(4.0);
                    ui::assignment_table::show_assignment_table(self, ui);
                }
                Tab::Dashboard => ui::dashboard::show_dashboard(self, ui),
            });

        // Dialogs
        if self.draft.is_some() {
            ui::dialogs::show_assignment_dialog(self, ctx);
        }
        if self.color_edit.is_some() {
            ui::dialogs::show_color_dialog(self, ctx);
        }
        if self.show_reminders {
            ui::dialogs::show_reminders_window(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }

        self.autosave();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.is_dirty() {
            self.save();
        }
    }
}
