use std::{
    path::PathBuf,
    sync::Arc,
};

use eframe::egui;

use super::{
    busy_overlay::BusyOverlay,
    form_view::FormView,
    top_bar::{
        TopBar,
        TopBarAction,
    },
};
use crate::core::{
    import::ALLOWED_EXTENSIONS,
    tasks::{
        TaskManager,
        TaskResult,
    },
    FormController,
    StatusKind,
};

pub struct FormApp {
    controller: FormController,
    task_manager: TaskManager,
    selected_path: Option<PathBuf>,
}

impl FormApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: FormController,
        mut task_manager: TaskManager,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        task_manager.set_waker(Arc::new(move || ctx.request_repaint()));

        Self { controller, task_manager, selected_path: None }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Upload(response) => {
                self.controller.complete_import(response);
            }
            TaskResult::ReadFailed(error) => {
                self.controller.abort_import(error);
            }
            TaskResult::Save(response) => {
                self.controller.complete_submit(response);
            }
        }
    }

    fn handle_top_bar(&mut self, action: TopBarAction) {
        match action {
            TopBarAction::ChooseFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Spreadsheets", ALLOWED_EXTENSIONS)
                    .pick_file()
                {
                    tracing::debug!(path = %path.display(), "file chosen");
                    self.selected_path = Some(path);
                }
            }
            TopBarAction::Import => {
                if let Ok(path) = self.controller.begin_import_path(self.selected_path.as_deref()) {
                    self.task_manager.upload(path);
                }
            }
            TopBarAction::Prev => {
                self.controller.navigate_prev();
            }
            TopBarAction::Next => {
                self.controller.navigate_next();
            }
        }
    }

    fn submit(&mut self) {
        if let Ok(payload) = self.controller.begin_submit() {
            self.task_manager.save(payload);
        }
    }

    fn show_message_area(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let submitting = self.controller.is_submitting();
            let can_submit = !submitting && !self.controller.is_importing();
            if ui.add_enabled(can_submit, egui::Button::new("Submit")).clicked() {
                self.submit();
            }
            if submitting || self.controller.is_importing() {
                ui.add(egui::Spinner::new());
            }

            if let Some(status) = self.controller.status() {
                let color = match status.kind {
                    StatusKind::Info => ui.visuals().text_color(),
                    StatusKind::Success => egui::Color32::from_rgb(0, 200, 0),
                    StatusKind::Error => ui.visuals().error_fg_color,
                };
                ui.label(egui::RichText::new(&status.text).color(color));
            }
        });
    }
}

impl eframe::App for FormApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let task_results = self.task_manager.poll_results();

        for result in task_results {
            self.handle_task_result(result);
        }

        let selected_file = self
            .selected_path
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned());
        let nav = self.controller.nav_state();

        let busy = self.controller.is_importing() || self.controller.is_submitting();
        if let Some(action) = TopBar::show(ctx, selected_file.as_deref(), busy, &nav) {
            self.handle_top_bar(action);
        }

        egui::TopBottomPanel::bottom("message_area").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_message_area(ui);
            ui.add_space(4.0);
        });

        let edits = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| FormView::show(ui, self.controller.form()))
                    .inner
            })
            .inner;

        for id in edits.toggled {
            self.controller.toggle_section(&id);
        }
        for (id, value) in edits.values {
            self.controller.edit_field(&id, &value);
        }

        if self.controller.is_importing() {
            let message = self
                .controller
                .status()
                .map(|status| status.text.as_str())
                .unwrap_or("Loading...");
            BusyOverlay::show(ctx, message);
        }
    }
}
