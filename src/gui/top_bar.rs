use eframe::egui::{
    self,
    containers,
};

use crate::core::records::NavState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBarAction {
    ChooseFile,
    Import,
    Prev,
    Next,
}

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        selected_file: Option<&str>,
        busy: bool,
        nav: &NavState,
    ) -> Option<TopBarAction> {
        let mut action = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);
                ui.menu_button("File", |ui| {
                    if ui.button("Choose File…").clicked() {
                        action = Some(TopBarAction::ChooseFile);
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.separator();
                if ui.button("Choose File…").clicked() {
                    action = Some(TopBarAction::ChooseFile);
                }
                match selected_file {
                    Some(name) => ui.label(name),
                    None => ui.weak("No file chosen"),
                };
                if ui.add_enabled(!busy, egui::Button::new("Import")).clicked() {
                    action = Some(TopBarAction::Import);
                }

                if nav.visible {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add_enabled(nav.next_enabled, egui::Button::new("Next ▶")).clicked()
                        {
                            action = Some(TopBarAction::Next);
                        }
                        ui.label(&nav.label);
                        if ui.add_enabled(nav.prev_enabled, egui::Button::new("◀ Prev")).clicked()
                        {
                            action = Some(TopBarAction::Prev);
                        }
                    });
                }
            });
        });

        action
    }
}
