use eframe::egui;

use crate::core::FormState;

const GRID_HORIZONTAL_SPACING: f32 = 10.0;
const GRID_VERTICAL_SPACING: f32 = 4.0;
const LABEL_WIDTH: f32 = 260.0;

/// What the user did to the form this frame.
#[derive(Debug, Default)]
pub struct FormEdits {
    pub toggled: Vec<String>,
    pub values: Vec<(String, String)>,
}

pub struct FormView;

impl FormView {
    /// Draws every section as a collapsing header whose open state mirrors `form`.
    /// Nothing is written back; the caller applies the returned edits.
    pub fn show(ui: &mut egui::Ui, form: &FormState) -> FormEdits {
        let mut edits = FormEdits::default();
        let definition = form.shared_definition();

        ui.heading(&definition.name);
        ui.add_space(6.0);

        for section in &definition.sections {
            let header = egui::CollapsingHeader::new(egui::RichText::new(&section.title).strong())
                .id_salt(&section.id)
                .open(Some(form.is_open(&section.id)))
                .show(ui, |ui| {
                    egui::Grid::new(("section_grid", &section.id))
                        .num_columns(2)
                        .spacing([GRID_HORIZONTAL_SPACING, GRID_VERTICAL_SPACING])
                        .show(ui, |ui| {
                            for field in &section.fields {
                                ui.add_sized(
                                    [LABEL_WIDTH, ui.spacing().interact_size.y],
                                    egui::Label::new(&field.label).wrap(),
                                );

                                let mut value = form.value(&field.id).unwrap_or_default().to_string();
                                let response = if field.multiline {
                                    ui.text_edit_multiline(&mut value)
                                } else {
                                    ui.text_edit_singleline(&mut value)
                                };
                                if response.changed() {
                                    edits.values.push((field.id.clone(), value));
                                }
                                ui.end_row();
                            }
                        });
                });

            if header.header_response.clicked() {
                edits.toggled.push(section.id.clone());
            }
        }

        edits
    }
}
