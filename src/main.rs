use std::{
    error::Error,
    sync::Arc,
};

use cardform::{
    core::{
        settings::{
            Settings,
            SETTINGS_FILE,
        },
        tasks::TaskManager,
        FormController,
    },
    gui::FormApp,
    persistence::{
        get_data_file_path,
        save_json,
    },
    services::HttpCollaborator,
};
use eframe::egui;
use tracing_subscriber::{
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cardform=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load();
    if !get_data_file_path(SETTINGS_FILE).exists() {
        if let Err(e) = save_json(&settings, SETTINGS_FILE) {
            tracing::warn!("could not write default settings: {}", e);
        }
    }

    let definition = settings.form_definition()?;
    tracing::info!(
        form = %definition.name,
        parse_url = %settings.parse_url,
        save_url = %settings.save_url,
        "starting"
    );

    let collaborator = Arc::new(HttpCollaborator::from_settings(&settings)?);
    let task_manager = TaskManager::new(collaborator.clone(), collaborator)?;
    let controller = FormController::new(definition);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Model Card Form")
            .with_inner_size([900.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Model Card Form",
        options,
        Box::new(|cc| Ok(Box::new(FormApp::new(cc, controller, task_manager)))),
    )?;

    Ok(())
}
