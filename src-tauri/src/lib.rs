mod annotation;
mod captions;
mod error;
mod export;
mod media;
mod models;
mod settings;
mod utils;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use annotation::{
    commands::{
        get_marks, get_session, get_session_metadata, request_export, request_mark, request_undo,
        reveal_export, select_role, set_observer_name,
    },
    AnnotationController,
};
use captions::{
    commands::{active_caption, get_captions},
    CaptionStore,
};
use export::CsvFileSink;
use log::warn;
use media::{
    commands::{load_video, open_video_file, resolve_source},
    protocol, MEDIA_SCHEME,
};
use settings::{AppSettings, SettingsStore};
use tauri::{Manager, State};

pub(crate) struct AppState {
    pub(crate) annotation: AnnotationController,
    pub(crate) captions: CaptionStore,
    pub(crate) settings: Arc<SettingsStore>,
}

#[tauri::command]
fn get_settings(state: State<AppState>) -> Result<AppSettings, String> {
    Ok(state.settings.get())
}

#[tauri::command]
fn update_settings(settings: AppSettings, state: State<AppState>) -> Result<AppSettings, String> {
    state
        .settings
        .replace(settings)
        .map_err(|e| e.to_string())
}

fn default_export_dir(desktop_dir: Option<PathBuf>, app_data_dir: &Path) -> PathBuf {
    match desktop_dir {
        Some(dir) if dir.is_dir() => dir,
        _ => {
            warn!(
                "Desktop directory unavailable; exports default to {}",
                app_data_dir.display()
            );
            app_data_dir.join("exports")
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Video Marker starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .register_asynchronous_uri_scheme_protocol(MEDIA_SCHEME, |ctx, request, responder| {
            let app_handle = ctx.app_handle().clone();
            tauri::async_runtime::spawn_blocking(move || {
                let current_video = app_handle
                    .try_state::<AppState>()
                    .and_then(|state| state.annotation.current_video_blocking());
                responder.respond(protocol::serve(&request, current_video.as_deref()));
            });
        })
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let settings_path = app_data_dir.join("settings.json");
                let settings_store = Arc::new(SettingsStore::new(settings_path)?);
                let initial_settings = settings_store.get();

                let export_dir =
                    default_export_dir(app.path().desktop_dir().ok(), &app_data_dir);
                let sink = CsvFileSink::new(settings_store.clone(), export_dir);
                let annotation =
                    AnnotationController::new(Arc::new(sink), initial_settings.debounce_secs);

                app.manage(AppState {
                    annotation,
                    captions: CaptionStore::new(),
                    settings: settings_store,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            open_video_file,
            resolve_source,
            load_video,
            get_session,
            request_mark,
            request_undo,
            get_marks,
            select_role,
            set_observer_name,
            get_session_metadata,
            request_export,
            reveal_export,
            active_caption,
            get_captions,
            get_settings,
            update_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
