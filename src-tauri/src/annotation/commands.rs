use std::path::PathBuf;

use serde_json::Value;
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_opener::OpenerExt;

use crate::{
    models::{ExportReceipt, ObserverRole},
    AppState,
};

use super::{
    AnnotationController, MarkOutcome, MarksSnapshot, MetadataSnapshot, SessionInfo, UndoOutcome,
};

fn controller_from_state(state: &State<'_, AppState>) -> AnnotationController {
    state.annotation.clone()
}

fn emit_marks_changed(app_handle: &AppHandle, marks: &MarksSnapshot) {
    let _ = app_handle.emit("marks-changed", marks);
}

/// The webview may send the PGY year as a number or as typed text.
fn pgy_input(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

#[tauri::command]
pub async fn get_session(state: State<'_, AppState>) -> Result<SessionInfo, String> {
    let controller = controller_from_state(&state);
    Ok(controller.session_info().await)
}

#[tauri::command]
pub async fn request_mark(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    time: f64,
) -> Result<MarkOutcome, String> {
    let controller = controller_from_state(&state);
    let (outcome, marks) = controller
        .request_mark(time)
        .await
        .map_err(|e| e.to_string())?;
    if matches!(outcome, MarkOutcome::Accepted { .. }) {
        emit_marks_changed(&app_handle, &marks);
    }
    Ok(outcome)
}

#[tauri::command]
pub async fn request_undo(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<UndoOutcome, String> {
    let controller = controller_from_state(&state);
    let (outcome, marks) = controller.request_undo().await;
    if matches!(outcome, UndoOutcome::Removed { .. }) {
        emit_marks_changed(&app_handle, &marks);
    }
    Ok(outcome)
}

#[tauri::command]
pub async fn get_marks(state: State<'_, AppState>) -> Result<MarksSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.marks().await)
}

#[tauri::command]
pub async fn select_role(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    role: String,
    pgy_year: Option<Value>,
) -> Result<MetadataSnapshot, String> {
    let controller = controller_from_state(&state);
    let role = role.parse::<ObserverRole>().map_err(|e| e.to_string())?;
    let pgy = pgy_input(pgy_year);
    let snapshot = controller
        .select_role(role, pgy.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    let _ = app_handle.emit("metadata-changed", &snapshot);
    Ok(snapshot)
}

#[tauri::command]
pub async fn set_observer_name(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    name: Option<String>,
) -> Result<MetadataSnapshot, String> {
    let controller = controller_from_state(&state);
    let snapshot = controller.set_observer_name(name.as_deref()).await;
    let _ = app_handle.emit("metadata-changed", &snapshot);
    Ok(snapshot)
}

#[tauri::command]
pub async fn get_session_metadata(state: State<'_, AppState>) -> Result<MetadataSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.metadata().await)
}

#[tauri::command]
pub async fn request_export(
    state: State<'_, AppState>,
    destination: Option<PathBuf>,
) -> Result<ExportReceipt, String> {
    let controller = controller_from_state(&state);
    controller
        .request_export(destination)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn reveal_export(app_handle: AppHandle, path: PathBuf) -> Result<(), String> {
    app_handle
        .opener()
        .reveal_item_in_dir(&path)
        .map_err(|e| e.to_string())
}
