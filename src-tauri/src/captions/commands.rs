use tauri::State;

use crate::{models::CaptionEntry, AppState};

#[tauri::command]
pub fn active_caption(state: State<'_, AppState>, time: f64) -> Option<String> {
    state
        .captions
        .current()
        .active_caption(time)
        .map(str::to_string)
}

#[tauri::command]
pub fn get_captions(state: State<'_, AppState>) -> Vec<CaptionEntry> {
    state.captions.current().entries().to_vec()
}
