pub mod config;
pub mod logging;

use calc_engine::{Action, Evaluation, Session, Snapshot};
use config::FrontendConfig;
use std::sync::Mutex;
use tauri::State;

/// The window's calculator session, shared by every command invocation.
pub struct AppState {
    session: Mutex<Session>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    fn with_session<T>(&self, f: impl FnOnce(&mut Session) -> T) -> Result<T, String> {
        let mut session = self.session.lock().map_err(|e| e.to_string())?;
        Ok(f(&mut session))
    }
}

/// Keypad button press, e.g. `{ "action": "digit", "value": "7" }`.
#[tauri::command]
fn apply_action(action: Action, state: State<'_, AppState>) -> Result<Snapshot, String> {
    state.with_session(|s| s.apply(action))
}

/// Keyboard key forwarded from the webview. `None` when the key is unbound.
#[tauri::command]
fn press_key(key: String, state: State<'_, AppState>) -> Result<Option<Snapshot>, String> {
    state.with_session(|s| s.press(&key))
}

#[tauri::command]
fn snapshot(state: State<'_, AppState>) -> Result<Snapshot, String> {
    state.with_session(|s| s.snapshot())
}

#[tauri::command]
fn tape(state: State<'_, AppState>) -> Result<Vec<Evaluation>, String> {
    state.with_session(|s| s.tape().cloned().collect())
}

#[tauri::command]
fn get_app_config() -> FrontendConfig {
    FrontendConfig::from(config::get_config())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    logging::init_logging();

    let config = config::get_config();
    tracing::info!(app = %config.app_name, env = %config.dev_env, "starting keypad");

    tauri::Builder::default()
        .manage(AppState::new(Session::with_options(config.session_options())))
        .invoke_handler(tauri::generate_handler![
            apply_action,
            press_key,
            snapshot,
            tape,
            get_app_config
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
