use crate::config::Settings;
use crate::services::{
    ApiError, ClipboardWriter, CommandClipboard, ConsoleNotifier, DisabledClipboard, HttpFileApi,
};
use crate::AppState;
use std::sync::Arc;

/// Pick the clipboard port from configuration.
pub fn build_clipboard(command: &[String]) -> Arc<dyn ClipboardWriter> {
    match CommandClipboard::from_argv(command) {
        Some(clipboard) => Arc::new(clipboard),
        None => {
            tracing::info!("No clipboard command configured, file ids will not be copied");
            Arc::new(DisabledClipboard)
        }
    }
}

/// Wire the HTTP API client, clipboard and console notifier into the controllers.
pub fn build_state(settings: &Settings) -> Result<AppState, ApiError> {
    let api = Arc::new(HttpFileApi::new(settings.api.clone())?);

    tracing::info!(base_url = %settings.api.base_url, "Using file API");

    Ok(AppState::new(
        api,
        build_clipboard(&settings.clipboard.command),
        Arc::new(ConsoleNotifier),
        settings,
    ))
}
