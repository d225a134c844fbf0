pub mod catalog;
pub mod config;
pub mod controllers;
pub mod models;
pub mod services;
pub mod startup;
pub mod terminal;
pub mod utils;
pub mod views;

use catalog::StaticContentCatalog;
use config::Settings;
use controllers::{FileListing, SearchController, UploadController};
use services::{ClipboardWriter, FileApi, Notifier};
use std::sync::Arc;

/// Shared application state: the API client and the controllers built on it.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn FileApi>,
    pub upload: Arc<UploadController>,
    pub search: SearchController,
    pub listing: Arc<FileListing>,
    pub catalog: &'static StaticContentCatalog,
}

impl AppState {
    pub fn new(
        api: Arc<dyn FileApi>,
        clipboard: Arc<dyn ClipboardWriter>,
        notifier: Arc<dyn Notifier>,
        settings: &Settings,
    ) -> Self {
        let request_timeout = settings.api.request_timeout();

        let upload = Arc::new(UploadController::new(
            api.clone(),
            clipboard,
            notifier,
            request_timeout,
        ));
        let search = SearchController::new(
            api.clone(),
            settings.search.debounce(),
            settings.search.fallback_query.clone(),
            request_timeout,
        );
        let listing = Arc::new(FileListing::new(api.clone(), request_timeout));

        Self {
            api,
            upload,
            search,
            listing,
            catalog: StaticContentCatalog::global(),
        }
    }
}
