//! App module - contains the main application state and logic

mod predict;
mod preview;

use crate::chart::ConfidenceChart;
use crate::settings::Settings;
use crate::speech::Narrator;
use crate::theme;
use crate::types::*;
use chrono::{DateTime, Local};
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Placeholder shown when nothing is selected.
pub const NO_FILE: &str = "No file chosen";

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // File selection
    pub(crate) selected_path: Option<PathBuf>,
    pub(crate) selected_name: String,
    pub(crate) selected_size: Option<u64>,
    pub(crate) preview_texture: Option<egui::TextureHandle>,
    pub(crate) scanner_active: bool,

    // Submission (shared with the request task)
    pub(crate) submission: Arc<Mutex<SubmissionState>>,
    pub(crate) runtime: tokio::runtime::Runtime,

    // Last known result
    pub(crate) last_result: Option<ClassificationResult>,
    pub(crate) scanned_at: Option<DateTime<Local>>,
    pub(crate) chart: Option<ConfidenceChart>,

    // Alert modal
    pub(crate) alert_message: Option<String>,

    // Speech
    pub(crate) narrator: Narrator,
    pub(crate) auto_speak: bool,

    // Backend
    pub(crate) backend_url: String,
    pub(crate) backend_url_edit: String,
    pub(crate) backend_reachable: Option<bool>,

    // Window chrome / settings
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    pub(crate) show_settings: bool,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
    pub(crate) browse_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
        backend_reachable: Option<bool>,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let backend_url = settings.backend_url_or_default();

        Self {
            selected_path: None,
            selected_name: NO_FILE.to_string(),
            selected_size: None,
            preview_texture: None,
            scanner_active: false,
            submission: Arc::new(Mutex::new(SubmissionState::default())),
            runtime: tokio::runtime::Runtime::new().unwrap(),
            last_result: None,
            scanned_at: None,
            chart: None,
            alert_message: None,
            narrator: Narrator::new(),
            auto_speak: settings.auto_speak,
            backend_url_edit: backend_url.clone(),
            backend_url,
            backend_reachable,
            logo_texture: None,
            show_settings: false,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
            browse_dir: settings.browse_dir_or_default(),
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            backend_url: Some(self.backend_url.clone()),
            auto_speak: self.auto_speak,
            browse_dir: Some(self.browse_dir.to_string_lossy().to_string()),
        };
        settings.save(&self.data_dir);
    }

    /// True while a submission is outstanding; drives the disabled Detect
    /// button, the spinner, and the scan-line animation.
    pub fn is_submitting(&self) -> bool {
        self.submission.lock().unwrap().in_flight
    }
}
