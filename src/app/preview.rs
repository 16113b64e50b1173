//! File selection and scanner preview loading

use super::{App, NO_FILE};
use crate::constants::IMAGE_EXTENSIONS;
use eframe::egui;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

impl App {
    /// Opens the native picker, filtered to the formats the backend accepts.
    pub fn browse(&mut self, ctx: &egui::Context) {
        let picked = rfd::FileDialog::new()
            .add_filter("Fingerprint image", &IMAGE_EXTENSIONS)
            .set_directory(&self.browse_dir)
            .pick_file();

        match picked {
            Some(path) => self.select_file(ctx, path),
            // Dismissed picker behaves like an empty selection.
            None => self.clear_selection(),
        }
    }

    /// Loads `path` into the scanner: display name, size, preview texture.
    pub fn select_file(&mut self, ctx: &egui::Context, path: PathBuf) {
        self.selected_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| NO_FILE.to_string());
        self.selected_size = std::fs::metadata(&path).ok().map(|m| m.len());
        self.preview_texture = load_preview(ctx, &path);
        self.scanner_active = true;
        if let Some(parent) = path.parent() {
            self.browse_dir = parent.to_path_buf();
        }
        debug!(path = %path.display(), "Fingerprint selected");
        self.selected_path = Some(path);
    }

    /// Drops the current selection and preview; the result area stays.
    pub fn clear_selection(&mut self) {
        self.selected_path = None;
        self.selected_name = NO_FILE.to_string();
        self.selected_size = None;
        self.preview_texture = None;
        self.scanner_active = false;
    }

    /// Clears the selection, preview, displayed result, and chart.
    pub fn reset(&mut self) {
        self.clear_selection();
        self.last_result = None;
        self.scanned_at = None;
        self.chart = None;
    }
}

fn load_preview(ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.into_raw();
            Some(ctx.load_texture(
                "fingerprint_preview",
                egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                egui::TextureOptions::LINEAR,
            ))
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to decode preview");
            None
        }
    }
}
