#![windows_subsystem = "windows"]
//! HemoScan - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod chart;
mod constants;
mod settings;
mod speech;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use ui::components::{detail_row, status_dot};
use utils::format_bytes;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "hemoscan.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hemoscan=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

/// One GET against the backend root to drive the status indicator.
fn probe_backend(base_url: &str) -> bool {
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build probe client");
            return false;
        }
    };
    match client.get(base_url).send() {
        Ok(response) => {
            info!(status = %response.status(), url = base_url, "Backend probe answered");
            true
        }
        Err(e) => {
            warn!(error = %e, url = base_url, "Backend probe failed");
            false
        }
    }
}

fn main() -> eframe::Result<()> {
    let data_dir = utils::get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "HemoScan starting");

    let settings = settings::Settings::load(&data_dir);
    let backend_reachable = Some(probe_backend(&settings.backend_url_or_default()));

    // Load saved window position/size
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1000.0, 660.0)))
        .with_min_inner_size([860.0, 560.0])
        .with_title("HemoScan");

    // Window/taskbar icon rasterized from the logo SVG
    {
        let (pixels, w, h) = utils::rasterize_logo_square(64);
        let icon = egui::IconData {
            rgba: pixels,
            width: w,
            height: h,
        };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "HemoScan",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir, backend_reachable);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Collect results from the request task / probe thread
        self.poll_submission();
        self.poll_backend_probe(ctx);

        self.render_alert(ctx);
        self.render_settings_modal(ctx);

        let submitting = self.is_submitting();

        // Left sidebar - scanner (must be added BEFORE CentralPanel)
        egui::SidePanel::left("scanner_panel")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 0)),
            )
            .show(ctx, |ui| {
                let panel_max_rect = ui.max_rect();

                // Header with logo, centered
                let avail_w = ui.available_width();
                ui.add_space(18.0);
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    let texture = self.logo_texture.get_or_insert_with(|| {
                        let (pixels, w, h) = utils::rasterize_logo(avail_w as u32);
                        ctx.load_texture(
                            "logo",
                            egui::ColorImage::from_rgba_unmultiplied(
                                [w as usize, h as usize],
                                &pixels,
                            ),
                            egui::TextureOptions::LINEAR,
                        )
                    });

                    let aspect = texture.size()[1] as f32 / texture.size()[0] as f32;
                    let logo_w = avail_w * 0.28;
                    let logo_size = egui::vec2(logo_w, logo_w * aspect);
                    ui.image(egui::load::SizedTexture::new(texture.id(), logo_size));

                    ui.add_space(4.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("HEMOSCAN")
                                .size(theme::FONT_TITLE)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("FINGERPRINT BLOOD GROUP DETECTION")
                                .size(9.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });
                ui.add_space(14.0);

                // Scanner viewport
                theme::scanner_frame(self.scanner_active).show(ui, |ui| {
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(ui.available_width(), theme::SCANNER_HEIGHT),
                        egui::Sense::hover(),
                    );

                    if let Some(texture) = &self.preview_texture {
                        let tex_size = texture.size_vec2();
                        let scale =
                            (rect.width() / tex_size.x).min(rect.height() / tex_size.y);
                        let img_rect =
                            egui::Rect::from_center_size(rect.center(), tex_size * scale);
                        ui.painter().image(
                            texture.id(),
                            img_rect,
                            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                            egui::Color32::WHITE,
                        );
                    } else {
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::FINGERPRINT,
                            egui::FontId::proportional(72.0),
                            theme::TEXT_DIM,
                        );
                    }

                    // Scan line sweeps while a submission is in flight
                    if submitting {
                        let t = ui.input(|i| i.time) as f32;
                        let phase = (t * 0.6).fract();
                        let y = rect.top() + rect.height() * phase;
                        ui.painter().line_segment(
                            [
                                egui::pos2(rect.left() + 4.0, y),
                                egui::pos2(rect.right() - 4.0, y),
                            ],
                            egui::Stroke::new(2.0, theme::ACCENT_LIGHT),
                        );
                        ctx.request_repaint();
                    }
                });

                ui.add_space(theme::SPACING_MD);

                // Selected file row
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(&self.selected_name)
                                .size(theme::FONT_LABEL)
                                .color(if self.selected_path.is_some() {
                                    theme::TEXT_SECONDARY
                                } else {
                                    theme::TEXT_DIM
                                }),
                        )
                        .selectable(false)
                        .truncate(),
                    );
                    if let Some(size) = self.selected_size {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(format_bytes(size))
                                        .size(theme::FONT_SMALL)
                                        .color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                        });
                    }
                });

                ui.add_space(theme::SPACING_MD);

                // Browse
                let browse_btn = ui.add_sized(
                    [ui.available_width(), theme::BUTTON_HEIGHT],
                    theme::button(format!(
                        "{}  Choose Fingerprint",
                        egui_phosphor::regular::FOLDER_OPEN
                    )),
                );
                if browse_btn.clicked() {
                    self.browse(ctx);
                }

                ui.add_space(theme::SPACING_SM);

                // Detect - disabled for the duration of a submission
                let detect_btn = ui.add_enabled(
                    !submitting,
                    egui::Button::new(if submitting {
                        egui::RichText::new("Scanning...").color(theme::TEXT_DIM)
                    } else {
                        egui::RichText::new(format!(
                            "{}  Detect Blood Group",
                            egui_phosphor::regular::SCAN
                        ))
                        .color(egui::Color32::from_rgb(0x2d, 0x05, 0x05))
                    })
                    .fill(if submitting {
                        theme::BTN_DISABLED
                    } else {
                        theme::BTN_ACCENT
                    })
                    .corner_radius(theme::RADIUS_DEFAULT)
                    .min_size(egui::vec2(ui.available_width(), theme::BUTTON_HEIGHT)),
                );
                if detect_btn.clicked() {
                    self.submit(ctx);
                }

                ui.add_space(theme::SPACING_SM);

                // Reset
                let reset_btn = ui.add_sized(
                    [ui.available_width(), theme::BUTTON_HEIGHT],
                    theme::button(format!(
                        "{}  Reset",
                        egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE
                    )),
                );
                if reset_btn.clicked() {
                    info!("Scanner reset");
                    self.reset();
                }

                // Bottom row: status dot, version, settings gear
                let bottom_rect = egui::Rect::from_min_max(
                    egui::pos2(panel_max_rect.left(), panel_max_rect.bottom() - 30.0),
                    panel_max_rect.max,
                );
                ui.allocate_ui_at_rect(bottom_rect, |ui| {
                    ui.horizontal(|ui| {
                        status_dot(ui, self.backend_reachable);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let gear = ui.add(
                                egui::Label::new(
                                    egui::RichText::new(egui_phosphor::regular::GEAR)
                                        .size(16.0)
                                        .color(theme::TEXT_DIM),
                                )
                                .sense(egui::Sense::click()),
                            );
                            if gear.clicked() {
                                self.backend_url_edit = self.backend_url.clone();
                                self.show_settings = true;
                            }
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(format!("v{}", APP_VERSION))
                                        .size(10.0)
                                        .color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                        });
                    });
                });
            });

        // Central panel - result area
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                if submitting {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.4);
                        ui.spinner();
                        ui.add_space(theme::SPACING_MD);
                        ui.label(
                            egui::RichText::new("Analyzing fingerprint...")
                                .color(theme::TEXT_MUTED),
                        );
                    });
                    return;
                }

                let Some(result) = self.last_result.clone() else {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.35);
                        ui.label(
                            egui::RichText::new(egui_phosphor::regular::DROP)
                                .size(48.0)
                                .color(theme::TEXT_DIM),
                        );
                        ui.add_space(theme::SPACING_MD);
                        ui.label(
                            egui::RichText::new("Choose a fingerprint image and press Detect.")
                                .color(theme::TEXT_DIM),
                        );
                    });
                    return;
                };

                theme::card_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());

                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new("DETECTED BLOOD GROUP")
                                        .size(theme::FONT_SMALL)
                                        .color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(&result.blood_group)
                                        .size(44.0)
                                        .strong()
                                        .color(theme::ACCENT_LIGHT),
                                )
                                .selectable(false),
                            );
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(result.subject_line())
                                        .size(theme::FONT_BODY)
                                        .color(theme::TEXT_SECONDARY),
                                )
                                .selectable(false),
                            );
                        });

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                            let speak_btn = ui.add(theme::button(format!(
                                "{}  Speak",
                                egui_phosphor::regular::SPEAKER_HIGH
                            )));
                            if speak_btn.clicked() {
                                self.speak_result();
                            }
                        });
                    });

                    ui.add_space(theme::SPACING_SM);
                    if let Some(scanned_at) = self.scanned_at {
                        detail_row(
                            ui,
                            "Scanned",
                            &scanned_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                        );
                    }

                    ui.add_space(theme::SPACING_MD);
                    ui.separator();
                    ui.add_space(theme::SPACING_MD);

                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("CONFIDENCE BY GROUP")
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                    ui.add_space(theme::SPACING_SM);

                    if let Some(chart) = &self.chart {
                        chart.show(ui);
                    }
                });
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

// ============================================================================
// MODALS & BACKGROUND RESULTS
// ============================================================================

impl App {
    /// Picks up probe results posted by the settings modal's recheck thread.
    fn poll_backend_probe(&mut self, ctx: &egui::Context) {
        let id = egui::Id::new("backend_probe");
        if let Some(ok) = ctx.memory(|mem| mem.data.get_temp::<bool>(id)) {
            ctx.memory_mut(|mem| mem.data.remove::<bool>(id));
            self.backend_reachable = Some(ok);
        }
    }

    fn recheck_backend(&mut self, ctx: &egui::Context) {
        self.backend_reachable = None;
        let url = self.backend_url.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let ok = probe_backend(&url);
            ctx.memory_mut(|mem| mem.data.insert_temp(egui::Id::new("backend_probe"), ok));
            ctx.request_repaint();
        });
    }

    /// Blocking alert with a single OK button.
    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert_message.clone() else {
            return;
        };

        let modal = egui::Modal::new(egui::Id::new("alert_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(180))
            .frame(theme::modal_frame());
        let modal_response = modal.show(ctx, |ui| {
            ui.set_min_width(320.0);
            ui.set_max_width(320.0);

            ui.vertical_centered(|ui| {
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(egui_phosphor::regular::WARNING)
                        .size(32.0)
                        .color(theme::STATUS_WARNING),
                );
                ui.add_space(theme::SPACING_MD);
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(&message).color(theme::TEXT_SECONDARY),
                    )
                    .wrap(),
                );
                ui.add_space(theme::SPACING_XL);
                let ok_btn =
                    ui.add(theme::button_accent(format!("{}  OK", egui_phosphor::regular::CHECK)));
                if ok_btn.clicked() {
                    self.alert_message = None;
                }
            });
        });
        if modal_response.should_close() {
            self.alert_message = None;
        }
    }

    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame());
        let modal_response = modal.show(ctx, |ui| {
            ui.set_width(320.0);

            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(egui::RichText::new("Settings").size(16.0).strong())
                        .selectable(false),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let close = ui.add(
                        egui::Label::new(
                            egui::RichText::new(egui_phosphor::regular::X)
                                .size(16.0)
                                .color(theme::TEXT_DIM),
                        )
                        .sense(egui::Sense::click()),
                    );
                    if close.clicked() {
                        self.show_settings = false;
                    }
                });
            });
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(theme::SPACING_SM);

            // — Backend —
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Backend URL")
                        .size(theme::FONT_LABEL)
                        .color(theme::ACCENT_LIGHT),
                )
                .selectable(false),
            );
            ui.add_space(2.0);

            let url_edit = egui::Frame::new()
                .fill(theme::BG_INPUT)
                .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
                .corner_radius(theme::RADIUS_DEFAULT)
                .inner_margin(egui::Margin::symmetric(6, 4))
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.backend_url_edit)
                            .frame(false)
                            .hint_text(DEFAULT_BACKEND_URL)
                            .desired_width(ui.available_width())
                            .font(egui::FontId::proportional(theme::FONT_LABEL)),
                    )
                })
                .inner;

            let apply =
                url_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if apply {
                let trimmed = self.backend_url_edit.trim().to_string();
                if !trimmed.is_empty() && trimmed != self.backend_url {
                    info!(url = %trimmed, "Backend URL changed");
                    self.backend_url = trimmed;
                    self.save_settings();
                    self.recheck_backend(ctx);
                }
            }

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let test_btn = ui.add(theme::button(format!(
                    "{}  Test Connection",
                    egui_phosphor::regular::PLUGS_CONNECTED
                )));
                if test_btn.clicked() {
                    self.recheck_backend(ctx);
                }
                if self.backend_reachable.is_none() {
                    ui.spinner();
                } else {
                    status_dot(ui, self.backend_reachable);
                }
            });

            ui.add_space(theme::SPACING_MD);
            ui.separator();
            ui.add_space(theme::SPACING_SM);

            // — Speech —
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Speech")
                        .size(theme::FONT_LABEL)
                        .color(theme::ACCENT_LIGHT),
                )
                .selectable(false),
            );
            ui.add_space(2.0);
            if theme::settings_checkbox(ui, self.auto_speak, "Announce detected group out loud") {
                self.auto_speak = !self.auto_speak;
                self.save_settings();
            }

            ui.add_space(theme::SPACING_MD);
            ui.separator();
            ui.add_space(theme::SPACING_SM);

            // — Logs —
            let logs_btn = ui.add(theme::button(format!(
                "{}  Open Log Folder",
                egui_phosphor::regular::FOLDER_OPEN
            )));
            if logs_btn.clicked() {
                let logs_dir: PathBuf = self.data_dir.join("logs");
                std::fs::create_dir_all(&logs_dir).ok();
                let _ = open::that(&logs_dir);
            }
        });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }
}
