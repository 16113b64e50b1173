//! Per-category confidence bar chart

use crate::constants::BLOOD_GROUPS;
use crate::theme;
use eframe::egui;
use std::collections::HashMap;

/// One rendered chart, rebuilt on every successful scan and dropped on reset.
///
/// When the server omits confidences the bars fall back to 95 for the
/// detected category and 8 for the rest. That distribution is purely a
/// presentation device (`synthesized` is set and the chart is captioned
/// as illustrative), not a statistical inference.
pub struct ConfidenceChart {
    pub values: [u8; 8],
    pub detected: Option<usize>,
    pub synthesized: bool,
}

impl ConfidenceChart {
    pub fn build(blood_group: &str, confidences: Option<&HashMap<String, f64>>) -> Self {
        let detected = BLOOD_GROUPS.iter().position(|g| *g == blood_group);
        match confidences {
            Some(map) => {
                let mut values = [0u8; 8];
                for (i, group) in BLOOD_GROUPS.iter().enumerate() {
                    let score = map.get(*group).copied().unwrap_or(0.0);
                    // Scale to 0-100; the axis tops out at 100 like the chart does.
                    values[i] = (score * 100.0).round().clamp(0.0, 100.0) as u8;
                }
                Self {
                    values,
                    detected,
                    synthesized: false,
                }
            }
            None => {
                let mut values = [8u8; 8];
                if let Some(i) = detected {
                    values[i] = 95;
                }
                Self {
                    values,
                    detected,
                    synthesized: true,
                }
            }
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(width, theme::CHART_HEIGHT),
            egui::Sense::hover(),
        );
        if !ui.is_rect_visible(rect) {
            return;
        }
        let painter = ui.painter();

        let value_h = 16.0;
        let label_h = 20.0;
        let plot = egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.top() + value_h),
            egui::pos2(rect.right(), rect.bottom() - label_h),
        );

        painter.line_segment(
            [plot.left_bottom(), plot.right_bottom()],
            egui::Stroke::new(theme::STROKE_DEFAULT, theme::CHART_BASELINE),
        );

        let n = BLOOD_GROUPS.len() as f32;
        let gap = 10.0;
        let bar_w = ((plot.width() - gap * (n - 1.0)) / n).max(4.0);

        for (i, group) in BLOOD_GROUPS.iter().enumerate() {
            let value = self.values[i];
            let highlighted = self.detected == Some(i);
            let x = plot.left() + i as f32 * (bar_w + gap);
            let h = plot.height() * value as f32 / 100.0;
            let bar = egui::Rect::from_min_max(
                egui::pos2(x, plot.bottom() - h),
                egui::pos2(x + bar_w, plot.bottom()),
            );

            let fill = if highlighted {
                theme::CHART_BAR_DETECTED
            } else {
                theme::CHART_BAR
            };
            painter.rect_filled(bar, theme::RADIUS_DEFAULT, fill);

            painter.text(
                egui::pos2(bar.center().x, bar.top() - 2.0),
                egui::Align2::CENTER_BOTTOM,
                format!("{}", value),
                egui::FontId::proportional(theme::FONT_SMALL),
                if highlighted {
                    theme::TEXT_PRIMARY
                } else {
                    theme::TEXT_DIM
                },
            );
            painter.text(
                egui::pos2(bar.center().x, rect.bottom()),
                egui::Align2::CENTER_BOTTOM,
                *group,
                egui::FontId::proportional(theme::FONT_SECTION),
                if highlighted {
                    theme::ACCENT_LIGHT
                } else {
                    theme::TEXT_MUTED
                },
            );
        }

        if self.synthesized {
            ui.add_space(theme::SPACING_SM);
            ui.label(
                egui::RichText::new("Illustrative distribution (server did not report confidences)")
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn real_confidences_scale_to_percent() {
        let map = scores(&[("O+", 0.9), ("A+", 0.05)]);
        let chart = ConfidenceChart::build("O+", Some(&map));

        assert!(!chart.synthesized);
        assert_eq!(chart.detected, Some(6)); // O+ position in display order
        assert_eq!(chart.values[6], 90);
        assert_eq!(chart.values[0], 5); // A+
        // Categories the server omitted read zero.
        assert_eq!(chart.values[2], 0); // B+
    }

    #[test]
    fn missing_confidences_synthesize_fallback() {
        let chart = ConfidenceChart::build("B-", None);

        assert!(chart.synthesized);
        for (i, &value) in chart.values.iter().enumerate() {
            if Some(i) == chart.detected {
                assert_eq!(value, 95);
            } else {
                assert_eq!(value, 8);
            }
        }
    }

    #[test]
    fn unknown_label_highlights_nothing() {
        let chart = ConfidenceChart::build("X?", None);
        assert_eq!(chart.detected, None);
        assert!(chart.values.iter().all(|&v| v == 8));
    }

    #[test]
    fn out_of_range_scores_are_clipped() {
        let map = scores(&[("A+", 1.5), ("A-", -0.2)]);
        let chart = ConfidenceChart::build("A+", Some(&map));
        assert_eq!(chart.values[0], 100);
        assert_eq!(chart.values[1], 0);
    }
}
