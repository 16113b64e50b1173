//! Submission logic: one multipart POST per detection

use super::App;
use crate::chart::ConfidenceChart;
use crate::constants::{PREDICT_PATH, UPLOAD_FIELD};
use crate::types::{interpret_response, PredictOutcome};
use eframe::egui;
use tracing::{info, warn};

impl App {
    pub fn submit(&mut self, ctx: &egui::Context) {
        let Some(path) = self.selected_path.clone() else {
            self.alert_message =
                Some("Please choose a fingerprint image (bmp/png/jpg).".to_string());
            return;
        };

        // A file that cannot be read is reported without a network call.
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to read selected file");
                self.alert_message =
                    Some(format!("Could not read {}: {}", self.selected_name, e));
                return;
            }
        };

        if !self.submission.lock().unwrap().begin() {
            return;
        }

        let url = predict_url(&self.backend_url);
        let file_name = self.selected_name.clone();
        let state = self.submission.clone();
        let ctx = ctx.clone();

        info!(url = %url, file = %file_name, size = bytes.len(), "Submitting fingerprint");

        self.runtime.spawn(async move {
            let outcome = send_fingerprint(&url, file_name, bytes).await;
            state.lock().unwrap().finish(outcome);
            ctx.request_repaint();
        });
    }

    /// Applies a finished submission to the UI state. Called once per frame
    /// from the update loop. Error outcomes leave the displayed result as is.
    pub fn poll_submission(&mut self) {
        let outcome = self.submission.lock().unwrap().take_outcome();
        let Some(outcome) = outcome else {
            return;
        };

        match outcome {
            PredictOutcome::Success(result) => {
                info!(blood_group = %result.blood_group, "Classification received");
                self.chart = Some(ConfidenceChart::build(
                    &result.blood_group,
                    result.confidences.as_ref(),
                ));
                self.scanned_at = Some(chrono::Local::now());
                if self.auto_speak {
                    self.narrator.announce(&result.blood_group);
                }
                self.last_result = Some(result);
            }
            PredictOutcome::ServerError(message) => {
                warn!(message = %message, "Backend rejected submission");
                self.alert_message = Some(message);
            }
            PredictOutcome::Transport(message) => {
                warn!(message = %message, "Backend unreachable");
                self.alert_message = Some(message);
            }
        }
    }

    /// Re-announces the last result; no-op when nothing has been detected.
    pub fn speak_result(&mut self) {
        if let Some(result) = &self.last_result {
            let group = result.blood_group.clone();
            self.narrator.announce(&group);
        }
    }
}

fn predict_url(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), PREDICT_PATH)
}

async fn send_fingerprint(url: &str, file_name: String, bytes: Vec<u8>) -> PredictOutcome {
    let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
    let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

    match reqwest::Client::new().post(url).multipart(form).send().await {
        Ok(response) => {
            let status = response.status();
            match response.text().await {
                Ok(body) => interpret_response(status, &body),
                Err(e) => PredictOutcome::Transport(transport_message(&e)),
            }
        }
        Err(e) => PredictOutcome::Transport(transport_message(&e)),
    }
}

fn transport_message(e: &reqwest::Error) -> String {
    format!(
        "Could not reach backend. Make sure the inference server is running.\n{}",
        e
    )
}

#[cfg(test)]
mod tests {
    use super::predict_url;

    #[test]
    fn predict_url_joins_cleanly() {
        assert_eq!(
            predict_url("http://127.0.0.1:5000"),
            "http://127.0.0.1:5000/predict"
        );
        assert_eq!(
            predict_url("http://127.0.0.1:5000/"),
            "http://127.0.0.1:5000/predict"
        );
    }
}
