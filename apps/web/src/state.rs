//! Client state machine.
//!
//! `Collecting → Loading → Result → (start over) → Collecting`. Transitions are
//! plain methods so they run without a browser; the UI keeps one
//! `ClientState<web_sys::File>` in a signal and re-renders from it.

use crate::models::{AnalyzeResponse, NegotiableItem};
use crate::summary::Totals;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Picking files. No items.
    Collecting,
    /// One analysis request in flight.
    Loading,
    /// Showing a non-empty item list.
    Result,
}

/// Blocking notice shown to the user after a failed analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    /// Server answered but without a usable item list.
    CouldNotAnalyze,
    /// The request itself failed or the body was not JSON.
    RequestFailed,
}

impl Alert {
    pub fn message(&self) -> &'static str {
        match self {
            Alert::CouldNotAnalyze => "解析できませんでした。別の画像を試してください。",
            Alert::RequestFailed => "エラーが発生しました",
        }
    }
}

/// Files to send for one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest<F> {
    pub estimate: F,
    pub drawing: Option<F>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientState<F> {
    pub phase: Phase,
    pub estimate_file: Option<F>,
    pub drawing_file: Option<F>,
    pub items: Vec<NegotiableItem>,
}

impl<F> Default for ClientState<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> ClientState<F> {
    pub fn new() -> Self {
        Self {
            phase: Phase::Collecting,
            estimate_file: None,
            drawing_file: None,
            items: Vec::new(),
        }
    }

    /// Replaces the estimate selection (`None` clears it).
    pub fn select_estimate(&mut self, file: Option<F>) {
        self.estimate_file = file;
    }

    /// Replaces the drawing selection (`None` clears it).
    pub fn select_drawing(&mut self, file: Option<F>) {
        self.drawing_file = file;
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Collecting && self.estimate_file.is_some()
    }

    /// Settles the in-flight request. Returns the alert to show, if any.
    ///
    /// `outcome` is the decoded response, or `Err` for transport/decode failures.
    pub fn finish_analysis<E>(&mut self, outcome: Result<AnalyzeResponse, E>) -> Option<Alert> {
        let alert = match outcome {
            Ok(response) => match response.items() {
                Some(items) => {
                    self.items = items;
                    None
                }
                None => Some(Alert::CouldNotAnalyze),
            },
            Err(_) => Some(Alert::RequestFailed),
        };

        self.phase = if self.items.is_empty() {
            Phase::Collecting
        } else {
            Phase::Result
        };
        alert
    }

    /// Back to the upload form. The drawing selection is kept on purpose.
    pub fn start_over(&mut self) {
        self.items.clear();
        self.estimate_file = None;
        self.phase = Phase::Collecting;
    }

    pub fn totals(&self) -> Totals {
        Totals::from_items(&self.items)
    }
}

impl<F: Clone> ClientState<F> {
    /// Collecting → Loading. Returns the files to upload, or `None` when no
    /// request may start (no estimate, or one already running).
    pub fn begin_analysis(&mut self) -> Option<AnalysisRequest<F>> {
        if !self.can_submit() {
            return None;
        }
        let estimate = self.estimate_file.clone()?;
        self.phase = Phase::Loading;
        Some(AnalysisRequest {
            estimate,
            drawing: self.drawing_file.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = ClientState<&'static str>;

    fn response(text: &str) -> Result<AnalyzeResponse, String> {
        Ok(serde_json::from_str(text).unwrap())
    }

    const ONE_ITEM: &str = r#"{"success":true,"data":{"items":[{"name":"鍵交換代","current":20000,"target":10000,"reason":"..."}]}}"#;

    fn loading_state() -> State {
        let mut state = State::new();
        state.select_estimate(Some("estimate.jpg"));
        state.begin_analysis().unwrap();
        state
    }

    #[test]
    fn test_submit_requires_estimate() {
        let mut state = State::new();
        assert!(!state.can_submit());
        state.select_drawing(Some("drawing.png"));
        assert!(!state.can_submit());
        assert_eq!(state.begin_analysis(), None);
        assert_eq!(state.phase, Phase::Collecting);

        state.select_estimate(Some("estimate.jpg"));
        assert!(state.can_submit());
    }

    #[test]
    fn test_selection_replaces_previous_file() {
        let mut state = State::new();
        state.select_estimate(Some("first.jpg"));
        state.select_estimate(Some("second.jpg"));
        assert_eq!(state.estimate_file, Some("second.jpg"));
        state.select_estimate(None);
        assert_eq!(state.estimate_file, None);
    }

    #[test]
    fn test_begin_analysis_sends_both_files_and_blocks_resubmit() {
        let mut state = State::new();
        state.select_estimate(Some("estimate.jpg"));
        state.select_drawing(Some("drawing.png"));

        assert_eq!(
            state.begin_analysis(),
            Some(AnalysisRequest {
                estimate: "estimate.jpg",
                drawing: Some("drawing.png"),
            })
        );
        assert!(state.is_loading());
        assert!(!state.can_submit());
        assert_eq!(state.begin_analysis(), None);
    }

    #[test]
    fn test_success_moves_to_result() {
        let mut state = loading_state();
        assert_eq!(state.finish_analysis(response(ONE_ITEM)), None);
        assert_eq!(state.phase, Phase::Result);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.totals().diff, 10000.0);
    }

    #[test]
    fn test_failure_flag_alerts_and_stays_collecting() {
        let mut state = loading_state();
        let alert = state.finish_analysis(response(r#"{"success":false,"msg":"Error"}"#));
        assert_eq!(alert, Some(Alert::CouldNotAnalyze));
        assert_eq!(state.phase, Phase::Collecting);
        assert!(state.items.is_empty());
        assert!(state.can_submit());
    }

    #[test]
    fn test_missing_items_alerts() {
        let mut state = loading_state();
        let alert = state.finish_analysis(response(r#"{"success":true,"data":{}}"#));
        assert_eq!(alert, Some(Alert::CouldNotAnalyze));
        assert_eq!(state.phase, Phase::Collecting);
    }

    #[test]
    fn test_empty_items_return_to_form_silently() {
        let mut state = loading_state();
        let alert = state.finish_analysis(response(r#"{"success":true,"data":{"items":[]}}"#));
        assert_eq!(alert, None);
        assert_eq!(state.phase, Phase::Collecting);
    }

    #[test]
    fn test_transport_error_alerts() {
        let mut state = loading_state();
        let alert = state.finish_analysis::<String>(Err("network unreachable".to_string()));
        assert_eq!(alert, Some(Alert::RequestFailed));
        assert_eq!(alert.unwrap().message(), "エラーが発生しました");
        assert_eq!(state.phase, Phase::Collecting);
    }

    #[test]
    fn test_start_over_clears_items_and_estimate_only() {
        let mut state = State::new();
        state.select_estimate(Some("estimate.jpg"));
        state.select_drawing(Some("drawing.png"));
        state.begin_analysis().unwrap();
        state.finish_analysis(response(ONE_ITEM));
        assert_eq!(state.phase, Phase::Result);

        state.start_over();
        assert_eq!(state.phase, Phase::Collecting);
        assert!(state.items.is_empty());
        assert_eq!(state.estimate_file, None);
        assert_eq!(state.drawing_file, Some("drawing.png"));
        assert_eq!(state.totals(), Totals::default());
    }
}
