use inference_client::DetectionResult;
use serde::Serialize;
use serde_json::{json, Value};

const FULL_SCALE: u32 = 10_000;

pub const NO_DETECTION_MESSAGE: &str = "No shoe detected. Please try another image.";
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The detection service is unavailable. Please try again later.";

/// A model score held in hundredths of a percent so that every rendering
/// of it agrees to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confidence {
    hundredths: u32,
}

impl Confidence {
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            hundredths: (score * FULL_SCALE as f64).round() as u32,
        }
    }

    pub fn percent(&self) -> f64 {
        self.hundredths as f64 / 100.0
    }

    pub fn remaining(&self) -> f64 {
        (FULL_SCALE - self.hundredths) as f64 / 100.0
    }

    pub fn display(&self) -> String {
        format!("{:.2}%", self.percent())
    }

    pub fn remaining_display(&self) -> String {
        format!("{:.2}%", self.remaining())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Detected {
        label: String,
        confidence: Confidence,
    },
    NoDetection,
    ServiceUnavailable,
}

impl Outcome {
    /// Only the first prediction is ever shown.
    pub fn from_result(result: &DetectionResult) -> Self {
        match result.top_prediction() {
            Some(prediction) => Outcome::Detected {
                label: prediction.class_name.clone(),
                confidence: Confidence::from_score(prediction.confidence),
            },
            None => Outcome::NoDetection,
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        match self {
            Outcome::Detected { .. } => AnalysisStatus::Detected,
            Outcome::NoDetection => AnalysisStatus::NoDetection,
            Outcome::ServiceUnavailable => AnalysisStatus::ServiceUnavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Detected,
    NoDetection,
    ServiceUnavailable,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Detected => "detected",
            AnalysisStatus::NoDetection => "no_detection",
            AnalysisStatus::ServiceUnavailable => "service_unavailable",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetectionSummary {
    pub label: String,
    pub confidence: f64,
    pub confidence_text: String,
}

/// What the page renders for one upload.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub status: AnalysisStatus,
    pub message: String,
    pub detection: Option<DetectionSummary>,
    pub gauge: Option<Value>,
    pub bar_chart: Option<Value>,
    pub raw_response: Value,
}

impl AnalysisView {
    pub fn render(outcome: &Outcome, raw_response: Value) -> Self {
        match outcome {
            Outcome::Detected { label, confidence } => Self {
                status: outcome.status(),
                message: format!("Detected: {}", label),
                detection: Some(DetectionSummary {
                    label: label.clone(),
                    confidence: confidence.percent(),
                    confidence_text: confidence.display(),
                }),
                gauge: Some(gauge_options(confidence)),
                bar_chart: Some(bar_chart_options(confidence)),
                raw_response,
            },
            Outcome::NoDetection => Self::without_charts(outcome, NO_DETECTION_MESSAGE, raw_response),
            Outcome::ServiceUnavailable => {
                Self::without_charts(outcome, SERVICE_UNAVAILABLE_MESSAGE, raw_response)
            }
        }
    }

    fn without_charts(outcome: &Outcome, message: &str, raw_response: Value) -> Self {
        Self {
            status: outcome.status(),
            message: message.to_string(),
            detection: None,
            gauge: None,
            bar_chart: None,
            raw_response,
        }
    }
}

pub fn gauge_options(confidence: &Confidence) -> Value {
    json!({
        "series": [{
            "type": "gauge",
            "min": 0,
            "max": 100,
            "progress": {"show": true},
            "axisLine": {"lineStyle": {"width": 20}},
            "pointer": {"length": "80%", "width": 5},
            "detail": {"formatter": confidence.display()},
            "data": [{"value": confidence.percent(), "name": "Confidence"}]
        }]
    })
}

pub fn bar_chart_options(confidence: &Confidence) -> Value {
    json!({
        "title": {"text": "Confidence Breakdown"},
        "xAxis": {"type": "value", "min": 0, "max": 100, "name": "Percentage"},
        "yAxis": {"type": "category", "data": ["Confidence", "Remaining"]},
        "series": [{
            "type": "bar",
            "label": {"show": true, "position": "inside"},
            "data": [
                {
                    "value": confidence.percent(),
                    "label": {"formatter": confidence.display()},
                    "itemStyle": {"color": "green"}
                },
                {
                    "value": confidence.remaining(),
                    "label": {"formatter": confidence.remaining_display()},
                    "itemStyle": {"color": "red"}
                }
            ]
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(raw: Value) -> DetectionResult {
        DetectionResult::from_json(raw).unwrap()
    }

    #[test]
    fn test_confidence_rounding() {
        let confidence = Confidence::from_score(0.9732);

        assert_eq!(confidence.percent(), 97.32);
        assert_eq!(confidence.remaining(), 2.68);
        assert_eq!(confidence.display(), "97.32%");

        assert_eq!(Confidence::from_score(0.123456).display(), "12.35%");
        assert_eq!(Confidence::from_score(1.7).percent(), 100.0);
        assert_eq!(Confidence::from_score(-0.2).percent(), 0.0);
        assert_eq!(Confidence::from_score(f64::NAN).percent(), 0.0);
    }

    #[test]
    fn test_bar_segments_always_sum_to_hundred() {
        for hundredths in 0..=FULL_SCALE {
            let confidence = Confidence::from_score(hundredths as f64 / FULL_SCALE as f64);
            let total = format!("{:.2}", confidence.percent() + confidence.remaining());
            assert_eq!(total, "100.00", "failed at {}", hundredths);

            let bar = bar_chart_options(&confidence);
            assert_eq!(bar["series"][0]["data"][0]["value"], json!(confidence.percent()));
            assert_eq!(bar["series"][0]["data"][1]["value"], json!(confidence.remaining()));
        }
    }

    #[test]
    fn test_bar_labels_keep_two_decimals() {
        let confidence = Confidence::from_score(0.973);

        let bar = bar_chart_options(&confidence);
        let data = &bar["series"][0]["data"];

        assert_eq!(data[0]["label"]["formatter"], "97.30%");
        assert_eq!(data[1]["label"]["formatter"], "2.70%");
        assert_eq!(
            gauge_options(&confidence)["series"][0]["detail"]["formatter"],
            "97.30%"
        );
        assert_eq!(Confidence::from_score(0.5).remaining_display(), "50.00%");
    }

    #[test]
    fn test_first_prediction_wins() {
        let outcome = Outcome::from_result(&result(json!({
            "predictions": [
                {"class": "Original", "confidence": 0.9732},
                {"class": "Fake", "confidence": 0.99}
            ]
        })));

        assert_eq!(
            outcome,
            Outcome::Detected {
                label: "Original".to_string(),
                confidence: Confidence::from_score(0.9732),
            }
        );
    }

    #[test]
    fn test_detected_view_is_consistent() {
        let raw = json!({"predictions": [{"class": "Original", "confidence": 0.9732}]});
        let outcome = Outcome::from_result(&result(raw.clone()));

        let view = AnalysisView::render(&outcome, raw.clone());

        assert_eq!(view.status, AnalysisStatus::Detected);
        assert_eq!(view.message, "Detected: Original");
        let detection = view.detection.unwrap();
        assert_eq!(detection.label, "Original");
        assert_eq!(detection.confidence, 97.32);
        assert_eq!(detection.confidence_text, "97.32%");

        let gauge = view.gauge.unwrap();
        assert_eq!(gauge["series"][0]["data"][0]["value"], json!(97.32));
        assert_eq!(gauge["series"][0]["detail"]["formatter"], "97.32%");

        let bar = view.bar_chart.unwrap();
        assert_eq!(bar["series"][0]["data"][0]["value"], json!(97.32));
        assert_eq!(bar["series"][0]["data"][1]["value"], json!(2.68));
        assert_eq!(view.raw_response, raw);
    }

    #[test]
    fn test_no_detection_view_has_no_charts() {
        let raw = json!({"predictions": []});
        let outcome = Outcome::from_result(&result(raw.clone()));

        let view = AnalysisView::render(&outcome, raw.clone());

        assert_eq!(view.status, AnalysisStatus::NoDetection);
        assert_eq!(view.message, NO_DETECTION_MESSAGE);
        assert!(view.detection.is_none());
        assert!(view.gauge.is_none());
        assert!(view.bar_chart.is_none());
        assert_eq!(view.raw_response, raw);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let view = AnalysisView::render(
            &Outcome::ServiceUnavailable,
            json!({"error": "connection refused"}),
        );

        let serialized = serde_json::to_value(&view).unwrap();

        assert_eq!(serialized["status"], "service_unavailable");
        assert_eq!(serialized["gauge"], Value::Null);
        assert_eq!(AnalysisStatus::ServiceUnavailable.as_str(), "service_unavailable");
    }
}
