use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One detected object as returned by the hosted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "class")]
    pub class_name: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_id: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

/// Parsed predictions alongside the untouched vendor payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    pub predictions: Vec<Prediction>,
    pub raw: Value,
}

impl DetectionResult {
    pub fn from_json(raw: Value) -> Result<Self, serde_json::Error> {
        let envelope = Envelope::deserialize(&raw)?;
        Ok(Self {
            predictions: envelope.predictions,
            raw,
        })
    }

    pub fn top_prediction(&self) -> Option<&Prediction> {
        self.predictions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_hosted_response() {
        let raw = json!({
            "time": 0.041,
            "image": {"width": 640, "height": 480},
            "predictions": [
                {
                    "x": 320.5, "y": 240.0, "width": 200.0, "height": 120.0,
                    "confidence": 0.9732, "class": "Original",
                    "class_id": 1, "detection_id": "8f1c"
                },
                {"confidence": 0.41, "class": "Fake"}
            ]
        });

        let result = DetectionResult::from_json(raw.clone()).unwrap();

        assert_eq!(result.predictions.len(), 2);
        let top = result.top_prediction().unwrap();
        assert_eq!(top.class_name, "Original");
        assert_eq!(top.confidence, 0.9732);
        assert_eq!(top.class_id, Some(1));
        assert_eq!(result.predictions[1].x, None);
        assert_eq!(result.raw, raw);
    }

    #[test]
    fn test_missing_predictions_is_empty() {
        let result = DetectionResult::from_json(json!({"time": 0.02})).unwrap();

        assert!(result.predictions.is_empty());
        assert!(result.top_prediction().is_none());
    }

    #[test]
    fn test_prediction_without_class_is_rejected() {
        let raw = json!({"predictions": [{"confidence": 0.5}]});
        assert!(DetectionResult::from_json(raw).is_err());
    }
}
