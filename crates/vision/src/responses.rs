//! Wire types for the Azure Computer Vision v3.2 REST API and their
//! conversion into domain values.
//!
//! Conversion is separated from transport so the parsing rules (first caption
//! wins, confidences must be in `[0, 1]`) are testable without a network.

use pipeline::{AnalysisError, Caption, Confidence, Tag};
use serde::Deserialize;

/// Body of a `POST /vision/v3.2/describe` response.
#[derive(Debug, Deserialize)]
pub(crate) struct DescribeResponse {
    pub description: DescriptionDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DescriptionDetail {
    /// Caption candidates, best first. May be empty for images the service
    /// cannot describe.
    #[serde(default)]
    pub captions: Vec<CaptionDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CaptionDto {
    pub text: String,
    pub confidence: f64,
}

/// Body of a `POST /vision/v3.2/analyze?visualFeatures=Tags` response.
#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeResponse {
    #[serde(default)]
    pub tags: Vec<TagDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagDto {
    pub name: String,
    pub confidence: f64,
}

/// Extracts the first caption candidate, or fails if there is none.
pub(crate) fn caption_from(response: DescribeResponse) -> Result<Caption, AnalysisError> {
    let best = response
        .description
        .captions
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::MalformedResponse {
            message: "describe response has no caption candidates".into(),
        })?;
    Ok(Caption {
        confidence: confidence_from(best.confidence, "caption")?,
        text: best.text,
    })
}

/// Converts the tag list, preserving service order.
pub(crate) fn tags_from(response: AnalyzeResponse) -> Result<Vec<Tag>, AnalysisError> {
    response
        .tags
        .into_iter()
        .map(|tag| {
            Ok(Tag {
                confidence: confidence_from(tag.confidence, "tag")?,
                name: tag.name,
            })
        })
        .collect()
}

fn confidence_from(value: f64, field: &str) -> Result<Confidence, AnalysisError> {
    Confidence::new(value).ok_or_else(|| AnalysisError::MalformedResponse {
        message: format!("{field} confidence {value} outside [0, 1]"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_response_yields_first_caption() {
        let response: DescribeResponse = serde_json::from_str(
            r#"{
                "description": {
                    "tags": ["cat", "indoor"],
                    "captions": [
                        { "text": "a cat", "confidence": 0.91 },
                        { "text": "a small cat", "confidence": 0.55 }
                    ]
                },
                "requestId": "0dd2caa1",
                "metadata": { "width": 800, "height": 600, "format": "Jpeg" }
            }"#,
        )
        .unwrap();

        let caption = caption_from(response).unwrap();
        assert_eq!(caption.text, "a cat");
        assert_eq!(caption.confidence.to_string(), "0.91");
    }

    #[test]
    fn empty_caption_list_is_malformed() {
        let response: DescribeResponse =
            serde_json::from_str(r#"{ "description": { "captions": [] } }"#).unwrap();
        let err = caption_from(response).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse { .. }));
    }

    #[test]
    fn analyze_response_preserves_tag_order() {
        let response: AnalyzeResponse = serde_json::from_str(
            r#"{
                "tags": [
                    { "name": "cat", "confidence": 0.98 },
                    { "name": "animal", "confidence": 0.76 }
                ],
                "requestId": "0dd2caa1"
            }"#,
        )
        .unwrap();

        let tags = tags_from(response).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "cat");
        assert_eq!(tags[1].name, "animal");
    }

    #[test]
    fn missing_tags_key_is_empty_list() {
        let response: AnalyzeResponse = serde_json::from_str(r#"{ "requestId": "x" }"#).unwrap();
        assert!(tags_from(response).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_confidence_is_malformed() {
        let response: AnalyzeResponse =
            serde_json::from_str(r#"{ "tags": [ { "name": "cat", "confidence": 1.5 } ] }"#)
                .unwrap();
        let err = tags_from(response).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse { .. }));
    }
}
