//! Response classification

use crate::config::CrudConfig;
use crate::dom::markup;
use crate::types::Verdict;

/// Decides whether a submission response is an acceptance or a re-rendered
/// form with errors.
///
/// Any `Fn(&str) -> Verdict` closure is a classifier.
pub trait ResponseClassifier: Send + Sync {
    fn classify(&self, body: &str) -> Verdict;
}

impl<F> ResponseClassifier for F
where
    F: Fn(&str) -> Verdict + Send + Sync,
{
    fn classify(&self, body: &str) -> Verdict {
        self(body)
    }
}

/// Rejects any response containing an element with one of the marker classes
/// (`has-error` on fields, `alert` on the form), whatever the status code.
#[derive(Debug, Clone)]
pub struct MarkupClassifier {
    markers: Vec<String>,
}

impl MarkupClassifier {
    #[must_use]
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    #[must_use]
    pub fn from_config(config: &CrudConfig) -> Self {
        Self::new(config.classifier.error_markers.clone())
    }
}

impl Default for MarkupClassifier {
    fn default() -> Self {
        Self::from_config(&CrudConfig::default())
    }
}

impl ResponseClassifier for MarkupClassifier {
    fn classify(&self, body: &str) -> Verdict {
        if markup::contains_class(body, &self.markers) {
            Verdict::Rejected
        } else {
            Verdict::Accepted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_is_rejected() {
        let body = r#"<form id="create-edit-form"><div class="form-group has-error">
            <input name="title"><span class="help-block">This field is required.</span></div></form>"#;
        assert_eq!(MarkupClassifier::default().classify(body), Verdict::Rejected);
    }

    #[test]
    fn form_alert_is_rejected() {
        let body = r#"<div class="alert alert-danger">Duplicate title</div><form></form>"#;
        assert_eq!(MarkupClassifier::default().classify(body), Verdict::Rejected);
    }

    #[test]
    fn json_payload_is_accepted() {
        let body = r#"{"pk": 9, "name": "Gadgets"}"#;
        assert_eq!(MarkupClassifier::default().classify(body), Verdict::Accepted);
    }

    #[test]
    fn clean_markup_is_accepted() {
        let body = r#"<p class="text-success">Saved</p>"#;
        assert_eq!(MarkupClassifier::default().classify(body), Verdict::Accepted);
    }

    #[test]
    fn closures_are_classifiers() {
        let strict = |body: &str| {
            if body.trim_start().starts_with('{') {
                Verdict::Accepted
            } else {
                Verdict::Rejected
            }
        };
        assert_eq!(strict.classify("<p>ok</p>"), Verdict::Rejected);
        assert_eq!(strict.classify(r#"{"pk":1}"#), Verdict::Accepted);
    }
}
