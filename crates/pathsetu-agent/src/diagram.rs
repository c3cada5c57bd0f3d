// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded Mermaid diagram handling.
//!
//! Replies may contain a fenced ```` ```mermaid ```` block. [`extract`] cuts
//! the first such block out of the user-visible text and returns its body;
//! [`DiagramRenderer::resolve_image`] turns that body into an image URL on a
//! rendering service. Neither step can fail loudly: anything unexpected means
//! "no diagram".

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use pathsetu_config::model::{DIAGRAM_PAYLOAD_PLACEHOLDER, DiagramConfig};
use tracing::debug;

const OPENING_FENCE: &str = "```mermaid";
const CLOSING_FENCE: &str = "```";

/// Orientation directive stripped from display text.
const ORIENTATION_DIRECTIVE: &str = "graph TD";

/// Result of scanning a reply for a diagram block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub display_text: String,
    pub diagram_spec: Option<String>,
}

/// Splits a reply into display text and an optional diagram body.
///
/// Only the first opening fence and the next closing fence after it are
/// considered. An opening fence without a closing fence is not a diagram and
/// leaves the text untouched.
pub fn extract(reply_text: &str) -> Extraction {
    let unchanged = || Extraction {
        display_text: reply_text.to_string(),
        diagram_spec: None,
    };

    let Some(open) = reply_text.find(OPENING_FENCE) else {
        return unchanged();
    };
    let body_start = open + OPENING_FENCE.len();
    let Some(close_rel) = reply_text[body_start..].find(CLOSING_FENCE) else {
        return unchanged();
    };
    let body_end = body_start + close_rel;

    let before = &reply_text[..open];
    let after = &reply_text[body_end + CLOSING_FENCE.len()..];

    let mut display = String::with_capacity(before.len() + after.len() + 1);
    display.push_str(before);
    if !after.starts_with('\n') {
        display.push('\n');
    }
    display.push_str(after);

    Extraction {
        display_text: display.replace(ORIENTATION_DIRECTIVE, ""),
        diagram_spec: Some(reply_text[body_start..body_end].to_string()),
    }
}

/// Builds image URLs on a diagram rendering service.
#[derive(Debug, Clone)]
pub struct DiagramRenderer {
    template: String,
}

impl DiagramRenderer {
    /// `template` must contain `{payload}`; otherwise every resolution fails.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        Self::new(config.render_url_template.clone())
    }

    /// Encodes the diagram as padded URL-safe base64 and substitutes it into
    /// the template. Returns `None` for an empty diagram or a template that
    /// does not yield a valid URL.
    pub fn resolve_image(&self, diagram_spec: &str) -> Option<String> {
        let code = diagram_spec
            .replace(OPENING_FENCE, "")
            .replace(CLOSING_FENCE, "");
        let code = code.trim();
        if code.is_empty() {
            debug!("diagram body is empty, skipping image");
            return None;
        }
        if !self.template.contains(DIAGRAM_PAYLOAD_PLACEHOLDER) {
            debug!(template = %self.template, "render template has no payload placeholder");
            return None;
        }

        let payload = URL_SAFE.encode(code.as_bytes());
        let candidate = self.template.replace(DIAGRAM_PAYLOAD_PLACEHOLDER, &payload);
        match url::Url::parse(&candidate) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                debug!(error = %e, "rendered diagram URL is invalid");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_block_and_keeps_surrounding_text() {
        let out = extract("Here: ```mermaid\ngraph TD\nA-->B\n```");
        assert_eq!(out.display_text, "Here: \n");
        let spec = out.diagram_spec.expect("diagram");
        assert!(spec.contains("A-->B"));
        assert_eq!(spec, "\ngraph TD\nA-->B\n");
    }

    #[test]
    fn text_without_marker_is_unchanged() {
        let out = extract("no diagram here");
        assert_eq!(out.display_text, "no diagram here");
        assert_eq!(out.diagram_spec, None);
    }

    #[test]
    fn unterminated_block_is_not_a_diagram() {
        let out = extract("```mermaid\nA-->B");
        assert_eq!(out.display_text, "```mermaid\nA-->B");
        assert_eq!(out.diagram_spec, None);
    }

    #[test]
    fn trailing_text_keeps_its_own_newline() {
        let out = extract("Plan:\n```mermaid\nA-->B\n```\nGood luck!");
        assert_eq!(out.display_text, "Plan:\n\nGood luck!");
        assert_eq!(out.diagram_spec.as_deref(), Some("\nA-->B\n"));
    }

    #[test]
    fn only_first_block_is_extracted() {
        let out = extract("```mermaid\nA\n``` and ```mermaid\nB\n```");
        assert_eq!(out.diagram_spec.as_deref(), Some("\nA\n"));
        assert_eq!(out.display_text, "\n and ```mermaid\nB\n```");
    }

    #[test]
    fn stray_orientation_directive_is_removed() {
        let out = extract("Use graph TD layout ```mermaid\nX\n```");
        assert_eq!(out.display_text, "Use  layout \n");
    }

    #[test]
    fn resolves_to_url_safe_base64() {
        let renderer = DiagramRenderer::new("https://mermaid.ink/img/{payload}");
        let url = renderer.resolve_image("\ngraph TD\nA-->B\n").unwrap();
        let expected = URL_SAFE.encode("graph TD\nA-->B");
        assert_eq!(url, format!("https://mermaid.ink/img/{expected}"));
        assert!(!expected.contains('+') && !expected.contains('/'));
    }

    #[test]
    fn refenced_spec_is_cleaned_before_encoding() {
        let renderer = DiagramRenderer::new("https://r.example/{payload}");
        let a = renderer.resolve_image("```mermaid\nA-->B\n```").unwrap();
        let b = renderer.resolve_image("A-->B").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unresolvable_inputs_yield_none() {
        let renderer = DiagramRenderer::new("https://mermaid.ink/img/{payload}");
        assert_eq!(renderer.resolve_image("  \n "), None);
        assert_eq!(renderer.resolve_image("```mermaid\n```"), None);

        assert_eq!(DiagramRenderer::new("https://x/img").resolve_image("A-->B"), None);
        assert_eq!(DiagramRenderer::new("not a url {payload}").resolve_image("A-->B"), None);
    }
}
