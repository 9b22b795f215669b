//! Tooltip rendering seam
//!
//! The engine never builds markup itself: every annotated match goes through
//! a [`Render`] implementation. Closures work directly, and
//! [`TooltipTemplate`] provides a plain default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Emitted instead of calling the formatter when a match is empty
pub const BROKEN_TOOLTIP: &str = "[broken-tooltip]";

/// Failure reported by a formatter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    /// Create an error with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns a matched term and its description into tooltip markup
pub trait Render {
    /// Render one annotation
    ///
    /// `title` is the matched text exactly as it appears in the input, so its
    /// case may differ from the glossary term.
    fn render(&self, title: &str, description: &str) -> Result<String, RenderError>;
}

impl<F> Render for F
where
    F: Fn(&str, &str) -> Result<String, RenderError>,
{
    fn render(&self, title: &str, description: &str) -> Result<String, RenderError> {
        self(title, description)
    }
}

/// Render one occurrence, guarding the formatter against unusable input
///
/// An empty description yields the title unchanged and an empty title yields
/// [`BROKEN_TOOLTIP`]; the formatter is only called with both present.
pub fn render_occurrence<R>(
    renderer: &R,
    title: &str,
    description: &str,
) -> Result<String, RenderError>
where
    R: Render + ?Sized,
{
    if title.is_empty() {
        return Ok(BROKEN_TOOLTIP.to_string());
    }
    if description.is_empty() {
        return Ok(title.to_string());
    }
    renderer.render(title, description)
}

/// Default tooltip markup
///
/// Produces
/// `<span class="glosstip" tabindex="0">title<span class="glosstip__description" role="tooltip">description</span></span>`.
/// Title and description are inserted verbatim: the title is a slice of the
/// input markup and descriptions may carry the "read more" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipTemplate {
    /// Class of the wrapping element
    pub wrapper_class: String,
    /// Class of the element holding the description
    pub description_class: String,
}

impl Default for TooltipTemplate {
    fn default() -> Self {
        Self {
            wrapper_class: "glosstip".to_string(),
            description_class: "glosstip__description".to_string(),
        }
    }
}

impl Render for TooltipTemplate {
    fn render(&self, title: &str, description: &str) -> Result<String, RenderError> {
        Ok(format!(
            r#"<span class="{}" tabindex="0">{}<span class="{}" role="tooltip">{}</span></span>"#,
            self.wrapper_class, title, self.description_class, description
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_closure_renderer() {
        let renderer = |title: &str, description: &str| -> Result<String, RenderError> {
            Ok(format!("[{title}|{description}]"))
        };
        assert_eq!(
            render_occurrence(&renderer, "Milk", "A liquid.").unwrap(),
            "[Milk|A liquid.]"
        );
    }

    #[test]
    fn test_empty_description_skips_formatter() {
        let calls = Cell::new(0);
        let renderer = |_: &str, _: &str| -> Result<String, RenderError> {
            calls.set(calls.get() + 1);
            Ok(String::from("rendered"))
        };

        assert_eq!(render_occurrence(&renderer, "Milk", "").unwrap(), "Milk");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_empty_title_is_broken_marker() {
        let renderer = |_: &str, _: &str| -> Result<String, RenderError> {
            Err(RenderError::new("must not be called"))
        };

        assert_eq!(
            render_occurrence(&renderer, "", "A liquid.").unwrap(),
            BROKEN_TOOLTIP
        );
        assert_eq!(render_occurrence(&renderer, "", "").unwrap(), BROKEN_TOOLTIP);
    }

    #[test]
    fn test_formatter_errors_propagate() {
        let renderer = |_: &str, _: &str| -> Result<String, RenderError> {
            Err(RenderError::new("theme unavailable"))
        };

        let error = render_occurrence(&renderer, "Milk", "A liquid.").unwrap_err();
        assert_eq!(error.to_string(), "theme unavailable");
    }

    #[test]
    fn test_default_template() {
        let html = TooltipTemplate::default().render("Milk", "A liquid.").unwrap();
        assert_eq!(
            html,
            r#"<span class="glosstip" tabindex="0">Milk<span class="glosstip__description" role="tooltip">A liquid.</span></span>"#
        );
    }
}
