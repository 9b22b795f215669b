//! End-to-end tests: glossary file and settings through the tooltip filter

use glosstip_core::{
    FilterSettings, GlossaryStore, Limits, TooltipFilter, TriggerEvent, TOOLTIP_LIBRARY,
};
use std::io::Write;

const GLOSSARY: &str = r#"
[[vocabulary]]
id = "nutrition"
name = "Nutrition"

[[vocabulary.terms]]
name = "Milk powder"
description = "Milk that has been dried."
id = "12"

[[vocabulary.terms]]
name = "Milk"
description = "A white liquid."
id = "7"

[[vocabulary.terms]]
name = "Lait"
description = "Un liquide blanc."
id = "8"
langcode = "fr"

[[vocabulary.terms]]
name = "Draft"
description = ""
id = "9"
"#;

fn write_glossary(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn settings(toml: &str) -> FilterSettings {
    FilterSettings::from_toml_str(toml).unwrap()
}

#[test]
fn test_full_pipeline_from_files() {
    let file = write_glossary(".toml", GLOSSARY);
    let store = GlossaryStore::from_file(file.path()).unwrap();

    let filter = TooltipFilter::new(
        settings(
            r#"
vocabulary = "nutrition"
automatic = true
occurrence_limit = 1
exclude_tags = "h1"
trigger_event = "mouseover"
"#,
        ),
        store,
    );

    let html = "<h1>Milk</h1>\n<p>Milk powder is not milk. Draft beer.</p>";
    let result = filter.process(html, Some("en")).unwrap();

    assert!(result.text.starts_with("<h1>Milk</h1>\n<p><span class=\"glosstip\" tabindex=\"0\">Milk powder<span"));
    assert!(result.text.contains("Milk that has been dried."));
    assert!(result.text.contains(">milk<span class=\"glosstip__description\" role=\"tooltip\">A white liquid.</span></span>."));
    assert!(result.text.ends_with("Draft beer.</p>"));
    assert_eq!(result.stats.annotated, 2);
    assert_eq!(result.stats.guarded, 1);

    let attachments = result.attachments.unwrap();
    assert_eq!(attachments.library, vec![TOOLTIP_LIBRARY]);
    assert_eq!(attachments.settings.trigger_event, TriggerEvent::Mouseover);
}

#[test]
fn test_json_glossary() {
    let file = write_glossary(
        ".json",
        r#"{"vocabulary": [{"id": "v", "terms": [{"name": "cocoa", "description": "Beans.", "id": "3"}]}]}"#,
    );
    let store = GlossaryStore::from_file(file.path()).unwrap();
    let filter = TooltipFilter::new(settings("vocabulary = \"v\"\nautomatic = true"), store);

    let result = filter.process("Cocoa!", None).unwrap();
    assert!(result.text.contains(">Cocoa<span"));
}

#[test]
fn test_attachment_serialization() {
    let store = GlossaryStore::from_toml_str(GLOSSARY).unwrap();
    let filter = TooltipFilter::new(settings("vocabulary = \"nutrition\"\nautomatic = true"), store);

    let result = filter.process("plain text", None).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["text"], "plain text");
    assert_eq!(json["attachments"]["library"][0], "glosstip/tooltips");
    assert_eq!(json["attachments"]["settings"]["trigger_event"], "click");
    assert_eq!(json["stats"]["annotated"], 0);
}

#[test]
fn test_limits_are_enforced() {
    let store = GlossaryStore::from_toml_str(GLOSSARY).unwrap();
    let filter = TooltipFilter::new(settings("vocabulary = \"nutrition\"\nautomatic = true"), store)
        .with_limits(Limits {
            max_text_bytes: Some(4),
            max_terms: None,
        });

    assert!(filter.process("milk milk", None).is_err());
    assert_eq!(filter.process("milk", None).unwrap().stats.annotated, 1);
}

#[test]
fn test_unconfigured_filter_never_fails() {
    let store = GlossaryStore::default();
    let filter = TooltipFilter::new(FilterSettings::default(), store);

    let result = filter.process("<p>milk</p>", Some("en")).unwrap();
    assert_eq!(result.text, "<p>milk</p>");
    assert!(result.attachments.is_none());
}
