//! Prompt template and candidate listing formatters
//!
//! PRIVATE MODULE - Not exported from crate

use codegraph_core::entities::{ClassEntity, MethodEntity};

pub const ENTITY_EXTRACTION: &str = include_str!("../assets/prompts/entity_extraction.txt");

/// Hard cap on classes rendered into the prompt, applied after pre-filtering
/// as an independent guard against prompt-size blowups
pub const MAX_CLASSES_IN_PROMPT: usize = 50;

/// Hard cap on methods rendered into the prompt
pub const MAX_METHODS_IN_PROMPT: usize = 100;

/// Upper bound on entities the model is asked to return
pub const MAX_EXTRACTION_RESULTS: usize = 20;

pub fn format_prompt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Render the full extraction prompt for a query and its candidate sets
pub fn entity_extraction_prompt(
    query: &str,
    classes: &[ClassEntity],
    methods: &[MethodEntity],
) -> String {
    format_prompt(
        ENTITY_EXTRACTION,
        &[
            ("query", query),
            ("class_listing", &format_class_listing(classes)),
            ("method_listing", &format_method_listing(methods)),
            ("max_results", &MAX_EXTRACTION_RESULTS.to_string()),
        ],
    )
}

pub fn format_class_listing(classes: &[ClassEntity]) -> String {
    if classes.is_empty() {
        return "(none)".to_string();
    }
    classes
        .iter()
        .take(MAX_CLASSES_IN_PROMPT)
        .map(|c| match &c.description {
            Some(description) => format!("- {} ({}): {}", c.name, c.package, description),
            None => format!("- {} ({})", c.name, c.package),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_method_listing(methods: &[MethodEntity]) -> String {
    if methods.is_empty() {
        return "(none)".to_string();
    }
    methods
        .iter()
        .take(MAX_METHODS_IN_PROMPT)
        .map(|m| match &m.description {
            Some(description) => format!(
                "- {} [{}] {}: {}",
                m.name, m.class_name, m.signature, description
            ),
            None => format!("- {} [{}] {}", m.name, m.class_name, m.signature),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_prompt() {
        let template = "Hello {name}, you are {age} years old.";
        let vars = [("name", "Alice"), ("age", "30")];
        let result = format_prompt(template, &vars);
        assert_eq!(result, "Hello Alice, you are 30 years old.");
    }

    #[test]
    #[allow(clippy::len_zero)] // const_is_empty conflicts with len_zero for const strings
    fn test_prompt_loads() {
        assert!(ENTITY_EXTRACTION.len() > 0);
        assert!(ENTITY_EXTRACTION.contains("{query}"));
        assert!(ENTITY_EXTRACTION.contains("CLASS:"));
        assert!(ENTITY_EXTRACTION.contains("METHOD:"));
    }

    #[test]
    fn test_class_listing_is_capped() {
        let classes: Vec<ClassEntity> = (0..80)
            .map(|i| ClassEntity::new(format!("C{i}"), "com.shop"))
            .collect();
        let listing = format_class_listing(&classes);
        assert_eq!(listing.lines().count(), MAX_CLASSES_IN_PROMPT);
    }

    #[test]
    fn test_method_listing_is_capped() {
        let methods: Vec<MethodEntity> = (0..150)
            .map(|i| MethodEntity::new(format!("m{i}"), "()", "C", "com.shop"))
            .collect();
        let listing = format_method_listing(&methods);
        assert_eq!(listing.lines().count(), MAX_METHODS_IN_PROMPT);
    }

    #[test]
    fn test_listing_includes_description_when_present() {
        let mut class = ClassEntity::new("OrderService", "com.shop.orders");
        class.description = Some("Coordinates order placement".to_string());
        let listing = format_class_listing(&[class]);
        assert_eq!(
            listing,
            "- OrderService (com.shop.orders): Coordinates order placement"
        );
    }

    #[test]
    fn test_extraction_prompt_substitutes_everything() {
        let prompt = entity_extraction_prompt("where are orders placed", &[], &[]);
        assert!(prompt.contains("where are orders placed"));
        assert!(prompt.contains("(none)"));
        assert!(prompt.contains("at most 20 lines"));
        assert!(!prompt.contains('{'));
    }
}
