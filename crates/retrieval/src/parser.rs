//! Line-oriented parser for the model's extraction response

use codegraph_core::entities::ExtractedEntities;

const CLASS_PREFIX: &str = "CLASS:";
const METHOD_PREFIX: &str = "METHOD:";

/// Parse `CLASS:` / `METHOD:` lines out of a raw model response.
///
/// Blank lines and lines matching neither prefix are ignored; a prefix with
/// an empty remainder is skipped. The packages and terms lists are always
/// empty under the current extraction grammar.
pub fn parse_llm_response(response: &str) -> ExtractedEntities {
    let mut classes = Vec::new();
    let mut methods = Vec::new();

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(CLASS_PREFIX) {
            let name = rest.trim();
            if !name.is_empty() {
                classes.push(name.to_string());
            }
        } else if let Some(rest) = line.strip_prefix(METHOD_PREFIX) {
            let name = rest.trim();
            if !name.is_empty() {
                methods.push(name.to_string());
            }
        }
    }

    ExtractedEntities::new(classes, methods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_round_trip() {
        let response = "CLASS: OrderService\nMETHOD: processOrder\n\nignored line\n";
        let extracted = parse_llm_response(response);
        assert_eq!(extracted.classes, vec!["OrderService"]);
        assert_eq!(extracted.methods, vec!["processOrder"]);
        assert!(extracted.packages.is_empty());
        assert!(extracted.terms.is_empty());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let response = "  CLASS:   OrderService  \n\tMETHOD: processOrder\t\n";
        let extracted = parse_llm_response(response);
        assert_eq!(extracted.classes, vec!["OrderService"]);
        assert_eq!(extracted.methods, vec!["processOrder"]);
    }

    #[test]
    fn test_parse_skips_empty_names() {
        let response = "CLASS:\nMETHOD:   \nCLASS: Billing\n";
        let extracted = parse_llm_response(response);
        assert_eq!(extracted.classes, vec!["Billing"]);
        assert!(extracted.methods.is_empty());
    }

    #[test]
    fn test_parse_ignores_unknown_lines_without_error() {
        let response = "Here are the results:\nCLASS: OrderService\nPACKAGE: com.shop\n";
        let extracted = parse_llm_response(response);
        assert_eq!(extracted.classes, vec!["OrderService"]);
        assert_eq!(extracted.total_count(), 1);
    }

    #[test]
    fn test_parse_empty_response() {
        let extracted = parse_llm_response("");
        assert!(!extracted.has_entities());
    }

    #[test]
    fn test_parse_preserves_response_order_within_kind() {
        let response = "METHOD: b\nCLASS: A\nMETHOD: a\nCLASS: B\n";
        let extracted = parse_llm_response(response);
        assert_eq!(extracted.classes, vec!["A", "B"]);
        assert_eq!(extracted.methods, vec!["b", "a"]);
    }
}
