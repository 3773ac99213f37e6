#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::*;

    fn validate(json: &str) -> ValidationReport {
        Validator::default().validate("d", &Document::from_json_str(json).unwrap())
    }

    fn severities(r: &ValidationReport) -> Vec<(Severity, Option<&str>)> {
        r.issues
            .iter()
            .map(|i| (i.severity, i.input_id.as_deref()))
            .collect()
    }

    #[test]
    fn missing_id_is_a_single_error() {
        let r = validate(r#"{"title": "t", "inputs": [{"type": "number_range", "min": 10, "max": 5}]}"#);
        assert_eq!(r.errors(), 1);
        assert_eq!(severities(&r), [(Severity::Error, Some("input[0]"))]);
    }

    #[test]
    fn inverted_range_names_the_input() {
        let r = validate(
            r#"{"title": "t", "inputs": [{"id": "n", "type": "number_range", "min": 10, "max": 5}]}"#,
        );
        assert_eq!(r.errors(), 1);
        let issue = &r.issues[0];
        assert_eq!(issue.input_id.as_deref(), Some("n"));
        assert_eq!(
            issue.message,
            "min value (10.00) must be less than max value (5.00)"
        );
    }

    #[test]
    fn initial_outside_range_is_a_warning() {
        let r = validate(
            r#"{"title": "t", "inputs": [{"id": "n", "type": "number_range", "min": 0, "max": 10, "initial": 20}]}"#,
        );
        assert_eq!(severities(&r), [(Severity::Warning, Some("n"))]);
        assert!(r.issues[0].message.contains("outside range"));
    }

    #[test]
    fn non_finite_numbers_are_errors() {
        let ron = |src: &str| Validator::default().validate("d", &Document::from_ron_str(src).unwrap());
        let r = ron(r#"{"title": "t", "inputs": [{"id": "n", "type": "number_range", "min": NaN, "max": 5}]}"#);
        assert_eq!(severities(&r), [(Severity::Error, Some("n"))]);
        assert_eq!(r.issues[0].message, "min value (NaN) must be a finite number");

        let r = ron(
            r#"{"title": "t", "inputs": [{"id": "n", "type": "number_range", "min": 0, "max": 5, "step": NaN, "initial": inf}]}"#,
        );
        assert_eq!(
            severities(&r),
            [(Severity::Error, Some("n")), (Severity::Error, Some("n"))]
        );
        assert!(r.issues[0].message.starts_with("step value"));
        assert!(r.issues[1].message.starts_with("initial value (inf)"));
    }

    #[test]
    fn missing_type_and_title() {
        let r = validate(r#"{"inputs": [{"id": "a"}]}"#);
        assert_eq!(
            severities(&r),
            [(Severity::Warning, Some("a")), (Severity::Warning, None)]
        );
        assert_eq!(r.issues[1].message, "No title specified");
    }

    #[test]
    fn text_length_rules() {
        let r = validate(
            r#"{"title": "t", "inputs": [
                {"id": "a", "type": "text", "initial": "&aHello there", "max_length": 5},
                {"id": "b", "type": "text", "max_length": 0},
                {"id": "c", "type": "text", "initial": "plain", "max_length": 10}
            ]}"#,
        );
        assert_eq!(
            severities(&r),
            [
                (Severity::Warning, Some("a")),
                (Severity::Info, Some("a")),
                (Severity::Warning, Some("b")),
            ]
        );
        assert_eq!(
            r.issues[0].suggestion.as_deref(),
            Some("Increase max_length to at least 63 or simplify initial text")
        );
    }

    #[test]
    fn formatter_is_used_for_length() {
        let strip = |s: &str| s.replace("&a", "");
        let v = Validator::new(Arc::new(strip));
        let doc = Document::from_json_str(
            r#"{"title": "t", "inputs": [{"id": "a", "type": "text", "initial": "&aHi", "max_length": 3}]}"#,
        )
        .unwrap();
        // "Hi" fits; only the low max_length hint remains
        assert_eq!(severities(&v.validate("d", &doc)), [(Severity::Info, Some("a"))]);
    }

    #[test]
    fn boolean_initial_must_be_bool() {
        let r = validate(
            r#"{"title": "t", "inputs": [
                {"id": "x", "type": "boolean", "initial": "yes"},
                {"id": "y", "type": "boolean", "initial": false}
            ]}"#,
        );
        assert_eq!(severities(&r), [(Severity::Warning, Some("x"))]);
    }

    #[test]
    fn duplicate_ids_are_errors() {
        let r = validate(
            r#"{"title": "t", "inputs": [{"id": "a", "type": "text"}, {"id": "a", "type": "boolean"}]}"#,
        );
        assert_eq!(severities(&r), [(Severity::Error, Some("a"))]);
    }

    #[test]
    fn button_group_without_confirm_or_cancel() {
        let r = validate(r#"{"title": "t", "buttons": {"ok": {"text": "x"}}}"#);
        assert_eq!(severities(&r), [(Severity::Warning, None)]);
        // applies to every dialog type
        let r = validate(r#"{"title": "t", "type": "multi_action", "buttons": {"ok": {}}}"#);
        assert_eq!(severities(&r), [(Severity::Warning, None)]);
        let r = validate(r#"{"title": "t", "buttons": {"cancel": {}}}"#);
        assert!(r.is_clean());
    }

    #[test]
    fn legacy_layout_is_info_and_still_checked() {
        let doc = Document::from_json_str(r#"{"old": {"inputs": [{"type": "text"}]}}"#).unwrap();
        let r = Validator::default().validate("old", &doc);
        assert_eq!(
            severities(&r),
            [
                (Severity::Info, None),
                (Severity::Error, Some("input[0]")),
                (Severity::Warning, None),
            ]
        );
    }

    #[test]
    fn report_helpers_and_policy() {
        let mut catalog = DialogCatalog::new();
        catalog.insert_json("b", r#"{"title": "fine"}"#).unwrap();
        catalog
            .insert_json("a", r#"{"inputs": [{"type": "text"}]}"#)
            .unwrap();
        let r = Validator::default().validate_catalog(&catalog);
        assert_eq!(r.summary(), "1 errors, 1 warnings, 0 info messages");
        assert_eq!(r.for_dialog("a").issues.len(), 2);
        assert!(r.for_dialog("b").is_clean());
        assert!(!ValidationPolicy::Advisory.blocks(&r));
        assert!(ValidationPolicy::BlockOnError.blocks(&r));
        assert_eq!(ValidationPolicy::default(), ValidationPolicy::Advisory);
        assert_eq!(
            r.issues[0].to_string(),
            "ERROR [a -> input[0]]: Input is missing required 'id' field"
        );
    }
}
