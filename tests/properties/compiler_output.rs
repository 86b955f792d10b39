//! Property tests for compiler output parsing.

use std::path::Path;

use proptest::prelude::*;

use nuwa::domain::ports::MemoryReader;
use nuwa::domain::services::{parse_includes, parse_located_line, DiagnosticTranslator};
use nuwa::Severity;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: translation never panics and never loses a located line.
    #[test]
    fn property_translate_never_panics(raw in "(?s).{0,512}") {
        let reader = MemoryReader::new();
        let translation = DiagnosticTranslator::new(Path::new("/src"), &reader).translate(&raw);
        let located = raw.lines().filter(|l| parse_located_line(l).is_some()).count();
        prop_assert_eq!(translation.diagnostics.len(), located);
    }

    /// PROPERTY: well-formed located lines parse back to their parts.
    #[test]
    fn property_located_line_parses(
        file in "[a-z_/]{1,20}\\.nim",
        line in 1usize..100_000,
        column in 1usize..500,
        severity in prop_oneof![Just("Error"), Just("Warning"), Just("Hint")],
        message in "[ -~]{1,80}",
    ) {
        let text = format!("{file}({line}, {column}) {severity}: {message}");
        let parsed = parse_located_line(&text).expect("located line");
        prop_assert_eq!(parsed.file, file.as_str());
        prop_assert_eq!(parsed.line, line);
        prop_assert_eq!(parsed.column, column);
        prop_assert_eq!(Some(parsed.severity), Severity::parse(severity));
    }

    /// PROPERTY: the include parser never panics and always yields `.nim`-terminated names.
    #[test]
    fn property_includes_never_panic(content in "(?s).{0,512}") {
        for name in parse_includes(&content) {
            prop_assert!(name.contains('.'), "{:?}", name);
        }
    }
}
