//! Property tests for compiler flag resolution.

use std::path::Path;

use proptest::prelude::*;

use nuwa::{ConfigResolver, Overrides, ProjectConfig};

fn flag() -> impl Strategy<Value = String> {
    proptest::string::string_regex("-{1,2}[a-z]{1,8}(:[a-z0-9]{1,6})?").unwrap()
}

fn flags() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(flag(), 0..6)
}

fn toml_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|f| format!("{f:?}")).collect();
    format!("[{}]", quoted.join(", "))
}

fn project(base: &[String], profile: &[String]) -> ProjectConfig {
    let content = format!(
        "[project]\nname = \"demo\"\n\n[tool.nuwa]\nnim-flags = {}\n\n[tool.nuwa.profiles]\nchosen = {}\n",
        toml_list(base),
        toml_list(profile)
    );
    toml::from_str(&content).expect("generated pyproject parses")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: effective flags are exactly base ++ profile ++ CLI, duplicates kept.
    #[test]
    fn property_flags_concatenate_in_order(
        base in flags(),
        profile in flags(),
        cli in flags(),
    ) {
        let config = project(&base, &profile);
        let overrides = Overrides {
            nim_flags: cli.clone(),
            ..Overrides::default()
        };

        let effective = ConfigResolver::new(Some("chosen".to_string()), overrides)
            .resolve(&config, Path::new("/p"))
            .unwrap();

        let expected: Vec<String> = base.iter().chain(&profile).chain(&cli).cloned().collect();
        prop_assert_eq!(effective.nim_flags, expected);
    }

    /// PROPERTY: without a profile the profile table contributes nothing.
    #[test]
    fn property_no_profile_skips_profile_flags(
        base in flags(),
        profile in flags(),
    ) {
        let config = project(&base, &profile);

        let effective = ConfigResolver::new(None, Overrides::default())
            .resolve(&config, Path::new("/p"))
            .unwrap();

        prop_assert_eq!(effective.nim_flags, base);
    }
}
