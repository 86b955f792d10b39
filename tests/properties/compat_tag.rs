//! Property tests for compatibility tag derivation.

use proptest::prelude::*;

use nuwa::{CompatibilityTag, RuntimeInfo};

fn runtime() -> impl Strategy<Value = RuntimeInfo> {
    (
        prop_oneof!["cpython", "CPython", "pypy", "graalpy"],
        3u32..4,
        0u32..20,
        prop_oneof!["", "t", "d"],
        proptest::option::of("[a-z0-9_-]{1,24}"),
        prop_oneof![
            "[A-Za-z0-9._-]{1,24}",
            "macosx-1[0-4]\\.[0-9]-(universal2|intel|arm64|x86_64)",
        ],
        proptest::option::of(prop_oneof!["arm64", "x86_64", "AMD64"]),
        proptest::option::of("1[0-5]\\.[0-9]{1,2}(\\.[0-9])?"),
        proptest::option::of(prop_oneof![Just(32u32), Just(64u32)]),
    )
        .prop_map(
            |(implementation, major, minor, abiflags, soabi, platform, machine, mac_version, pointer_bits)| {
                RuntimeInfo {
                    implementation: implementation.to_string(),
                    major,
                    minor,
                    abiflags: abiflags.to_string(),
                    soabi,
                    platform,
                    machine,
                    mac_version,
                    pointer_bits,
                    ..RuntimeInfo::default()
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the same runtime always yields the same tag.
    #[test]
    fn property_tag_is_deterministic(info in runtime()) {
        prop_assert_eq!(
            CompatibilityTag::from_runtime(&info),
            CompatibilityTag::from_runtime(&info.clone())
        );
    }

    /// PROPERTY: every tag component is a valid wheel filename segment.
    #[test]
    fn property_tag_components_are_filename_safe(info in runtime()) {
        let tag = CompatibilityTag::from_runtime(&info);
        for part in [&tag.interpreter, &tag.abi, &tag.platform] {
            prop_assert!(!part.is_empty());
            prop_assert!(
                part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "{:?}", part
            );
        }
        prop_assert_eq!(tag.to_string().matches('-').count(), 2);
    }

    /// PROPERTY: CPython ABI tags carry the version and the ABI flags.
    #[test]
    fn property_cpython_abi_tracks_flags(minor in 0u32..20, free_threaded in any::<bool>()) {
        let info = RuntimeInfo {
            implementation: "cpython".to_string(),
            major: 3,
            minor,
            abiflags: if free_threaded { "t".to_string() } else { String::new() },
            soabi: None,
            platform: "linux-x86_64".to_string(),
            ..RuntimeInfo::default()
        };
        let tag = CompatibilityTag::from_runtime(&info);
        prop_assert_eq!(&tag.interpreter, &format!("cp3{minor}"));
        let expected_abi = format!("cp3{minor}{}", if free_threaded { "t" } else { "" });
        prop_assert_eq!(&tag.abi, &expected_abi);
    }
}
