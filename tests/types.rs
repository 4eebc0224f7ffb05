// ABOUTME: Integration tests for type-safe identifiers and validated image tags.
// ABOUTME: Tests parsing, validation, serde and generated-input properties.

use smoke_runner::types::*;

mod image_ref_tests {
    use super::*;

    #[test]
    fn parse_simple_name() {
        let img = ImageRef::parse("nginx").unwrap();
        assert_eq!(img.name(), "nginx");
        assert_eq!(img.tag(), Some("latest"));
        assert!(img.registry().is_none());
        assert!(img.digest().is_none());
    }

    #[test]
    fn parse_underscored_name_with_tag() {
        let img = ImageRef::parse("intel_image:latest").unwrap();
        assert_eq!(img.name(), "intel_image");
        assert_eq!(img.tag(), Some("latest"));
    }

    #[test]
    fn parse_with_registry_port() {
        let img = ImageRef::parse("localhost:5000/team/app:v1.2.3").unwrap();
        assert_eq!(img.registry(), Some("localhost:5000"));
        assert_eq!(img.name(), "team/app");
        assert_eq!(img.tag(), Some("v1.2.3"));
    }

    #[test]
    fn parse_with_digest_only() {
        let img = ImageRef::parse("nginx@sha256:abc123").unwrap();
        assert_eq!(img.digest(), Some("sha256:abc123"));
        assert!(img.tag().is_none());
    }

    #[test]
    fn rejects_bad_references() {
        for input in ["", "  ", "App:v1", "app:", "app:-v1", "app:.v1", "-app", "app/", "a b"] {
            assert!(ImageRef::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn uppercase_name_has_specific_error() {
        assert_eq!(
            ImageRef::parse("Intel_Image:latest"),
            Err(ParseImageRefError::Uppercase("Intel_Image".to_string()))
        );
    }

    #[test]
    fn display_formats_correctly() {
        let img = ImageRef::parse("ghcr.io/org/app:v1@sha256:abc").unwrap();
        assert_eq!(img.to_string(), "ghcr.io/org/app:v1@sha256:abc");
    }

    #[test]
    fn from_str_matches_parse() {
        let parsed: ImageRef = "intel_image:latest".parse().unwrap();
        assert_eq!(parsed, ImageRef::parse("intel_image:latest").unwrap());
    }
}

mod id_tests {
    use super::*;

    #[test]
    fn container_id_stores_value() {
        let id = ContainerId::new("abc123");
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn image_id_round_trips_through_json() {
        let id = ImageId::new("sha256:feedface");
        let json = serde_json::to_string(&id).unwrap();
        let back: ImageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn valid_name_and_tag_display_round_trips(
            name in "[a-z0-9]([a-z0-9_.-]{0,20}[a-z0-9])?",
            tag in "[A-Za-z0-9_][A-Za-z0-9_.-]{0,30}",
        ) {
            let input = format!("{name}:{tag}");
            let img = ImageRef::parse(&input).unwrap();
            prop_assert_eq!(img.name(), name.as_str());
            prop_assert_eq!(img.tag(), Some(tag.as_str()));
            prop_assert_eq!(img.to_string(), input);
        }

        #[test]
        fn slug_is_a_valid_container_name(
            name in "[a-z0-9]{1,10}(/[a-z0-9]{1,10}){0,2}",
            tag in "[A-Za-z0-9_][A-Za-z0-9_.-]{0,20}",
        ) {
            let img = ImageRef::parse(&format!("{name}:{tag}")).unwrap();
            let slug = img.slug();
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || matches!(c, '_' | '.' | '-')));
            prop_assert!(slug.starts_with(|c: char| c.is_ascii_alphanumeric()));
        }

        #[test]
        fn parse_never_panics(input in "\\PC{0,64}") {
            let _ = ImageRef::parse(&input);
        }

        #[test]
        fn short_id_is_a_prefix(value in "[0-9a-f]{1,64}") {
            let id = ContainerId::new(value.clone());
            prop_assert!(value.starts_with(id.short()));
            prop_assert!(id.short().len() <= 12);
        }
    }
}
