//! Property-based tests for chatvault.
//!
//! These tests generate random inputs to find edge cases.

use proptest::prelude::*;

use chatvault::config::RowWriterConfig;
use chatvault::fetch::local_path;
use chatvault::model::{Channel, Emoji, Role};
use chatvault::output::to_delimited;
use chatvault::row::{DomainValue, FixedClock, HEADER_WIDTH, RowSerializer, flag};
use chrono::{TimeZone, Utc};

fn serializer() -> RowSerializer<FixedClock> {
    RowSerializer::with_clock(FixedClock(
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
    ))
}

/// Path segments that survive locator parsing untouched.
fn arb_segment() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "attachments".to_string(),
        "avatars".to_string(),
        "emojis".to_string(),
        "123456789012345678".to_string(),
        "a_1f2e3d".to_string(),
        "cat.png".to_string(),
        "report-v2.pdf".to_string(),
        "x".to_string(),
    ])
}

fn arb_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_segment(), 1..6)
}

/// Field text including the characters a delimited line must escape.
fn arb_text() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        String::new(),
        "plain".to_string(),
        "tab\there".to_string(),
        "line\nbreak".to_string(),
        "quote \"inside\"".to_string(),
        "comma, separated".to_string(),
        "Привет мир".to_string(),
        "🎉🔥 emoji".to_string(),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // LOCAL PATH PROPERTIES
    // ============================================

    /// The local path is exactly the locator's path segments
    #[test]
    fn local_path_mirrors_segments(segments in arb_segments()) {
        let locator = format!("https://cdn.example/{}", segments.join("/"));
        let path = local_path(&locator).unwrap();
        let parts: Vec<String> = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        prop_assert_eq!(parts, segments);
    }

    /// Query strings never change the local path
    #[test]
    fn local_path_ignores_query(segments in arb_segments(), size in 16u32..4096) {
        let base = format!("https://cdn.example/{}", segments.join("/"));
        let with_query = format!("{base}?size={size}&ex=abc");
        prop_assert_eq!(local_path(&base).unwrap(), local_path(&with_query).unwrap());
    }

    /// Host and scheme never change the local path
    #[test]
    fn local_path_ignores_host(segments in arb_segments()) {
        let joined = segments.join("/");
        let a = local_path(&format!("https://cdn.example/{joined}")).unwrap();
        let b = local_path(&format!("http://127.0.0.1:8080/{joined}")).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Derived paths are always relative
    #[test]
    fn local_path_is_relative(segments in arb_segments()) {
        let path = local_path(&format!("https://cdn.example//{}", segments.join("//"))).unwrap();
        prop_assert!(path.is_relative());
    }

    // ============================================
    // ROW PROPERTIES
    // ============================================

    /// Flags render as their name or as nothing, never as a boolean literal
    #[test]
    fn flag_is_name_or_empty(set in any::<bool>()) {
        let rendered = flag("hoist", set);
        prop_assert_eq!(rendered.is_empty(), !set);
        prop_assert!(rendered != "true" && rendered != "false");
    }

    /// Serializing the same value twice gives the same row
    #[test]
    fn serialize_is_deterministic(
        name in arb_text(),
        color in any::<i64>(),
        permissions in any::<u64>(),
        hoist in any::<bool>(),
    ) {
        let value = DomainValue::from(Role {
            id: "9".into(),
            name,
            color,
            permissions,
            hoist,
            ..Role::default()
        });
        let s = serializer();
        prop_assert_eq!(
            s.serialize("rest", "update", &value).unwrap(),
            s.serialize("rest", "update", &value).unwrap()
        );
    }

    /// Row length is header plus the shape's declared width
    #[test]
    fn row_width_is_fixed(name in arb_text(), topic in arb_text(), nsfw in any::<bool>()) {
        let value = DomainValue::from(Channel {
            id: "20".into(),
            name,
            topic,
            nsfw,
            ..Channel::default()
        });
        let row = serializer().serialize("gateway", "create", &value).unwrap();
        prop_assert_eq!(row.len(), HEADER_WIDTH + value.shape().width());
    }

    /// Only text, voice and category channel kinds serialize
    #[test]
    fn channel_kind_domain(kind in any::<u8>()) {
        let value = DomainValue::from(Channel { kind, ..Channel::default() });
        let result = serializer().serialize("rest", "create", &value);
        prop_assert_eq!(result.is_ok(), matches!(kind, 0 | 2 | 4));
    }

    /// Delimited output reads back into the same fields
    #[test]
    fn delimited_round_trip(id in arb_text(), name in arb_text()) {
        let emoji = Emoji { id, name, ..Emoji::default() };
        let row = serializer().serialize("rest", "create", &emoji.into()).unwrap();
        let text = to_delimited(std::slice::from_ref(&row), &RowWriterConfig::new()).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        let fields: Vec<&str> = record.iter().collect();
        prop_assert_eq!(fields, row.fields().iter().map(String::as_str).collect::<Vec<_>>());
    }
}
