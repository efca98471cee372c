use gateway_ts_core::analyse::analyse_files;
use gateway_ts_core::model::{Field, FieldType, Message, ProtoFile};
use gateway_ts_core::naming::ts_identifier;
use gateway_ts_core::{GeneratorOptions, Registry};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    // proto identifiers, underscores included on purpose
    proptest::string::string_regex("[A-Za-z_][A-Za-z0-9_]{0,6}").unwrap()
}

fn proto_name() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..=4).prop_map(|parts| parts.join("."))
}

/// A chain of files where file N references a message in file N-1 and one in
/// its own package.
fn chained_files(count: usize) -> Vec<ProtoFile> {
    (0..count)
        .map(|i| {
            let mut fields = vec![Field {
                name: "self_ref".to_string(),
                number: 1,
                field_type: FieldType::Named(format!(".pkg{i}.Item")),
                ..Default::default()
            }];
            if i > 0 {
                fields.push(Field {
                    name: "prev".to_string(),
                    number: 2,
                    field_type: FieldType::Named(format!(".pkg{}.Item", i - 1)),
                    ..Default::default()
                });
            }
            ProtoFile {
                name: format!("dir{}/file{i}.proto", i % 3),
                package: format!("pkg{i}"),
                messages: vec![Message {
                    name: "Item".to_string(),
                    fields,
                    nested_messages: vec![Message {
                        name: "Detail".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn distinct_proto_names_never_share_an_identifier(a in proto_name(), b in proto_name()) {
        prop_assume!(a != b);
        prop_assert_ne!(ts_identifier(&a), ts_identifier(&b));
    }

    #[test]
    fn resolution_is_independent_of_file_order(
        shuffled in Just(chained_files(6)).prop_shuffle()
    ) {
        let canonical = chained_files(6);
        let baseline = Registry::build(&canonical).expect("registry");
        let registry = Registry::build(&shuffled).expect("registry");

        for entry in baseline.iter() {
            prop_assert_eq!(
                registry.resolve(&entry.proto_name).expect("resolves"),
                entry.type_ref()
            );
        }

        let options = GeneratorOptions::default();
        let mut expected = analyse_files(&canonical, &baseline, &options).expect("analyse");
        let mut actual = analyse_files(&shuffled, &registry, &options).expect("analyse");
        expected.sort_by(|x, y| x.name.cmp(&y.name));
        actual.sort_by(|x, y| x.name.cmp(&y.name));
        prop_assert_eq!(actual, expected);
    }
}
