//! End-to-end parser behavior tests: token grammar, clustering, arrays,
//! enum flags, dispatch, validation, and the reserved help/version surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use url::Url;
use uuid::Uuid;

use command_parse_core::{
    ArgSpec, Converter, CustomValue, EnumMember, EnumSpec, OptionSpec, SchemaError, Value,
    ValueKind,
};
use command_parse_engine::{
    CancelToken, Command, Invocation, ParseError, RunError, Runner, validate_required,
};

const TEST_VALUE: EnumSpec = EnumSpec::new(
    "TestValue",
    &[
        EnumMember { name: "None", bits: 0 },
        EnumMember { name: "Value1", bits: 1 },
        EnumMember { name: "Value2", bits: 2 },
        EnumMember { name: "Value3", bits: 3 },
        EnumMember { name: "NotSure", bits: 4 },
    ],
);

const TEST_FLAGS: EnumSpec = EnumSpec::new(
    "TestFlags",
    &[
        EnumMember { name: "None", bits: 0 },
        EnumMember { name: "Value1", bits: 1 },
        EnumMember { name: "Value2", bits: 2 },
        EnumMember { name: "Value4", bits: 4 },
    ],
);

/// Parses tokens against a single-level command and returns the populated
/// values.
fn parse_values(root: Command, tokens: &[&str]) -> command_parse_core::BoundValues {
    let runner = Runner::new(root);
    let invocation = runner.parse(tokens).expect("parse should succeed");
    invocation
        .values()
        .expect("expected a command invocation")
        .clone()
}

/// Parses tokens expecting a failure.
fn parse_err(root: Command, tokens: &[&str]) -> RunError {
    Runner::new(root)
        .parse(tokens)
        .err()
        .expect("parse should fail")
}

fn int_array(values: &command_parse_core::BoundValues, name: &str) -> Vec<i64> {
    values
        .get_array(name)
        .unwrap_or(&[])
        .iter()
        .filter_map(Value::as_i64)
        .collect()
}

fn str_array(values: &command_parse_core::BoundValues, name: &str) -> Vec<String> {
    values
        .get_array(name)
        .unwrap_or(&[])
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

#[test]
fn test_separator_variants_populate_all_kinds() {
    let root = Command::new()
        .with_option(OptionSpec::scalar("option1", ValueKind::String))
        .with_option(OptionSpec::scalar("option2", ValueKind::I32))
        .with_option(OptionSpec::scalar("option3", ValueKind::F64))
        .with_option(OptionSpec::scalar("option4", ValueKind::String).with_short('4'))
        .with_option(OptionSpec::flag("flag"));

    let values = parse_values(
        root,
        &[
            "--option1=value1",
            "--option2:123",
            "--option3",
            "-3.1415",
            "-4",
            "value4",
            "--flag",
        ],
    );

    assert_eq!(values.get_str("option1"), Some("value1"));
    assert_eq!(values.get_i64("option2"), Some(123));
    assert_eq!(values.get_f64("option3"), Some(-3.1415));
    assert_eq!(values.get_str("option4"), Some("value4"));
    assert_eq!(values.get_bool("flag"), Some(true));
}

fn short_options() -> Command {
    Command::new()
        .with_option(OptionSpec::flag("flag-a").with_short('a'))
        .with_option(OptionSpec::flag("flag-b").with_short('b'))
        .with_option(OptionSpec::flag("flag-c").with_short('c'))
        .with_option(OptionSpec::scalar("option-s", ValueKind::I16).with_short('s'))
}

#[test]
fn test_short_cluster_combines_flags() {
    let values = parse_values(short_options(), &["-ab"]);
    assert_eq!(values.get_bool("flag-a"), Some(true));
    assert_eq!(values.get_bool("flag-b"), Some(true));
    assert!(!values.is_set("flag-c"));
    assert!(!values.is_set("option-s"));
}

#[test]
fn test_short_cluster_trailing_scalar_consumes_next_token() {
    let values = parse_values(short_options(), &["-acs", "15"]);
    assert_eq!(values.get_bool("flag-a"), Some(true));
    assert!(!values.is_set("flag-b"));
    assert_eq!(values.get_bool("flag-c"), Some(true));
    assert_eq!(values.get_i64("option-s"), Some(15));
}

#[test]
fn test_short_cluster_pending_option_survives_later_flags() {
    // The pending non-flag option keeps waiting even when flags follow it
    // in the cluster.
    let values = parse_values(short_options(), &["-sa", "15"]);
    assert_eq!(values.get_bool("flag-a"), Some(true));
    assert_eq!(values.get_i64("option-s"), Some(15));
}

#[test]
fn test_short_cluster_inline_value_needs_a_pending_option() {
    let err = parse_err(short_options(), &["-ab=x"]);
    assert_eq!(
        err,
        RunError::Parse(ParseError::UnexpectedClusterValue {
            cluster: "ab".to_string(),
            value: "x".to_string(),
        })
    );
}

fn array_options() -> Command {
    Command::new()
        .with_option(OptionSpec::array("string-array", ValueKind::String))
        .with_option(
            OptionSpec::array("int-array", ValueKind::I32)
                .with_alias("int-array-alias")
                .with_alias("int-array-alias2"),
        )
}

#[test]
fn test_array_accumulation_across_aliases_is_order_preserving() {
    let values = parse_values(
        array_options(),
        &[
            "--int-array",
            "1",
            "--int-array-alias:5",
            "32",
            "--int-array-alias2=-18",
        ],
    );
    assert_eq!(int_array(&values, "int-array"), vec![1, 5, 32, -18]);
}

#[test]
fn test_interleaved_arrays_release_option_tokens() {
    let values = parse_values(
        array_options(),
        &[
            "--string-array",
            "value1",
            "--int-array",
            "1",
            "--string-array",
            "value2",
            "value3",
            "--int-array:5",
            "32",
            "--int-array=-18",
        ],
    );

    assert_eq!(
        str_array(&values, "string-array"),
        vec!["value1", "value2", "value3"]
    );
    assert_eq!(int_array(&values, "int-array"), vec![1, 5, 32, -18]);
}

#[test]
fn test_int_array_consumes_negative_numbers() {
    let root = Command::new().with_option(OptionSpec::array("int-list", ValueKind::I32));
    let values = parse_values(root, &["--int-list", "1", "--int-list:5", "32", "-18"]);
    assert_eq!(int_array(&values, "int-list"), vec![1, 5, 32, -18]);
}

#[test]
fn test_argument_positions_with_trailing_array_and_option() {
    let root = Command::new()
        .with_argument(ArgSpec::scalar(1, "int-argument", ValueKind::I32))
        .with_argument(ArgSpec::scalar(0, "string-argument", ValueKind::String))
        .with_argument(ArgSpec::array(2, "array-argument", ValueKind::String))
        .with_option(OptionSpec::flag("test-flag"));

    let values = parse_values(
        root,
        &[
            "string-argument",
            "15",
            "array-argument-1",
            "array-argument-2",
            "array-argument-3",
            "--test-flag",
        ],
    );

    assert_eq!(values.get_str("string-argument"), Some("string-argument"));
    assert_eq!(values.get_i64("int-argument"), Some(15));
    assert_eq!(
        str_array(&values, "array-argument"),
        vec!["array-argument-1", "array-argument-2", "array-argument-3"]
    );
    assert_eq!(values.get_bool("test-flag"), Some(true));
}

#[test]
fn test_extra_argument_is_rejected() {
    let root = Command::new().with_argument(ArgSpec::scalar(0, "only", ValueKind::String));
    let err = parse_err(root, &["one", "two"]);
    assert_eq!(
        err,
        RunError::Parse(ParseError::ExtraArgument("two".to_string()))
    );
}

#[test]
fn test_argument_conversion_failure_names_the_argument() {
    let root = Command::new().with_argument(ArgSpec::scalar(0, "count", ValueKind::I32));
    let err = parse_err(root, &["abc"]);
    assert!(matches!(
        err,
        RunError::Parse(ParseError::InvalidArgumentValue { argument, .. }) if argument == "count"
    ));
}

#[test]
fn test_array_argument_conversion_failure_is_an_error() {
    // Unlike array options, array arguments do not release non-coercible
    // tokens back to the command.
    let root = Command::new().with_argument(ArgSpec::array(0, "numbers", ValueKind::I32));
    let err = parse_err(root, &["1", "2", "x"]);
    assert!(matches!(
        err,
        RunError::Parse(ParseError::InvalidArgumentValue { argument, .. }) if argument == "numbers"
    ));
}

#[test]
fn test_enum_flags_accumulate_across_occurrences() {
    let root = Command::new().with_option(OptionSpec::enum_flags("flags", TEST_FLAGS));
    let values = parse_values(
        root,
        &["--flags", "value1", "value4", "--flags", "value2", "none"],
    );
    // value1 | value2 | value4; `none` contributes nothing mid-sequence.
    assert_eq!(values.flag_bits("flags"), Some(7));
}

#[test]
fn test_enum_flags_inline_plus_combination() {
    let root = Command::new().with_option(OptionSpec::enum_flags("flags", TEST_FLAGS));
    let values = parse_values(root, &["--flags=value2+value4"]);
    assert_eq!(values.flag_bits("flags"), Some(6));
}

#[test]
fn test_enum_flags_reject_unknown_member() {
    let root = Command::new().with_option(OptionSpec::enum_flags("flags", TEST_FLAGS));
    let err = parse_err(root, &["--flags=value1+bogus"]);
    assert!(matches!(
        err,
        RunError::Parse(ParseError::InvalidOptionValue { option, .. }) if option == "flags"
    ));
}

#[test]
fn test_enum_scalar_matches_declared_and_dash_case_names() {
    let root = Command::new().with_option(OptionSpec::scalar(
        "choice",
        ValueKind::Enum(TEST_VALUE),
    ));

    let values = parse_values(root, &["--choice", "not-sure"]);
    assert_eq!(values.enum_member("choice"), Some("NotSure"));
}

#[test]
fn test_bool_option_accepts_explicit_value() {
    let root = Command::new().with_option(OptionSpec::flag("bool-option"));

    let values = parse_values(root, &["--bool-option", "false"]);
    assert_eq!(values.get_bool("bool-option"), Some(false));
}

#[test]
fn test_trailing_flag_resolves_true() {
    let root = Command::new().with_option(OptionSpec::flag("bool-option"));
    let values = parse_values(root, &["--bool-option"]);
    assert_eq!(values.get_bool("bool-option"), Some(true));
}

#[test]
fn test_flag_reoffers_non_boolean_token_to_the_command() {
    let root = Command::new()
        .with_option(OptionSpec::flag("flag"))
        .with_argument(ArgSpec::scalar(0, "word", ValueKind::String));

    let values = parse_values(root, &["--flag", "hello"]);
    assert_eq!(values.get_bool("flag"), Some(true));
    assert_eq!(values.get_str("word"), Some("hello"));
}

#[test]
fn test_numeric_option_kinds() {
    let root = Command::new()
        .with_option(OptionSpec::scalar("sbyte-option", ValueKind::I8))
        .with_option(OptionSpec::scalar("byte-option", ValueKind::U8))
        .with_option(OptionSpec::scalar("short-option", ValueKind::I16))
        .with_option(OptionSpec::scalar("ushort-option", ValueKind::U16))
        .with_option(OptionSpec::scalar("int-option", ValueKind::I32))
        .with_option(OptionSpec::scalar("uint-option", ValueKind::U32))
        .with_option(OptionSpec::scalar("long-option", ValueKind::I64))
        .with_option(OptionSpec::scalar("ulong-option", ValueKind::U64))
        .with_option(OptionSpec::scalar("float-option", ValueKind::F32))
        .with_option(OptionSpec::scalar("double-option", ValueKind::F64));

    let values = parse_values(
        root,
        &[
            "--sbyte-option",
            "-45",
            "--byte-option",
            "134",
            "--short-option",
            "-5923",
            "--ushort-option",
            "65535",
            "--int-option",
            "-592398450",
            "--uint-option",
            "2048578625",
            "--long-option",
            "987651343910347803",
            "--ulong-option",
            "798256207857208532",
            "--float-option",
            "3.5",
            "--double-option",
            "-1.60217e-19",
        ],
    );

    assert_eq!(values.get_i64("sbyte-option"), Some(-45));
    assert_eq!(values.get_i64("byte-option"), Some(134));
    assert_eq!(values.get_i64("short-option"), Some(-5923));
    assert_eq!(values.get_i64("ushort-option"), Some(65535));
    assert_eq!(values.get_i64("int-option"), Some(-592_398_450));
    assert_eq!(values.get_i64("uint-option"), Some(2_048_578_625));
    assert_eq!(values.get_i64("long-option"), Some(987_651_343_910_347_803));
    assert_eq!(values.get_u64("ulong-option"), Some(798_256_207_857_208_532));
    assert_eq!(values.get_f64("float-option"), Some(3.5));
    assert_eq!(values.get_f64("double-option"), Some(-1.60217e-19));
}

#[test]
fn test_well_known_option_kinds() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file_path = dir.path().join("input.txt");
    std::fs::write(&file_path, "x").expect("write temp file");
    let file_token = file_path.display().to_string();
    let dir_token = dir.path().display().to_string();

    let root = Command::new()
        .with_option(OptionSpec::scalar("uri-option", ValueKind::Url))
        .with_option(OptionSpec::scalar("file-option", ValueKind::FilePath))
        .with_option(OptionSpec::scalar("dir-option", ValueKind::DirPath))
        .with_option(OptionSpec::scalar("guid-option", ValueKind::Uuid));

    let values = parse_values(
        root,
        &[
            "--uri-option",
            "https://www.example.com/search?q=1",
            "--file-option",
            &file_token,
            "--dir-option",
            &dir_token,
            "--guid-option",
            "{A0CC4F81-9C94-44B2-81D8-3EC378106669}",
        ],
    );

    assert_eq!(
        values.get_url("uri-option"),
        Some(&Url::parse("https://www.example.com/search?q=1").unwrap())
    );
    assert_eq!(values.get_path("file-option"), Some(file_path.as_path()));
    assert_eq!(values.get_path("dir-option"), Some(dir.path()));
    assert_eq!(
        values.get_uuid("guid-option"),
        Some(Uuid::parse_str("A0CC4F81-9C94-44B2-81D8-3EC378106669").unwrap())
    );
}

#[test]
fn test_custom_converter_produces_typed_value() {
    let converter = Converter::new(ValueKind::Custom("Timestamp"), |token| {
        let seconds: i64 = token
            .parse()
            .map_err(|_| format!("invalid timestamp '{token}'"))?;
        let when = Utc
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| format!("timestamp '{token}' out of range"))?;
        Ok(CustomValue::new("Timestamp", token, when))
    });

    let root = Command::new().with_option(
        OptionSpec::scalar("since", ValueKind::Custom("Timestamp")).with_converter(converter),
    );

    let values = parse_values(root, &["--since", "1700000000"]);
    let expected = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();
    assert_eq!(
        values.get_custom::<DateTime<Utc>>("since"),
        Some(&expected)
    );
}

#[test]
fn test_from_str_converter_fallback() {
    let root = Command::new().with_option(
        OptionSpec::scalar("bind", ValueKind::Custom("IpAddr"))
            .with_converter(Converter::from_str::<std::net::IpAddr>("IpAddr")),
    );

    let values = parse_values(root, &["--bind", "127.0.0.1"]);
    assert_eq!(
        values.get_custom::<std::net::IpAddr>("bind"),
        Some(&"127.0.0.1".parse().unwrap())
    );
}

#[test]
fn test_converter_failure_is_a_parse_error() {
    let root = Command::new().with_option(
        OptionSpec::scalar("bind", ValueKind::Custom("IpAddr"))
            .with_converter(Converter::from_str::<std::net::IpAddr>("IpAddr")),
    );

    let err = parse_err(root, &["--bind", "nowhere"]);
    assert!(matches!(
        err,
        RunError::Parse(ParseError::InvalidOptionValue { option, .. }) if option == "bind"
    ));
}

#[test]
fn test_round_trip_of_rendered_option_tokens() {
    let schema = || {
        Command::new()
            .with_option(OptionSpec::scalar("text", ValueKind::String))
            .with_option(OptionSpec::scalar("count", ValueKind::I32))
            .with_option(OptionSpec::array("items", ValueKind::String))
            .with_option(OptionSpec::array("numbers", ValueKind::I32))
            .with_option(OptionSpec::enum_flags("flags", TEST_FLAGS))
            .with_option(OptionSpec::flag("verbose"))
    };

    let values = parse_values(
        schema(),
        &[
            "--text",
            "some@really#weird^&!()*_- string",
            "--count=-18",
            "--items",
            "first",
            "second",
            "--numbers",
            "1",
            "5",
            "--flags=value1+value4",
            "--verbose",
        ],
    );

    let rendered = values.to_tokens();
    let tokens: Vec<&str> = rendered.iter().map(String::as_str).collect();
    let reparsed = parse_values(schema(), &tokens);

    assert_eq!(reparsed.get_str("text"), values.get_str("text"));
    assert_eq!(reparsed.get_i64("count"), values.get_i64("count"));
    assert_eq!(str_array(&reparsed, "items"), str_array(&values, "items"));
    assert_eq!(
        int_array(&reparsed, "numbers"),
        int_array(&values, "numbers")
    );
    assert_eq!(reparsed.flag_bits("flags"), values.flag_bits("flags"));
    assert_eq!(reparsed.get_bool("verbose"), values.get_bool("verbose"));
}

#[test]
fn test_unknown_long_option() {
    let root = Command::new().with_option(OptionSpec::flag("flag"));
    let err = parse_err(root, &["--nope"]);
    assert_eq!(
        err,
        RunError::Parse(ParseError::UnknownOption("nope".to_string()))
    );
}

#[test]
fn test_unknown_short_option_names_the_character() {
    let err = parse_err(short_options(), &["-abx"]);
    assert_eq!(
        err,
        RunError::Parse(ParseError::UnknownOption("x".to_string()))
    );
}

#[test]
fn test_missing_scalar_value_at_end_of_input() {
    let root = Command::new().with_option(OptionSpec::scalar("option1", ValueKind::String));
    let err = parse_err(root, &["--option1"]);
    assert_eq!(
        err,
        RunError::Parse(ParseError::MissingValue("option1".to_string()))
    );
}

#[test]
fn test_required_option_missing_fails_validation() {
    let root = Command::new()
        .with_option(OptionSpec::scalar("choice", ValueKind::Enum(TEST_VALUE)).required());
    let runner = Runner::new(root);

    let invocation = runner.parse(Vec::<String>::new()).unwrap();
    let err = runner
        .execute(invocation, &CancelToken::new())
        .expect_err("validation should fail");
    assert_eq!(err, ParseError::RequiredOptionMissing("choice".to_string()));
}

#[test]
fn test_required_argument_missing_fails_validation() {
    let root = Command::new()
        .with_argument(ArgSpec::scalar(0, "first", ValueKind::String).required())
        .with_argument(ArgSpec::scalar(1, "second", ValueKind::String).required());
    let runner = Runner::new(root);

    let invocation = runner.parse(["only-first"]).unwrap();
    let err = validate_required(invocation.values().unwrap()).unwrap_err();
    assert_eq!(
        err,
        ParseError::RequiredArgumentMissing("second".to_string())
    );
}

#[test]
fn test_required_ordering_violation_fails_at_construction() {
    // An optional argument before a required one is a schema mistake,
    // reported regardless of what tokens arrive.
    let root = Command::new()
        .with_argument(ArgSpec::scalar(0, "arg1", ValueKind::String))
        .with_argument(ArgSpec::scalar(1, "arg2", ValueKind::String).required())
        .with_argument(ArgSpec::scalar(2, "arg3", ValueKind::String));

    let err = parse_err(root, &["arg1", "arg2", "arg3"]);
    assert_eq!(
        err,
        RunError::Schema(SchemaError::RequiredArgumentGap("arg1".to_string()))
    );
}

#[test]
fn test_duplicate_argument_position_fails_at_construction() {
    let root = Command::new()
        .with_argument(ArgSpec::scalar(0, "arg1", ValueKind::String))
        .with_argument(ArgSpec::scalar(1, "arg2", ValueKind::String))
        .with_argument(ArgSpec::scalar(1, "arg3", ValueKind::String));

    let err = parse_err(root, &["arg1", "arg2", "arg3"]);
    assert_eq!(
        err,
        RunError::Schema(SchemaError::DuplicateArgumentPosition(1))
    );
}

#[test]
fn test_converter_mismatch_fails_at_construction() {
    let root = Command::new().with_option(
        OptionSpec::scalar("value", ValueKind::String)
            .with_converter(Converter::from_str::<std::net::IpAddr>("IpAddr")),
    );

    let err = parse_err(root, &["--value=123"]);
    assert!(matches!(
        err,
        RunError::Schema(SchemaError::ConverterMismatch { .. })
    ));
}

fn dispatch_tree() -> (Command, Arc<AtomicBool>, Arc<AtomicBool>, Arc<AtomicBool>) {
    let test_hit = Arc::new(AtomicBool::new(false));
    let sub1_hit = Arc::new(AtomicBool::new(false));
    let sub2_hit = Arc::new(AtomicBool::new(false));

    let test_witness = test_hit.clone();
    let sub1_witness = sub1_hit.clone();
    let sub2_witness = sub2_hit.clone();

    let root = Command::new().with_command(
        "test",
        Command::new()
            .with_action(move |_, _| {
                test_witness.store(true, Ordering::SeqCst);
                0
            })
            .with_command(
                "tsub1",
                Command::new().with_action(move |_, _| {
                    sub1_witness.store(true, Ordering::SeqCst);
                    0
                }),
            )
            .with_command(
                "tsub2",
                Command::new().with_action(move |_, _| {
                    sub2_witness.store(true, Ordering::SeqCst);
                    0
                }),
            ),
    );

    (root, test_hit, sub1_hit, sub2_hit)
}

#[test]
fn test_nested_subcommand_dispatch_executes_only_the_selected_action() {
    let (root, test_hit, sub1_hit, sub2_hit) = dispatch_tree();
    let runner = Runner::new(root);

    assert_eq!(runner.run(["test", "tsub1"]), 0);
    assert!(!test_hit.load(Ordering::SeqCst));
    assert!(sub1_hit.load(Ordering::SeqCst));
    assert!(!sub2_hit.load(Ordering::SeqCst));
}

#[test]
fn test_parent_command_executes_without_subcommand_token() {
    let (root, test_hit, sub1_hit, sub2_hit) = dispatch_tree();
    let runner = Runner::new(root);

    assert_eq!(runner.run(["test"]), 0);
    assert!(test_hit.load(Ordering::SeqCst));
    assert!(!sub1_hit.load(Ordering::SeqCst));
    assert!(!sub2_hit.load(Ordering::SeqCst));
}

#[test]
fn test_root_options_may_precede_a_subcommand() {
    let root = Command::new()
        .with_option(OptionSpec::flag("verbose"))
        .with_command(
            "run",
            Command::new().with_argument(ArgSpec::scalar(0, "target", ValueKind::String)),
        );
    let runner = Runner::new(root);

    let invocation = runner.parse(["--verbose", "run", "all"]).unwrap();
    assert_eq!(invocation.path(), ["run"]);
    assert_eq!(invocation.values().unwrap().get_str("target"), Some("all"));
}

#[test]
fn test_empty_input_selects_the_root_command() {
    let runner = Runner::new(Command::new());
    let invocation = runner.parse(Vec::<String>::new()).unwrap();
    assert!(matches!(invocation, Invocation::Command { .. }));
    assert!(invocation.path().is_empty());
}

#[test]
fn test_help_surface_is_always_available() {
    let root = || {
        Command::new()
            .with_option(OptionSpec::flag("verbose"))
            .with_command("sub", Command::new().with_help("A subcommand"))
    };

    for tokens in [&["--help"][..], &["-h"][..], &["-?"][..], &["help"][..]] {
        let runner = Runner::new(root());
        let invocation = runner.parse(tokens).unwrap();
        assert!(
            matches!(invocation, Invocation::Help { root: true, .. }),
            "tokens {tokens:?} should select root help"
        );
    }

    let runner = Runner::new(root());
    let invocation = runner.parse(["sub", "--help"]).unwrap();
    match invocation {
        Invocation::Help { path, root, .. } => {
            assert_eq!(path, ["sub"]);
            assert!(!root);
        }
        _ => panic!("expected help invocation"),
    }
}

#[test]
fn test_version_surface_only_at_the_root() {
    let root = || Command::new().with_command("sub", Command::new());

    let runner = Runner::new(root());
    assert!(matches!(
        runner.parse(["--version"]).unwrap(),
        Invocation::Version
    ));
    let runner = Runner::new(root());
    assert!(matches!(
        runner.parse(["version"]).unwrap(),
        Invocation::Version
    ));

    // Below the root, `version` is an ordinary token.
    let runner = Runner::new(root());
    let err = runner.parse(["sub", "version"]).unwrap_err();
    assert_eq!(
        err,
        RunError::Parse(ParseError::ExtraArgument("version".to_string()))
    );
}

#[test]
fn test_reserved_option_name_fails_at_construction() {
    let root = Command::new().with_option(OptionSpec::flag("help"));
    let err = parse_err(root, &[]);
    assert_eq!(
        err,
        RunError::Schema(SchemaError::ReservedOption("help".to_string()))
    );
}

#[test]
fn test_exit_codes_distinguish_parse_and_validation_failures() {
    let root = || {
        Command::new()
            .with_option(OptionSpec::scalar("needed", ValueKind::String).required())
    };

    let runner = Runner::new(root());
    assert_eq!(
        runner.run(["--nope"]),
        command_parse_engine::EXIT_PARSE_ERROR
    );

    let runner = Runner::new(root());
    assert_eq!(
        runner.run(Vec::<String>::new()),
        command_parse_engine::EXIT_VALIDATION_ERROR
    );
}
