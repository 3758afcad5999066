//! Greeting sample: a small CLI exercising the command-parse engine.
//!
//! ```text
//! greet hello World -s
//! greet goodbye --short World
//! greet test args one 42 a b c
//! greet test enum --choice maybe --flags flag1+flag4
//! greet test cancel -d 0.25
//! greet test time --at 2026-08-07T12:00:00Z
//! ```

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};

use command_parse_core::{
    ArgSpec, BoundValues, Converter, CustomValue, EnumMember, EnumSpec, FromValues, OptionSpec,
    ValueKind,
};
use command_parse_engine::{CancelToken, Command, Runner};

const ENUM_VALUE: EnumSpec = EnumSpec::new(
    "EnumValue",
    &[
        EnumMember { name: "None", bits: 0 },
        EnumMember { name: "Yes", bits: 1 },
        EnumMember { name: "No", bits: 2 },
        EnumMember { name: "Maybe", bits: 3 },
        EnumMember { name: "NotSure", bits: 4 },
    ],
);

const ENUM_FLAGS: EnumSpec = EnumSpec::new(
    "EnumFlags",
    &[
        EnumMember { name: "None", bits: 0 },
        EnumMember { name: "Flag1", bits: 1 },
        EnumMember { name: "Flag2", bits: 2 },
        EnumMember { name: "Flag4", bits: 4 },
    ],
);

struct GreetingOptions {
    name: String,
    short: bool,
}

impl FromValues for GreetingOptions {
    fn from_values(values: &BoundValues) -> Self {
        Self {
            name: values.get_str("name").unwrap_or("Anonymous").to_string(),
            short: values.get_bool("short").unwrap_or(false),
        }
    }
}

fn greeting_command(help: &str, long_word: &'static str, short_word: &'static str) -> Command {
    Command::new()
        .with_help(help)
        .with_argument(
            ArgSpec::scalar(0, "name", ValueKind::String)
                .with_default_text("Anonymous")
                .with_help("Name of the person to greet"),
        )
        .with_option(
            OptionSpec::flag("short")
                .with_short('s')
                .with_help("Show short version of the message"),
        )
        .with_action(move |values, _cancel| {
            let options = GreetingOptions::from_values(values);
            if options.short {
                println!("{short_word} {}!", options.name);
            } else {
                println!("{long_word} {}!", options.name);
            }
            0
        })
}

struct CancelOptions {
    delay: f64,
}

impl FromValues for CancelOptions {
    fn from_values(values: &BoundValues) -> Self {
        Self {
            delay: values.get_f64("delay").unwrap_or(0.5),
        }
    }
}

fn cancel_command() -> Command {
    Command::new()
        .with_help("Test cancel functionality")
        .with_option(
            OptionSpec::scalar("delay", ValueKind::F64)
                .with_short('d')
                .with_default_text("0.5")
                .with_help("Delay between ticks in seconds."),
        )
        .with_action(|values, cancel| {
            let options = CancelOptions::from_values(values);
            println!("Press Ctrl-C to stop the counting");

            let mut count = 0u64;
            while !cancel.is_cancelled() {
                println!("{count}");
                count += 1;
                thread::sleep(Duration::from_secs_f64(options.delay));
            }

            println!("The counting stopped");
            0
        })
}

fn no_cancel_command() -> Command {
    Command::new()
        .with_help("Test behavior when cancel is not possible")
        .with_option(
            OptionSpec::scalar("delay", ValueKind::F64)
                .with_short('d')
                .with_default_text("0.5")
                .with_help("Delay between ticks in seconds."),
        )
        .with_action(|values, _cancel| {
            let options = CancelOptions::from_values(values);
            println!("Press Ctrl-C to stop the counting");

            let mut count = 0u64;
            loop {
                println!("{count}");
                count += 1;
                thread::sleep(Duration::from_secs_f64(options.delay));
            }
        })
}

struct ArgsOptions {
    arg1: String,
    arg2: i64,
    arg3: Vec<String>,
}

impl FromValues for ArgsOptions {
    fn from_values(values: &BoundValues) -> Self {
        Self {
            arg1: values.get_str("arg1").unwrap_or_default().to_string(),
            arg2: values.get_i64("arg2").unwrap_or(123),
            arg3: values
                .get_array("arg3")
                .unwrap_or(&[])
                .iter()
                .filter_map(|value| value.as_str())
                .map(str::to_string)
                .collect(),
        }
    }
}

fn args_command() -> Command {
    Command::new()
        .with_help("Test arguments")
        .with_argument(
            ArgSpec::scalar(0, "arg1", ValueKind::String)
                .required()
                .with_help("String argument"),
        )
        .with_argument(
            ArgSpec::scalar(1, "arg2", ValueKind::I32)
                .with_default_text("123")
                .with_help("Integer argument"),
        )
        .with_argument(
            ArgSpec::array(2, "arg3", ValueKind::String).with_help("String list argument"),
        )
        .with_action(|values, _cancel| {
            let options = ArgsOptions::from_values(values);
            println!("Arg1: {}", options.arg1);
            println!("Arg2: {}", options.arg2);
            println!("Arg3: {}", options.arg3.join(", "));
            0
        })
}

fn enum_command() -> Command {
    Command::new()
        .with_help("Test enum values.")
        .with_help("See help and choose different enum values to check them.")
        .with_option(
            OptionSpec::scalar("choice", ValueKind::Enum(ENUM_VALUE))
                .required()
                .with_help("Enum value of your choice"),
        )
        .with_option(
            OptionSpec::enum_flags("flags", ENUM_FLAGS)
                .with_default_text("flag1+flag4")
                .with_help("Enum flags. Several flags can be used.")
                .with_help("Use plus sign to join several flags or separate them by space"),
        )
        .with_action(|values, _cancel| {
            let choice = values.enum_member("choice").unwrap_or("None");
            let flags = values.flag_bits("flags").unwrap_or(1 | 4);
            println!("Your choice: {choice}");
            println!("Flags: {}", ENUM_FLAGS.render_bits(flags));
            0
        })
}

fn timestamp_converter() -> Converter {
    Converter::new(ValueKind::Custom("DateTime"), |token| {
        let when: DateTime<Utc> = token
            .parse()
            .map_err(|_| format!("invalid timestamp '{token}'"))?;
        Ok(CustomValue::new("DateTime", token, when))
    })
}

fn time_command() -> Command {
    Command::new()
        .with_help("Test a user-supplied value converter")
        .with_option(
            OptionSpec::scalar("at", ValueKind::Custom("DateTime"))
                .required()
                .with_converter(timestamp_converter())
                .with_help("RFC 3339 timestamp to echo back"),
        )
        .with_action(|values, _cancel| {
            let when = values
                .get_custom::<DateTime<Utc>>("at")
                .expect("required option is validated before the action");
            println!("Parsed: {when}");
            0
        })
}

fn build_tree() -> Command {
    Command::new()
        .with_help("Greeting sample for the command-parse engine")
        .with_command("hello", greeting_command("Say hello", "Hello", "Hi"))
        .with_command("goodbye", greeting_command("Say goodbye", "Goodbye", "Bye"))
        .with_command(
            "test",
            Command::new()
                .with_help("Test different features of the parser")
                .with_action(|_, _| {
                    println!("Please define what feature to test");
                    0
                })
                .with_command("cancel", cancel_command())
                .with_command("no-cancel", no_cancel_command())
                .with_command("args", args_command())
                .with_command("enum", enum_command())
                .with_command("time", time_command()),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cancel = CancelToken::new();
    signal_hook::flag::register(signal_hook::consts::SIGINT, cancel.flag())
        .expect("failed to register SIGINT handler");

    let runner = Runner::new(build_tree())
        .with_bin_name("greet")
        .with_version(env!("CARGO_PKG_VERSION"));

    let status = runner.run_with_cancel(std::env::args().skip(1), &cancel);
    std::process::exit(status);
}
