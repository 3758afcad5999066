//! Help-text rendering.
//!
//! Renders the implicit help surface for one command: description, usage
//! line, aligned argument/option/command tables, and the reserved
//! `--version`/`--help` rows. Rendering returns a `String`; the driver
//! decides where it goes.

use command_parse_core::{FieldKind, SchemaSet};

use crate::tree::Command;

/// Renders the full help page for a command.
///
/// `path` is the command's position in the tree (empty for the root) and
/// `root` selects the root-only rows (`--version`, bare `version`).
pub(crate) fn render_help(
    bin_name: &str,
    command: &Command,
    path: &[String],
    schema: &SchemaSet,
    root: bool,
) -> String {
    let mut out = String::new();

    out.push_str("Description:\n");
    for line in command.help() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }

    out.push_str("\nUsage:\n  ");
    out.push_str(bin_name);
    for segment in path {
        out.push(' ');
        out.push_str(segment);
    }
    if command.has_children() {
        out.push_str(" <command>");
    }
    for argument in schema.arguments() {
        let dots = if argument.kind().is_array() { "..." } else { "" };
        if argument.is_required() {
            out.push_str(&format!(" <{}{dots}>", argument.name()));
        } else {
            out.push_str(&format!(" [<{}{dots}>]", argument.name()));
        }
    }
    out.push_str(" [options]\n");

    if schema.argument_count() != 0 {
        out.push_str("\nArguments:\n");
        let rows: Vec<(String, &[String])> = schema
            .arguments()
            .iter()
            .map(|argument| {
                let dots = if argument.kind().is_array() { "..." } else { "" };
                let mut name = format!("  <{}{dots}>", argument.name());
                if !argument.is_required() {
                    if let Some(default) = argument.default_text() {
                        name.push_str(&format!(" {{{default}}}"));
                    }
                }
                (name, argument.help())
            })
            .collect();
        push_table(&mut out, &rows);
    }

    out.push_str("\nOptions:\n");
    let mut rows: Vec<(String, &[String])> = schema
        .options()
        .iter()
        .map(|option| {
            let mut name = String::from("  ");
            if let Some(short) = option.short() {
                name.push_str(&format!("-{short}, "));
            }
            name.push_str("--");
            name.push_str(&option.names().join("|"));

            name.push(' ');
            match option.kind() {
                FieldKind::Flag => name.push_str("[true|false]"),
                FieldKind::Array(_) | FieldKind::EnumFlags(_) => {
                    name.push_str(&format!("<{}...>", option.canonical_name()));
                }
                FieldKind::Scalar(_) => {
                    name.push_str(&format!("<{}>", option.canonical_name()));
                }
            }

            if !option.is_required() {
                if let Some(default) = option.default_text() {
                    name.push_str(&format!(" {{{default}}}"));
                }
            }
            (name, option.help())
        })
        .collect();

    let version_help = ["Show version information".to_string()];
    let help_help = ["Show help and usage information".to_string()];
    if root {
        rows.push(("  --version".to_string(), &version_help[..]));
    }
    rows.push(("  -?, -h, --help".to_string(), &help_help[..]));
    push_table(&mut out, &rows);

    if command.has_children() {
        out.push_str("\nCommands:\n");
        let mut rows: Vec<(String, &[String])> = command
            .children()
            .map(|(name, child)| (format!("  {name}"), child.help()))
            .collect();
        if root {
            rows.push(("  version".to_string(), &version_help[..]));
        }
        rows.push(("  help".to_string(), &help_help[..]));
        push_table(&mut out, &rows);
    }

    out
}

/// Two-column table: names padded to the widest entry, multi-line help
/// continued under the help column.
fn push_table(out: &mut String, rows: &[(String, &[String])]) {
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    for (name, help) in rows {
        match help.split_first() {
            None => {
                out.push_str(name);
                out.push('\n');
            }
            Some((first, rest)) => {
                out.push_str(&format!("{name:<width$}  {first}\n"));
                for line in rest {
                    out.push_str(&format!("{:<width$}  {line}\n", ""));
                }
            }
        }
    }
}
