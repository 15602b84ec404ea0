//! Plain-text help listing for registered commands

use crate::core::{CommandSummary, FlagSummary};

/// Render a help listing for `program` from command summaries
pub fn render(program: &str, commands: &[CommandSummary]) -> String {
    let mut out = format!("Usage: {} <command> [subcommand] [flags] [args...]\n", program);
    if commands.is_empty() {
        out.push_str("\nNo commands registered.\n");
        return out;
    }

    let width = name_width(commands);
    out.push_str("\nCommands:\n");
    for command in commands {
        out.push_str(&command_lines(command, 2, width));
        for sub in &command.subcommands {
            out.push_str(&command_lines(sub, 4, width.saturating_sub(2)));
        }
    }
    out
}

fn name_width(commands: &[CommandSummary]) -> usize {
    commands
        .iter()
        .flat_map(|c| {
            std::iter::once(c.name.chars().count())
                .chain(c.subcommands.iter().map(|s| s.name.chars().count() + 2))
        })
        .max()
        .unwrap_or(0)
}

fn command_lines(command: &CommandSummary, indent: usize, width: usize) -> String {
    let mut lines = format!(
        "{:indent$}{:<width$}  {}\n",
        "",
        command.name,
        command.description,
        indent = indent,
        width = width
    );
    for flag in &command.flags {
        lines.push_str(&format!(
            "{:indent$}{}\n",
            "",
            flag_line(flag),
            indent = indent + 4
        ));
    }
    lines
}

fn flag_line(summary: &FlagSummary) -> String {
    let flag = &summary.flag;
    let mut line = match flag.short {
        Some(short) => format!("-{}, --{}", short, flag.long),
        None => format!("    --{}", flag.long),
    };
    if !summary.boolean {
        line.push_str(" <value>");
    }
    if !flag.description.is_empty() {
        line.push_str("  ");
        line.push_str(&flag.description);
    }
    if flag.required {
        line.push_str(" (required)");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Flag;

    fn summary(name: &str, flags: Vec<FlagSummary>) -> CommandSummary {
        CommandSummary {
            name: name.to_string(),
            description: format!("{} things", name),
            flags,
            subcommands: Vec::new(),
        }
    }

    #[test]
    fn test_render_empty() {
        let text = render("app", &[]);
        assert!(text.starts_with("Usage: app"));
        assert!(text.contains("No commands registered."));
    }

    #[test]
    fn test_render_flags_and_subcommands() {
        let mut server = summary("server", Vec::new());
        server.subcommands.push(summary(
            "start",
            vec![FlagSummary {
                flag: Flag::new("port")
                    .short('p')
                    .description("Port to listen on")
                    .required(),
                boolean: false,
            }],
        ));
        let copy = summary(
            "copy",
            vec![FlagSummary {
                flag: Flag::new("verbose").description("Verbose output"),
                boolean: true,
            }],
        );

        let text = render("app", &[copy, server]);
        assert!(text.contains("  copy     copy things\n"));
        assert!(text.contains("    --verbose  Verbose output\n"));
        assert!(text.contains("    start  start things\n"));
        assert!(text.contains("-p, --port <value>  Port to listen on (required)"));
    }

    #[test]
    fn test_render_aligns_by_characters() {
        let text = render("app", &[summary("café", Vec::new()), summary("hello", Vec::new())]);
        assert!(text.contains("  café   café things\n"));
        assert!(text.contains("  hello  hello things\n"));
    }
}
