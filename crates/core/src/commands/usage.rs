use super::{
    argument::ArgumentSpec,
    context::CommandPlatform,
    invocation::Invocation,
    node::{Command, CommandAction},
    parsers,
};
use itertools::Itertools;

/// `/name <args>` for a direct command, `/name <a | b>` for one with
/// subcommands, or both joined by `OR`, in which case the direct arguments
/// are all shown as optional.
pub fn generate_usage(command: &Command, platform: &dyn CommandPlatform) -> String {
    let mut usage = format!("/{}", command.name);
    let subcommands = command
        .subcommands
        .iter()
        .filter_map(|sub| sub.path().next())
        .unique_by(|segment| segment.to_lowercase())
        .join(" | ");

    match (&command.direct, command.subcommands.is_empty()) {
        (Some(direct), true) => {
            push_arguments(&mut usage, &format_arguments(&direct.arguments, false, platform));
        }
        (None, false) => {
            usage.push_str(&format!(" <{subcommands}>"));
        }
        (Some(direct), false) => {
            push_arguments(&mut usage, &format_arguments(&direct.arguments, true, platform));
            usage.push_str(&format!(" OR /{} <{}>", command.name, subcommands));
        }
        (None, true) => {}
    }
    usage
}

/// One `/name sub <args> - description` line per subcommand.
pub fn generate_subcommand_usages(command: &Command, platform: &dyn CommandPlatform) -> Vec<String> {
    command
        .subcommands
        .iter()
        .map(|sub| {
            let mut usage = format!("/{} {}", command.name, sub.name);
            push_arguments(&mut usage, &format_arguments(&sub.arguments, false, platform));
            if !sub.description.is_empty() {
                usage.push_str(" - ");
                usage.push_str(&sub.description);
            }
            usage
        })
        .collect()
}

/// Renders user-supplied arguments: positionals first, then options.
/// Sender-bound arguments are left out.
pub fn format_arguments(
    specs: &[ArgumentSpec],
    force_optional: bool,
    platform: &dyn CommandPlatform,
) -> String {
    render(
        specs
            .iter()
            .filter(|spec| !spec.sender_bound && !platform.is_sender_type(&spec.value_type)),
        force_optional,
    )
}

/// Usage shown when resolving `action` failed. Arguments the sender may
/// not use are left out.
pub(crate) fn action_usage(invocation: &Invocation<'_>, action: &CommandAction) -> String {
    let mut usage = format!("/{}", invocation.command.name);
    if let Some(sub) = invocation.subcommand {
        usage.push(' ');
        usage.push_str(&sub.name);
    }
    let visible = action.arguments.iter().filter(|spec| {
        !invocation.is_sender_argument(spec) && !invocation.lacks_argument_permission(spec)
    });
    push_arguments(&mut usage, &render(visible, false));
    usage
}

fn render<'s>(specs: impl Iterator<Item = &'s ArgumentSpec>, force_optional: bool) -> String {
    let (options, positionals): (Vec<_>, Vec<_>) = specs.partition(|spec| spec.is_option());

    let positionals = positionals.into_iter().map(|spec| {
        let name = display_name(spec);
        if force_optional || spec.optional_or_defaulted() {
            format!("[{name}]")
        } else {
            format!("<{name}>")
        }
    });
    let options = options.into_iter().filter_map(|spec| {
        let mut token = spec.option.as_ref()?.primary_token()?;
        if !spec.is_flag() {
            token.push_str(&format!(" <{}>", display_name(spec)));
        }
        Some(if force_optional || spec.optional_or_defaulted() {
            format!("[{token}]")
        } else {
            token
        })
    });
    positionals.chain(options).join(" ")
}

fn push_arguments(usage: &mut String, arguments: &str) {
    if !arguments.is_empty() {
        usage.push(' ');
        usage.push_str(arguments);
    }
}

/// The first literal list among the suggestion sources names the accepted
/// values, otherwise the argument name is used.
pub fn display_name(spec: &ArgumentSpec) -> String {
    let list = spec
        .suggestions
        .iter()
        .find_map(|source| parsers::literal_list(source.trim()));
    match list {
        Some(items) if !items.is_empty() && items.len() <= 3 => items.join("|"),
        Some(items) if !items.is_empty() => {
            format!("{}:{}|...", spec.value_type.type_name().to_lowercase(), items[0])
        }
        _ => spec.name.clone(),
    }
}
