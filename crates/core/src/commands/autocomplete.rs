use crate::commands::{
    argument::ArgumentSpec,
    invocation::Invocation,
    node::CommandAction,
    options::{self, OptionIndex},
    parser::filter_prefix,
    parsers,
};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Suggestion source listing the commands the sender can see.
const COMMANDS_SOURCE: &str = "@commands";

/// Produces completions for the token being typed, following the same
/// positional rules the resolver uses to assign tokens.
pub struct SuggestionGenerator<'a> {
    invocation: Invocation<'a>,
}

impl<'a> SuggestionGenerator<'a> {
    pub fn new(invocation: Invocation<'a>) -> Self {
        Self { invocation }
    }

    /// `tokens` are the words after the command label. The last one, which
    /// may be empty, is the one being completed.
    pub fn suggest(&self, tokens: &[String]) -> Vec<String> {
        let inv = &self.invocation;
        let command = inv.command;
        let direct = command.direct.as_ref().filter(|_| inv.has_command_node());

        if command.subcommands.is_empty() {
            return match direct {
                Some(action) => self.for_action(action, tokens),
                None => Vec::new(),
            };
        }

        let Some((current, prior)) = tokens.split_last() else {
            return inv.visible_subcommand_names();
        };

        let found = command.find_subcommand_path(prior);
        let used = found.map_or(0, |(_, used)| used);
        let depth = command.intermediate_depth(prior);
        let children = if depth == prior.len() {
            inv.visible_children(prior)
        } else {
            Vec::new()
        };
        let exact = children
            .iter()
            .any(|child| child.eq_ignore_ascii_case(current));

        let mut suggestions = IndexSet::new();
        if !exact && used >= depth {
            match found {
                Some((sub, used)) => {
                    let scoped = inv.with_subcommand(Some(sub));
                    if scoped.can_reach(sub) {
                        suggestions.extend(SuggestionGenerator::new(scoped).for_action(sub, &tokens[used..]));
                    } else {
                        debug!("Hiding completions of inaccessible subcommand {}", sub.name);
                    }
                }
                None => {
                    if let Some(action) = direct {
                        suggestions.extend(self.for_action(action, tokens));
                    }
                }
            }
        }
        suggestions.extend(filter_prefix(children, current));
        suggestions.into_iter().collect()
    }

    fn for_action(&self, action: &CommandAction, tokens: &[String]) -> Vec<String> {
        let specs = &action.arguments;
        let index = OptionIndex::build(specs, |spec| self.invocation.is_sender_argument(spec));
        if index.is_empty() {
            self.positional(specs, tokens)
        } else {
            self.with_options(specs, &index, tokens)
        }
    }

    fn positional(&self, specs: &[ArgumentSpec], tokens: &[String]) -> Vec<String> {
        let inputs: Vec<&ArgumentSpec> = specs
            .iter()
            .filter(|spec| !self.invocation.is_sender_argument(spec) && !spec.is_option())
            .collect();
        let Some(first) = inputs.first() else {
            return Vec::new();
        };

        let mut suggestions = IndexSet::new();
        let current = match tokens.last() {
            None => {
                suggestions.extend(self.visible_argument(first, ""));
                if first.optional_or_defaulted() {
                    if let Some(next) = inputs.get(1) {
                        suggestions.extend(self.visible_argument(next, ""));
                    }
                }
                ""
            }
            Some(current) => {
                let mut target = tokens.len() - 1;
                if target >= inputs.len() && inputs.last().is_some_and(|spec| spec.greedy) {
                    target = inputs.len() - 1;
                }
                if let Some(spec) = inputs.get(target) {
                    suggestions.extend(self.visible_argument(spec, current));
                    if spec.optional_or_defaulted() {
                        if let Some(next) = inputs.get(target + 1) {
                            suggestions.extend(self.visible_argument(next, ""));
                        }
                    }
                }
                current.as_str()
            }
        };
        filter_prefix(suggestions.into_iter().collect(), current)
    }

    fn with_options(&self, specs: &[ArgumentSpec], index: &OptionIndex, tokens: &[String]) -> Vec<String> {
        let (current, prior) = match tokens.split_last() {
            Some((current, prior)) => (current.as_str(), prior),
            None => ("", tokens),
        };
        let parsed = match options::parse_options(prior, specs, index, true) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!("No completions after malformed options: {}", err);
                return Vec::new();
            }
        };

        if let Some(pending) = parsed.pending {
            return self.visible_argument(&specs[pending], current);
        }

        let current_is_option = !parsed.terminated && options::is_option_prefix(current);
        let mut suggestions = IndexSet::new();
        if !current_is_option {
            let mut positionals = parsed.positionals.clone();
            positionals.push(current.to_string());
            suggestions.extend(self.positional(specs, &positionals));
        }
        if !parsed.terminated && (current.is_empty() || current_is_option) {
            suggestions.extend(self.option_names(specs, index, &parsed.used, current));
        }
        suggestions.into_iter().collect()
    }

    fn option_names(
        &self,
        specs: &[ArgumentSpec],
        index: &OptionIndex,
        used: &FxHashSet<usize>,
        current: &str,
    ) -> Vec<String> {
        let mut names = Vec::new();
        for &i in index.options() {
            let spec = &specs[i];
            if used.contains(&i) || !self.invocation.can_see_argument(spec) {
                continue;
            }
            let Some(option) = &spec.option else {
                continue;
            };
            names.extend(option.long.iter().map(|name| format!("--{name}")));
            names.extend(option.short.iter().map(|name| format!("-{name}")));
        }
        filter_prefix(names, current)
    }

    fn visible_argument(&self, spec: &ArgumentSpec, current: &str) -> Vec<String> {
        if !self.invocation.can_see_argument(spec) {
            return Vec::new();
        }
        argument_suggestions(&self.invocation, spec, current)
    }
}

/// Completions for one argument: its declared sources, or the type's own
/// suggestions when it declares none.
pub(crate) fn argument_suggestions(inv: &Invocation<'_>, spec: &ArgumentSpec, current: &str) -> Vec<String> {
    if spec.suggestions.is_empty() {
        return inv
            .parsers()
            .suggestions_for_filtered(spec, current, inv.sender);
    }
    source_suggestions(inv, spec, current)
}

/// Expands every declared source of `spec`, filtered by `current`.
pub(crate) fn source_suggestions(inv: &Invocation<'_>, spec: &ArgumentSpec, current: &str) -> Vec<String> {
    let mut suggestions = IndexSet::new();
    for source in &spec.suggestions {
        for part in source.split('|').map(str::trim).filter(|part| !part.is_empty()) {
            suggestions.extend(evaluate_source(inv, part, current));
        }
    }
    filter_prefix(suggestions.into_iter().collect(), current)
}

fn evaluate_source(inv: &Invocation<'_>, source: &str, current: &str) -> Vec<String> {
    if source.eq_ignore_ascii_case(COMMANDS_SOURCE) {
        return inv
            .dispatcher
            .visible_commands(inv.sender)
            .iter()
            .map(|command| command.name.clone())
            .collect();
    }
    if let Some(values) = parsers::literal_list(source) {
        return values;
    }
    if inv.parsers().is_special_suggestion(source) {
        return inv.parsers().parse_suggestion(source, inv.sender);
    }
    if let Some(provider) = inv.command.provider(source) {
        let sender = inv.sender;
        return match panic::catch_unwind(AssertUnwindSafe(|| provider(sender, current))) {
            Ok(values) => values,
            Err(_) => {
                warn!(
                    "Suggestion provider {} of /{} panicked",
                    source, inv.command.name
                );
                Vec::new()
            }
        };
    }
    warn!(
        "Unknown suggestion source '{}' on /{}",
        source, inv.command.name
    );
    Vec::new()
}
