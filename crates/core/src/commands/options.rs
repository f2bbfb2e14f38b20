//! Named options (`--name value`, `-n=value`) and flags, split off the
//! token list before positional matching.

use crate::commands::{argument::ArgumentSpec, error::ResolveError};
use rustc_hash::{FxHashMap, FxHashSet};

/// Option arguments of one action, by normalized name. Values are indices
/// into the action's argument list.
#[derive(Debug, Default)]
pub(crate) struct OptionIndex {
    short: FxHashMap<String, usize>,
    long: FxHashMap<String, usize>,
    options: Vec<usize>,
}

impl OptionIndex {
    pub(crate) fn build(specs: &[ArgumentSpec], is_sender: impl Fn(&ArgumentSpec) -> bool) -> Self {
        let mut index = OptionIndex::default();
        for (i, spec) in specs.iter().enumerate() {
            let Some(option) = &spec.option else {
                continue;
            };
            if is_sender(spec) {
                continue;
            }
            index.options.push(i);
            for name in &option.short {
                index.short.insert(name.to_lowercase(), i);
            }
            for name in &option.long {
                index.long.insert(name.to_lowercase(), i);
            }
        }
        index
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub(crate) fn options(&self) -> &[usize] {
        &self.options
    }

    fn resolve(&self, token: &OptionToken<'_>) -> Option<usize> {
        let key = token.key.to_lowercase();
        if token.long {
            self.long.get(&key).copied()
        } else {
            self.short.get(&key).copied()
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ParsedOptions {
    pub(crate) positionals: Vec<String>,
    pub(crate) values: FxHashMap<usize, String>,
    pub(crate) used: FxHashSet<usize>,
    /// Option still waiting for its value at the end of the tokens.
    pub(crate) pending: Option<usize>,
    pub(crate) terminated: bool,
}

/// Splits `tokens` into option values and positionals. A value-taking
/// option at the very end is an error unless `allow_pending` is set.
pub(crate) fn parse_options(
    tokens: &[String],
    specs: &[ArgumentSpec],
    index: &OptionIndex,
    allow_pending: bool,
) -> Result<ParsedOptions, ResolveError> {
    let mut parsed = ParsedOptions::default();
    if index.is_empty() {
        parsed.positionals = tokens.to_vec();
        return Ok(parsed);
    }

    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        if !parsed.terminated && token == "--" {
            parsed.terminated = true;
            continue;
        }
        if !parsed.terminated {
            let resolved = parse_option_token(token)
                .and_then(|option| index.resolve(&option).map(|i| (option, i)));
            if let Some((option, i)) = resolved {
                parsed.used.insert(i);
                if let Some(value) = option.value {
                    parsed.values.insert(i, value.to_string());
                } else if specs[i].is_flag() {
                    parsed.values.insert(i, "true".to_string());
                } else if let Some(value) = iter.next() {
                    parsed.values.insert(i, value.clone());
                } else if allow_pending {
                    parsed.pending = Some(i);
                } else {
                    return Err(ResolveError::MissingOptionValue {
                        option: token.clone(),
                    });
                }
                continue;
            }
        }
        parsed.positionals.push(token.clone());
    }
    Ok(parsed)
}

#[derive(Debug, PartialEq, Eq)]
struct OptionToken<'t> {
    key: &'t str,
    long: bool,
    value: Option<&'t str>,
}

fn parse_option_token(token: &str) -> Option<OptionToken<'_>> {
    let (body, long) = if let Some(body) = token.strip_prefix("--") {
        (body, true)
    } else if let Some(body) = token.strip_prefix('-') {
        (body, false)
    } else {
        return None;
    };
    if body.is_empty() || is_numeric(body) {
        return None;
    }
    let (key, value) = match body.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (body, None),
    };
    if key.is_empty() {
        return None;
    }
    Some(OptionToken { key, long, value })
}

/// Whether a partially typed token is heading towards an option name.
pub(crate) fn is_option_prefix(token: &str) -> bool {
    if token == "-" || token == "--" {
        return true;
    }
    let body = match token.strip_prefix("--").or_else(|| token.strip_prefix('-')) {
        Some(body) => body,
        None => return false,
    };
    body.is_empty() || !is_numeric(body)
}

fn is_numeric(body: &str) -> bool {
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<ArgumentSpec> {
        vec![
            ArgumentSpec::string("target"),
            ArgumentSpec::string("world").option(&["world"], &["w"]),
            ArgumentSpec::new("silent", crate::commands::argument::ValueType::Boolean)
                .flag(&["silent"], &["s"]),
        ]
    }

    fn tokens(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn splits_options_from_positionals() {
        let specs = specs();
        let index = OptionIndex::build(&specs, |_| false);
        let parsed = parse_options(&tokens("Steve -w nether --SILENT -5"), &specs, &index, false).unwrap();
        assert_eq!(parsed.positionals, vec!["Steve", "-5"]);
        assert_eq!(parsed.values[&1], "nether");
        assert_eq!(parsed.values[&2], "true");
        assert!(!parsed.terminated);
    }

    #[test]
    fn inline_values_and_terminator() {
        let specs = specs();
        let index = OptionIndex::build(&specs, |_| false);
        let parsed = parse_options(&tokens("--world=end -- --silent"), &specs, &index, false).unwrap();
        assert_eq!(parsed.values[&1], "end");
        assert!(!parsed.values.contains_key(&2));
        assert_eq!(parsed.positionals, vec!["--silent"]);
        assert!(parsed.terminated);
    }

    #[test]
    fn missing_value() {
        let specs = specs();
        let index = OptionIndex::build(&specs, |_| false);
        assert_eq!(
            parse_options(&tokens("Steve --world"), &specs, &index, false).unwrap_err(),
            ResolveError::MissingOptionValue {
                option: "--world".into()
            }
        );
        let parsed = parse_options(&tokens("Steve --world"), &specs, &index, true).unwrap();
        assert_eq!(parsed.pending, Some(1));
    }

    #[test]
    fn option_prefixes() {
        assert!(is_option_prefix("-"));
        assert!(is_option_prefix("--wo"));
        assert!(!is_option_prefix("-5"));
        assert!(!is_option_prefix("-.5"));
        assert!(!is_option_prefix("world"));
        assert_eq!(parse_option_token("-5"), None);
        assert_eq!(parse_option_token("--=x"), None);
    }
}
