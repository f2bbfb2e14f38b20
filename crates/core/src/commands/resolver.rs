//! Turns the tokens of one action invocation into typed values.
//!
//! Resolution runs in a fixed order:
//!
//! 1. sender-bound arguments are filled from the sender and never consume a token;
//! 2. named options and flags are split off the token list;
//! 3. each remaining argument either falls back to its default because the
//!    sender lacks its permission (dropping the leading token), or claims the
//!    first token that clearly belongs to it;
//! 4. whatever is still unfilled takes the leftover tokens in order.
//!
//! The matcher is greedy and only backtracks by a single token when an
//! optional argument fails to convert.

use crate::commands::{
    argument::ArgumentSpec,
    autocomplete,
    error::ResolveError,
    invocation::Invocation,
    options::{self, OptionIndex},
    value::Value,
};
use tracing::debug;

/// Values parallel to an action's argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArguments {
    pub values: Vec<Option<Value>>,
    /// Arguments the permission gate replaced with their default.
    pub gated: Vec<bool>,
}

pub struct ArgumentResolver<'a> {
    invocation: Invocation<'a>,
}

impl<'a> ArgumentResolver<'a> {
    pub fn new(invocation: Invocation<'a>) -> Self {
        Self { invocation }
    }

    pub fn resolve(
        &self,
        specs: &[ArgumentSpec],
        tokens: &[String],
    ) -> Result<ResolvedArguments, ResolveError> {
        let inv = &self.invocation;
        let mut values: Vec<Option<Value>> = vec![None; specs.len()];
        let mut filled = vec![false; specs.len()];
        let mut gated = vec![false; specs.len()];

        for (i, spec) in specs.iter().enumerate() {
            if !inv.is_sender_argument(spec) {
                continue;
            }
            let value = inv
                .platform()
                .resolve_sender_argument(inv.sender, spec)?;
            debug!("Filled sender argument {} with {}", spec.name, value);
            values[i] = Some(value);
            filled[i] = true;
        }

        let index = OptionIndex::build(specs, |spec| inv.is_sender_argument(spec));
        let parsed = options::parse_options(tokens, specs, &index, false)?;
        for &i in index.options() {
            let spec = &specs[i];
            filled[i] = true;
            let raw = match parsed.values.get(&i) {
                Some(raw) => raw.as_str(),
                None if spec.is_flag() => spec.default().unwrap_or("false"),
                None => match spec.default() {
                    Some(default) => default,
                    None if spec.optional => continue,
                    None => {
                        return Err(ResolveError::MissingRequired {
                            name: spec.name.clone(),
                        });
                    }
                },
            };
            values[i] = inv.convert(raw, spec);
            if values[i].is_none() && !spec.optional {
                debug!("Failed to convert option {} from '{}'", spec.name, raw);
                return Err(ResolveError::ConversionFailed {
                    name: spec.name.clone(),
                    raw: raw.to_string(),
                });
            }
        }

        let mut remaining = parsed.positionals;
        for (i, spec) in specs.iter().enumerate() {
            if filled[i] {
                continue;
            }
            if inv.lacks_argument_permission(spec) {
                debug!(
                    "Sender lacks permission for argument {}, using its default",
                    spec.name
                );
                values[i] = spec.default().and_then(|default| inv.convert(default, spec));
                filled[i] = true;
                gated[i] = true;
                if !remaining.is_empty() {
                    remaining.remove(0);
                }
                continue;
            }
            if spec.greedy || remaining.is_empty() {
                continue;
            }
            let suggested = self.suggested_tokens(spec);
            if let Some(position) = remaining
                .iter()
                .position(|token| self.is_match(spec, &suggested, token))
            {
                let token = remaining.remove(position);
                debug!("Matched '{}' to argument {}", token, spec.name);
                values[i] = inv.convert(&token, spec);
                filled[i] = true;
            }
        }

        let mut cursor = 0;
        for (i, spec) in specs.iter().enumerate() {
            if filled[i] {
                continue;
            }
            let mut from_user = false;
            let raw = if cursor < remaining.len() {
                from_user = true;
                if spec.greedy {
                    let joined = remaining[cursor..].join(" ");
                    cursor = remaining.len();
                    debug!("Greedy argument {} consumed '{}'", spec.name, joined);
                    Some(joined)
                } else {
                    cursor += 1;
                    Some(remaining[cursor - 1].clone())
                }
            } else if let Some(default) = spec.default() {
                Some(default.to_string())
            } else if spec.optional {
                None
            } else {
                debug!("Missing required argument {}", spec.name);
                return Err(ResolveError::MissingRequired {
                    name: spec.name.clone(),
                });
            };

            let Some(raw) = raw else {
                continue;
            };
            values[i] = inv.convert(&raw, spec);
            if values[i].is_some() {
                continue;
            }
            if spec.optional {
                if from_user {
                    debug!(
                        "Optional argument {} rejected '{}', leaving it for the next one",
                        spec.name, raw
                    );
                    cursor = cursor.saturating_sub(1);
                }
                continue;
            }
            return Err(ResolveError::ConversionFailed {
                name: spec.name.clone(),
                raw,
            });
        }

        Ok(ResolvedArguments { values, gated })
    }

    /// The argument's declared suggestions, expanded once per resolution.
    fn suggested_tokens(&self, spec: &ArgumentSpec) -> Vec<String> {
        if spec.suggestions.is_empty() {
            return Vec::new();
        }
        autocomplete::source_suggestions(&self.invocation, spec, "")
    }

    /// Whether `token` clearly belongs to `spec`: it converts to something
    /// other than itself, it is one of the argument's suggestions, or the argument
    /// accepts any string.
    fn is_match(&self, spec: &ArgumentSpec, suggested: &[String], token: &str) -> bool {
        if let Some(value) = self.invocation.convert(token, spec) {
            if !matches!(&value, Value::String(raw) if raw == token) {
                return true;
            }
        }
        if suggested
            .iter()
            .any(|suggestion| suggestion.eq_ignore_ascii_case(token))
        {
            return true;
        }
        spec.value_type.is_string()
    }
}
