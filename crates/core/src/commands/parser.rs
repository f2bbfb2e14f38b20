use crate::commands::{
    argument::{ArgumentSpec, CompareMode, ValueType},
    compare,
    context::SenderRef,
    value::Value,
};
use std::sync::Arc;
use tracing::debug;

/// Converts raw tokens of the types it understands and offers completions
/// for them.
pub trait TypeParser: Send + Sync {
    fn name(&self) -> &str;

    /// Parsers with a higher priority are consulted first.
    fn priority(&self) -> i32 {
        0
    }

    fn can_parse(&self, value_type: &ValueType) -> bool;

    fn parse(&self, token: &str, value_type: &ValueType, sender: &SenderRef) -> Option<Value>;

    fn suggestions(&self, _sender: &SenderRef, _spec: Option<&ArgumentSpec>) -> Vec<String> {
        Vec::new()
    }

    /// Whether `source` is a special suggestion marker owned by this parser.
    fn can_parse_suggestion(&self, _source: &str) -> bool {
        false
    }

    fn parse_suggestion(&self, _source: &str, _sender: &SenderRef) -> Vec<String> {
        Vec::new()
    }

    fn is_equal(
        &self,
        _sender: &SenderRef,
        first: Option<&Value>,
        second: Option<&Value>,
        mode: CompareMode,
    ) -> bool {
        compare::is_equal(first, second, mode)
    }

    fn is_sender(&self, sender: &SenderRef, value: Option<&Value>, mode: CompareMode) -> bool {
        compare::is_sender(sender, value, mode)
    }
}

/// Priority-ordered parser list. Registration order breaks priority ties.
#[derive(Clone, Default)]
pub struct TypeParserRegistry {
    parsers: Vec<Arc<dyn TypeParser>>,
}

impl TypeParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, parser: impl TypeParser + 'static) {
        self.register_arc(Arc::new(parser));
    }

    pub fn register_arc(&mut self, parser: Arc<dyn TypeParser>) {
        debug!(
            "Registering type parser {} (priority {})",
            parser.name(),
            parser.priority()
        );
        self.parsers.push(parser);
        self.parsers
            .sort_by_key(|parser| std::cmp::Reverse(parser.priority()));
    }

    /// Removes every parser called `name`. Returns whether any was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.parsers.len();
        self.parsers.retain(|parser| parser.name() != name);
        self.parsers.len() != before
    }

    pub fn parsers(&self) -> impl Iterator<Item = &Arc<dyn TypeParser>> {
        self.parsers.iter()
    }

    pub fn find_parser(&self, value_type: &ValueType) -> Option<&Arc<dyn TypeParser>> {
        self.parsers
            .iter()
            .find(|parser| parser.can_parse(value_type))
    }

    /// First successful parse among the parsers accepting `value_type`.
    pub fn parse(&self, token: &str, value_type: &ValueType, sender: &SenderRef) -> Option<Value> {
        self.parsers
            .iter()
            .filter(|parser| parser.can_parse(value_type))
            .find_map(|parser| parser.parse(token, value_type, sender))
    }

    /// [`parse`](Self::parse), falling back to the raw token for string types.
    pub fn convert(&self, token: &str, value_type: &ValueType, sender: &SenderRef) -> Option<Value> {
        if let Some(value) = self.parse(token, value_type, sender) {
            return Some(value);
        }
        if value_type.is_string() {
            debug!("No parser produced a value for '{token}', keeping the raw string");
            return Some(Value::String(token.to_string()));
        }
        debug!("Could not convert '{token}' to {value_type}");
        None
    }

    pub fn suggestions_for(&self, spec: &ArgumentSpec, sender: &SenderRef) -> Vec<String> {
        self.parsers
            .iter()
            .filter(|parser| parser.can_parse(&spec.value_type))
            .map(|parser| parser.suggestions(sender, Some(spec)))
            .find(|suggestions| !suggestions.is_empty())
            .unwrap_or_default()
    }

    pub fn suggestions_for_filtered(
        &self,
        spec: &ArgumentSpec,
        current: &str,
        sender: &SenderRef,
    ) -> Vec<String> {
        filter_prefix(self.suggestions_for(spec, sender), current)
    }

    pub fn is_special_suggestion(&self, source: &str) -> bool {
        self.parsers
            .iter()
            .any(|parser| parser.can_parse_suggestion(source))
    }

    /// Expands a suggestion source. Sources no parser claims are returned
    /// as a single literal suggestion.
    pub fn parse_suggestion(&self, source: &str, sender: &SenderRef) -> Vec<String> {
        let mut handled = false;
        for parser in &self.parsers {
            if !parser.can_parse_suggestion(source) {
                continue;
            }
            handled = true;
            let suggestions = parser.parse_suggestion(source, sender);
            if !suggestions.is_empty() {
                return suggestions;
            }
        }
        if handled {
            Vec::new()
        } else {
            vec![source.to_string()]
        }
    }

    pub fn parse_suggestion_filtered(
        &self,
        source: &str,
        current: &str,
        sender: &SenderRef,
    ) -> Vec<String> {
        filter_prefix(self.parse_suggestion(source, sender), current)
    }

    /// Equality through the parser owning the left type, then the right one.
    pub fn are_equal(
        &self,
        sender: &SenderRef,
        left: (&ArgumentSpec, Option<&Value>),
        right: (&ArgumentSpec, Option<&Value>),
    ) -> bool {
        let (left_spec, left_value) = left;
        let (right_spec, right_value) = right;
        if let Some(parser) = self.find_parser(&left_spec.value_type) {
            return parser.is_equal(sender, left_value, right_value, left_spec.compare_mode);
        }
        if let Some(parser) = self.find_parser(&right_spec.value_type) {
            return parser.is_equal(sender, left_value, right_value, right_spec.compare_mode);
        }
        compare::is_equal(left_value, right_value, left_spec.compare_mode)
    }

    pub fn is_sender(&self, sender: &SenderRef, spec: &ArgumentSpec, value: Option<&Value>) -> bool {
        match self.find_parser(&spec.value_type) {
            Some(parser) => parser.is_sender(sender, value, spec.compare_mode),
            None => compare::is_sender(sender, value, spec.compare_mode),
        }
    }
}

pub(crate) fn filter_prefix(suggestions: Vec<String>, current: &str) -> Vec<String> {
    if current.is_empty() {
        return suggestions;
    }
    let current = current.to_lowercase();
    suggestions
        .into_iter()
        .filter(|suggestion| suggestion.to_lowercase().starts_with(&current))
        .collect()
}
