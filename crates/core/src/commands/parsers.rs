//! Built-in [`TypeParser`]s.

use crate::commands::{
    argument::{ArgumentSpec, CompareMode, ValueType},
    compare,
    context::SenderRef,
    parser::{TypeParser, TypeParserRegistry},
    value::{PlayerRef, Value},
};
use crate::utils::HyphenatedUUID;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static LIST_SUGGESTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{([^}]+)\}$").unwrap());

/// Source of online players for the player parser.
pub trait PlayerDirectory: Send + Sync {
    fn online_players(&self) -> Vec<PlayerRef>;

    fn find_player(&self, name: &str) -> Option<PlayerRef> {
        self.online_players()
            .into_iter()
            .find(|player| player.name.eq_ignore_ascii_case(name))
    }
}

impl TypeParserRegistry {
    /// A registry preloaded with every built-in parser.
    pub fn with_defaults(players: Arc<dyn PlayerDirectory>) -> Self {
        let mut registry = Self::new();
        registry.register(StringParser);
        registry.register(IntegerParser);
        registry.register(LongParser);
        registry.register(FloatParser);
        registry.register(BooleanParser);
        registry.register(EnumParser);
        registry.register(UuidParser);
        registry.register(ListSuggestionParser);
        registry.register(NumberSuggestionParser);
        registry.register(PlayerParser::new(players));
        registry
    }
}

pub struct StringParser;

impl TypeParser for StringParser {
    fn name(&self) -> &str {
        "string"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn can_parse(&self, value_type: &ValueType) -> bool {
        value_type.is_string()
    }

    fn parse(&self, token: &str, _: &ValueType, _: &SenderRef) -> Option<Value> {
        Some(Value::String(token.to_string()))
    }
}

pub struct IntegerParser;

impl TypeParser for IntegerParser {
    fn name(&self) -> &str {
        "integer"
    }

    fn can_parse(&self, value_type: &ValueType) -> bool {
        matches!(value_type, ValueType::Integer)
    }

    fn parse(&self, token: &str, _: &ValueType, _: &SenderRef) -> Option<Value> {
        token.trim().parse().ok().map(Value::Integer)
    }
}

pub struct LongParser;

impl TypeParser for LongParser {
    fn name(&self) -> &str {
        "long"
    }

    fn can_parse(&self, value_type: &ValueType) -> bool {
        matches!(value_type, ValueType::Long)
    }

    fn parse(&self, token: &str, _: &ValueType, _: &SenderRef) -> Option<Value> {
        token.trim().parse().ok().map(Value::Long)
    }
}

pub struct FloatParser;

impl TypeParser for FloatParser {
    fn name(&self) -> &str {
        "float"
    }

    fn can_parse(&self, value_type: &ValueType) -> bool {
        matches!(value_type, ValueType::Float)
    }

    fn parse(&self, token: &str, _: &ValueType, _: &SenderRef) -> Option<Value> {
        token
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Value::Float)
    }
}

pub struct BooleanParser;

impl TypeParser for BooleanParser {
    fn name(&self) -> &str {
        "boolean"
    }

    fn can_parse(&self, value_type: &ValueType) -> bool {
        matches!(value_type, ValueType::Boolean)
    }

    fn parse(&self, token: &str, _: &ValueType, _: &SenderRef) -> Option<Value> {
        if token.eq_ignore_ascii_case("true") {
            Some(Value::Boolean(true))
        } else if token.eq_ignore_ascii_case("false") {
            Some(Value::Boolean(false))
        } else {
            None
        }
    }

    fn suggestions(&self, _: &SenderRef, _: Option<&ArgumentSpec>) -> Vec<String> {
        vec!["true".to_string(), "false".to_string()]
    }
}

/// Matches enumeration constants case-insensitively, with spaces read as `_`.
pub struct EnumParser;

impl TypeParser for EnumParser {
    fn name(&self) -> &str {
        "enum"
    }

    fn can_parse(&self, value_type: &ValueType) -> bool {
        matches!(value_type, ValueType::Enum { .. })
    }

    fn parse(&self, token: &str, value_type: &ValueType, _: &SenderRef) -> Option<Value> {
        let ValueType::Enum { constants, .. } = value_type else {
            return None;
        };
        let wanted = token.trim().replace(' ', "_");
        constants
            .iter()
            .find(|constant| constant.eq_ignore_ascii_case(&wanted))
            .map(|constant| Value::Choice(constant.clone()))
    }

    fn suggestions(&self, _: &SenderRef, spec: Option<&ArgumentSpec>) -> Vec<String> {
        match spec.map(|spec| &spec.value_type) {
            Some(ValueType::Enum { constants, .. }) => constants
                .iter()
                .map(|constant| constant.to_lowercase())
                .collect(),
            _ => Vec::new(),
        }
    }
}

pub struct UuidParser;

impl TypeParser for UuidParser {
    fn name(&self) -> &str {
        "uuid"
    }

    fn can_parse(&self, value_type: &ValueType) -> bool {
        matches!(value_type, ValueType::Uuid)
    }

    fn parse(&self, token: &str, _: &ValueType, _: &SenderRef) -> Option<Value> {
        let token = token.trim();
        if token.chars().filter(|c| *c != '-').count() != 32 {
            return None;
        }
        token
            .parse::<HyphenatedUUID>()
            .ok()
            .map(|uuid| Value::Uuid(uuid.0))
    }
}

/// Expands literal lists written as `{a,b,c}`.
pub struct ListSuggestionParser;

impl TypeParser for ListSuggestionParser {
    fn name(&self) -> &str {
        "list"
    }

    fn priority(&self) -> i32 {
        80
    }

    fn can_parse(&self, _: &ValueType) -> bool {
        false
    }

    fn parse(&self, _: &str, _: &ValueType, _: &SenderRef) -> Option<Value> {
        None
    }

    fn can_parse_suggestion(&self, source: &str) -> bool {
        LIST_SUGGESTION.is_match(source)
    }

    fn parse_suggestion(&self, source: &str, _: &SenderRef) -> Vec<String> {
        literal_list(source).unwrap_or_default()
    }
}

/// Items of a `{a,b,c}` literal list, if `source` is one.
pub(crate) fn literal_list(source: &str) -> Option<Vec<String>> {
    let captures = LIST_SUGGESTION.captures(source)?;
    Some(
        captures[1]
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// `@number` offers `0, 5, ..., 100`.
pub struct NumberSuggestionParser;

impl TypeParser for NumberSuggestionParser {
    fn name(&self) -> &str {
        "number"
    }

    fn can_parse(&self, _: &ValueType) -> bool {
        false
    }

    fn parse(&self, _: &str, _: &ValueType, _: &SenderRef) -> Option<Value> {
        None
    }

    fn can_parse_suggestion(&self, source: &str) -> bool {
        source.eq_ignore_ascii_case("@number")
    }

    fn parse_suggestion(&self, _: &str, _: &SenderRef) -> Vec<String> {
        (0..=100).step_by(5).map(|n: i32| n.to_string()).collect()
    }
}

/// Online players by name. `@sender` and `self` refer to the invoking player.
pub struct PlayerParser {
    players: Arc<dyn PlayerDirectory>,
}

impl PlayerParser {
    pub fn new(players: Arc<dyn PlayerDirectory>) -> Self {
        Self { players }
    }

    fn online_names(&self) -> Vec<String> {
        self.players
            .online_players()
            .into_iter()
            .map(|player| player.name)
            .collect()
    }

    /// The player's id, looked up by name among online players when the
    /// reference carries none.
    fn player_id(&self, player: &PlayerRef) -> Option<u128> {
        player
            .id
            .or_else(|| self.players.find_player(&player.name).and_then(|found| found.id))
    }

    fn same_player(&self, first: &PlayerRef, second: &PlayerRef) -> bool {
        match (self.player_id(first), self.player_id(second)) {
            (Some(a), Some(b)) => a == b,
            _ => first.name.eq_ignore_ascii_case(&second.name),
        }
    }
}

impl TypeParser for PlayerParser {
    fn name(&self) -> &str {
        "player"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn can_parse(&self, value_type: &ValueType) -> bool {
        matches!(value_type, ValueType::Player)
    }

    fn parse(&self, token: &str, _: &ValueType, sender: &SenderRef) -> Option<Value> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("@sender") || token.eq_ignore_ascii_case("self") {
            return sender.as_player().map(Value::Player);
        }
        self.players.find_player(token).map(Value::Player)
    }

    fn suggestions(&self, _: &SenderRef, _: Option<&ArgumentSpec>) -> Vec<String> {
        self.online_names()
    }

    fn can_parse_suggestion(&self, source: &str) -> bool {
        ["@players", "@player", "@sender"]
            .iter()
            .any(|marker| source.eq_ignore_ascii_case(marker))
    }

    fn parse_suggestion(&self, source: &str, sender: &SenderRef) -> Vec<String> {
        if source.eq_ignore_ascii_case("@sender") {
            return sender
                .as_player()
                .map(|player| vec![player.name])
                .unwrap_or_default();
        }
        self.online_names()
    }

    /// Players compare by id, then by name. Explicit compare modes and
    /// non-player values use the generic comparison.
    fn is_equal(
        &self,
        _sender: &SenderRef,
        first: Option<&Value>,
        second: Option<&Value>,
        mode: CompareMode,
    ) -> bool {
        match (first, second) {
            (Some(Value::Player(a)), Some(Value::Player(b))) if mode == CompareMode::Auto => {
                self.same_player(a, b)
            }
            _ => compare::is_equal(first, second, mode),
        }
    }

    fn is_sender(&self, sender: &SenderRef, value: Option<&Value>, mode: CompareMode) -> bool {
        match (value, sender.as_player()) {
            (Some(Value::Player(player)), Some(me)) if mode == CompareMode::Auto => {
                self.same_player(player, &me)
            }
            _ => compare::is_sender(sender, value, mode),
        }
    }
}
