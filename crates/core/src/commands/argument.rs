use std::fmt;

/// Semantic type tag used to pick a [`TypeParser`](super::parser::TypeParser).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Long,
    Float,
    Boolean,
    Uuid,
    Player,
    /// The platform's generic sender type. Always filled from the invoking sender.
    Sender,
    Enum {
        name: String,
        constants: Vec<String>,
    },
    /// A host-defined type, handled by a host-registered parser.
    Custom(String),
}

impl ValueType {
    pub fn enumeration<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueType::Enum {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ValueType::String)
    }

    /// Lowercase name used in usage hints such as `integer:1|...`.
    pub fn type_name(&self) -> &str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Boolean => "boolean",
            ValueType::Uuid => "uuid",
            ValueType::Player => "player",
            ValueType::Sender => "sender",
            ValueType::Enum { name, .. } => name,
            ValueType::Custom(name) => name,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PermissionCondition {
    #[default]
    Always,
    NotNull,
    /// The target refers to the invoking sender.
    IsSelf,
    Other,
    AnyOther,
    Distinct,
    AllDistinct,
    Equals,
    NotEquals,
    Exists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareMode {
    #[default]
    Auto,
    Identity,
    Name,
    RawEquals,
}

/// Who holds a permission node when nothing explicit has been granted or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PermissionDefault {
    False,
    NotOp,
    #[default]
    Op,
    True,
}

impl PermissionDefault {
    pub fn grants(self, is_op: bool) -> bool {
        match self {
            PermissionDefault::False => false,
            PermissionDefault::NotOp => !is_op,
            PermissionDefault::Op => is_op,
            PermissionDefault::True => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SenderKind {
    Any,
    Player,
    Console,
    Block,
    Remote,
}

impl fmt::Display for SenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SenderKind::Any => "anyone",
            SenderKind::Player => "players",
            SenderKind::Console => "the console",
            SenderKind::Block => "command blocks",
            SenderKind::Remote => "remote consoles",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub(crate) long: Vec<String>,
    pub(crate) short: Vec<String>,
    pub(crate) flag: bool,
}

impl OptionSpec {
    /// `--long` form used in usage strings.
    pub fn primary_token(&self) -> Option<String> {
        self.long
            .first()
            .map(|name| format!("--{name}"))
            .or_else(|| self.short.first().map(|name| format!("-{name}")))
    }
}

/// Immutable descriptor of one command parameter.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    pub(crate) name: String,
    pub(crate) value_type: ValueType,
    pub(crate) optional: bool,
    pub(crate) default_value: Option<String>,
    pub(crate) suggestions: Vec<String>,
    /// `None` when no permission is declared, `Some("")` for the derived node.
    pub(crate) permission: Option<String>,
    pub(crate) permission_node: Option<String>,
    pub(crate) include_argument_segment: bool,
    pub(crate) permission_default: PermissionDefault,
    pub(crate) condition: PermissionCondition,
    pub(crate) condition_args: Vec<String>,
    pub(crate) compare_mode: CompareMode,
    pub(crate) greedy: bool,
    pub(crate) sender_bound: bool,
    pub(crate) sender_kinds: Vec<SenderKind>,
    pub(crate) option: Option<OptionSpec>,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            optional: false,
            default_value: None,
            suggestions: Vec::new(),
            permission: None,
            permission_node: None,
            include_argument_segment: true,
            permission_default: PermissionDefault::Op,
            condition: PermissionCondition::Always,
            condition_args: Vec::new(),
            compare_mode: CompareMode::Auto,
            greedy: false,
            sender_bound: false,
            sender_kinds: Vec::new(),
            option: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Integer)
    }

    pub fn player(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Player)
    }

    /// An argument filled from the invoking sender, restricted to `kinds`.
    pub fn sender(name: impl Into<String>, value_type: ValueType, kinds: &[SenderKind]) -> Self {
        let mut spec = Self::new(name, value_type);
        spec.sender_bound = true;
        spec.sender_kinds = kinds.to_vec();
        spec
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Clears optionality and any default. Mostly useful for named options,
    /// which start out optional.
    pub fn required(mut self) -> Self {
        self.optional = false;
        self.default_value = None;
        self
    }

    /// Sets the pre-conversion default. Implies [`optional`](Self::optional).
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self.optional = true;
        self
    }

    /// Adds a suggestion source: a literal set `{a,b}`, a special marker
    /// such as `@players`, or the name of a provider registered on the command.
    pub fn suggest(mut self, source: impl Into<String>) -> Self {
        self.suggestions.push(source.into());
        self
    }

    /// Declares a permission. An empty node derives one from the command path.
    pub fn permission(mut self, node: impl Into<String>) -> Self {
        self.permission = Some(node.into());
        self
    }

    /// Overrides the trailing segment of the derived permission node.
    pub fn permission_node(mut self, node: impl Into<String>) -> Self {
        self.permission_node = Some(node.into());
        self
    }

    pub fn without_argument_segment(mut self) -> Self {
        self.include_argument_segment = false;
        self
    }

    pub fn permission_default(mut self, default: PermissionDefault) -> Self {
        self.permission_default = default;
        self
    }

    pub fn condition<I, S>(mut self, condition: PermissionCondition, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.condition = condition;
        self.condition_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn compare_mode(mut self, mode: CompareMode) -> Self {
        self.compare_mode = mode;
        self
    }

    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    /// Makes this a named option reachable through `--long` / `-short`.
    pub fn option(mut self, long: &[&str], short: &[&str]) -> Self {
        self.option = Some(OptionSpec {
            long: normalize_option_names(long),
            short: normalize_option_names(short),
            flag: false,
        });
        self.optional = true;
        self
    }

    /// Like [`option`](Self::option) but takes no value.
    pub fn flag(self, long: &[&str], short: &[&str]) -> Self {
        let mut spec = self.option(long, short);
        if let Some(option) = &mut spec.option {
            option.flag = true;
        }
        spec
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    pub fn suggestion_sources(&self) -> &[String] {
        &self.suggestions
    }

    pub fn declares_permission(&self) -> bool {
        self.permission.is_some()
    }

    pub fn is_option(&self) -> bool {
        self.option.is_some()
    }

    pub fn is_flag(&self) -> bool {
        self.option.as_ref().is_some_and(|option| option.flag)
    }

    pub(crate) fn optional_or_defaulted(&self) -> bool {
        self.optional || self.default_value.is_some()
    }
}

fn normalize_option_names(names: &[&str]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim().trim_start_matches('-').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_value_implies_optional() {
        let spec = ArgumentSpec::integer("amount").default_value("1");
        assert!(spec.is_optional());
        assert_eq!(spec.default(), Some("1"));
    }

    #[test]
    fn option_names_are_normalized() {
        let spec = ArgumentSpec::string("world").option(&["--world", "w"], &["-w"]);
        let option = spec.option.as_ref().unwrap();
        assert_eq!(option.long, vec!["world", "w"]);
        assert_eq!(option.short, vec!["w"]);
        assert_eq!(option.primary_token().as_deref(), Some("--world"));
        assert!(!spec.is_flag());
    }

    #[test]
    fn permission_default_policy() {
        assert!(PermissionDefault::Op.grants(true));
        assert!(!PermissionDefault::Op.grants(false));
        assert!(PermissionDefault::NotOp.grants(false));
        assert!(!PermissionDefault::False.grants(true));
        assert!(PermissionDefault::True.grants(false));
    }
}
