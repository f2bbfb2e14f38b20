//! Declarative command dispatch: typed arguments, conditional permissions
//! and tab completion over a registered command tree.

mod argument;
mod argument_set;
mod autocomplete;
mod builtin;
mod compare;
mod condition;
mod context;
mod error;
mod executor;
mod invocation;
mod node;
mod options;
mod parser;
mod parsers;
mod permission;
mod registry;
mod resolver;
mod result;
mod usage;
mod value;

pub use argument::{
    ArgumentSpec, CompareMode, OptionSpec, PermissionCondition, PermissionDefault, SenderKind,
    ValueType,
};
pub use argument_set::ArgumentSet;
pub use autocomplete::SuggestionGenerator;
pub use builtin::register_builtins;
pub use compare::{is_equal, is_sender};
pub use condition::ConditionEvaluator;
pub use context::{CommandPlatform, ExecutionContext, SenderRef};
pub use error::{CommandError, HandlerResult, InternalError, ResolveError, RuntimeError};
pub use executor::Dispatcher;
pub use invocation::Invocation;
pub use node::{
    ClosureExecutor, Command, CommandAction, CommandOverrides, Executor, Handler,
    SuggestionProvider,
};
pub use parser::{TypeParser, TypeParserRegistry};
pub use parsers::{
    BooleanParser, EnumParser, FloatParser, IntegerParser, ListSuggestionParser, LongParser,
    NumberSuggestionParser, PlayerDirectory, PlayerParser, StringParser, UuidParser,
};
pub use permission::PermissionResolver;
pub use registry::CommandRegistry;
pub use resolver::{ArgumentResolver, ResolvedArguments};
pub use result::CommandResult;
pub use usage::{display_name, format_arguments, generate_subcommand_usages, generate_usage};
pub use value::{PlayerRef, Value};
