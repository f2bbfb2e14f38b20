use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use toml_edit::{value, DocumentMut, Table};
use tracing::{info, warn};

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut Table);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut Table) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String);

macro_rules! gen_config {
    (
        $( $name:ident: $type:ty = $default:expr ),*
    ) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(default)]
        pub struct EngineConfig {
            $(
                pub $name: $type,
            )*
        }

        impl Default for EngineConfig {
            fn default() -> Self {
                Self {
                    $(
                        $name: $default,
                    )*
                }
            }
        }

        impl EngineConfig {
            /// Reads `path`, writing back any missing entries with their
            /// defaults. A missing file is created.
            pub fn load(path: impl AsRef<Path>) -> Result<EngineConfig> {
                let path = path.as_ref();
                let original = match fs::read_to_string(path) {
                    Ok(contents) => contents,
                    Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
                    Err(err) => {
                        return Err(err).with_context(|| format!("Failed to read {}", path.display()))
                    }
                };
                let mut doc = original
                    .parse::<DocumentMut>()
                    .with_context(|| format!("Failed to parse {}", path.display()))?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), doc.as_table_mut());
                )*

                let patched = doc.to_string();
                if original != patched {
                    fs::write(path, &patched)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote missing configuration entries to {}", path.display());
                }

                Self::from_toml_str(&patched)
            }
        }
    };
}

gen_config! {
    permission_prefix: String = "cmdforge".to_string(),
    namespace: String = "cmdforge".to_string(),
    messages: Messages = Messages::default()
}

impl EngineConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<EngineConfig> {
        toml::from_str(contents).context("Invalid engine configuration")
    }
}

macro_rules! gen_messages {
    (
        $( $name:ident = $default:literal ),*
    ) => {
        /// User-facing message templates. `{name}` placeholders are filled
        /// in with [`Messages::format`].
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct Messages {
            $(
                pub $name: String,
            )*
        }

        impl Default for Messages {
            fn default() -> Self {
                Self {
                    $(
                        $name: $default.to_string(),
                    )*
                }
            }
        }

        impl ConfigSerializeDefault for Messages {
            fn fix_config(self, name: &str, doc: &mut Table) {
                let entry = doc.entry(name).or_insert_with(toml_edit::table);
                let Some(table) = entry.as_table_mut() else {
                    warn!("Configuration entry '{}' is not a table, leaving it alone", name);
                    return;
                };
                $(
                    table.entry(stringify!($name)).or_insert_with(|| value(self.$name));
                )*
            }
        }
    };
}

gen_messages! {
    no_permission = "You do not have permission to use this command.",
    execution_error = "An error occurred while executing this command.",
    executed = "Command executed.",
    specify_subcommand = "Please specify a subcommand: {subcommands}",
    unknown_subcommand = "Unknown subcommand: {subcommand}. Available: {subcommands}",
    invalid_arguments = "Invalid arguments. Usage: {usage}",
    not_found = "Unknown command: {command}",
    not_found_with_alternatives = "Unknown command: {command}. Available: {commands}",
    sender_mismatch = "This command can only be used by: {expected}"
}

impl Messages {
    pub fn format(template: &str, placeholders: &[(&str, &str)]) -> String {
        placeholders
            .iter()
            .fold(template.to_string(), |message, (key, replacement)| {
                message.replace(&format!("{{{key}}}"), replacement)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
                permission_prefix = "myserver"

                [messages]
                no_permission = "Nope."
            "#,
        )
        .unwrap();
        assert_eq!(config.permission_prefix, "myserver");
        assert_eq!(config.namespace, "cmdforge");
        assert_eq!(config.messages.no_permission, "Nope.");
        assert_eq!(config.messages.executed, "Command executed.");
    }

    #[test]
    fn placeholders() {
        assert_eq!(
            Messages::format(
                &Messages::default().unknown_subcommand,
                &[("subcommand", "foo"), ("subcommands", "set, list")]
            ),
            "Unknown subcommand: foo. Available: set, list"
        );
    }

    #[test]
    fn load_patches_file() {
        let path = std::env::temp_dir().join(format!("cmdforge-config-{}.toml", std::process::id()));
        fs::write(&path, "# keep me\nnamespace = \"hub\"\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.namespace, "hub");
        assert_eq!(config.permission_prefix, "cmdforge");

        let patched = fs::read_to_string(&path).unwrap();
        assert!(patched.starts_with("# keep me\nnamespace = \"hub\"\n"));
        assert!(patched.contains("permission_prefix = \"cmdforge\""));
        assert!(patched.contains("[messages]"));
        let _ = fs::remove_file(&path);
    }
}
