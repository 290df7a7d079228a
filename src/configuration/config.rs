#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::fmt;
use std::path;
use std::str::FromStr;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use clap::Arg;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::PromptMode;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    GeminiToken,
    GeminiURL,
    HealthCheckTimeout,
    MaxOutputTokens,
    Mode,
    Model,
    RequestTimeout,
    SafetyThreshold,
    Temperature,
    TopK,
    TopP,
    Username,
}

fn default_config_path() -> String {
    #[cfg(not(target_os = "macos"))]
    let config_dir = dirs::config_dir();
    #[cfg(target_os = "macos")]
    let config_dir = dirs::home_dir().map(|home| return home.join(".config"));

    return config_dir
        .map(|dir| {
            return dir
                .join("dsatutor/config.toml")
                .to_string_lossy()
                .to_string();
        })
        .unwrap_or_default();
}

fn find_arg(cmd: &Command, key: ConfigKey) -> Option<&Arg> {
    let long = key.to_string();
    return cmd
        .get_arguments()
        .find(|arg| return arg.get_long() == Some(long.as_str()));
}

/// Values clap would accept for `key`, empty when it takes free text.
fn possible_values(cmd: &Command, key: ConfigKey) -> Vec<String> {
    return find_arg(cmd, key)
        .map(|arg| {
            return arg
                .get_possible_values()
                .iter()
                .map(|value| return value.get_name().to_string())
                .collect::<Vec<String>>();
        })
        .unwrap_or_default();
}

/// Parses a raw config value, naming the key when it is malformed.
pub fn parse_value<T>(key: ConfigKey, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    return raw
        .trim()
        .parse::<T>()
        .map_err(|err| return anyhow!("Invalid value for '{key}': {raw} ({err})"));
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn parse<T>(key: ConfigKey) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        return parse_value(key, &Config::get(key));
    }

    pub fn default(key: ConfigKey) -> String {
        if key == ConfigKey::Username {
            let mut user = env::var("USER").unwrap_or_else(|_| return "".to_string());
            if user.is_empty() {
                user = "User".to_string();
            }

            return user;
        }

        let default_mode = PromptMode::default().to_string();
        let config_path = default_config_path();

        let res = match key {
            ConfigKey::GeminiToken => "",
            ConfigKey::GeminiURL => "https://generativelanguage.googleapis.com",
            ConfigKey::HealthCheckTimeout => "1000",
            ConfigKey::MaxOutputTokens => "2048",
            ConfigKey::Mode => &default_mode,
            ConfigKey::Model => "gemini-1.5-pro",
            ConfigKey::RequestTimeout => "30000",
            ConfigKey::SafetyThreshold => "BLOCK_MEDIUM_AND_ABOVE",
            ConfigKey::Temperature => "0.7",
            ConfigKey::TopK => "40",
            ConfigKey::TopP => "0.95",

            // Special
            ConfigKey::ConfigFile => &config_path,
            ConfigKey::Username => "",
        };

        return res.to_string();
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.is_file() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                let val = match doc.get(&key.to_string()) {
                    Some(val) => val,
                    None => continue,
                };

                let allowed = possible_values(&cmd, key);

                if let Some(val_int) = val.as_integer() {
                    Config::set(key, &val_int.to_string());
                } else if let Some(val_float) = val.as_float() {
                    Config::set(key, &val_float.to_string());
                } else if let Some(val_str) = val.as_str() {
                    if val_str.is_empty() {
                        continue;
                    }
                    if !allowed.is_empty() && !allowed.contains(&val_str.to_string()) {
                        bail!(
                            "{} has an invalid value for key '{key}': {val_str}\nPossible values are: {}",
                            config_path.display(),
                            allowed.join(", ")
                        );
                    }
                    Config::set(key, val_str);
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            username = Config::get(ConfigKey::Username),
            mode = Config::get(ConfigKey::Mode),
            model = Config::get(ConfigKey::Model),
            gemini_url = Config::get(ConfigKey::GeminiURL),
            has_token = !Config::get(ConfigKey::GeminiToken).is_empty(),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                if key == ConfigKey::Username {
                    return Some(
                        "# Your user name, shown next to your questions.\n# username = \"\""
                            .to_string(),
                    );
                }

                let arg = find_arg(&cmd, key)?;

                let mut description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let allowed = possible_values(&cmd, key);
                if !allowed.is_empty() {
                    description = format!("{description} [possible values: {}]", allowed.join(", "));
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i64>().is_ok() || val.parse::<f64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
