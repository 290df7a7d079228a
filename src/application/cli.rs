#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::PromptMode;
use crate::domain::services::help_text;
use crate::domain::services::prompt;

/// What `main` should run once arguments and configuration are settled.
#[derive(Debug, PartialEq, Eq)]
pub enum Launch {
    Chat,
    Ask(String),
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

pub fn log_path() -> path::PathBuf {
    if let Ok(dir) = env::var("DSATUTOR_LOG_DIR") {
        if !dir.is_empty() {
            return path::PathBuf::from(dir).join("debug.log");
        }
    }

    return dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("dsatutor/debug.log");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    if config_file_path_str.is_empty() {
        bail!("Could not determine a configuration directory for this system");
    }

    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for the tutor")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running with environment variable RUST_LOG=dsatutor")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        )
        .subcommand(
            Command::new("template").about("Output the instruction template sent ahead of every question.")
        );
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start an interactive tutoring chat. This is the default.");
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Ask a single question, print the answer and exit.")
        .arg(
            Arg::new("question")
                .help("The question to ask.")
                .num_args(1..)
                .required(true),
        );
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .env("DSATUTOR_CONFIG_FILE")
        .num_args(1)
        .help(format!(
            "Path to configuration file [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ))
        .global(true);
}

fn arg_gemini_token() -> Arg {
    return Arg::new(ConfigKey::GeminiToken.to_string())
        .long(ConfigKey::GeminiToken.to_string())
        .env("DSATUTOR_GEMINI_TOKEN")
        .hide_env_values(true)
        .num_args(1)
        .help("Gemini API key. Leave unset to answer every question with the built-in offline tutor.")
        .global(true);
}

fn arg_gemini_url() -> Arg {
    return Arg::new(ConfigKey::GeminiURL.to_string())
        .long(ConfigKey::GeminiURL.to_string())
        .env("DSATUTOR_GEMINI_URL")
        .num_args(1)
        .help(format!(
            "Gemini API URL. Can be swapped to a compatible proxy. [default: {}]",
            Config::default(ConfigKey::GeminiURL)
        ))
        .global(true);
}

fn arg_health_check_timeout() -> Arg {
    return Arg::new(ConfigKey::HealthCheckTimeout.to_string())
        .long(ConfigKey::HealthCheckTimeout.to_string())
        .env("DSATUTOR_HEALTH_CHECK_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds before timing out when doing a healthcheck for Gemini. [default: {}]",
            Config::default(ConfigKey::HealthCheckTimeout)
        ))
        .global(true);
}

fn arg_max_output_tokens() -> Arg {
    return Arg::new(ConfigKey::MaxOutputTokens.to_string())
        .long(ConfigKey::MaxOutputTokens.to_string())
        .env("DSATUTOR_MAX_OUTPUT_TOKENS")
        .num_args(1)
        .help(format!(
            "Upper bound on the number of tokens in an answer. [default: {}]",
            Config::default(ConfigKey::MaxOutputTokens)
        ))
        .global(true);
}

fn arg_mode() -> Arg {
    return Arg::new(ConfigKey::Mode.to_string())
        .long(ConfigKey::Mode.to_string())
        .env("DSATUTOR_MODE")
        .num_args(1)
        .help(format!(
            "How questions are framed for the model. [default: {}]",
            Config::default(ConfigKey::Mode)
        ))
        .value_parser(PossibleValuesParser::new(PromptMode::VARIANTS))
        .global(true);
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.to_string())
        .short('m')
        .long(ConfigKey::Model.to_string())
        .env("DSATUTOR_MODEL")
        .num_args(1)
        .help(format!(
            "The Gemini model used to answer questions. [default: {}]",
            Config::default(ConfigKey::Model)
        ))
        .global(true);
}

fn arg_request_timeout() -> Arg {
    return Arg::new(ConfigKey::RequestTimeout.to_string())
        .long(ConfigKey::RequestTimeout.to_string())
        .env("DSATUTOR_REQUEST_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds for an answer before giving up. [default: {}]",
            Config::default(ConfigKey::RequestTimeout)
        ))
        .global(true);
}

fn arg_safety_threshold() -> Arg {
    return Arg::new(ConfigKey::SafetyThreshold.to_string())
        .long(ConfigKey::SafetyThreshold.to_string())
        .env("DSATUTOR_SAFETY_THRESHOLD")
        .num_args(1)
        .help(format!(
            "Threshold applied to every harm category. Set to an empty string to use the backend defaults. [default: {}]",
            Config::default(ConfigKey::SafetyThreshold)
        ))
        .global(true);
}

fn arg_temperature() -> Arg {
    return Arg::new(ConfigKey::Temperature.to_string())
        .long(ConfigKey::Temperature.to_string())
        .env("DSATUTOR_TEMPERATURE")
        .num_args(1)
        .help(format!(
            "Sampling temperature. [default: {}]",
            Config::default(ConfigKey::Temperature)
        ))
        .global(true);
}

fn arg_top_k() -> Arg {
    return Arg::new(ConfigKey::TopK.to_string())
        .long(ConfigKey::TopK.to_string())
        .env("DSATUTOR_TOP_K")
        .num_args(1)
        .help(format!(
            "Top-k sampling. [default: {}]",
            Config::default(ConfigKey::TopK)
        ))
        .global(true);
}

fn arg_top_p() -> Arg {
    return Arg::new(ConfigKey::TopP.to_string())
        .long(ConfigKey::TopP.to_string())
        .env("DSATUTOR_TOP_P")
        .num_args(1)
        .help(format!(
            "Nucleus sampling probability. [default: {}]",
            Config::default(ConfigKey::TopP)
        ))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("dsatutor")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_ask())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(arg_config_file())
        .arg(arg_gemini_token())
        .arg(arg_gemini_url())
        .arg(arg_health_check_timeout())
        .arg(arg_max_output_tokens())
        .arg(arg_mode())
        .arg(arg_model())
        .arg(arg_request_timeout())
        .arg(arg_safety_threshold())
        .arg(arg_temperature())
        .arg(arg_top_k())
        .arg(arg_top_p());
}

/// Handles the informational subcommands itself and returns `None` for them.
/// Otherwise loads configuration and returns what to run.
pub async fn parse() -> Result<Option<Launch>> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_path().to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                Some(("template", _)) => {
                    println!(
                        "# Template version {}\n\n{}",
                        prompt::TEMPLATE_VERSION,
                        prompt::RESPONSE_TEMPLATE.trim()
                    );
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("ask", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let question = subcmd_matches
                .get_many::<String>("question")
                .map(|words| return words.cloned().collect::<Vec<String>>().join(" "))
                .unwrap_or_default();

            return Ok(Some(Launch::Ask(question)));
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(None);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(Some(Launch::Chat));
}
