use std::{env, path::PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::{
    cli::{output, CliError},
    config::{Config, ConfigManager},
    domain::{Displayable, MemberField, MemberRecord},
    errors::FormError,
    form::{edit_record, CrosstermSurface, FormResult, ScriptedSurface, TerminalSurface},
    storage::{JsonRecordStore, RecordStore},
    utils::build_info,
};

/// Environment variable holding a scripted key sequence for headless runs.
pub const TEST_KEYS_ENV: &str = "MEMBER_FORM_TEST_KEYS";

const SCRIPTED_WIDTH: u16 = 80;
const SCRIPTED_HEIGHT: u16 = 25;

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub store: Option<PathBuf>,
    pub assume_yes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    View(usize),
    Add,
    Edit(usize),
    Delete(usize),
    ConfigShow,
    ConfigSet { key: String, value: String },
    Version,
    Help,
}

pub const USAGE: &str = "Usage: member_form_cli [--store <file.json>] <command>\n\
Commands:\n  \
list\n  \
view <n>\n  \
add\n  \
edit <n>\n  \
delete <n> [--yes]\n  \
config [set <key> <value>]\n  \
version";

impl Invocation {
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = None;
        let mut assume_yes = false;
        let mut positional = Vec::new();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--store" => {
                    let path = args
                        .next()
                        .ok_or_else(|| CliError::Usage("--store needs a file path".into()))?;
                    store = Some(PathBuf::from(path));
                }
                "--yes" | "-y" => assume_yes = true,
                "--help" | "-h" => positional.insert(0, "help".to_string()),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            Some("list") | Some("ls") => Command::List,
            Some("view") => Command::View(position(positional.next())?),
            Some("add") => Command::Add,
            Some("edit") => Command::Edit(position(positional.next())?),
            Some("delete") | Some("rm") => Command::Delete(position(positional.next())?),
            Some("config") => match positional.next().as_deref() {
                None | Some("show") => Command::ConfigShow,
                Some("set") => {
                    let key = positional
                        .next()
                        .ok_or_else(|| CliError::Usage("config set needs a key".into()))?;
                    let value = positional.next().unwrap_or_default();
                    Command::ConfigSet { key, value }
                }
                Some(other) => {
                    return Err(CliError::Usage(format!("unknown config action `{other}`")))
                }
            },
            Some("version") => Command::Version,
            Some("help") => Command::Help,
            Some(other) => return Err(CliError::Usage(format!("unknown command `{other}`"))),
            None => return Err(CliError::Usage("missing command".into())),
        };
        Ok(Self {
            command,
            store,
            assume_yes,
        })
    }
}

/// One-based list position as typed by the user.
fn position(raw: Option<String>) -> Result<usize, CliError> {
    let raw = raw.ok_or_else(|| CliError::Usage("expected a member number".into()))?;
    match raw.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(FormError::InvalidInput(format!("`{raw}` is not a member number")).into()),
    }
}

/// Executes a parsed invocation against the configured record store.
pub fn execute(invocation: Invocation) -> Result<(), CliError> {
    let manager = ConfigManager::new();
    let mut config = manager.load()?;
    if let Some(store) = &invocation.store {
        config.store_path = Some(store.clone());
    }

    match invocation.command {
        Command::List => list(&open_store(&config)?),
        Command::View(position) => view(&open_store(&config)?, position),
        Command::Add => add(&mut open_store(&config)?, &config),
        Command::Edit(position) => edit(&mut open_store(&config)?, &config, position),
        Command::Delete(position) => {
            delete(&mut open_store(&config)?, position, invocation.assume_yes)
        }
        Command::ConfigShow => {
            show_config(&config);
            Ok(())
        }
        Command::ConfigSet { key, value } => {
            // Reload so a one-off `--store` flag is not persisted.
            let mut stored = manager.load()?;
            stored.set(&key, &value)?;
            manager.save(&stored)?;
            output::success(format!("Set {key} (saved to {})", manager.path().display()));
            Ok(())
        }
        Command::Version => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> Result<JsonRecordStore, CliError> {
    Ok(JsonRecordStore::open(
        config.resolved_store_path(),
        config.collection.clone(),
    )?)
}

fn record_at(store: &impl RecordStore, position: usize) -> Result<MemberRecord, CliError> {
    store
        .get_at(position - 1)
        .map_err(|_| FormError::IndexOutOfRange(position).into())
}

fn list(store: &impl RecordStore) -> Result<(), CliError> {
    let records = store.list()?;
    if records.is_empty() {
        output::info("No members yet. Use `add` to create one.");
        return Ok(());
    }
    for (index, record) in records.iter().enumerate() {
        println!("{:>3}. {}", index + 1, record.display_label());
    }
    Ok(())
}

fn view(store: &impl RecordStore, position: usize) -> Result<(), CliError> {
    let record = record_at(store, position)?;
    output::section(record.full_name());
    for field in MemberField::ALL {
        let value = record.display_value(field);
        let shown = if value.is_empty() { "-" } else { value.as_str() };
        println!("{:<18} {}", format!("{}:", field.label()), shown);
    }
    Ok(())
}

fn add(store: &mut impl RecordStore, config: &Config) -> Result<(), CliError> {
    match run_form(config, &MemberRecord::blank())? {
        FormResult::Completed(record) => {
            let name = record.full_name();
            store.insert(record)?;
            output::success(format!("Added {name}"));
        }
        FormResult::Cancelled => output::warning("Add cancelled; nothing was saved"),
    }
    Ok(())
}

fn edit(store: &mut impl RecordStore, config: &Config, position: usize) -> Result<(), CliError> {
    let original = record_at(store, position)?;
    let edited = match run_form(config, &original)? {
        FormResult::Completed(record) => record,
        FormResult::Cancelled => {
            output::warning("Edit cancelled; nothing was saved");
            return Ok(());
        }
    };

    let changed = original.changed_fields(&edited);
    if changed.is_empty() || !store.update(&edited)? {
        output::info(format!("No changes to {}", original.full_name()));
        return Ok(());
    }
    let labels: Vec<&str> = changed.iter().map(|field| field.label()).collect();
    output::success(format!(
        "Updated {} ({})",
        edited.full_name(),
        labels.join(", ")
    ));
    Ok(())
}

fn delete(store: &mut impl RecordStore, position: usize, assume_yes: bool) -> Result<(), CliError> {
    let record = record_at(store, position)?;
    if !assume_yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {}?", record.display_label()))
            .default(false)
            .interact()?;
        if !confirmed {
            output::warning("Delete cancelled");
            return Ok(());
        }
    }
    let removed = store.delete_at(position - 1)?;
    output::success(format!("Deleted {}", removed.full_name()));
    Ok(())
}

fn show_config(config: &Config) {
    output::section("Configuration");
    for (key, value) in config.entries() {
        println!("{key:<15} {value}");
    }
}

/// Runs the member form on the scripted surface when a key script is set,
/// otherwise on the real terminal.
fn run_form(config: &Config, record: &MemberRecord) -> Result<FormResult<MemberRecord>, CliError> {
    let mut surface = open_surface(config)?;
    let result = edit_record(surface.as_mut(), record);
    // Restore the terminal before anything is printed.
    drop(surface);
    Ok(result?)
}

fn open_surface(config: &Config) -> Result<Box<dyn TerminalSurface>, CliError> {
    if let Ok(script) = env::var(TEST_KEYS_ENV) {
        tracing::debug!("using scripted key input");
        return Ok(Box::new(ScriptedSurface::from_script(
            SCRIPTED_WIDTH,
            SCRIPTED_HEIGHT,
            &script,
        )));
    }
    let surface = CrosstermSurface::activate(config.audible_alerts).map_err(FormError::from)?;
    Ok(Box::new(surface))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_flags() {
        let invocation = Invocation::parse(["--store", "m.json", "delete", "2", "--yes"]).unwrap();
        assert_eq!(invocation.command, Command::Delete(2));
        assert_eq!(invocation.store, Some(PathBuf::from("m.json")));
        assert!(invocation.assume_yes);

        assert_eq!(
            Invocation::parse(["config", "set", "collection", "alumni"])
                .unwrap()
                .command,
            Command::ConfigSet {
                key: "collection".into(),
                value: "alumni".into()
            }
        );
        assert_eq!(Invocation::parse(["config"]).unwrap().command, Command::ConfigShow);
    }

    #[test]
    fn rejects_bad_positions_and_unknown_commands() {
        assert!(matches!(
            Invocation::parse(["view", "0"]),
            Err(CliError::Form(FormError::InvalidInput(_)))
        ));
        assert!(matches!(Invocation::parse(["edit"]), Err(CliError::Usage(_))));
        assert!(matches!(Invocation::parse(["frobnicate"]), Err(CliError::Usage(_))));
        assert!(matches!(
            Invocation::parse(Vec::<String>::new()),
            Err(CliError::Usage(_))
        ));
    }
}
