//! Command execution against a configured store

use crate::cli::{Command, GetArgs, ImportArgs, ListArgs, PutArgs};
use anyhow::{Context, Result};
use dbmsg_config::Config;
use dbmsg_i18n::{BundleRecord, Locale, MessageResolver, MessageSourceBuilder};
use dbmsg_store::SledBundleStore;
use std::io::Write;
use tracing::{debug, info};

/// An opened store plus the configuration it was opened with
#[derive(Debug)]
pub struct App {
    config: Config,
    store: SledBundleStore,
}

impl App {
    /// Open the store named by the configuration
    pub fn open(config: Config) -> Result<Self> {
        let store = SledBundleStore::from_config(&config.store)
            .with_context(|| format!("Failed to open store at {}", config.store.path))?;
        Ok(Self { config, store })
    }

    /// The loaded configuration
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Build a resolver over this store from the `messages` section
    pub fn resolver(&self) -> Result<MessageResolver> {
        let resolver = MessageSourceBuilder::from_config(&self.config.messages)?
            .loader(self.store.clone())
            .build()
            .context("Failed to build message source")?;
        Ok(resolver)
    }

    /// Run one command, writing its output to `out`
    pub fn run(&self, command: &Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Get(args) => self.get(args, out),
            Command::Put(args) => self.put(args, out),
            Command::Import(args) => self.import(args, out),
            Command::List(args) => self.list(args, out),
        }
    }

    fn get(&self, args: &GetArgs, out: &mut impl Write) -> Result<()> {
        let locale: Locale = args.locale.parse()?;
        let positional: Vec<&str> = args.args.iter().map(String::as_str).collect();

        let message = self.resolver()?.get_message(
            &args.code,
            &locale,
            &positional,
            args.default.as_deref(),
        )?;
        writeln!(out, "{message}")?;
        Ok(())
    }

    fn put(&self, args: &PutArgs, out: &mut impl Write) -> Result<()> {
        let locale: Locale = args.locale.parse()?;
        let record = BundleRecord::new(&args.basename, &args.key, &args.value).with_locale(&locale);
        let name = record.composed_name();

        self.store.upsert(record)?;
        self.store.flush()?;

        info!(bundle = %name, key = %args.key, "Record stored");
        writeln!(out, "{name}/{}", args.key)?;
        Ok(())
    }

    fn import(&self, args: &ImportArgs, out: &mut impl Write) -> Result<()> {
        let count = self
            .store
            .import_json(&args.file)
            .with_context(|| format!("Failed to import {}", args.file.display()))?;
        self.store.flush()?;

        writeln!(out, "Imported {count} records")?;
        Ok(())
    }

    fn list(&self, args: &ListArgs, out: &mut impl Write) -> Result<()> {
        let records: Vec<BundleRecord> = self
            .store
            .records()?
            .into_iter()
            .filter(|r| args.basename.as_deref().map_or(true, |b| r.base_name == b))
            .collect();
        debug!(count = records.len(), "Listing records");

        if args.json {
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
        } else {
            for record in &records {
                writeln!(out, "{}\t{}\t{}", record.composed_name(), record.key, record.value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbmsg_common::test_utils::create_temp_dir;

    fn app_in(dir: &tempfile::TempDir) -> App {
        let mut config = Config::default();
        config.store.path = dir.path().join("db").to_string_lossy().into_owned();
        config.messages.basename = "app".to_string();
        App::open(config).unwrap()
    }

    fn run(app: &App, command: Command) -> String {
        let mut out = Vec::new();
        app.run(&command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_put_then_get() {
        let dir = create_temp_dir();
        let app = app_in(&dir);

        let stored = run(
            &app,
            Command::Put(PutArgs {
                basename: "app".to_string(),
                key: "greeting".to_string(),
                value: "Hallo {0}".to_string(),
                locale: "de".to_string(),
            }),
        );
        assert_eq!(stored, "app_de/greeting\n");

        let message = run(
            &app,
            Command::Get(GetArgs {
                code: "greeting".to_string(),
                locale: "de_AT".to_string(),
                args: vec!["Ada".to_string()],
                default: None,
            }),
        );
        assert_eq!(message, "Hallo Ada\n");
    }

    #[test]
    fn test_get_missing_code_uses_default() {
        let dir = create_temp_dir();
        let app = app_in(&dir);

        let mut out = Vec::new();
        let missing = GetArgs {
            code: "nope".to_string(),
            locale: String::new(),
            args: Vec::new(),
            default: None,
        };
        assert!(app.run(&Command::Get(missing), &mut out).is_err());

        let message = run(
            &app,
            Command::Get(GetArgs {
                code: "nope".to_string(),
                locale: String::new(),
                args: Vec::new(),
                default: Some("fallback".to_string()),
            }),
        );
        assert_eq!(message, "fallback\n");
    }

    #[test]
    fn test_list_filters_by_basename() {
        let dir = create_temp_dir();
        let app = app_in(&dir);

        for (basename, key) in [("app", "a"), ("errors", "e")] {
            run(
                &app,
                Command::Put(PutArgs {
                    basename: basename.to_string(),
                    key: key.to_string(),
                    value: "v".to_string(),
                    locale: String::new(),
                }),
            );
        }

        let listed = run(
            &app,
            Command::List(ListArgs {
                basename: Some("errors".to_string()),
                json: false,
            }),
        );
        assert_eq!(listed, "errors\te\tv\n");
    }
}
