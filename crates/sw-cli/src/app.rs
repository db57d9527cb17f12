//! Command handlers
//!
//! Each handler writes its user-facing output to `out`; diagnostics go
//! through `log`.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use sw_journal::{
    AccountBook, CardRenderer, CatalogStore, HistoryBook, JournalSink, ResultRecord, SharedStore,
    User,
};
use sw_stage::StageTrace;
use sw_wheel::{CategoryMap, SpinOutcome, StageMachine};

use crate::config::AppConfig;

pub struct App {
    store: SharedStore,
    config: AppConfig,
}

impl App {
    pub fn new(store: SharedStore, config: AppConfig) -> Self {
        Self { store, config }
    }

    fn accounts(&self) -> AccountBook {
        AccountBook::new(self.store.clone())
    }

    fn catalogs(&self) -> CatalogStore {
        CatalogStore::new(self.store.clone())
    }

    fn history_of(&self, user: &User) -> HistoryBook {
        HistoryBook::new(self.store.clone(), &user.username).with_limit(self.config.history_limit)
    }

    fn require_user(&self) -> Result<User> {
        self.accounts()
            .require_user()
            .context("log in first with `sweet-spin login`")
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCOUNTS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn register(&self, username: &str, password: &str, out: &mut dyn Write) -> Result<()> {
        let user = self.accounts().register(username, password)?;
        writeln!(out, "Welcome, {}! You are logged in.", user.username)?;
        Ok(())
    }

    pub fn login(&self, username: &str, password: &str, out: &mut dyn Write) -> Result<()> {
        let user = self.accounts().login(username, password)?;
        writeln!(out, "Logged in as {}.", user.username)?;
        Ok(())
    }

    pub fn logout(&self, out: &mut dyn Write) -> Result<()> {
        self.accounts().logout()?;
        writeln!(out, "Logged out.")?;
        Ok(())
    }

    pub fn whoami(&self, out: &mut dyn Write) -> Result<()> {
        match self.accounts().current_user()? {
            Some(user) => writeln!(out, "{}", user.username)?,
            None => writeln!(out, "Nobody is logged in.")?,
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PLAY
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play one full round for the logged-in player
    pub async fn play(&self, trace_path: Option<&Path>, out: &mut dyn Write) -> Result<ResultRecord> {
        let user = self.require_user()?;
        let catalog = self.catalogs().load(&user.username)?;

        let renderer = CardRenderer::default().with_title(self.config.title_template.clone());
        let sink = Arc::new(
            JournalSink::new(self.store.clone(), &user.username)
                .with_renderer(Arc::new(renderer))
                .with_limit(self.config.history_limit),
        );
        let machine = StageMachine::builder(catalog.into_shared())
            .sink(sink.clone())
            .config(self.config.wheel.clone())
            .build();
        let mut events = machine.subscribe();

        writeln!(out, "{}", machine.stage().title(None))?;
        let category = settle(&machine).await?;
        writeln!(out, "  -> {}", category.winner)?;

        machine.advance()?;
        writeln!(out, "{}", machine.stage().title(Some(category.winner.as_str())))?;
        let item = settle(&machine).await?;
        writeln!(out, "  -> {}", item.winner)?;

        let record = sink
            .last_record()
            .context("the result could not be saved")?;
        writeln!(
            out,
            "{} {} / {}  ({}, id {})",
            self.config.title_template.replace("{user}", &user.username),
            record.category,
            record.item,
            record.date_str,
            record.id
        )?;

        if let Some(path) = trace_path {
            let mut trace =
                StageTrace::new(uuid::Uuid::new_v4().to_string()).with_player(&user.username);
            while let Ok(event) = events.try_recv() {
                trace.push(event);
            }
            fs::write(path, trace.to_json()?)
                .with_context(|| format!("writing trace to {}", path.display()))?;
            log::info!("[Cli] Trace with {} events written to {}", trace.len(), path.display());
        }

        Ok(record)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // HISTORY
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn history_list(&self, out: &mut dyn Write) -> Result<()> {
        let user = self.require_user()?;
        let records = self.history_of(&user).records()?;
        if records.is_empty() {
            writeln!(out, "No rounds played yet.")?;
        }
        for record in records {
            writeln!(
                out,
                "{}  {:<16}  {} / {}",
                record.id, record.date_str, record.category, record.item
            )?;
        }
        Ok(())
    }

    /// Show one record, or write its card to `card_out`
    pub fn history_show(&self, id: &str, card_out: Option<&Path>, out: &mut dyn Write) -> Result<()> {
        let user = self.require_user()?;
        let Some(record) = self.history_of(&user).get(id)? else {
            bail!("no history record with id {}", id);
        };

        match card_out {
            Some(path) => {
                fs::write(path, &record.image.body)
                    .with_context(|| format!("writing card to {}", path.display()))?;
                writeln!(out, "Card written to {}", path.display())?;
            }
            None => {
                writeln!(out, "id:       {}", record.id)?;
                writeln!(out, "date:     {}", record.date_str)?;
                writeln!(out, "category: {}", record.category)?;
                writeln!(out, "item:     {}", record.item)?;
                writeln!(
                    out,
                    "card:     {} ({} bytes, .{})",
                    record.image.media_type,
                    record.image.body.len(),
                    record.image.extension()
                )?;
            }
        }
        Ok(())
    }

    pub fn history_delete(&self, id: &str, out: &mut dyn Write) -> Result<()> {
        let user = self.require_user()?;
        let removed = self.history_of(&user).remove(id)?;
        writeln!(out, "Deleted {} / {}", removed.category, removed.item)?;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CATALOG
    // ═══════════════════════════════════════════════════════════════════════════

    fn edit_catalog<T>(&self, edit: impl FnOnce(&mut CategoryMap) -> Result<T>) -> Result<T> {
        let user = self.require_user()?;
        let catalogs = self.catalogs();
        let mut catalog = catalogs.load(&user.username)?;
        let value = edit(&mut catalog)?;
        catalogs.save(&user.username, &catalog)?;
        Ok(value)
    }

    pub fn category_list(&self, out: &mut dyn Write) -> Result<()> {
        let user = self.require_user()?;
        let catalog = self.catalogs().load(&user.username)?;
        if catalog.is_empty() {
            writeln!(out, "No categories. Add one with `sweet-spin category add`.")?;
        }
        for category in catalog.iter() {
            writeln!(out, "{} ({})", category.name, category.items.len())?;
            for (index, item) in category.items.iter().enumerate() {
                writeln!(out, "  [{}] {}", index, item)?;
            }
        }
        Ok(())
    }

    pub fn category_add(&self, name: &str, out: &mut dyn Write) -> Result<()> {
        self.edit_catalog(|catalog| Ok(catalog.add_category(name)?))?;
        writeln!(out, "Added category {}", name.trim())?;
        Ok(())
    }

    pub fn category_remove(&self, name: &str, out: &mut dyn Write) -> Result<()> {
        let items = self.edit_catalog(|catalog| Ok(catalog.remove_category(name)?))?;
        writeln!(out, "Removed category {} ({} items)", name, items.len())?;
        Ok(())
    }

    pub fn item_add(&self, category: &str, item: &str, out: &mut dyn Write) -> Result<()> {
        self.edit_catalog(|catalog| Ok(catalog.add_item(category, item)?))?;
        writeln!(out, "Added {} to {}", item.trim(), category)?;
        Ok(())
    }

    pub fn item_remove(&self, category: &str, index: usize, out: &mut dyn Write) -> Result<()> {
        let item = self.edit_catalog(|catalog| Ok(catalog.remove_item(category, index)?))?;
        writeln!(out, "Removed {} from {}", item, category)?;
        Ok(())
    }
}

async fn settle(machine: &StageMachine) -> Result<SpinOutcome> {
    let handle = machine.spin()?;
    handle.settled().await?.context("the spin was discarded")
}
