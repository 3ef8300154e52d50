//! Engine: owns all runtime state and reacts to host signals
//!
//! The host drives the engine from its tick thread:
//!
//! ```text
//!  host event ──► Engine::handle_signal ──► Continue | Suppress
//!  host tick  ──► Engine::tick
//!                  ├─ drain brews queued before this tick began
//!                  └─ every N ticks: Reconciler::run
//! ```
//!
//! Nothing here blocks, and no failure is returned to the host. Errors are
//! logged at `warn` and the affected upgrade/effect simply does not apply.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use brewmaster_types::EngineConfig;

use crate::brewing::{self, BrewQueue, PendingBrew, TierTable};
use crate::config;
use crate::effects::{self, EffectRegistry, EffectStore, ReconcileSummary, Reconciler};
use crate::host::{ActorId, BlockPos, Hand, Host, Notice};
use crate::item::ItemStack;
use crate::stands::{self, STAND_FILE, StandRegistry};

/// Everything the host reports to the engine
#[derive(Debug, Clone)]
pub enum HostSignal {
    ActorConnected {
        actor: ActorId,
    },
    ActorDisconnected {
        actor: ActorId,
    },
    /// A brewing station finished a cycle. Carries the contents as they
    /// were before the host applied its own result.
    BrewCompleted {
        station: BlockPos,
        slots: [Option<ItemStack>; 3],
        catalyst: Option<ItemStack>,
    },
    /// Right-click with an item in hand
    ItemInteract {
        actor: ActorId,
        hand: Hand,
        item: ItemStack,
    },
    /// The host is about to let the actor consume an item
    ItemConsume {
        actor: ActorId,
        hand: Hand,
        item: ItemStack,
    },
    BlockPlaced {
        actor: ActorId,
        pos: BlockPos,
        item: ItemStack,
    },
    /// `Suppress` in reply cancels the host's own block drop
    BlockBroken {
        actor: ActorId,
        pos: BlockPos,
    },
}

/// Whether the host should run its default handling for a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Continue,
    Suppress,
}

pub struct Engine {
    config: EngineConfig,
    /// Where `config` came from; reload re-reads this file
    config_path: Option<PathBuf>,
    tiers: Arc<TierTable>,

    registry: EffectRegistry,
    reconciler: Reconciler,
    store: EffectStore,

    stands: StandRegistry,
    stand_path: PathBuf,

    brews: BrewQueue,
    tick_count: u64,
}

impl Engine {
    pub fn new(config: EngineConfig, tiers: TierTable) -> Self {
        let data_dir = config::resolve_data_dir(&config);
        Self {
            reconciler: Reconciler::new(&config.warning_thresholds_secs),
            store: EffectStore::new(&data_dir),
            stand_path: data_dir.join(STAND_FILE),
            config,
            config_path: None,
            tiers: Arc::new(tiers),
            registry: EffectRegistry::new(),
            stands: StandRegistry::new(),
            brews: BrewQueue::new(),
            tick_count: 0,
        }
    }

    /// Build from an in-memory config, parsing its tier lines
    pub fn from_config(config: EngineConfig) -> Self {
        let tiers = TierTable::parse(&config.duration_tiers, &config.power_tiers);
        Self::new(config, tiers)
    }

    /// Build from a config file. A missing or broken file falls back to
    /// defaults; the path is remembered for later reloads.
    pub fn from_config_file(path: &Path) -> Self {
        let mut engine = Self::from_config(config::load_or_default(path));
        engine.config_path = Some(path.to_path_buf());
        engine
    }

    // ─── Lifecycle ──────────────────────────────────────────────────────────

    /// Load persisted stands and the effect files of already-connected actors
    pub fn start(&mut self, host: &mut dyn Host) {
        self.stands = match StandRegistry::load_file(&self.stand_path, host) {
            Ok(stands) => stands,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load stand registry");
                StandRegistry::new()
            }
        };

        let now_ms = host.now_millis();
        for actor in host.connected_actors() {
            self.load_actor(&actor, now_ms);
        }

        tracing::info!(
            stands = self.stands.len(),
            actors = self.registry.len(),
            duration_tiers = self.tiers.max_duration_level(),
            power_tiers = self.tiers.max_power_level(),
            "Engine started"
        );
    }

    /// Called once per host tick, before or after that tick's signals.
    ///
    /// A queued brew settles on the second call after its completion, so it
    /// never settles inside the host tick that completed it, whichever order
    /// the host uses.
    pub fn tick(&mut self, host: &mut dyn Host) -> Option<ReconcileSummary> {
        self.process_pending_brews(host);

        self.tick_count += 1;
        let period = u64::from(self.config.reconcile_period_ticks.max(1));
        if self.tick_count % period != 0 {
            return None;
        }
        let now_ms = host.now_millis();
        Some(self.reconciler.run(&mut self.registry, host, now_ms))
    }

    /// Flush every registry entry and the stand file
    pub fn shutdown(&mut self, _host: &mut dyn Host) {
        let actors: Vec<ActorId> = self.registry.actors().cloned().collect();
        for actor in &actors {
            self.save_actor(actor);
        }
        self.save_stands();
        tracing::info!(actors = actors.len(), "Engine shut down");
    }

    // ─── Signals ────────────────────────────────────────────────────────────

    pub fn handle_signal(&mut self, host: &mut dyn Host, signal: HostSignal) -> SignalOutcome {
        match signal {
            HostSignal::ActorConnected { actor } => {
                let now_ms = host.now_millis();
                self.load_actor(&actor, now_ms);
                SignalOutcome::Continue
            }
            HostSignal::ActorDisconnected { actor } => {
                self.save_actor(&actor);
                self.registry.take(&actor);
                SignalOutcome::Continue
            }
            HostSignal::BrewCompleted {
                station,
                slots,
                catalyst,
            } => self.on_brew_completed(station, slots, catalyst),
            HostSignal::ItemInteract { actor, hand, item }
            | HostSignal::ItemConsume { actor, hand, item } => {
                self.on_item_use(host, &actor, hand, &item)
            }
            HostSignal::BlockPlaced { actor, pos, item } => {
                if stands::is_stand_item(&item) && self.stands.insert(pos.clone()) {
                    tracing::info!(actor = %actor, stand = %pos, "Registered master stand");
                    self.save_stands();
                    host.notify(&actor, Notice::StandPlaced);
                }
                SignalOutcome::Continue
            }
            HostSignal::BlockBroken { actor, pos } => {
                if !self.stands.remove(&pos) {
                    return SignalOutcome::Continue;
                }
                tracing::info!(actor = %actor, stand = %pos, "Unregistered master stand");
                self.save_stands();
                host.drop_item(&pos, stands::stand_item());
                host.notify(&actor, Notice::StandRemoved);
                SignalOutcome::Suppress
            }
        }
    }

    fn on_brew_completed(
        &mut self,
        station: BlockPos,
        slots: [Option<ItemStack>; 3],
        catalyst: Option<ItemStack>,
    ) -> SignalOutcome {
        if !self.stands.contains(&station) {
            return SignalOutcome::Continue;
        }
        let Some(catalyst) = catalyst else {
            return SignalOutcome::Continue;
        };
        if brewing::Axis::from_catalyst(&catalyst.material).is_none() {
            return SignalOutcome::Continue;
        }

        tracing::debug!(station = %station, "Queued brew for next tick");
        self.brews.push(PendingBrew {
            station,
            slots,
            catalyst,
            queued_tick: self.tick_count,
        });
        SignalOutcome::Suppress
    }

    fn on_item_use(
        &mut self,
        host: &mut dyn Host,
        actor: &ActorId,
        hand: Hand,
        item: &ItemStack,
    ) -> SignalOutcome {
        if !brewing::codec::is_master_item(item) {
            return SignalOutcome::Continue;
        }
        let Some(state) = brewing::decode(item) else {
            return SignalOutcome::Continue;
        };

        let now_ms = host.now_millis();
        if let Err(e) = effects::activate(&mut self.registry, host, actor, hand, &state, now_ms) {
            tracing::warn!(actor = %actor, error = %e, "Rejected master potion");
            host.notify(
                actor,
                Notice::InvalidItem {
                    reason: e.to_string(),
                },
            );
        }
        SignalOutcome::Suppress
    }

    /// Apply every brew queued before the previous tick against the current tiers
    fn process_pending_brews(&mut self, host: &mut dyn Host) {
        for brew in self.brews.drain_before(self.tick_count) {
            if !self.stands.contains(&brew.station) {
                tracing::debug!(station = %brew.station, "Stand removed before brew settled");
                continue;
            }
            let station = brew.station;
            match brewing::upgrade_slots(&self.tiers, brew.slots, brew.catalyst) {
                Some(result) => {
                    tracing::info!(
                        station = %station,
                        axis = %result.axis,
                        upgraded = result.upgraded_count(),
                        "Brew settled"
                    );
                    host.write_brewing_station(&station, result.slots, result.catalyst);
                }
                None => {
                    tracing::warn!(station = %station, "Queued brew has no usable catalyst");
                }
            }
        }
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    fn load_actor(&mut self, actor: &ActorId, now_ms: i64) {
        match self.store.load(actor, now_ms) {
            Ok(records) => self.registry.replace(actor, records),
            Err(e) => tracing::warn!(actor = %actor, error = %e, "Failed to load effects"),
        }
    }

    fn save_actor(&self, actor: &ActorId) {
        if let Err(e) = self.store.save(actor, self.registry.records(actor)) {
            tracing::warn!(actor = %actor, error = %e, "Failed to save effects");
        }
    }

    fn save_stands(&self) {
        if let Err(e) = self.stands.save_file(&self.stand_path) {
            tracing::warn!(error = %e, "Failed to save stand registry");
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn tiers(&self) -> Arc<TierTable> {
        Arc::clone(&self.tiers)
    }

    /// Swap in freshly parsed ladders along with the lines they came from
    pub(crate) fn replace_tiers(&mut self, source: &EngineConfig, tiers: TierTable) {
        self.config.duration_tiers = source.duration_tiers.clone();
        self.config.power_tiers = source.power_tiers.clone();
        self.tiers = Arc::new(tiers);
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn stands(&self) -> &StandRegistry {
        &self.stands
    }

    pub fn pending_brews(&self) -> usize {
        self.brews.len()
    }
}
