//! In-memory host used by unit and scenario tests

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::host::{ActorId, BlockPos, EffectGrant, GameMode, Hand, Host, LiveEffect, Notice};
use crate::item::ItemStack;

#[derive(Debug, Default)]
pub struct FakeActor {
    pub connected: bool,
    pub game_mode: GameMode,
    pub allow_flight: bool,
    pub flying: bool,
    pub fly_speed: f32,
    /// Number of `set_allow_flight` calls received
    pub allow_flight_writes: usize,
    pub effects: HashMap<String, LiveEffect>,
    pub grants: Vec<EffectGrant>,
    pub removed: Vec<String>,
    /// Units taken from either hand
    pub taken: u32,
    pub last_hand: Option<Hand>,
    pub given: Vec<ItemStack>,
    pub notices: Vec<Notice>,
    pub status: Option<String>,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    pub now: i64,
    pub actors: BTreeMap<ActorId, FakeActor>,
    pub worlds: HashSet<String>,
    pub stand_blocks: HashSet<BlockPos>,
    pub drops: Vec<(BlockPos, ItemStack)>,
    pub stations: HashMap<BlockPos, ([Option<ItemStack>; 3], Option<ItemStack>)>,
}

impl FakeHost {
    pub fn new(now: i64) -> Self {
        let mut host = Self {
            now,
            ..Self::default()
        };
        host.worlds.insert("world".to_string());
        host
    }

    pub fn connect(&mut self, id: &str) -> ActorId {
        let actor = ActorId::new(id);
        let fake = self.actors.entry(actor.clone()).or_insert_with(|| FakeActor {
            fly_speed: 0.1,
            ..FakeActor::default()
        });
        fake.connected = true;
        actor
    }

    pub fn disconnect(&mut self, actor: &ActorId) {
        self.actor_mut(actor).connected = false;
    }

    pub fn advance(&mut self, millis: i64) {
        self.now += millis;
    }

    pub fn actor(&self, actor: &ActorId) -> &FakeActor {
        &self.actors[actor]
    }

    pub fn actor_mut(&mut self, actor: &ActorId) -> &mut FakeActor {
        self.actors
            .get_mut(actor)
            .unwrap_or_else(|| panic!("unknown actor {actor}"))
    }

    pub fn place_stand_block(&mut self, pos: &BlockPos) {
        self.worlds.insert(pos.world.clone());
        self.stand_blocks.insert(pos.clone());
    }
}

impl Host for FakeHost {
    fn now_millis(&self) -> i64 {
        self.now
    }

    fn connected_actors(&self) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|(_, a)| a.connected)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn is_connected(&self, actor: &ActorId) -> bool {
        self.actors.get(actor).is_some_and(|a| a.connected)
    }

    fn game_mode(&self, actor: &ActorId) -> GameMode {
        self.actors.get(actor).map(|a| a.game_mode).unwrap_or_default()
    }

    fn live_effect(&self, actor: &ActorId, effect: &str) -> Option<LiveEffect> {
        self.actors.get(actor)?.effects.get(effect).copied()
    }

    fn grant_effect(&mut self, actor: &ActorId, grant: EffectGrant) {
        let fake = self.actor_mut(actor);
        fake.effects.insert(
            grant.effect.to_string(),
            LiveEffect {
                amplifier: grant.amplifier,
                remaining_ticks: grant.duration_ticks,
            },
        );
        fake.grants.push(grant);
    }

    fn remove_effect(&mut self, actor: &ActorId, effect: &str) {
        let fake = self.actor_mut(actor);
        fake.effects.remove(effect);
        fake.removed.push(effect.to_string());
    }

    fn allow_flight(&self, actor: &ActorId) -> bool {
        self.actors.get(actor).is_some_and(|a| a.allow_flight)
    }

    fn set_allow_flight(&mut self, actor: &ActorId, allowed: bool) {
        let fake = self.actor_mut(actor);
        fake.allow_flight = allowed;
        fake.allow_flight_writes += 1;
        if !allowed {
            fake.flying = false;
        }
    }

    fn set_flying(&mut self, actor: &ActorId, flying: bool) {
        self.actor_mut(actor).flying = flying;
    }

    fn set_fly_speed(&mut self, actor: &ActorId, speed: f32) {
        self.actor_mut(actor).fly_speed = speed;
    }

    fn take_from_hand(&mut self, actor: &ActorId, hand: Hand, amount: u32) {
        let fake = self.actor_mut(actor);
        fake.taken += amount;
        fake.last_hand = Some(hand);
    }

    fn give_item(&mut self, actor: &ActorId, item: ItemStack) {
        self.actor_mut(actor).given.push(item);
    }

    fn drop_item(&mut self, pos: &BlockPos, item: ItemStack) {
        self.drops.push((pos.clone(), item));
    }

    fn write_brewing_station(
        &mut self,
        pos: &BlockPos,
        slots: [Option<ItemStack>; 3],
        catalyst: Option<ItemStack>,
    ) {
        self.stations.insert(pos.clone(), (slots, catalyst));
    }

    fn world_loaded(&self, world: &str) -> bool {
        self.worlds.contains(world)
    }

    fn is_brewing_stand(&self, pos: &BlockPos) -> bool {
        self.stand_blocks.contains(pos)
    }

    fn notify(&mut self, actor: &ActorId, notice: Notice) {
        self.actor_mut(actor).notices.push(notice);
    }

    fn show_status(&mut self, actor: &ActorId, text: &str) {
        self.actor_mut(actor).status = Some(text.to_string());
    }
}
