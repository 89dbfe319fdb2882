//! Aggro system: threat bookkeeping and target selection for hostile
//! entities.
//!
//! Per aggro holder, each update runs in order:
//! decay → leash check → proximity seeding → pruning → capacity trim →
//! target selection. Threat from damage and healing is queued and resolved
//! before the per-entity pass.

use hecs::{Entity, World};
use tracing::debug;

use skirmish_core::components::{Aggro, Health, Team};
use skirmish_core::constants::*;
use skirmish_core::events::SimEvent;
use skirmish_core::types::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ThreatEvent {
    /// `source` hurt `holder`.
    Damage {
        holder: Entity,
        source: Entity,
        amount: f32,
    },
    /// `healer` healed `healed`; every table tracking `healed` notices.
    Healing {
        healer: Entity,
        healed: Entity,
        amount: f32,
    },
}

pub struct AggroSystem {
    pending: Vec<ThreatEvent>,
    pub damage_multiplier: f32,
    pub healing_multiplier: f32,
    pub taunt_bonus: f32,
}

impl Default for AggroSystem {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            damage_multiplier: DAMAGE_THREAT_MULTIPLIER,
            healing_multiplier: HEALING_THREAT_MULTIPLIER,
            taunt_bonus: TAUNT_THREAT_BONUS,
        }
    }
}

impl AggroSystem {
    pub fn new(damage_multiplier: f32, healing_multiplier: f32, taunt_bonus: f32) -> Self {
        Self {
            pending: Vec::new(),
            damage_multiplier,
            healing_multiplier,
            taunt_bonus,
        }
    }

    /// Threat events waiting for the next update.
    pub fn pending_threat(&self) -> usize {
        self.pending.len()
    }

    /// `attacker` dealt `damage` to `target`; `target` remembers it.
    pub fn add_damage_threat(&mut self, target: Entity, attacker: Entity, damage: f32) {
        if target == attacker || damage <= 0.0 {
            return;
        }
        self.pending.push(ThreatEvent::Damage {
            holder: target,
            source: attacker,
            amount: damage * self.damage_multiplier,
        });
    }

    /// `healer` restored `amount` to `healed`.
    pub fn add_healing_threat(&mut self, healer: Entity, healed: Entity, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        self.pending.push(ThreatEvent::Healing {
            healer,
            healed,
            amount: amount * self.healing_multiplier,
        });
    }

    /// Put `taunter` on top of `target`'s table right away.
    /// Fails if `target` holds no aggro or is leashed.
    pub fn taunt(&self, world: &World, taunter: Entity, target: Entity) -> bool {
        if taunter == target {
            return false;
        }
        let Ok(mut aggro) = world.get::<&mut Aggro>(target) else {
            return false;
        };
        if aggro.leashed {
            return false;
        }
        let threat = aggro.table.max_threat() + self.taunt_bonus;
        aggro.table.set(taunter, threat);
        debug!(?taunter, ?target, threat, "taunt");
        true
    }

    pub fn update(&mut self, world: &World, dt: f32, events: &mut Vec<SimEvent>) {
        self.resolve_pending(world);

        let holders: Vec<(Entity, Option<Position>)> = world
            .query::<(&Aggro, Option<&Position>)>()
            .iter()
            .map(|(entity, (_aggro, pos))| (entity, pos.copied()))
            .collect();

        // Living, positioned entities that proximity seeding may notice.
        let candidates: Vec<(Entity, Position, Option<Team>)> = world
            .query::<(&Position, Option<&Team>, Option<&Health>)>()
            .iter()
            .filter(|(_, (_, _, health))| health.map_or(true, |h| h.is_alive()))
            .map(|(entity, (pos, team, _))| (entity, *pos, team.copied()))
            .collect();

        for (holder, pos) in holders {
            let team = world.get::<&Team>(holder).ok().map(|t| *t);
            let Ok(mut aggro) = world.get::<&mut Aggro>(holder) else {
                continue;
            };
            let previous = aggro.current_target;

            // (a) decay
            let decay = aggro.threat_decay * dt;
            aggro.table.retain(|entry| {
                entry.threat -= decay;
                entry.threat > 0.0
            });

            // (b) leash
            let anchor_distance = pos.map(|p| p.distance_to(&aggro.leash_anchor));
            if aggro.leashed {
                match anchor_distance {
                    Some(d) if d <= aggro.aggro_range * 0.5 => {
                        aggro.leashed = false;
                        debug!(entity = ?holder, "back within leash");
                    }
                    _ => continue,
                }
            } else if aggro.leash_range > 0.0
                && anchor_distance.is_some_and(|d| d > aggro.leash_range)
            {
                aggro.leashed = true;
                aggro.table.clear();
                aggro.current_target = None;
                debug!(entity = ?holder, "leashed");
                if previous.is_some() {
                    events.push(SimEvent::TargetChanged {
                        entity: holder,
                        previous,
                        current: None,
                    });
                }
                continue;
            }

            // (c) proximity seeding
            if let Some(pos) = pos {
                let range_sq = aggro.aggro_range * aggro.aggro_range;
                for (other, other_pos, other_team) in &candidates {
                    if *other == holder {
                        continue;
                    }
                    if team.is_some() && team == *other_team {
                        continue;
                    }
                    if pos.distance_squared_to(other_pos) <= range_sq {
                        aggro.table.seed(*other, BASELINE_THREAT);
                    }
                }
            }

            // (d) prune
            let leash_range = aggro.leash_range;
            aggro.table.retain(|entry| {
                if !world.contains(entry.entity) {
                    return false;
                }
                if world
                    .get::<&Health>(entry.entity)
                    .is_ok_and(|h| !h.is_alive())
                {
                    return false;
                }
                if leash_range <= 0.0 {
                    return true;
                }
                match (pos, world.get::<&Position>(entry.entity)) {
                    (Some(p), Ok(other)) => p.distance_to(&other) <= leash_range,
                    _ => true,
                }
            });

            // (e) capacity
            let cap = aggro.max_threat_memory;
            aggro.table.trim_to(cap);

            // (f) target selection
            let current = aggro.table.top();
            if current != previous {
                aggro.current_target = current;
                debug!(entity = ?holder, ?previous, ?current, "target changed");
                events.push(SimEvent::TargetChanged {
                    entity: holder,
                    previous,
                    current,
                });
            }
        }
    }

    fn resolve_pending(&mut self, world: &World) {
        for event in self.pending.drain(..) {
            match event {
                ThreatEvent::Damage {
                    holder,
                    source,
                    amount,
                } => {
                    if let Ok(mut aggro) = world.get::<&mut Aggro>(holder) {
                        if !aggro.leashed {
                            aggro.table.add(source, amount);
                        }
                    }
                }
                ThreatEvent::Healing {
                    healer,
                    healed,
                    amount,
                } => {
                    for (holder, aggro) in world.query::<&mut Aggro>().iter() {
                        if holder == healer || aggro.leashed || !aggro.table.contains(healed) {
                            continue;
                        }
                        aggro.table.add(healer, amount);
                    }
                }
            }
        }
    }
}
