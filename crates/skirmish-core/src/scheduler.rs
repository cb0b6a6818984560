//! Initiative and turn order.
//!
//! Every round each standing combatant rolls `d20 + DEX modifier`. Rolls are
//! drawn in join order so a fixed seed always produces the same schedule.
//! The order is by score descending, then speed descending, then team id
//! ascending, then join order ascending.

use std::cmp::Reverse;

use rand::Rng;
use serde::{Deserialize, Serialize};

use bestiary::Ability;

use crate::combatant::{CombatantId, Team};
use crate::roster::Roster;

/// One combatant's initiative for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRoll {
    /// Who rolled
    pub id: CombatantId,
    /// Side of the roller
    pub team: Team,
    /// `d20 + DEX modifier`
    pub score: i32,
    /// Speed, the first tiebreak
    pub speed: u32,
}

impl InitiativeRoll {
    fn sort_key(&self) -> (Reverse<i32>, Reverse<u32>, u8, CombatantId) {
        (
            Reverse(self.score),
            Reverse(self.speed),
            self.team.id(),
            self.id,
        )
    }
}

/// The dispatch order of one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    rolls: Vec<InitiativeRoll>,
}

impl TurnOrder {
    /// Rolls initiative for every standing combatant in `roster`.
    pub fn roll<R: Rng + ?Sized>(roster: &Roster, rng: &mut R) -> Self {
        let mut rolls: Vec<InitiativeRoll> = roster
            .all_living()
            .map(|combatant| {
                let template = combatant.template();
                let d20: i32 = rng.gen_range(1..=20);
                InitiativeRoll {
                    id: combatant.id(),
                    team: combatant.team(),
                    score: d20 + template.modifier(Ability::Dexterity),
                    speed: template.speed,
                }
            })
            .collect();

        rolls.sort_by_key(InitiativeRoll::sort_key);
        Self { rolls }
    }

    /// Ids in dispatch order.
    pub fn ids(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.rolls.iter().map(|roll| roll.id)
    }

    /// The individual rolls in dispatch order.
    #[must_use]
    pub fn rolls(&self) -> &[InitiativeRoll] {
        &self.rolls
    }

    /// Number of scheduled turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    /// Whether nobody is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestiary::StatTemplate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn spawn(roster: &mut Roster, dex: u8, speed: u32, team: Team) -> CombatantId {
        let template = StatTemplate::builder("T", 1)
            .hit_points(10)
            .abilities([10, dex, 10, 10, 10, 10])
            .speed(speed)
            .build();
        roster.spawn(Arc::new(template), team)
    }

    #[test]
    fn order_is_sorted_by_score_then_tiebreaks() {
        let mut roster = Roster::new();
        for i in 0..8u8 {
            let team = if i % 2 == 0 { Team::Party } else { Team::Enemies };
            spawn(&mut roster, 8 + i, 25 + u32::from(i % 3) * 5, team);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            let order = TurnOrder::roll(&roster, &mut rng);
            assert_eq!(order.len(), 8);
            for pair in order.rolls().windows(2) {
                assert!(pair[0].sort_key() <= pair[1].sort_key());
            }
        }
    }

    #[test]
    fn identical_rolls_break_ties_by_team_then_join_order() {
        let roll = |id: u32, team: Team, speed: u32| InitiativeRoll {
            id: CombatantId::new(id),
            team,
            score: 12,
            speed,
        };
        let mut sorted = vec![
            roll(3, Team::Enemies, 30),
            roll(2, Team::Party, 30),
            roll(0, Team::Party, 30),
            roll(1, Team::Enemies, 40),
        ];
        sorted.sort_by_key(InitiativeRoll::sort_key);
        let ids: Vec<u32> = sorted.iter().map(|r| r.id.as_u32()).collect();
        assert_eq!(ids, vec![1, 0, 2, 3]);
    }

    #[test]
    fn skips_incapacitated() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, 10, 30, Team::Party);
        let b = spawn(&mut roster, 10, 30, Team::Enemies);
        roster.get_mut(a).unwrap().take_damage(100, None);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let order = TurnOrder::roll(&roster, &mut rng);
        assert_eq!(order.ids().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn same_seed_same_order() {
        let mut roster = Roster::new();
        for i in 0..6 {
            spawn(&mut roster, 10 + i, 30, Team::Party);
        }
        let a = TurnOrder::roll(&roster, &mut ChaCha8Rng::seed_from_u64(5));
        let b = TurnOrder::roll(&roster, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
