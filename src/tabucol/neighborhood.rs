//! Candidate move generation.
//!
//! The pool holds every recoloring of a conflicting vertex to another color.
//! It is shuffled, then walked until `rep` moves are admitted or the pool
//! runs out. Admission depends on which of the tabu memory and the
//! aspiration table are present:
//!
//! | tabu | aspiration | admitted when |
//! |------|------------|---------------|
//! | off  | off        | always |
//! | on   | off        | not tabu |
//! | on   | on         | not tabu, or tabu and passing the aspiration check |
//! | off  | on         | improving on the current objective |
//!
//! A tabu move admitted through aspiration records its objective in the
//! table and loses its tabu status. With no tabu memory the table is never
//! consulted, so every improving move in the walk is admitted.

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::AspirationKey;
use super::memory::{AspirationTable, TabuMemory};
use super::state::ColoringState;
use super::types::{Candidate, Move, SearchStats};
use crate::graph::Graph;

/// Per-run candidate generator.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood {
    rep: usize,
    aspiration_key: AspirationKey,
}

impl Neighborhood {
    /// Creates a generator admitting at most `rep` moves per call.
    pub fn new(rep: usize, aspiration_key: AspirationKey) -> Self {
        Self {
            rep,
            aspiration_key,
        }
    }

    /// Every move of a conflicting vertex to another color, in vertex then
    /// color order.
    pub fn pool(state: &ColoringState) -> Vec<Move> {
        let k = state.k();
        state
            .conflicting_vertices()
            .into_iter()
            .flat_map(|v| {
                let own = state.color(v);
                (0..k).filter(move |&c| c != own).map(move |c| Move::new(v, c))
            })
            .collect()
    }

    /// Admits up to `rep` candidate moves from `state`.
    ///
    /// An empty result means no legal move exists.
    pub fn generate<R: Rng>(
        &self,
        graph: &Graph,
        state: &ColoringState,
        mut tabu: Option<&mut TabuMemory>,
        mut aspiration: Option<&mut AspirationTable>,
        stats: &mut SearchStats,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let mut pool = Self::pool(state);
        pool.shuffle(rng);

        let current = state.objective();
        let improving_only = tabu.is_none() && aspiration.is_some();
        let key = match (&tabu, &aspiration, self.aspiration_key) {
            (Some(_), Some(_), AspirationKey::Objective) => current as u64,
            (Some(_), Some(_), AspirationKey::State) => state.state_key(),
            _ => 0,
        };

        let mut admitted = Vec::with_capacity(self.rep.min(pool.len()));
        for mv in pool {
            if admitted.len() == self.rep {
                break;
            }

            let is_tabu = match tabu.as_deref() {
                Some(memory) => {
                    stats.tabu_lookups += 1;
                    memory.contains(&mv)
                }
                None => false,
            };

            if !is_tabu {
                stats.candidates_evaluated += 1;
                let objective = state.objective_after(graph, mv);
                // without tabu memory, aspiration degrades to accept-if-improving
                if improving_only && objective >= current {
                    continue;
                }
                admitted.push(Candidate {
                    mv,
                    objective,
                    aspirated: false,
                });
                continue;
            }

            let Some(table) = aspiration.as_deref_mut() else {
                continue;
            };
            stats.aspiration_lookups += 1;
            stats.candidates_evaluated += 1;
            let objective = state.objective_after(graph, mv);
            if !table.admits(key, current, objective) {
                continue;
            }

            table.record(key, objective);
            if let Some(memory) = tabu.as_deref_mut() {
                memory.lift(&mv);
            }
            stats.aspiration_overrides += 1;
            admitted.push(Candidate {
                mv,
                objective,
                aspirated: true,
            });
        }
        admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn triangle() -> Graph {
        Graph::new(3, [(0, 1), (1, 2), (0, 2)]).unwrap()
    }

    #[test]
    fn test_pool_covers_conflicting_vertices_only() {
        // path 0-1-2 with 0 and 1 sharing color 0
        let g = Graph::new(3, [(0, 1), (1, 2)]).unwrap();
        let state = ColoringState::from_coloring(&g, 3, vec![0, 0, 1]);
        let pool = Neighborhood::pool(&state);
        assert_eq!(
            pool,
            vec![
                Move::new(0, 1),
                Move::new(0, 2),
                Move::new(1, 1),
                Move::new(1, 2)
            ]
        );
    }

    #[test]
    fn test_pool_never_keeps_color() {
        let g = triangle();
        let state = ColoringState::from_coloring(&g, 2, vec![0, 0, 0]);
        for mv in Neighborhood::pool(&state) {
            assert_ne!(mv.color, state.color(mv.vertex));
        }
    }

    #[test]
    fn test_generate_caps_at_rep() {
        let g = triangle();
        let state = ColoringState::from_coloring(&g, 3, vec![0, 0, 0]);
        let mut stats = SearchStats::default();
        let mut rng = StdRng::seed_from_u64(3);
        let candidates = Neighborhood::new(2, AspirationKey::Objective).generate(
            &g,
            &state,
            None,
            None,
            &mut stats,
            &mut rng,
        );
        assert_eq!(candidates.len(), 2);
        assert_eq!(stats.candidates_evaluated, 2);
        assert_eq!(stats.tabu_lookups, 0);
        assert_eq!(stats.aspiration_lookups, 0);
        for c in &candidates {
            assert_eq!(c.objective, state.objective_after(&g, c.mv));
            assert!(!c.aspirated);
        }
    }

    #[test]
    fn test_generate_skips_tabu_moves() {
        // single edge, both ends colored 0: pool is (0,1) and (1,1)
        let g = Graph::new(2, [(0, 1)]).unwrap();
        let state = ColoringState::from_coloring(&g, 2, vec![0, 0]);
        let mut memory = TabuMemory::new(2);
        memory.push(Move::new(0, 1));
        let mut stats = SearchStats::default();
        let mut rng = StdRng::seed_from_u64(9);

        let candidates = Neighborhood::new(2, AspirationKey::Objective).generate(
            &g,
            &state,
            Some(&mut memory),
            None,
            &mut stats,
            &mut rng,
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].mv, Move::new(1, 1));
        assert_eq!(stats.tabu_lookups, 2);
        assert!(memory.contains(&Move::new(0, 1)));
    }

    #[test]
    fn test_all_tabu_without_aspiration_is_empty() {
        let g = Graph::new(2, [(0, 1)]).unwrap();
        let state = ColoringState::from_coloring(&g, 2, vec![0, 0]);
        let mut memory = TabuMemory::new(2);
        memory.push(Move::new(0, 1));
        memory.push(Move::new(1, 1));
        let mut stats = SearchStats::default();
        let mut rng = StdRng::seed_from_u64(9);

        let candidates = Neighborhood::new(2, AspirationKey::Objective).generate(
            &g,
            &state,
            Some(&mut memory),
            None,
            &mut stats,
            &mut rng,
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_aspiration_admits_and_lifts_tabu_move() {
        let g = Graph::new(2, [(0, 1)]).unwrap();
        let state = ColoringState::from_coloring(&g, 2, vec![0, 0]);
        let mut memory = TabuMemory::new(2);
        memory.push(Move::new(0, 1));
        memory.push(Move::new(1, 1));
        let mut table = AspirationTable::new();
        let mut stats = SearchStats::default();
        let mut rng = StdRng::seed_from_u64(9);

        let candidates = Neighborhood::new(2, AspirationKey::Objective).generate(
            &g,
            &state,
            Some(&mut memory),
            Some(&mut table),
            &mut stats,
            &mut rng,
        );
        // the first move resolves the conflict and is admitted; the second
        // ties the new record and is not
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].aspirated);
        assert_eq!(candidates[0].objective, 0);
        assert!(!memory.contains(&candidates[0].mv));
        assert_eq!(memory.len(), 1);
        assert_eq!(table.best(2), Some(0));
        assert_eq!(stats.aspiration_overrides, 1);
        assert_eq!(stats.aspiration_lookups, 2);
    }

    #[test]
    fn test_aspiration_without_tabu_accepts_every_improving_move() {
        // star: center 0 and leaves all colored 0; moving a leaf leaves the
        // center conflicting, moving the center resolves everything
        let g = Graph::new(4, [(0, 1), (0, 2), (0, 3)]).unwrap();
        let state = ColoringState::from_coloring(&g, 2, vec![0, 0, 0, 0]);
        let improving: Vec<Move> = Neighborhood::pool(&state)
            .into_iter()
            .filter(|&mv| state.objective_after(&g, mv) < state.objective())
            .collect();
        assert_eq!(improving.len(), 4);

        for key in [AspirationKey::Objective, AspirationKey::State] {
            for seed in 0..20 {
                let mut table = AspirationTable::new();
                let mut stats = SearchStats::default();
                let mut rng = StdRng::seed_from_u64(seed);

                let candidates = Neighborhood::new(4, key).generate(
                    &g,
                    &state,
                    None,
                    Some(&mut table),
                    &mut stats,
                    &mut rng,
                );
                let mut admitted: Vec<Move> = candidates.iter().map(|c| c.mv).collect();
                admitted.sort_by_key(|mv| (mv.vertex, mv.color));
                assert_eq!(admitted, improving);
                assert!(candidates.iter().all(|c| !c.aspirated));
                assert_eq!(stats.tabu_lookups, 0);
                assert_eq!(stats.aspiration_lookups, 0);
                assert_eq!(stats.aspiration_overrides, 0);
                assert!(table.is_empty());
            }
        }
    }

    #[test]
    fn test_aspiration_without_tabu_rejects_worsening_moves() {
        // path 0-1-2 colored 0,0,1: recoloring 1 to 1 trades one conflict
        // for another
        let g = Graph::new(3, [(0, 1), (1, 2)]).unwrap();
        let state = ColoringState::from_coloring(&g, 2, vec![0, 0, 1]);
        let mut table = AspirationTable::new();
        let mut stats = SearchStats::default();
        let mut rng = StdRng::seed_from_u64(1);

        let candidates = Neighborhood::new(2, AspirationKey::Objective).generate(
            &g,
            &state,
            None,
            Some(&mut table),
            &mut stats,
            &mut rng,
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].mv, Move::new(0, 1));
        assert_eq!(candidates[0].objective, 0);
        assert_eq!(stats.candidates_evaluated, 2);
    }
}
