use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::profile::CheckProfile;
use crate::engine::search::{check_solvable, SearchLimits, SearchReason};
use crate::engine::status_text::build_check_status;
use crate::engine::{
    apply_move, clone_state, list_candidate_moves, normalize_state, Move, MovePriority, PileRef,
    SolutionPlayback,
};
use crate::game::{
    all_variants, deal, BuildMode, Card, EmptyFill, GameState, SequenceMode, StockMode, Suit,
    VariantRules, FORTY_THIEVES, FREECELL, GOLF, KLONDIKE, PYRAMID, SCORPION,
};

fn card(suit: Suit, rank: u8, face_up: bool) -> Card {
    Card {
        suit,
        rank,
        face_up,
    }
}

fn spades(ranks: &[u8]) -> Vec<Card> {
    ranks.iter().map(|rank| card(Suit::Spades, *rank, true)).collect()
}

const SMALL_TABLE: VariantRules = VariantRules {
    id: "small-table",
    label: "Small table",
    build_mode: BuildMode::Suit,
    sequence_mode: SequenceMode::Suit,
    foundations: 1,
    columns: 1,
    stock_mode: StockMode::None,
    waste_to_tableau: false,
    ..KLONDIKE
};

const OPEN_TABLE: VariantRules = VariantRules {
    id: "open-table",
    label: "Open table",
    build_mode: BuildMode::Any,
    sequence_mode: SequenceMode::SingleCard,
    empty_fill: EmptyFill::AnyCard,
    columns: 2,
    ..SMALL_TABLE
};

fn one_column_descending() -> GameState {
    let mut state = GameState::empty(&SMALL_TABLE);
    state.tableau[0] = spades(&[4, 3, 2, 1]);
    state
}

fn buried_two() -> GameState {
    let mut state = GameState::empty(&OPEN_TABLE);
    state.tableau[0] = spades(&[2, 3]);
    state.tableau[1] = spades(&[1]);
    state
}

#[test]
fn normalize_is_stable_under_clone() {
    for rules in all_variants() {
        let state = deal(rules, 99);
        let copy = clone_state(&state);
        assert_eq!(normalize_state(&state), normalize_state(&copy));
        assert_eq!(copy, state);
    }
}

#[test]
fn normalize_masks_hidden_cards_and_marks_empty_cells() {
    let mut state = GameState::empty(&FREECELL);
    state.tableau[0] = vec![card(Suit::Hearts, 10, false), card(Suit::Hearts, 12, true)];
    state.cells[1] = Some(card(Suit::Clubs, 1, true));

    assert_eq!(normalize_state(&state), "|||/##QH|||||||/..|AC|..|..///0");
}

#[test]
fn normalize_keys_knights_between_jack_and_queen() {
    let knights = VariantRules {
        top_rank: 14,
        ..SMALL_TABLE
    };
    let mut state = GameState::empty(&knights);
    state.tableau[0] = spades(&[14, 13, 12, 11]);
    assert_eq!(normalize_state(&state), "/KSQSNSJS////0");

    let mut plain = GameState::empty(&SMALL_TABLE);
    plain.tableau[0] = spades(&[13, 12, 11]);
    assert_eq!(normalize_state(&plain), "/KSQSJS////0");
}

#[test]
fn out_of_range_ranks_generate_no_moves() {
    for rank in [0, u8::MAX] {
        let mut state = GameState::empty(&OPEN_TABLE);
        state.tableau[0] = spades(&[rank]);
        state.tableau[1] = spades(&[1]);
        let moves = list_candidate_moves(&state, &OPEN_TABLE);
        assert!(moves.iter().all(|candidate| !matches!(
            candidate.mv,
            Move::TableauToTableau { src: 0, .. } | Move::ToFoundation {
                from: PileRef::Tableau(0),
                ..
            }
        )));

        let mut golf = GameState::empty(&GOLF);
        golf.tableau[0] = spades(&[rank]);
        golf.waste = spades(&[1]);
        assert!(list_candidate_moves(&golf, &GOLF).is_empty());

        let mut pyramid = GameState::empty(&PYRAMID);
        pyramid.cells[27] = Some(card(Suit::Hearts, rank, true));
        pyramid.waste = spades(&[rank]);
        assert!(list_candidate_moves(&pyramid, &PYRAMID)
            .iter()
            .all(|candidate| !matches!(candidate.mv, Move::RemoveExposed { .. })));
    }
}

#[test]
fn normalize_distinguishes_piles_and_recycles() {
    let base = deal(&KLONDIKE, 4);
    let mut moved = base.clone();
    let card = moved.tableau[6].pop();
    moved.tableau[5].extend(card);
    assert_ne!(normalize_state(&base), normalize_state(&moved));

    let mut recycled = base.clone();
    recycled.recycles += 1;
    assert_ne!(normalize_state(&base), normalize_state(&recycled));
}

#[test]
fn candidates_are_sorted_by_priority() {
    for rules in all_variants() {
        for seed in 0..4 {
            let state = deal(rules, seed);
            let priorities: Vec<MovePriority> = list_candidate_moves(&state, rules)
                .iter()
                .map(|candidate| candidate.priority)
                .collect();
            assert!(priorities.windows(2).all(|pair| pair[0] <= pair[1]), "{}", rules.id);
        }
    }
}

#[test]
fn random_play_conserves_cards_and_every_candidate_applies() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut total_moves = 0_usize;

    'seeds: for seed in 0..200_u64 {
        for rules in all_variants() {
            let mut state = deal(rules, seed);
            let dealt = state.card_multiset();

            for _ in 0..40 {
                let candidates = list_candidate_moves(&state, rules);
                for candidate in &candidates {
                    let before = state.clone();
                    let next = apply_move(&state, &candidate.mv, rules);
                    assert_eq!(state, before, "{} input mutated", rules.id);
                    let next = next.unwrap_or_else(|| {
                        panic!("{} generated an illegal {:?}", rules.id, candidate.mv)
                    });
                    assert_eq!(next.card_count(), rules.deck_size());
                }
                if candidates.is_empty() {
                    break;
                }
                let pick = &candidates[rng.gen_range(0..candidates.len())];
                let Some(next) = apply_move(&state, &pick.mv, rules) else {
                    break;
                };
                state = next;
                total_moves += 1;
                assert_eq!(state.card_multiset(), dealt, "{} lost a card", rules.id);
            }

            if total_moves >= 1_500 {
                break 'seeds;
            }
        }
    }

    assert!(total_moves >= 1_000, "only {total_moves} moves played");
}

#[test]
fn illegal_moves_are_refused_without_touching_the_input() {
    let state = deal(&KLONDIKE, 8);
    let before = state.clone();

    let refused = [
        Move::TableauToTableau {
            src: 0,
            dst: 0,
            count: 1,
        },
        Move::TableauToTableau {
            src: 1,
            dst: 2,
            count: 2,
        },
        Move::CellToTableau { cell: 0, dst: 1 },
        Move::DealStock,
        Move::RecycleWaste,
        Move::ToFoundation {
            from: PileRef::Waste,
            foundation: 9,
        },
    ];
    for mv in refused {
        assert!(apply_move(&state, &mv, &KLONDIKE).is_none(), "{mv:?}");
    }
    assert_eq!(state, before);
}

#[test]
fn moving_a_run_reveals_the_card_beneath() {
    let mut state = GameState::empty(&KLONDIKE);
    state.tableau[0] = vec![
        card(Suit::Clubs, 2, false),
        card(Suit::Hearts, 9, true),
        card(Suit::Spades, 8, true),
    ];
    state.tableau[1] = vec![card(Suit::Clubs, 10, true)];

    let mv = Move::TableauToTableau { src: 0, dst: 1, count: 2 };
    let candidates = list_candidate_moves(&state, &KLONDIKE);
    let found = candidates.iter().find(|candidate| candidate.mv == mv);
    assert_eq!(found.map(|candidate| candidate.priority), Some(MovePriority::Reveal));

    let next = apply_move(&state, &mv, &KLONDIKE).unwrap();
    assert_eq!(next.tableau[0], vec![card(Suit::Clubs, 2, true)]);
    assert_eq!(next.tableau[1].len(), 3);
}

#[test]
fn freecell_runs_are_capped_by_free_space() {
    let mut state = GameState::empty(&FREECELL);
    state.tableau[0] = vec![
        card(Suit::Diamonds, 13, true),
        card(Suit::Hearts, 8, true),
        card(Suit::Clubs, 7, true),
    ];
    state.tableau[1] = vec![card(Suit::Spades, 9, true)];
    for col in 2..8 {
        state.tableau[col] = vec![card(Suit::Diamonds, col as u8, true)];
    }
    state.cells = vec![
        Some(card(Suit::Clubs, 12, true)),
        Some(card(Suit::Hearts, 12, true)),
        Some(card(Suit::Clubs, 11, true)),
        Some(card(Suit::Hearts, 11, true)),
    ];

    let mv = Move::TableauToTableau { src: 0, dst: 1, count: 2 };
    assert!(apply_move(&state, &mv, &FREECELL).is_none());

    state.cells[3] = None;
    assert!(apply_move(&state, &mv, &FREECELL).is_some());
}

#[test]
fn scorpion_lifts_a_complete_run() {
    let mut state = GameState::empty(&SCORPION);
    state.tableau[2] = vec![card(Suit::Clubs, 5, false)];
    state.tableau[2].extend((1..=13).rev().map(|rank| card(Suit::Hearts, rank, true)));

    let mv = Move::ToFoundation { from: PileRef::Tableau(2), foundation: 0 };
    assert!(list_candidate_moves(&state, &SCORPION).iter().any(|candidate| candidate.mv == mv));

    let next = apply_move(&state, &mv, &SCORPION).unwrap();
    assert_eq!(next.foundations[0].len(), 13);
    assert_eq!(next.foundations[0].last().map(|card| card.rank), Some(13));
    assert_eq!(next.tableau[2], vec![card(Suit::Clubs, 5, true)]);
}

#[test]
fn scorpion_deals_stock_across_the_first_columns() {
    let state = deal(&SCORPION, 2);
    let next = apply_move(&state, &Move::DealStock, &SCORPION).unwrap();
    assert!(next.stock.is_empty());
    for col in 0..3 {
        assert_eq!(next.tableau[col].len(), state.tableau[col].len() + 1);
    }
    assert_eq!(next.tableau[3].len(), state.tableau[3].len());
}

#[test]
fn golf_removes_adjacent_ranks_to_the_waste() {
    let mut state = GameState::empty(&GOLF);
    state.waste = vec![card(Suit::Clubs, 5, true)];
    state.tableau[0] = vec![card(Suit::Diamonds, 6, true)];
    state.tableau[1] = vec![card(Suit::Spades, 9, true)];
    state.tableau[2] = vec![card(Suit::Hearts, 4, true)];

    let removals: Vec<Move> = list_candidate_moves(&state, &GOLF)
        .into_iter()
        .filter(|candidate| candidate.priority == MovePriority::Foundation)
        .map(|candidate| candidate.mv)
        .collect();
    assert_eq!(
        removals,
        vec![
            Move::RemoveExposed { first: PileRef::Tableau(0), second: None },
            Move::RemoveExposed { first: PileRef::Tableau(2), second: None },
        ]
    );

    let next = apply_move(&state, &removals[0], &GOLF).unwrap();
    assert_eq!(next.waste_top(), Some(&card(Suit::Diamonds, 6, true)));
    assert!(next.tableau[0].is_empty());
}

#[test]
fn pyramid_removes_kings_and_pairs_summing_to_thirteen() {
    let mut state = GameState::empty(&PYRAMID);
    state.cells[21] = Some(card(Suit::Spades, 13, true));
    state.cells[26] = Some(card(Suit::Hearts, 6, true));
    state.cells[27] = Some(card(Suit::Clubs, 7, true));
    state.cells[20] = Some(card(Suit::Clubs, 2, true));
    state.waste = vec![card(Suit::Diamonds, 11, true)];

    let moves: Vec<Move> = list_candidate_moves(&state, &PYRAMID)
        .into_iter()
        .map(|candidate| candidate.mv)
        .collect();
    let king = Move::RemoveExposed { first: PileRef::Cell(21), second: None };
    let pair = Move::RemoveExposed {
        first: PileRef::Cell(26),
        second: Some(PileRef::Cell(27)),
    };
    assert!(moves.contains(&king));
    assert!(moves.contains(&pair));
    // Slot 20 is still covered by slots 26 and 27.
    assert!(!moves.iter().any(|mv| matches!(
        mv,
        Move::RemoveExposed { second: Some(PileRef::Waste), .. }
    )));

    let next = apply_move(&state, &pair, &PYRAMID).unwrap();
    assert_eq!(next.foundations[0].len(), 2);
    let with_waste = Move::RemoveExposed {
        first: PileRef::Cell(20),
        second: Some(PileRef::Waste),
    };
    assert!(list_candidate_moves(&next, &PYRAMID)
        .iter()
        .any(|candidate| candidate.mv == with_waste));
    assert!(apply_move(&state, &with_waste, &PYRAMID).is_none());
}

#[test]
fn limited_recycles_are_counted() {
    let mut state = GameState::empty(&PYRAMID);
    state.cells[0] = Some(card(Suit::Clubs, 1, true));
    state.waste = vec![card(Suit::Clubs, 5, true)];

    let mut current = state;
    for used in 1..=2 {
        current = apply_move(&current, &Move::RecycleWaste, &PYRAMID).unwrap();
        assert_eq!(current.recycles, used);
        current = apply_move(&current, &Move::DrawStock, &PYRAMID).unwrap();
    }
    assert!(apply_move(&current, &Move::RecycleWaste, &PYRAMID).is_none());
}

#[test]
fn quick_check_solves_a_single_descending_column() {
    let state = one_column_descending();
    let result = check_solvable(&state, &SMALL_TABLE, &SearchLimits::quick(100, 5_000));

    assert!(result.solved);
    assert_eq!(result.reason, SearchReason::Solved);
    assert!(result.states_explored <= 10);
    assert_eq!(result.best_cards_cleared, 4);
    let moves = result.solution_moves.unwrap();
    let keys = result.solution_state_keys.unwrap();
    assert_eq!(moves.len(), 4);
    assert_eq!(keys.len(), 5);
    assert_eq!(keys[0], normalize_state(&state));
}

#[test]
fn quick_check_respects_the_state_budget() {
    for rules in all_variants() {
        let state = deal(rules, 21);
        let result = check_solvable(&state, rules, &SearchLimits::quick(100, 60_000));
        assert!(result.states_explored <= 100, "{}", rules.id);
    }
}

#[test]
fn deep_search_respects_the_state_budget() {
    for rules in [&KLONDIKE, &FREECELL, &FORTY_THIEVES] {
        let state = deal(rules, 21);
        let result = check_solvable(&state, rules, &SearchLimits::deep(100, 60_000));
        assert!(result.states_explored <= 100);
        assert!(!result.proven_unsolvable);
    }
}

#[test]
fn quick_check_is_repeatable() {
    for rules in all_variants() {
        let state = deal(rules, 5);
        let limits = SearchLimits::quick(2_000, 60_000);
        let first = check_solvable(&state, rules, &limits);
        let second = check_solvable(&state, rules, &limits);
        assert_eq!(first.reason, second.reason, "{}", rules.id);
        assert_eq!(first.states_explored, second.states_explored);
    }
}

#[test]
fn deep_search_proves_a_deadlock() {
    let rules = VariantRules {
        empty_fill: EmptyFill::None,
        columns: 2,
        ..SMALL_TABLE
    };
    let mut state = GameState::empty(&rules);
    state.foundations[0] = spades(&[1, 2, 3]);
    state.tableau[0] = spades(&[5]);
    state.tableau[1] = spades(&[5]);

    let result = check_solvable(&state, &rules, &SearchLimits::deep(1_000, 60_000));
    assert!(!result.solved);
    assert_eq!(result.reason, SearchReason::Exhausted);
    assert!(result.proven_unsolvable);
    assert_eq!(result.best_cards_cleared, 3);
}

#[test]
fn deep_search_backtracks_where_greedy_stalls() {
    let state = buried_two();

    let quick = check_solvable(&state, &OPEN_TABLE, &SearchLimits::quick(1_000, 60_000));
    assert_eq!(quick.reason, SearchReason::Exhausted);
    assert!(!quick.proven_unsolvable);

    let deep = check_solvable(&state, &OPEN_TABLE, &SearchLimits::deep(1_000, 60_000));
    assert!(deep.solved);
    let moves = deep.solution_moves.unwrap();
    let keys = deep.solution_state_keys.unwrap();
    assert_eq!(keys.len(), moves.len() + 1);

    let mut replay = state;
    for (mv, key) in moves.iter().zip(keys.iter().skip(1)) {
        replay = apply_move(&replay, mv, &OPEN_TABLE).unwrap();
        assert_eq!(&normalize_state(&replay), key);
    }
    assert!(replay.is_solved(&OPEN_TABLE));
}

#[test]
fn stock_only_play_is_reported_as_a_cycle() {
    let mut state = GameState::empty(&KLONDIKE);
    state.stock.push(card(Suit::Spades, 5, false));

    let result = check_solvable(&state, &KLONDIKE, &SearchLimits::quick(1_000, 60_000));
    assert!(!result.solved);
    assert_eq!(result.reason, SearchReason::CycleDetected);
    assert_eq!(result.states_explored, 2);
}

#[test]
fn progress_past_the_threshold_is_likely_solved() {
    let state = one_column_descending();
    let limits = SearchLimits::quick(3, 60_000).with_threshold(3);
    let result = check_solvable(&state, &SMALL_TABLE, &limits);
    assert_eq!(result.reason, SearchReason::LikelySolved);
    assert!(!result.solved);
    assert_eq!(result.best_cards_cleared, 3);

    let result = check_solvable(&state, &SMALL_TABLE, &SearchLimits::quick(3, 60_000));
    assert_eq!(result.reason, SearchReason::StateLimit);
}

#[test]
fn zero_time_budget_stops_before_exploring() {
    let state = deal(&KLONDIKE, 1);
    let result = check_solvable(&state, &KLONDIKE, &SearchLimits::deep(1_000, 0));
    assert_eq!(result.reason, SearchReason::TimeLimit);
    assert_eq!(result.states_explored, 0);
}

#[test]
fn profiles_scale_the_threshold_with_the_deck() {
    assert_eq!(CheckProfile::for_variant(&KLONDIKE).quick.likely_solved_threshold, 39);
    assert_eq!(CheckProfile::for_variant(&FORTY_THIEVES).deep.likely_solved_threshold, 78);
    assert_eq!(CheckProfile::for_variant(&GOLF).quick.likely_solved_threshold, 20);
    let profile = CheckProfile::for_variant(&PYRAMID);
    assert!(profile.limits(true).relaxed_search);
    assert!(!profile.limits(false).relaxed_search);
    let fallback = profile.deep.for_fallback();
    assert_eq!(fallback.max_states, profile.deep.max_states / 4);
    assert_eq!(fallback.likely_solved_threshold, 20);
}

#[test]
fn playback_follows_the_line_and_resyncs() {
    let state = one_column_descending();
    let result = check_solvable(&state, &SMALL_TABLE, &SearchLimits::quick(100, 5_000));
    let mut playback = SolutionPlayback::from_result(&result).unwrap();
    assert!(playback.is_armed());
    assert_eq!(playback.remaining(), 4);

    let mut current = state.clone();
    let first = playback.next_hint(&current).unwrap();
    current = apply_move(&current, &first, &SMALL_TABLE).unwrap();
    let second = playback.next_hint(&current).unwrap();
    let after_second = apply_move(&current, &second, &SMALL_TABLE).unwrap();
    assert_eq!(playback.remaining(), 2);

    // Going back to the start replays from the matching step.
    assert_eq!(playback.next_hint(&state), Some(first));
    assert!(playback.next_hint(&after_second).is_some());

    let mut off_line = GameState::empty(&SMALL_TABLE);
    off_line.tableau[0] = spades(&[9]);
    assert_eq!(playback.next_hint(&off_line), None);

    playback.clear();
    assert!(!playback.is_armed());
}

#[test]
fn playback_refuses_unsolved_results() {
    let state = buried_two();
    let result = check_solvable(&state, &OPEN_TABLE, &SearchLimits::quick(1_000, 60_000));
    assert!(SolutionPlayback::from_result(&result).is_none());
}

#[test]
fn status_text_names_the_outcome() {
    let limits = SearchLimits::quick(100, 5_000);
    let solved = check_solvable(&one_column_descending(), &SMALL_TABLE, &limits);
    assert!(build_check_status(&solved).starts_with("Solvable: found a 4-move solution"));

    let mut state = GameState::empty(&KLONDIKE);
    state.stock.push(card(Suit::Spades, 5, false));
    let cycle = check_solvable(&state, &KLONDIKE, &SearchLimits::quick(1_000, 60_000));
    assert!(build_check_status(&cycle).contains("loops back"));
}

#[test]
fn search_results_serialize_with_wire_names() {
    let limits = SearchLimits::quick(100, 5_000);
    let result = check_solvable(&one_column_descending(), &SMALL_TABLE, &limits);
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["reason"], "solved");
    assert_eq!(value["statesExplored"], 5);
    assert_eq!(value["solutionMoves"][0]["type"], "toFoundation");
    assert_eq!(value["solutionMoves"][0]["from"]["tableau"], 0);
}
