//! Trial order for a block: a fixed number of presentations per stimulus,
//! shuffled so that the same stimulus rarely appears twice in a row.

use rand::Rng;
use rand::seq::SliceRandom;
use rlwm_core::{StimulusId, Trial};
use tracing::debug;

/// Upper bound on repair passes over a shuffled sequence.
pub const MAX_REPAIR_PASSES: usize = 100;

/// What happened while repairing a shuffled sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairReport {
    pub passes: usize,
    pub reshuffles: usize,
    /// Adjacent repeats left in the returned sequence.
    pub residual_repeats: usize,
}

/// Every stimulus once per iteration, in index order.
pub fn base_sequence(stimuli: &[StimulusId], iterations: usize) -> Vec<Trial> {
    (1..=iterations)
        .flat_map(|iteration| {
            stimuli
                .iter()
                .enumerate()
                .map(move |(stimulus_index, stimulus)| Trial {
                    stimulus_index,
                    stimulus: stimulus.clone(),
                    iteration,
                })
        })
        .collect()
}

pub fn build_sequence<R: Rng>(stimuli: &[StimulusId], iterations: usize, rng: &mut R) -> Vec<Trial> {
    randomize(base_sequence(stimuli, iterations), rng)
}

/// Shuffles `sequence` and repairs adjacent repeats.
pub fn randomize<R: Rng>(sequence: Vec<Trial>, rng: &mut R) -> Vec<Trial> {
    let (sequence, report) = randomize_with_report(sequence, rng);
    debug!(
        len = sequence.len(),
        passes = report.passes,
        reshuffles = report.reshuffles,
        residual = report.residual_repeats,
        "sequence randomized"
    );
    sequence
}

/// Fisher–Yates shuffle followed by at most [`MAX_REPAIR_PASSES`] repair passes.
///
/// A pass scans left to right; on a repeat at `i, i+1` it swaps `i+1` with the
/// first later position that creates no new repeat. When a pass finds repeats
/// but no legal swap, the next pass starts from a fresh shuffle. If the
/// budget runs out, the arrangement with the fewest repeats seen is returned.
///
/// A block with a single stimulus, which a config file may still request,
/// never admits a swap: every pass reshuffles, the whole budget is spent,
/// and all `len - 1` neighbours remain repeats.
pub fn randomize_with_report<R: Rng>(mut sequence: Vec<Trial>, rng: &mut R) -> (Vec<Trial>, RepairReport) {
    sequence.shuffle(rng);

    let mut best = sequence.clone();
    let mut best_repeats = adjacent_repeats(&best);
    let mut report = RepairReport {
        passes: 0,
        reshuffles: 0,
        residual_repeats: best_repeats,
    };

    while best_repeats > 0 && report.passes < MAX_REPAIR_PASSES {
        report.passes += 1;
        let swaps = repair_pass(&mut sequence);

        let repeats = adjacent_repeats(&sequence);
        if repeats < best_repeats {
            best.clone_from(&sequence);
            best_repeats = repeats;
        }
        if repeats > 0 && swaps == 0 {
            sequence.shuffle(rng);
            report.reshuffles += 1;
            let repeats = adjacent_repeats(&sequence);
            if repeats < best_repeats {
                best.clone_from(&sequence);
                best_repeats = repeats;
            }
        }
    }

    report.residual_repeats = best_repeats;
    (best, report)
}

/// One left-to-right sweep. Returns the number of swaps made.
fn repair_pass(seq: &mut [Trial]) -> usize {
    let mut swaps = 0;
    for i in 0..seq.len().saturating_sub(1) {
        if seq[i].stimulus_index != seq[i + 1].stimulus_index {
            continue;
        }
        if let Some(j) = find_swap(seq, i) {
            seq.swap(i + 1, j);
            swaps += 1;
        }
    }
    swaps
}

/// First `j >= i + 2` whose swap with `i + 1` introduces no adjacent repeat.
fn find_swap(seq: &[Trial], i: usize) -> Option<usize> {
    let len = seq.len();
    let moving = seq[i + 1].stimulus_index;
    (i + 2..len).find(|&j| {
        let candidate = seq[j].stimulus_index;
        let repeat_before_j = seq[j - 1].stimulus_index == moving;
        let repeat_after_j = j + 1 < len && seq[j + 1].stimulus_index == moving;
        let repeat_at_i = candidate == seq[i].stimulus_index;
        let repeat_at_next = i + 2 < len && candidate == seq[i + 2].stimulus_index;
        !(repeat_before_j || repeat_after_j || repeat_at_i || repeat_at_next)
    })
}

/// Number of positions `k` where `seq[k]` and `seq[k + 1]` show the same stimulus.
pub fn adjacent_repeats(seq: &[Trial]) -> usize {
    seq.windows(2)
        .filter(|w| w[0].stimulus_index == w[1].stimulus_index)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn stimuli(n: usize) -> Vec<StimulusId> {
        (0..n).map(|i| StimulusId(format!("s{i}"))).collect()
    }

    fn counts(seq: &[Trial], set_size: usize) -> Vec<usize> {
        let mut counts = vec![0; set_size];
        for trial in seq {
            counts[trial.stimulus_index] += 1;
        }
        counts
    }

    #[test]
    fn base_sequence_is_in_index_order() {
        let seq = base_sequence(&stimuli(3), 2);
        let order: Vec<(usize, usize)> = seq.iter().map(|t| (t.stimulus_index, t.iteration)).collect();
        assert_eq!(order, vec![(0, 1), (1, 1), (2, 1), (0, 2), (1, 2), (2, 2)]);
        assert_eq!(seq[4].stimulus.as_str(), "s1");
    }

    #[test]
    fn randomizing_keeps_frequencies() {
        let mut rng = StdRng::seed_from_u64(3);
        for set_size in 1..=6 {
            for iterations in 1..=12 {
                let seq = build_sequence(&stimuli(set_size), iterations, &mut rng);
                assert_eq!(seq.len(), set_size * iterations);
                assert_eq!(counts(&seq, set_size), vec![iterations; set_size]);
            }
        }
    }

    #[test]
    fn trials_keep_their_stimulus_and_iteration() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seq = build_sequence(&stimuli(4), 5, &mut rng);
        assert!(seq.iter().all(|t| t.stimulus.0 == format!("s{}", t.stimulus_index)));
        seq.sort_by_key(|t| (t.iteration, t.stimulus_index));
        assert_eq!(seq, base_sequence(&stimuli(4), 5));
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = build_sequence(&stimuli(5), 10, &mut StdRng::seed_from_u64(42));
        let b = build_sequence(&stimuli(5), 10, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    fn indices(order: &[usize]) -> Vec<Trial> {
        order
            .iter()
            .map(|&i| Trial {
                stimulus_index: i,
                stimulus: StimulusId(format!("s{i}")),
                iteration: 1,
            })
            .collect()
    }

    #[test]
    fn find_swap_skips_positions_that_would_repeat() {
        // Repeat at 0,1. j=2 sits next to the moving 0, j=3 is legal.
        let seq = indices(&[0, 0, 1, 2, 1, 2]);
        assert_eq!(find_swap(&seq, 0), Some(3));

        let mut repaired = seq.clone();
        assert_eq!(repair_pass(&mut repaired), 1);
        assert_eq!(adjacent_repeats(&repaired), 0);
    }

    #[test]
    fn find_swap_gives_up_when_every_position_repeats() {
        let seq = indices(&[0, 0, 1, 1]);
        assert_eq!(find_swap(&seq, 0), None);
        assert_eq!(find_swap(&seq, 2), None);
    }

    #[test]
    fn single_stimulus_cannot_be_repaired_and_is_tolerated() {
        let mut rng = StdRng::seed_from_u64(1);
        let (seq, report) = randomize_with_report(base_sequence(&stimuli(1), 4), &mut rng);
        assert_eq!(seq.len(), 4);
        assert_eq!(report.residual_repeats, 3);
        assert_eq!(report.passes, MAX_REPAIR_PASSES);
        assert_eq!(report.reshuffles, MAX_REPAIR_PASSES);
    }

    #[test]
    fn two_stimuli_two_iterations_alternate() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..50 {
            let seq = build_sequence(&stimuli(2), 2, &mut rng);
            assert_eq!(adjacent_repeats(&seq), 0, "{seq:?}");
        }
    }

    #[test]
    fn larger_set_sizes_rarely_repeat() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut total = 0;
        let mut clean = 0;
        for set_size in 3..=6 {
            for iterations in 2..=10 {
                for _ in 0..25 {
                    let seq = build_sequence(&stimuli(set_size), iterations, &mut rng);
                    total += 1;
                    if adjacent_repeats(&seq) == 0 {
                        clean += 1;
                    }
                }
            }
        }
        assert!(clean * 100 >= total * 95, "{clean}/{total} clean");
    }
}
