use rand::Rng;
use rlwm_core::{Action, StimulusId};

use crate::config::{BlockSpec, StimulusCategory};
use crate::error::{ExperimentError, Result};

/// Takes the first `spec.set_size` symbols of the block's category.
pub fn select_stimuli(
    categories: &[StimulusCategory],
    block_index: usize,
    spec: &BlockSpec,
) -> Result<Vec<StimulusId>> {
    if categories.is_empty() {
        return Err(ExperimentError::NoCategories);
    }
    if spec.set_size < 1 {
        return Err(ExperimentError::InvalidSetSize {
            block: block_index,
            set_size: spec.set_size,
        });
    }
    let category = &categories[spec.category_index % categories.len()];
    if spec.set_size > category.len() {
        return Err(ExperimentError::SetSizeExceedsCategory {
            block: block_index,
            set_size: spec.set_size,
            category: category.name.clone(),
            available: category.len(),
        });
    }
    Ok(category.symbols[..spec.set_size]
        .iter()
        .map(|s| StimulusId(s.clone()))
        .collect())
}

/// Draws the rewarded action for each stimulus index, uniformly and independently.
///
/// Nothing forces all three actions to appear.
pub fn generate_correct_actions<R: Rng>(set_size: usize, rng: &mut R) -> Vec<Action> {
    (0..set_size)
        .map(|_| Action::ALL[rng.random_range(0..Action::ALL.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_categories;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn picks_prefix_of_category() {
        let categories = default_categories();
        let spec = BlockSpec {
            set_size: 3,
            category_index: 1,
        };
        let stimuli = select_stimuli(&categories, 1, &spec).unwrap();
        let expected: Vec<StimulusId> = ["🍎", "🍊", "🍋"].into_iter().map(StimulusId::from).collect();
        assert_eq!(stimuli, expected);
    }

    #[test]
    fn same_block_always_gets_same_stimuli() {
        let categories = default_categories();
        let spec = BlockSpec {
            set_size: 4,
            category_index: 8,
        };
        let a = select_stimuli(&categories, 8, &spec).unwrap();
        let b = select_stimuli(&categories, 8, &spec).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].as_str(), "⚽");
    }

    #[test]
    fn oversized_block_fails() {
        let categories = default_categories();
        let spec = BlockSpec {
            set_size: 7,
            category_index: 0,
        };
        assert!(matches!(
            select_stimuli(&categories, 0, &spec),
            Err(ExperimentError::SetSizeExceedsCategory { .. })
        ));
        assert!(matches!(
            select_stimuli(&[], 0, &spec),
            Err(ExperimentError::NoCategories)
        ));
    }

    #[test]
    fn correct_actions_cover_every_stimulus() {
        let mut rng = StdRng::seed_from_u64(7);
        for set_size in 1..=6 {
            let actions = generate_correct_actions(set_size, &mut rng);
            assert_eq!(actions.len(), set_size);
        }
    }

    #[test]
    fn every_action_gets_drawn_eventually() {
        let mut rng = StdRng::seed_from_u64(11);
        let actions = generate_correct_actions(300, &mut rng);
        for action in Action::ALL {
            assert!(actions.contains(&action), "{action} never drawn");
        }
    }
}
