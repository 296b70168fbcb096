//! Set validation and search tests.
//!
//! Checks the validator against a brute-force distinct-count, and the finder
//! against an exhaustive triple loop, over the real classic deck.

use proptest::prelude::*;

use set_plus::cards::{Card, Deck, Feature, FeatureValue};
use set_plus::core::{CardId, GameConfig, GameVersion};
use set_plus::rules::{find_set, is_set, is_set_available};

fn classic() -> (GameConfig, Deck) {
    let config = GameVersion::Classic.config();
    let deck = Deck::generate(&config);
    (config, deck)
}

fn brute_is_set(cards: &[&Card], features: &[Feature], v: usize) -> bool {
    cards.len() == v
        && features.iter().all(|&feature| {
            let mut values: Vec<String> = cards
                .iter()
                .map(|c| c.value(feature).map(|x| x.to_string()).unwrap_or_default())
                .collect();
            values.sort();
            values.dedup();
            values.len() == 1 || values.len() == v
        })
}

fn brute_any_set(cards: &[&Card], features: &[Feature]) -> bool {
    let n = cards.len();
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                if brute_is_set(&[cards[a], cards[b], cards[c]], features, 3) {
                    return true;
                }
            }
        }
    }
    false
}

fn classic_card(
    color: &'static str,
    shape: &'static str,
    count: u16,
    shading: &'static str,
) -> Card {
    Card::new(
        CardId::fresh(),
        [
            (Feature::Color, FeatureValue::Named(color)),
            (Feature::Shape, FeatureValue::Named(shape)),
            (Feature::Count, FeatureValue::Number(count)),
            (Feature::Shading, FeatureValue::Named(shading)),
        ],
    )
}

/// Test the textbook example: all red, all shapes, all counts, all solid.
#[test]
fn test_all_red_group_is_a_set() {
    let config = GameVersion::Classic.config();
    let a = classic_card("red", "diamond", 1, "solid");
    let b = classic_card("red", "oval", 2, "solid");
    let c = classic_card("red", "squiggle", 3, "solid");
    assert!(is_set(&[&a, &b, &c], config.features(), 3));

    let d = classic_card("red", "squiggle", 3, "striped");
    assert!(!is_set(&[&a, &b, &d], config.features(), 3));
}

/// Test that the classic deck contains exactly 1080 Sets and the validator
/// agrees with brute force on every triple.
#[test]
fn test_validator_agrees_with_brute_force_on_every_triple() {
    let (config, deck) = classic();
    let cards: Vec<&Card> = deck.iter().collect();
    let features = config.features();

    let mut sets = 0;
    for a in 0..cards.len() {
        for b in a + 1..cards.len() {
            for c in b + 1..cards.len() {
                let group = [cards[a], cards[b], cards[c]];
                let fast = is_set(&group, features, 3);
                assert_eq!(fast, brute_is_set(&group, features, 3));
                sets += usize::from(fast);
            }
        }
    }
    assert_eq!(sets, 1080);
}

/// Test that any two classic cards complete to exactly one Set.
#[test]
fn test_every_pair_has_one_completion() {
    let (config, deck) = classic();
    let cards: Vec<&Card> = deck.iter().collect();

    for (i, j) in [(0, 1), (5, 40), (17, 80), (33, 62)] {
        let completions = cards
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != i && *k != j)
            .filter(|(_, c)| is_set(&[cards[i], cards[j], **c], config.features(), 3))
            .count();
        assert_eq!(completions, 1);
    }
}

/// Test that the finder handles `V = 4`.
#[test]
fn test_find_with_four_variations() {
    let config = GameVersion::V4x4.config();
    let deck = Deck::generate(&config);
    let board: Vec<&Card> = deck.iter().take(16).collect();

    let found = find_set(&board, config.features(), 4).unwrap();
    assert_eq!(found.len(), 4);
    assert!(brute_is_set(&found, config.features(), 4));
    assert!(!is_set(&found[..3], config.features(), 4));
}

/// Test that a board drawn from two values per feature has no Set.
#[test]
fn test_two_valued_board_has_no_set() {
    let (config, deck) = classic();
    let binary: Vec<&Card> = deck
        .iter()
        .filter(|card| {
            config
                .features()
                .iter()
                .all(|f| config.domain(*f)[..2].contains(&card.value(*f).unwrap()))
        })
        .collect();
    assert_eq!(binary.len(), 16);

    assert!(find_set(&binary, config.features(), 3).is_none());
    assert!(!is_set_available(&binary, config.features(), 3));
}

fn index_subsequence(
    size: impl Into<proptest::collection::SizeRange>,
) -> impl Strategy<Value = Vec<usize>> {
    proptest::sample::subsequence((0..81).collect::<Vec<usize>>(), size)
}

proptest! {
    /// Reordering a group never changes the verdict.
    #[test]
    fn test_is_set_permutation_invariant(
        indices in index_subsequence(3),
        rotate in 0usize..3,
        swap in any::<bool>(),
    ) {
        let (config, deck) = classic();
        let cards: Vec<&Card> = deck.iter().collect();
        let mut group: Vec<&Card> = indices.iter().map(|&i| cards[i]).collect();

        let expected = is_set(&group, config.features(), 3);
        group.rotate_left(rotate);
        if swap {
            group.swap(0, 1);
        }
        prop_assert_eq!(is_set(&group, config.features(), 3), expected);
    }

    /// The finder comes up empty exactly when no triple is a Set.
    #[test]
    fn test_find_none_iff_no_set(indices in index_subsequence(0..=10)) {
        let (config, deck) = classic();
        let cards: Vec<&Card> = deck.iter().collect();
        let board: Vec<&Card> = indices.iter().map(|&i| cards[i]).collect();

        let found = find_set(&board, config.features(), 3);
        prop_assert_eq!(found.is_some(), brute_any_set(&board, config.features()));
        if let Some(set) = found {
            prop_assert!(brute_is_set(&set, config.features(), 3));
        }
    }

    /// Groups of the wrong size are never Sets.
    #[test]
    fn test_wrong_size_is_never_a_set(indices in index_subsequence(0..=6usize)) {
        prop_assume!(indices.len() != 3);
        let (config, deck) = classic();
        let cards: Vec<&Card> = deck.iter().collect();
        let group: Vec<&Card> = indices.iter().map(|&i| cards[i]).collect();
        prop_assert!(!is_set(&group, config.features(), 3));
    }
}
