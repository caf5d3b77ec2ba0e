// src/quiz/generator.rs

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{
    config::MIN_CATALOG_SIZE,
    models::species::Species,
    quiz::{AnswerOption, MediaRef, Question, QuizError, QuizType, media::MediaResolver},
};

/// Generates an ordered question sequence from the species catalog.
///
/// Selection walks the taxonomic groups in random order, taking one species
/// per group, so the presented questions are diverse and near-identical
/// species do not cluster. If there are fewer groups than `size`, remaining
/// slots are filled uniformly from the unused pool. The returned sequence
/// has length `min(size, distinct species)`.
///
/// Intentionally non-deterministic: callers pass the RNG so tests can seed it
/// and check invariants rather than exact values.
pub fn generate(
    catalog: &[Species],
    size: usize,
    quiz_type: QuizType,
    official: bool,
    media: &MediaResolver,
    rng: &mut impl Rng,
) -> Result<Vec<Question>, QuizError> {
    // Work on the distinct species set; a catalog accessor may hand us
    // duplicate rows.
    let mut seen_ids = HashSet::new();
    let species: Vec<&Species> = catalog.iter().filter(|s| seen_ids.insert(s.id)).collect();

    if species.len() < MIN_CATALOG_SIZE {
        return Err(QuizError::CatalogInsufficient {
            available: species.len(),
            needed: MIN_CATALOG_SIZE,
        });
    }

    let mut by_group: HashMap<i32, Vec<&Species>> = HashMap::new();
    for s in &species {
        by_group.entry(s.group_id).or_default().push(*s);
    }

    // One species per group, groups visited in random order.
    let mut group_ids: Vec<i32> = by_group.keys().copied().collect();
    group_ids.shuffle(rng);

    let mut selected: Vec<&Species> = Vec::new();
    let mut used: HashSet<i64> = HashSet::new();
    for group_id in &group_ids {
        if selected.len() >= size {
            break;
        }
        if let Some(pick) = by_group[group_id].choose(rng).copied() {
            selected.push(pick);
            used.insert(pick.id);
        }
    }

    // Too few groups: fill the remaining slots uniformly, without
    // replacement, from the unused pool.
    let mut remaining: Vec<&Species> = species
        .iter()
        .filter(|s| !used.contains(&s.id))
        .copied()
        .collect();
    while selected.len() < size && !remaining.is_empty() {
        let i = rng.gen_range(0..remaining.len());
        let pick = remaining.swap_remove(i);
        selected.push(pick);
        used.insert(pick.id);
    }

    // Presentation order is not the selection order.
    selected.shuffle(rng);

    Ok(selected
        .iter()
        .map(|correct| build_question(correct, &species, &by_group, quiz_type, official, media, rng))
        .collect())
}

/// Builds the option set and media for one question.
///
/// Distractors: up to 2 same-group species, then random other-group species,
/// then a uniform top-up from the whole catalog, stopping at the nominal
/// option count for the quiz type or when the pool is exhausted. Options are
/// unique by id and by display name.
fn build_question(
    correct: &Species,
    species: &[&Species],
    by_group: &HashMap<i32, Vec<&Species>>,
    quiz_type: QuizType,
    official: bool,
    media: &MediaResolver,
    rng: &mut impl Rng,
) -> Question {
    let target = quiz_type.option_target();

    let mut options: Vec<&Species> = vec![correct];
    let mut names: HashSet<&str> = HashSet::new();
    names.insert(correct.name_local.as_str());

    // Two different records must never collide on display name either,
    // since the display name is what the user sees and picks between.
    fn collides(options: &[&Species], names: &HashSet<&str>, s: &Species) -> bool {
        options.iter().any(|o| o.id == s.id) || names.contains(s.name_local.as_str())
    }

    // Up to 2 plausible confusions from the same group.
    let same_group: Vec<&Species> = by_group[&correct.group_id]
        .iter()
        .copied()
        .filter(|s| s.id != correct.id)
        .collect();
    for s in same_group.choose_multiple(rng, 2).copied() {
        if options.len() >= target {
            break;
        }
        if !collides(&options, &names, s) {
            options.push(s);
            names.insert(s.name_local.as_str());
        }
    }

    // Up to 2 species from other groups, each drawn from a random group.
    let other_groups: Vec<i32> = by_group
        .keys()
        .copied()
        .filter(|g| *g != correct.group_id)
        .collect();
    if !other_groups.is_empty() {
        for _ in 0..2 {
            if options.len() >= target {
                break;
            }
            let group = other_groups[rng.gen_range(0..other_groups.len())];
            if let Some(s) = by_group[&group].choose(rng).copied()
                && !collides(&options, &names, s)
            {
                options.push(s);
                names.insert(s.name_local.as_str());
            }
        }
    }

    // Top up from the whole catalog, stopping early if the pool is
    // exhausted; undersized option sets are an accepted edge case.
    let mut pool: Vec<&Species> = species
        .iter()
        .copied()
        .filter(|s| !collides(&options, &names, s))
        .collect();
    while options.len() < target && !pool.is_empty() {
        let i = rng.gen_range(0..pool.len());
        let s = pool.swap_remove(i);
        if !collides(&options, &names, s) {
            options.push(s);
            names.insert(s.name_local.as_str());
        }
    }

    // The correct answer's position must not be predictable.
    let mut options: Vec<AnswerOption> = options.into_iter().map(AnswerOption::from).collect();
    options.shuffle(rng);

    Question {
        correct: AnswerOption::from(correct),
        options,
        media: resolve_media(correct, quiz_type, official, media, rng),
    }
}

/// Audio is a single deterministic file per species; an image is drawn
/// uniformly from the pool matching the session mode. An empty pool yields
/// an empty URL for the client to degrade on, not an error.
fn resolve_media(
    correct: &Species,
    quiz_type: QuizType,
    official: bool,
    media: &MediaResolver,
    rng: &mut impl Rng,
) -> MediaRef {
    match quiz_type {
        QuizType::Audio => media.audio(&correct.name_latin),
        QuizType::Image => {
            let pool = if official {
                &correct.images_test.0
            } else {
                &correct.images_practice.0
            };
            match pool.choose(rng) {
                Some(file) => media.image(file),
                None => MediaRef::default(),
            }
        }
    }
}
