//! Recommendation engine for selecting exercises.
//!
//! Two entry points:
//! - Mood plans: a fixed two-exercise plan per mood, looked up from a table
//! - Weighted random draw: one catalog exercise biased toward a target difficulty

use crate::catalog::{default_exercise, exercise};
use crate::{Catalog, Category, Difficulty, Exercise, Mood};
use rand::seq::SliceRandom;
use rand::Rng;

/// Chance of adding a second copy of a same-difficulty exercise
const SAME_LEVEL_EXTRA_P: f64 = 0.7;
/// Chance of including an exercise one level easier than the target
const EASIER_P: f64 = 0.2;
/// Chance of including an exercise one level harder than the target
const HARDER_P: f64 = 0.1;

/// Template for one curated mood-plan exercise
struct PlanEntry {
    name: &'static str,
    description: &'static str,
    instructions: &'static str,
    category: Category,
    duration_minutes: u32,
    calories: u32,
}

/// Curated plan per mood: a cardio/HIIT-leaning exercise first, then a secondary one
const MOOD_PLANS: [(Mood, [PlanEntry; 2]); 4] = [
    (
        Mood::Happy,
        [
            PlanEntry {
                name: "Dance Cardio",
                description: "Ride the good mood with upbeat movement.",
                instructions: "Put on a favourite song and keep moving: step touches, grapevines, arm swings.",
                category: Category::Cardio,
                duration_minutes: 10,
                calories: 90,
            },
            PlanEntry {
                name: "Jump Squats",
                description: "Explosive lower-body power.",
                instructions: "Squat down, then jump as high as you can. Land softly and repeat.",
                category: Category::Strength,
                duration_minutes: 5,
                calories: 60,
            },
        ],
    ),
    (
        Mood::Neutral,
        [
            PlanEntry {
                name: "Brisk Walk in Place",
                description: "Steady cardio to build momentum.",
                instructions: "Walk in place at a brisk pace, swinging the arms and staying tall.",
                category: Category::Cardio,
                duration_minutes: 10,
                calories: 50,
            },
            PlanEntry {
                name: "Plank Hold",
                description: "Core stability.",
                instructions: "Hold a forearm plank with a straight line from head to heels.",
                category: Category::Strength,
                duration_minutes: 5,
                calories: 25,
            },
        ],
    ),
    (
        Mood::Frustrated,
        [
            PlanEntry {
                name: "Burpee Blast",
                description: "Burn off frustration with maximum effort.",
                instructions: "Perform burpees for 40 seconds, rest for 20, and repeat.",
                category: Category::Hiit,
                duration_minutes: 10,
                calories: 140,
            },
            PlanEntry {
                name: "Power Punches",
                description: "Channel the energy into fast combinations.",
                instructions: "Throw fast jab-cross combinations, rotating through the hips.",
                category: Category::Cardio,
                duration_minutes: 5,
                calories: 60,
            },
        ],
    ),
    (
        Mood::Stressed,
        [
            PlanEntry {
                name: "Gentle Yoga Flow",
                description: "Slow movement to release tension.",
                instructions: "Flow between cat-cow, child's pose and downward dog, moving with the breath.",
                category: Category::Yoga,
                duration_minutes: 10,
                calories: 35,
            },
            PlanEntry {
                name: "Deep Breathing",
                description: "Calm the nervous system.",
                instructions: "Breathe in through the nose for 4 counts and out through the mouth for 6.",
                category: Category::Breathing,
                duration_minutes: 5,
                calories: 5,
            },
        ],
    ),
];

/// Build the curated two-exercise plan for a mood
///
/// The difficulty is stamped onto each exercise; it does not change which
/// exercises are chosen.
pub fn generate_mood_specific_exercises(mood: Mood, difficulty: Difficulty) -> Vec<Exercise> {
    let Some((_, entries)) = MOOD_PLANS.iter().find(|(m, _)| *m == mood) else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| {
            exercise(
                entry.name,
                entry.description,
                entry.instructions,
                difficulty,
                entry.category,
                entry.duration_minutes,
                entry.calories,
                &[mood],
            )
        })
        .collect()
}

/// Ordered exercises for a mood, never empty
///
/// Starts from the curated plan; see [`with_fallbacks`] for what happens
/// when that comes back empty.
pub fn recommend_for_mood(catalog: &Catalog, mood: Mood, difficulty: Difficulty) -> Vec<Exercise> {
    let plan = generate_mood_specific_exercises(mood, difficulty);
    with_fallbacks(plan, catalog, mood)
}

/// Fill an empty plan from the catalog
///
/// Tries mood-tagged catalog entries, then the whole catalog, then the
/// default exercise. A non-empty plan is returned unchanged.
pub fn with_fallbacks(plan: Vec<Exercise>, catalog: &Catalog, mood: Mood) -> Vec<Exercise> {
    if !plan.is_empty() {
        tracing::info!("Recommending {} exercises for mood {}", plan.len(), mood);
        return plan;
    }

    let tagged: Vec<Exercise> = catalog.by_mood(mood).cloned().collect();
    if !tagged.is_empty() {
        tracing::warn!("No curated plan for {}, using {} tagged exercises", mood, tagged.len());
        return tagged;
    }

    if !catalog.is_empty() {
        tracing::warn!("No exercises tagged {}, using full catalog", mood);
        return catalog.exercises.clone();
    }

    tracing::warn!("Catalog is empty, using default exercise");
    vec![default_exercise()]
}

/// Build the weighted candidate multiset for a target difficulty
///
/// Never empty for a non-empty catalog.
pub fn filter_exercises_by_difficulty<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    target: Difficulty,
    rng: &mut R,
) -> Vec<&'a Exercise> {
    let mut candidates = Vec::new();

    for exercise in &catalog.exercises {
        match exercise.difficulty.level() - target.level() {
            0 => {
                candidates.push(exercise);
                if rng.gen_bool(SAME_LEVEL_EXTRA_P) {
                    candidates.push(exercise);
                }
            }
            -1 => {
                if rng.gen_bool(EASIER_P) {
                    candidates.push(exercise);
                }
            }
            1 => {
                if rng.gen_bool(HARDER_P) {
                    candidates.push(exercise);
                }
            }
            _ => {}
        }
    }

    if candidates.is_empty() {
        candidates = catalog.by_difficulty(target).collect();
        if !candidates.is_empty() {
            tracing::debug!("Weighted filter empty, using exact {} matches", target);
        }
    }

    if candidates.is_empty() {
        tracing::debug!("No {} exercises, using full catalog", target);
        candidates = catalog.exercises.iter().collect();
    }

    candidates
}

/// Draw one exercise biased toward the target difficulty
pub fn select_random_exercise<R: Rng + ?Sized>(
    catalog: &Catalog,
    target: Difficulty,
    rng: &mut R,
) -> Exercise {
    let candidates = filter_exercises_by_difficulty(catalog, target, rng);

    match candidates.choose(rng) {
        Some(exercise) => {
            tracing::info!(
                "Selected {} ({}) from {} candidates",
                exercise.name,
                exercise.difficulty,
                candidates.len()
            );
            (*exercise).clone()
        }
        None => {
            tracing::warn!("Catalog is empty, using default exercise");
            default_exercise()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog_of(difficulties: &[Difficulty]) -> Catalog {
        let exercises = difficulties
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut e = default_exercise();
                e.name = format!("Exercise {}", i);
                e.difficulty = *d;
                e
            })
            .collect();
        Catalog { exercises }
    }

    #[test]
    fn test_stressed_beginner_plan_is_calm() {
        let plan = generate_mood_specific_exercises(Mood::Stressed, Difficulty::Beginner);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].category, Category::Yoga);
        assert_eq!(plan[1].category, Category::Breathing);
        assert!(plan.iter().all(|e| e.difficulty == Difficulty::Beginner));
    }

    #[test]
    fn test_every_mood_has_two_exercises() {
        for mood in Mood::ALL {
            let plan = generate_mood_specific_exercises(mood, Difficulty::Intermediate);
            assert_eq!(plan.len(), 2, "mood {:?}", mood);
            assert!(matches!(
                plan[0].category,
                Category::Cardio | Category::Hiit | Category::Yoga
            ));
            assert!(plan.iter().all(|e| e.media_ref.as_deref().unwrap().starts_with("gif_")));
        }
    }

    #[test]
    fn test_difficulty_does_not_change_plan() {
        let easy = generate_mood_specific_exercises(Mood::Frustrated, Difficulty::Beginner);
        let hard = generate_mood_specific_exercises(Mood::Frustrated, Difficulty::Advanced);
        let names = |v: &[Exercise]| v.iter().map(|e| e.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&easy), names(&hard));
        assert_eq!(hard[0].difficulty, Difficulty::Advanced);
    }

    #[test]
    fn test_recommend_for_mood_uses_plan() {
        let catalog = build_default_catalog();
        let exercises = recommend_for_mood(&catalog, Mood::Happy, Difficulty::Beginner);
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].name, "Dance Cardio");
    }

    #[test]
    fn test_plan_ignores_catalog_contents() {
        let exercises = recommend_for_mood(&Catalog::default(), Mood::Stressed, Difficulty::Beginner);
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].name, "Gentle Yoga Flow");
    }

    #[test]
    fn test_empty_plan_uses_mood_tagged_entries() {
        let mut calm = default_exercise();
        calm.name = "Box Breathing".into();
        calm.moods = vec![Mood::Stressed];
        let mut loud = default_exercise();
        loud.name = "Sprints".into();
        loud.moods = vec![Mood::Happy];
        let catalog = Catalog {
            exercises: vec![loud, calm],
        };

        let exercises = with_fallbacks(Vec::new(), &catalog, Mood::Stressed);
        let names: Vec<&str> = exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Box Breathing"]);
    }

    #[test]
    fn test_no_tagged_entries_uses_whole_catalog() {
        let catalog = catalog_of(&[Difficulty::Beginner, Difficulty::Advanced]);
        let untagged = Catalog {
            exercises: catalog
                .exercises
                .into_iter()
                .map(|mut e| {
                    e.moods.clear();
                    e
                })
                .collect(),
        };

        let exercises = with_fallbacks(Vec::new(), &untagged, Mood::Frustrated);
        assert_eq!(exercises, untagged.exercises);
    }

    #[test]
    fn test_empty_catalog_uses_default_exercise() {
        let exercises = with_fallbacks(Vec::new(), &Catalog::default(), Mood::Neutral);
        assert_eq!(exercises, vec![default_exercise()]);
    }

    #[test]
    fn test_non_empty_plan_passes_through() {
        let plan = generate_mood_specific_exercises(Mood::Happy, Difficulty::Advanced);
        let exercises = with_fallbacks(plan.clone(), &build_default_catalog(), Mood::Happy);
        assert_eq!(exercises, plan);
    }

    #[test]
    fn test_filter_never_empty() {
        let catalog = build_default_catalog();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for target in Difficulty::ALL {
                let candidates = filter_exercises_by_difficulty(&catalog, target, &mut rng);
                assert!(!candidates.is_empty());
            }
        }
    }

    #[test]
    fn test_filter_excludes_two_levels_away() {
        let catalog = catalog_of(&[Difficulty::Beginner, Difficulty::Advanced]);
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let candidates =
                filter_exercises_by_difficulty(&catalog, Difficulty::Beginner, &mut rng);
            assert!(candidates
                .iter()
                .all(|e| e.difficulty == Difficulty::Beginner));
        }
    }

    #[test]
    fn test_filter_same_level_appears_once_or_twice() {
        let catalog = catalog_of(&[Difficulty::Intermediate]);
        let mut doubled = 0;
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let n = filter_exercises_by_difficulty(&catalog, Difficulty::Intermediate, &mut rng)
                .len();
            assert!(n == 1 || n == 2);
            if n == 2 {
                doubled += 1;
            }
        }
        // ~70% expected
        assert!((250..450).contains(&doubled), "doubled {}", doubled);
    }

    #[test]
    fn test_filter_falls_back_to_whole_catalog() {
        // Only entries two levels away: weighted set and exact set are both empty
        let catalog = catalog_of(&[Difficulty::Advanced, Difficulty::Advanced]);
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = filter_exercises_by_difficulty(&catalog, Difficulty::Beginner, &mut rng);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_filter_neighbour_levels_are_rare() {
        let catalog = catalog_of(&[
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ]);
        let mut easier = 0;
        let mut harder = 0;
        for seed in 0..1000 {
            let mut rng = StdRng::seed_from_u64(seed);
            let candidates =
                filter_exercises_by_difficulty(&catalog, Difficulty::Intermediate, &mut rng);
            easier += candidates
                .iter()
                .filter(|e| e.difficulty == Difficulty::Beginner)
                .count();
            harder += candidates
                .iter()
                .filter(|e| e.difficulty == Difficulty::Advanced)
                .count();
        }
        assert!(easier > harder);
        assert!(easier < 400);
        assert!(harder < 250);
    }

    #[test]
    fn test_select_is_reproducible_with_seed() {
        let catalog = build_default_catalog();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(
                select_random_exercise(&catalog, Difficulty::Intermediate, &mut a).name,
                select_random_exercise(&catalog, Difficulty::Intermediate, &mut b).name
            );
        }
    }

    #[test]
    fn test_select_from_empty_catalog_returns_default() {
        let catalog = Catalog::default();
        let mut rng = StdRng::seed_from_u64(1);
        let picked = select_random_exercise(&catalog, Difficulty::Advanced, &mut rng);
        assert_eq!(picked, default_exercise());
    }
}
