//! Default catalog of programs and daily rituals.
//!
//! This module provides the built-in Mohero programs. Rituals are authored
//! per day; a program may have fewer authored rituals than its duration
//! while content is still being written.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
///
/// This function returns a reference to the pre-built catalog, avoiding
/// the overhead of rebuilding it on every operation.
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with built-in programs and rituals
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn exercise(id: &str, name: &str, description: &str, target_reps: u32) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        target_reps,
        completed_reps: 0,
    }
}

/// The shared exercise pool referenced by ritual definitions
fn exercise_pool() -> HashMap<&'static str, Exercise> {
    let mut pool = HashMap::new();

    pool.insert(
        "squats",
        exercise(
            "squats",
            "Squats Profonds",
            "Accroupissement complet avec alignement naturel",
            100,
        ),
    );
    pool.insert(
        "pushups",
        exercise(
            "pushups",
            "Pompes",
            "Pompes avec engagement du core et alignement parfait",
            30,
        ),
    );
    // Target is seconds held, not repetitions
    pool.insert(
        "plank",
        exercise(
            "plank",
            "Planche Active",
            "Maintien en position de planche avec engagement maximal",
            120,
        ),
    );
    pool.insert(
        "breath",
        exercise(
            "breath",
            "Respiration Tribale",
            "Technique de respiration profonde avec rétention",
            30,
        ),
    );
    pool.insert(
        "burpees",
        exercise(
            "burpees",
            "Burpees",
            "Mouvement explosif combinant squat, pompe et saut",
            50,
        ),
    );
    pool.insert(
        "lunges",
        exercise(
            "lunges",
            "Fentes Dynamiques",
            "Fentes avec rotation du tronc et mobilité des hanches",
            60,
        ),
    );

    pool
}

fn phase(title: &str, description: &str) -> ProgramPhase {
    ProgramPhase {
        title: title.into(),
        description: description.into(),
    }
}

fn build_default_catalog_internal() -> Catalog {
    let mut programs = HashMap::new();

    // ========================================================================
    // Programs
    // ========================================================================

    programs.insert(
        "crocodile-tide".into(),
        Program {
            id: "crocodile-tide".into(),
            title: "Marée du Crocodile".into(),
            description: "Un programme d'introduction pour développer force et mobilité \
                          à travers des mouvements fonctionnels."
                .into(),
            duration: 7,
            category: ProgramCategory::Discovery,
            focus: vec!["Mobilité".into(), "Force".into(), "Respiration".into()],
            benefits: vec![
                "Amélioration de la mobilité des hanches et des épaules".into(),
                "Renforcement du core et du haut du corps".into(),
                "Meilleure respiration et récupération".into(),
                "Introduction aux mouvements fonctionnels".into(),
            ],
            phases: vec![
                phase(
                    "Éveil (Jours 1-2)",
                    "Préparer le corps avec des mouvements simples et des techniques de respiration.",
                ),
                phase(
                    "Force (Jours 3-5)",
                    "Développer la force fonctionnelle avec des mouvements composés.",
                ),
                phase(
                    "Intégration (Jours 6-7)",
                    "Combiner mobilité et force dans des séquences de mouvements fluides.",
                ),
            ],
        },
    );

    programs.insert(
        "jaguar-breath".into(),
        Program {
            id: "jaguar-breath".into(),
            title: "Souffle du Jaguar".into(),
            description: "Un programme centré sur l'explosivité et la coordination pour \
                          les athlètes en devenir."
                .into(),
            duration: 6,
            category: ProgramCategory::Discovery,
            focus: vec!["Explosivité".into(), "Coordination".into(), "Vitesse".into()],
            benefits: vec![
                "Amélioration de la puissance explosive".into(),
                "Meilleure coordination inter-musculaire".into(),
                "Augmentation de la vitesse de réaction".into(),
                "Développement de l'agilité".into(),
            ],
            phases: vec![
                phase(
                    "Activation (Jours 1-2)",
                    "Réveiller les chaînes musculaires avec des exercices de coordination.",
                ),
                phase(
                    "Puissance (Jours 3-4)",
                    "Développer l'explosivité avec des mouvements dynamiques.",
                ),
                phase(
                    "Vitesse (Jours 5-6)",
                    "Affiner la rapidité d'exécution et la précision des mouvements.",
                ),
            ],
        },
    );

    programs.insert(
        "mohero-origin".into(),
        Program {
            id: "mohero-origin".into(),
            title: "Mohero Origin".into(),
            description: "Le programme complet pour transformer votre corps et votre esprit \
                          à travers 42 jours d'entraînement tribal."
                .into(),
            duration: 42,
            category: ProgramCategory::Premium,
            focus: vec![
                "Force".into(),
                "Mobilité".into(),
                "Endurance".into(),
                "Équilibre".into(),
            ],
            benefits: vec![
                "Transformation complète du physique".into(),
                "Développement d'une force fonctionnelle durable".into(),
                "Amélioration drastique de la mobilité et de la posture".into(),
                "Endurance physique et mentale accrue".into(),
                "Connaissance approfondie des mouvements ancestraux".into(),
            ],
            phases: vec![
                phase(
                    "Fondation (Jours 1-10)",
                    "Construire les bases du mouvement fonctionnel et de la respiration.",
                ),
                phase(
                    "Élévation (Jours 11-25)",
                    "Intensifier le travail de force et développer l'endurance musculaire.",
                ),
                phase(
                    "Transformation (Jours 26-35)",
                    "Combiner les acquis en séquences complexes pour une intégration complète.",
                ),
                phase(
                    "Transcendance (Jours 36-42)",
                    "Dépasser ses limites et affiner son corps comme un outil parfait.",
                ),
            ],
        },
    );

    // ========================================================================
    // Daily Rituals (crocodile-tide, days 1-7)
    // ========================================================================

    let pool = exercise_pool();
    let pick = |ids: &[&str]| -> Vec<Exercise> {
        ids.iter().map(|&id| pool[id].clone()).collect()
    };

    let ritual = |id: &str, day: u32, quote: &str, exercises: Vec<Exercise>| DailyRitual {
        id: id.into(),
        program_id: "crocodile-tide".into(),
        day,
        quote: quote.into(),
        exercises,
        is_completed: false,
    };

    let rituals = vec![
        ritual(
            "crocodile-d1",
            1,
            "Le voyage commence par un simple pas. Aujourd'hui, nous réveillons la bête \
             qui sommeille.",
            pick(&["squats", "pushups", "breath"]),
        ),
        ritual(
            "crocodile-d2",
            2,
            "La force vient de la répétition. Chaque mouvement te rapproche de ton but.",
            pick(&["squats", "plank", "breath"]),
        ),
        ritual(
            "crocodile-d3",
            3,
            "Comme l'eau qui sculpte la pierre, ta persévérance façonne ton corps.",
            pick(&["squats", "pushups", "burpees", "breath"]),
        ),
        ritual(
            "crocodile-d4",
            4,
            "L'équilibre entre effort et repos forge les guerriers les plus redoutables.",
            pick(&["lunges", "plank", "breath"]),
        ),
        ritual(
            "crocodile-d5",
            5,
            "Ta sueur d'aujourd'hui est ton armure de demain.",
            pick(&["burpees", "pushups", "squats", "breath"]),
        ),
        ritual(
            "crocodile-d6",
            6,
            "Dans chaque mouvement réside la sagesse de tes ancêtres.",
            pick(&["squats", "pushups", "lunges", "breath"]),
        ),
        ritual(
            "crocodile-d7",
            7,
            "Le dernier jour n'est que le début d'un nouveau cycle. Avance, guerrier.",
            pick(&["burpees", "lunges", "plank", "breath"]),
        ),
    ];

    Catalog { programs, rituals }
}

impl Catalog {
    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, program) in &self.programs {
            if id.is_empty() || program.id.is_empty() {
                errors.push("Program has empty ID".to_string());
            }
            if id != &program.id {
                errors.push(format!(
                    "Program key '{}' doesn't match program.id '{}'",
                    id, program.id
                ));
            }
            if program.title.is_empty() {
                errors.push(format!("Program '{}' has empty title", id));
            }
            if program.duration == 0 {
                errors.push(format!("Program '{}' has zero duration", id));
            }
        }

        let mut seen_days = HashSet::new();
        for ritual in &self.rituals {
            if ritual.id.is_empty() {
                errors.push("Ritual has empty ID".to_string());
            }
            if ritual.day == 0 {
                errors.push(format!("Ritual '{}' has day 0 (days are 1-based)", ritual.id));
            }
            if ritual.exercises.is_empty() {
                errors.push(format!("Ritual '{}' has no exercises", ritual.id));
            }

            // At most one ritual per (program, day)
            if !seen_days.insert((ritual.program_id.clone(), ritual.day)) {
                errors.push(format!(
                    "Duplicate ritual for program '{}' day {}",
                    ritual.program_id, ritual.day
                ));
            }

            match self.programs.get(&ritual.program_id) {
                None => {
                    errors.push(format!(
                        "Ritual '{}' references non-existent program '{}'",
                        ritual.id, ritual.program_id
                    ));
                }
                Some(program) => {
                    if ritual.day > program.duration {
                        errors.push(format!(
                            "Ritual '{}' is day {} but program '{}' lasts {} days",
                            ritual.id, ritual.day, program.id, program.duration
                        ));
                    }
                }
            }

            for ex in &ritual.exercises {
                if ex.id.is_empty() || ex.name.is_empty() {
                    errors.push(format!("Ritual '{}' has an exercise with empty id/name", ritual.id));
                }
                if ex.target_reps == 0 {
                    errors.push(format!(
                        "Ritual '{}': exercise '{}' has zero target reps",
                        ritual.id, ex.id
                    ));
                }
                if ex.completed_reps != 0 {
                    errors.push(format!(
                        "Ritual '{}': exercise '{}' ships with non-zero completed reps",
                        ritual.id, ex.id
                    ));
                }
            }
        }

        // Both tiers should be represented
        let has_discovery = self
            .programs
            .values()
            .any(|p| p.category == ProgramCategory::Discovery);
        let has_premium = self
            .programs
            .values()
            .any(|p| p.category == ProgramCategory::Premium);

        if !has_discovery {
            errors.push("Catalog has no discovery programs".to_string());
        }
        if !has_premium {
            errors.push("Catalog has no premium programs".to_string());
        }

        errors
    }

    /// Rituals belonging to a program, sorted by day
    pub fn rituals_for_program(&self, program_id: &str) -> Vec<&DailyRitual> {
        let mut rituals: Vec<_> = self
            .rituals
            .iter()
            .filter(|r| r.program_id == program_id)
            .collect();
        rituals.sort_by_key(|r| r.day);
        rituals
    }
}
