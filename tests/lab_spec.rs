use std::sync::Arc;

use speculate2::speculate;
use valence_lab::catalog::Catalog;
use valence_lab::lab::*;
use valence_lab::models::*;

fn stage(mixture: &mut Mixture, resolver: &Resolver, id: &str) -> AddResult {
    let reagent = resolver
        .catalog()
        .get(id)
        .unwrap_or_else(|| panic!("{} missing from catalog", id))
        .clone();
    mixture.add(&reagent).expect("Failed to stage reagent")
}

fn staged_pairs(mixture: &Mixture) -> Vec<(String, f64)> {
    mixture
        .staged()
        .iter()
        .map(|s| (s.reagent.id.clone(), s.quantity))
        .collect()
}

speculate! {
    before {
        let resolver = Resolver::new(Arc::new(Catalog::builtin().expect("Bundled catalog is invalid")));
        let mut mixture = Mixture::new();
    }

    describe "scenarios" {
        it "sodium and water is hazardous with a hydrogen quiz" {
            stage(&mut mixture, &resolver, "na");
            stage(&mut mixture, &resolver, "h2o");

            let outcome = mixture.mix(&resolver).expect("Mix failed");
            assert!(outcome.is_hazardous());
            assert_eq!(outcome.product().unwrap().name, "Sodium Hydroxide Solution");
            assert_eq!(outcome.quiz().unwrap().correct_answer, "Hydrogen");
            assert_eq!(mixture.phase(), MixturePhase::Hazard);
        }

        it "baking soda and vinegar fizz without a quiz" {
            stage(&mut mixture, &resolver, "baking_soda");
            stage(&mut mixture, &resolver, "vinegar");

            let outcome = mixture.mix(&resolver).expect("Mix failed");
            assert_eq!(outcome.kind(), OutcomeKind::Reaction);
            assert_eq!(outcome.product().unwrap().name, "Fizz (CO₂ and Water)");
            assert!(outcome.quiz().is_none());
            assert_eq!(mixture.phase(), MixturePhase::Reacted);
        }

        it "gold alone does not react and stays staging" {
            stage(&mut mixture, &resolver, "au");

            let outcome = mixture.mix(&resolver).expect("Mix failed");
            assert_eq!(outcome, Outcome::NoReaction);
            assert_eq!(mixture.phase(), MixturePhase::Staging);
            assert!(mixture.resulting_product().is_none());
        }

        it "an empty vessel has nothing to mix" {
            let generation = mixture.generation();

            let outcome = mixture.mix(&resolver).expect("Mix failed");
            assert_eq!(outcome, Outcome::NothingToMix);
            assert_eq!(mixture.phase(), MixturePhase::Empty);
            assert_eq!(mixture.generation(), generation);
            assert!(mixture.resolved_reaction().is_none());
            assert!(!mixture
                .drain_events()
                .iter()
                .any(|e| matches!(e, LabEvent::Hazard { .. })));
        }

        it "zinc and hydrochloric acid make zinc chloride" {
            stage(&mut mixture, &resolver, "zn");
            stage(&mut mixture, &resolver, "hcl");

            let outcome = mixture.mix(&resolver).expect("Mix failed");
            assert_eq!(outcome.kind(), OutcomeKind::Reaction);
            assert_eq!(mixture.resulting_product(), Some("Zinc Chloride"));
        }

        it "a single reagent never matches a multi-reagent rule" {
            stage(&mut mixture, &resolver, "na");
            assert_eq!(mixture.mix(&resolver).expect("Mix failed"), Outcome::NoReaction);
        }
    }

    describe "staging" {
        it "starts empty" {
            assert_eq!(mixture.phase(), MixturePhase::Empty);
            assert!(mixture.staged().is_empty());
        }

        it "adds reagents in insertion order at the default quantity" {
            stage(&mut mixture, &resolver, "vinegar");
            stage(&mut mixture, &resolver, "baking_soda");

            assert_eq!(
                staged_pairs(&mixture),
                vec![
                    ("vinegar".to_string(), DEFAULT_QUANTITY),
                    ("baking_soda".to_string(), DEFAULT_QUANTITY),
                ]
            );
            assert_eq!(mixture.phase(), MixturePhase::Staging);
        }

        it "treats a duplicate add as a no-op with a notice" {
            stage(&mut mixture, &resolver, "h2o");
            mixture.set_quantity("h2o", 400.0).expect("Failed to set quantity");
            mixture.drain_events();

            assert_eq!(stage(&mut mixture, &resolver, "h2o"), AddResult::AlreadyStaged);
            assert_eq!(staged_pairs(&mixture), vec![("h2o".to_string(), 400.0)]);

            let events = mixture.drain_events();
            assert!(matches!(
                events.as_slice(),
                [LabEvent::Notice { level: NoticeLevel::Info, .. }]
            ));
        }

        it "restores the previous contents after add then remove" {
            stage(&mut mixture, &resolver, "zn");
            mixture.set_quantity("zn", 320.0).expect("Failed to set quantity");
            let before = staged_pairs(&mixture);

            stage(&mut mixture, &resolver, "cu");
            mixture.remove("cu").expect("Failed to remove");

            assert_eq!(staged_pairs(&mixture), before);
        }

        it "rejects removing a reagent that is not staged" {
            let err = mixture.remove("au").unwrap_err();
            assert!(matches!(err, LabError::NotStaged(id) if id == "au"));
        }

        it "clamps quantities to the minimum bound" {
            stage(&mut mixture, &resolver, "h2o");

            assert_eq!(mixture.set_quantity("h2o", 0.0).unwrap(), MIN_QUANTITY);
            assert_eq!(mixture.set_quantity("h2o", -250.0).unwrap(), MIN_QUANTITY);
            assert_eq!(mixture.quantity("h2o"), Some(MIN_QUANTITY));
        }

        it "forgets a no-reaction outcome once the vessel changes" {
            stage(&mut mixture, &resolver, "au");
            mixture.mix(&resolver).expect("Mix failed");
            assert_eq!(mixture.snapshot().outcome.map(|o| o.kind), Some(OutcomeKind::NoReaction));

            stage(&mut mixture, &resolver, "ag");
            assert!(mixture.snapshot().outcome.is_none());

            mixture.mix(&resolver).expect("Mix failed");
            mixture.remove("au").expect("Failed to remove");
            mixture.remove("ag").expect("Failed to remove");
            let snapshot = mixture.snapshot();
            assert_eq!(snapshot.phase, MixturePhase::Empty);
            assert!(snapshot.outcome.is_none());
        }

        it "forgets a nothing-to-mix outcome after the next add" {
            mixture.mix(&resolver).expect("Mix failed");
            assert!(mixture.outcome().is_some());

            stage(&mut mixture, &resolver, "h2o");
            assert!(mixture.outcome().is_none());
        }

        it "clamps quantities to the maximum bound" {
            stage(&mut mixture, &resolver, "h2o");
            assert_eq!(mixture.set_quantity("h2o", 5000.0).unwrap(), MAX_QUANTITY);
        }
    }

    describe "hazard and quiz flow" {
        before {
            stage(&mut mixture, &resolver, "na");
            stage(&mut mixture, &resolver, "h2o");
            mixture.mix(&resolver).expect("Mix failed");
        }

        it "reveals the quiz for the current generation" {
            let prompt = mixture.reveal_quiz(mixture.generation()).expect("No quiz revealed");
            assert_eq!(prompt.options, vec!["Oxygen", "Hydrogen", "Nitrogen", "Chlorine"]);
            assert_eq!(mixture.phase(), MixturePhase::QuizPending);
        }

        it "suppresses a reveal scheduled before a reset" {
            let generation = mixture.generation();
            mixture.reset();

            assert!(mixture.reveal_quiz(generation).is_none());
            assert_eq!(mixture.phase(), MixturePhase::Empty);
        }

        it "blocks vessel changes while the quiz is outstanding" {
            assert!(matches!(mixture.remove("na"), Err(LabError::QuizInProgress)));
            assert!(matches!(mixture.mix(&resolver), Err(LabError::QuizInProgress)));
        }

        it "rejects an answer before the quiz is shown" {
            assert!(matches!(
                mixture.submit_quiz_answer("Hydrogen"),
                Err(LabError::NoQuizPending)
            ));
        }

        it "accepts a correct answer" {
            mixture.reveal_quiz(mixture.generation());
            let verdict = mixture.submit_quiz_answer("Hydrogen").expect("Answer rejected");

            assert!(verdict.correct);
            assert_eq!(mixture.phase(), MixturePhase::QuizAnswered);
        }

        it "accepts an incorrect answer and reports the right one" {
            mixture.reveal_quiz(mixture.generation());
            let verdict = mixture.submit_quiz_answer("Oxygen").expect("Answer rejected");

            assert!(!verdict.correct);
            assert_eq!(verdict.correct_answer, "Hydrogen");
            assert_eq!(mixture.phase(), MixturePhase::QuizAnswered);
        }

        it "resets fully after acknowledgement" {
            mixture.reveal_quiz(mixture.generation());
            mixture.submit_quiz_answer("Hydrogen").expect("Answer rejected");

            assert!(mixture.acknowledge_if_current(mixture.generation()));
            assert_eq!(mixture.phase(), MixturePhase::Empty);
            assert!(mixture.staged().is_empty());
            assert!(mixture.resolved_reaction().is_none());
        }

        it "emits hazard, prompt and result events in order" {
            mixture.reveal_quiz(mixture.generation());
            mixture.submit_quiz_answer("Nitrogen").expect("Answer rejected");

            let events = mixture.drain_events();
            let kinds: Vec<_> = events
                .iter()
                .filter(|e| !matches!(e, LabEvent::Notice { .. }))
                .collect();
            assert!(matches!(kinds[0], LabEvent::Hazard { .. }));
            assert!(matches!(kinds[1], LabEvent::QuizPrompt { .. }));
            assert!(matches!(kinds[2], LabEvent::QuizResult { correct: false, .. }));
        }
    }

    describe "reset" {
        it "is idempotent on an empty vessel" {
            mixture.reset();
            mixture.reset();

            assert_eq!(mixture.phase(), MixturePhase::Empty);
            assert!(mixture.staged().is_empty());
            assert!(mixture.resolved_reaction().is_none());
            assert!(mixture.outcome().is_none());
        }

        it "discards a resolved reaction" {
            stage(&mut mixture, &resolver, "na");
            stage(&mut mixture, &resolver, "cl");
            mixture.mix(&resolver).expect("Mix failed");
            assert_eq!(mixture.resulting_product(), Some("Salt Water"));

            mixture.reset();
            assert!(mixture.resulting_product().is_none());
            assert_eq!(mixture.snapshot().visuals.fill_percent, 0.0);
        }
    }

    describe "snapshot visuals" {
        it "blends only liquids and counts solid particles" {
            stage(&mut mixture, &resolver, "h2o");
            stage(&mut mixture, &resolver, "na");
            mixture.set_quantity("na", 250.0).expect("Failed to set quantity");

            let visuals = mixture.snapshot().visuals;
            let water = resolver.catalog().get("h2o").unwrap().color;
            assert_eq!((visuals.liquid_color.h, visuals.liquid_color.s), (water.h, water.s));
            assert_eq!(visuals.fill_percent, 35.0);
            assert_eq!(visuals.particles.len(), 3);
        }

        it "shows the product color at full fill once resolved" {
            stage(&mut mixture, &resolver, "zn");
            stage(&mut mixture, &resolver, "hcl");
            mixture.mix(&resolver).expect("Mix failed");

            let snapshot = mixture.snapshot();
            let product = &resolver
                .find_rule(&["zn", "hcl"].into_iter().collect())
                .unwrap()
                .product;
            assert_eq!(snapshot.visuals.liquid_color, product.color);
            assert_eq!(snapshot.visuals.fill_percent, 100.0);
            assert!(snapshot.visuals.particles.is_empty());
        }
    }
}
