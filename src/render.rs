//! Plain-text rendering of the catalog and of mix outcomes for the CLI.

use crate::catalog::Catalog;
use crate::models::{Outcome, Phase, ReactionRule};

const SOLID: char = '■';
const LIQUID: char = '≈';
const GAS: char = '○';
const HAZARD: char = '⚠';
const BENIGN: char = '✓';

/// Get the marker for a reagent phase.
fn phase_symbol(phase: Phase) -> char {
    match phase {
        Phase::Solid => SOLID,
        Phase::Liquid => LIQUID,
        Phase::Gas => GAS,
    }
}

/// Render the catalog as two sections, reagents then reactions.
///
/// Example output:
/// ```text
/// Reagents
/// ├── ≈ h2o  Water (H₂O)
/// └── ■ na  Sodium (Na)
/// Reactions
/// └── ⚠ h2o + na → Sodium Hydroxide Solution [quiz]
/// ```
pub fn render_catalog(catalog: &Catalog) -> String {
    let mut output = String::from("Reagents\n");
    let reagents = catalog.reagents();
    for (i, reagent) in reagents.iter().enumerate() {
        output.push_str(branch(i, reagents.len()));
        output.push(phase_symbol(reagent.phase));
        output.push_str(&format!(
            " {}  {} ({})\n",
            reagent.id, reagent.name, reagent.formula
        ));
    }

    output.push_str("Reactions\n");
    let rules = catalog.rules();
    for (i, rule) in rules.iter().enumerate() {
        output.push_str(branch(i, rules.len()));
        output.push_str(&render_rule(rule));
        output.push('\n');
    }
    output
}

fn branch(index: usize, len: usize) -> &'static str {
    if index + 1 == len {
        "└── "
    } else {
        "├── "
    }
}

fn render_rule(rule: &ReactionRule) -> String {
    let symbol = if rule.hazardous { HAZARD } else { BENIGN };
    let mut reagents = rule.reagents.clone();
    reagents.sort();
    let mut line = format!("{} {} → {}", symbol, reagents.join(" + "), rule.product.name);
    if rule.quiz.is_some() {
        line.push_str(" [quiz]");
    }
    line
}

/// One-line description of a mix outcome.
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::NothingToMix => "Nothing to mix: the vessel is empty".to_string(),
        Outcome::NoReaction => "No reaction".to_string(),
        Outcome::Reaction { product } => {
            format!("{} {} ({})", BENIGN, product.name, product.color)
        }
        Outcome::Hazard { product, quiz } => {
            let mut line = format!("{} Hazard! {} ({})", HAZARD, product.name, product.color);
            if let Some(quiz) = quiz {
                line.push_str(&format!("\n  Quiz: {}", quiz.question));
                for option in &quiz.options {
                    line.push_str(&format!("\n    - {}", option));
                }
            }
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hsla, Product, Reagent};

    fn reagent(id: &str, name: &str, formula: &str, phase: Phase) -> Reagent {
        Reagent {
            id: id.to_string(),
            name: name.to_string(),
            formula: formula.to_string(),
            phase,
            color: Hsla::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    #[test]
    fn test_catalog_tree() {
        let catalog = Catalog::new(
            vec![
                reagent("h2o", "Water", "H₂O", Phase::Liquid),
                reagent("na", "Sodium", "Na", Phase::Solid),
            ],
            vec![ReactionRule {
                reagents: vec!["na".to_string(), "h2o".to_string()],
                hazardous: true,
                product: Product {
                    name: "Sodium Hydroxide Solution".to_string(),
                    color: Hsla::new(200.0, 80.0, 70.0, 0.5),
                },
                quiz: None,
            }],
        )
        .unwrap();

        let expected = "Reagents\n├── ≈ h2o  Water (H₂O)\n└── ■ na  Sodium (Na)\nReactions\n└── ⚠ h2o + na → Sodium Hydroxide Solution\n";
        assert_eq!(render_catalog(&catalog), expected);
    }

    #[test]
    fn test_benign_outcome() {
        let outcome = Outcome::Reaction {
            product: Product {
                name: "Zinc Chloride".to_string(),
                color: Hsla::new(220.0, 10.0, 75.0, 0.5),
            },
        };
        assert_eq!(
            render_outcome(&outcome),
            "✓ Zinc Chloride (hsla(220, 10%, 75%, 0.5))"
        );
    }

    #[test]
    fn test_no_reaction() {
        assert_eq!(render_outcome(&Outcome::NoReaction), "No reaction");
    }
}
