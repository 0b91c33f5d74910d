//! Reagent catalog and reaction rule table.
//!
//! Both are loaded once, validated up front and never mutated afterwards.
//! A bundled default ships with the crate; deployments may point at their own
//! JSON file with the same shape.

mod error;
pub mod matching;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use error::CatalogError;

use crate::lab::ReagentSet;
use crate::models::{ExtractedChemical, ExtractionSummary, ReactionRule, Reagent};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// On-disk catalog layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub reagents: Vec<Reagent>,
    #[serde(default)]
    pub reactions: Vec<ReactionRule>,
}

#[derive(Debug)]
pub struct Catalog {
    reagents: Vec<Reagent>,
    rules: Vec<ReactionRule>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_formula: HashMap<String, usize>,
    rule_index: HashMap<ReagentSet, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids, ambiguous rules and malformed quizzes.
    pub fn new(reagents: Vec<Reagent>, rules: Vec<ReactionRule>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        let mut by_formula = HashMap::new();

        for (i, reagent) in reagents.iter().enumerate() {
            if reagent.id.trim().is_empty() {
                return Err(CatalogError::EmptyReagentId(i));
            }
            if by_id.insert(reagent.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateReagent(reagent.id.clone()));
            }
            // First entry wins for display lookups; ids stay authoritative.
            by_name
                .entry(matching::name_key(&reagent.name))
                .or_insert(i);
            by_formula
                .entry(matching::formula_key(&reagent.formula))
                .or_insert(i);
        }

        let mut rule_index = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            let set: ReagentSet = rule.reagents.iter().map(String::as_str).collect();
            if set.is_empty() {
                return Err(CatalogError::EmptyReaction(i));
            }

            if let Some(quiz) = &rule.quiz {
                if quiz.options.is_empty() {
                    return Err(CatalogError::QuizWithoutOptions(i));
                }
                if !quiz.options.contains(&quiz.correct_answer) {
                    return Err(CatalogError::QuizAnswerNotAnOption {
                        index: i,
                        answer: quiz.correct_answer.clone(),
                    });
                }
                if !rule.hazardous {
                    tracing::warn!(
                        "Reaction #{} has a quiz but is not hazardous; the quiz will never be shown",
                        i
                    );
                }
            }

            for id in set.iter().filter(|id| !by_id.contains_key(*id)) {
                tracing::warn!("Reaction #{} references reagent {:?} missing from the catalog", i, id);
            }

            let reagents = set.to_string();
            if let Some(first) = rule_index.insert(set, i) {
                return Err(CatalogError::DuplicateReaction {
                    first,
                    second: i,
                    reagents,
                });
            }
        }

        tracing::debug!(
            "Catalog loaded: {} reagents, {} reactions",
            reagents.len(),
            rules.len()
        );

        Ok(Self {
            reagents,
            rules,
            by_id,
            by_name,
            by_formula,
            rule_index,
        })
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.reagents, file.reactions)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from `path` when given, otherwise fall back to the bundled catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                tracing::info!("Loading catalog from {}", path.display());
                Self::load(path)
            }
            None => Self::builtin(),
        }
    }

    pub fn reagents(&self) -> &[Reagent] {
        &self.reagents
    }

    pub fn rules(&self) -> &[ReactionRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&Reagent> {
        self.by_id.get(id).map(|&i| &self.reagents[i])
    }

    /// Find a reagent by id, then by name (case-insensitive), then by formula.
    pub fn lookup(&self, id_or_name: &str) -> Option<&Reagent> {
        let query = id_or_name.trim();
        self.get(query)
            .or_else(|| self.by_name.get(&matching::name_key(query)).map(|&i| &self.reagents[i]))
            .or_else(|| {
                self.by_formula
                    .get(&matching::formula_key(query))
                    .map(|&i| &self.reagents[i])
            })
    }

    /// Best-effort match of an extracted record: name first, then formula.
    pub fn match_extracted(&self, chemical: &ExtractedChemical) -> Option<&Reagent> {
        self.by_name
            .get(&matching::name_key(&chemical.name))
            .or_else(|| self.by_formula.get(&matching::formula_key(&chemical.formula)))
            .map(|&i| &self.reagents[i])
            .or_else(|| self.get(chemical.name.trim()))
    }

    /// Split extracted records into known catalog reagents and unknown leftovers.
    pub fn summarize_extraction(&self, chemicals: &[ExtractedChemical]) -> ExtractionSummary {
        let mut summary = ExtractionSummary::default();
        for chemical in chemicals {
            match self.match_extracted(chemical) {
                Some(reagent) => {
                    if !summary.available.iter().any(|r| r.id == reagent.id) {
                        summary.available.push(reagent.clone());
                    }
                }
                None => summary.unmatched.push(chemical.clone()),
            }
        }
        summary
    }

    pub fn rule_for(&self, set: &ReagentSet) -> Option<&ReactionRule> {
        self.rule_index.get(set).map(|&i| &self.rules[i])
    }
}
