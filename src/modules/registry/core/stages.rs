// Inspection stage cascade and closed-quantity accounting.
//
// Purpose
// - Compute how many pipes are still available at each inspection stage given the scrap entered
//   so far, and check that every pipe of a batch ends up in exactly one bucket.
//
// Rules
// - Stages run rattling -> external -> hydro (jetting) -> mpi -> drift -> emi -> marking.
// - available(rattling) = batch qty; available(k) = max(0, available(k-1) - scrap(k-1)).
// - A stage's scrap may not exceed its available pool, evaluated against the current scraps.
// - class_1 + class_2 + class_3 + repair + total scrap must equal the batch qty exactly.
// - Violations are errors. Nothing is clamped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Rattling,
    External,
    Hydro,
    Mpi,
    Drift,
    Emi,
    Marking,
}

impl Stage {
    pub const ORDER: [Stage; 7] = [
        Stage::Rattling,
        Stage::External,
        Stage::Hydro,
        Stage::Mpi,
        Stage::Drift,
        Stage::Emi,
        Stage::Marking,
    ];

    pub fn index(&self) -> usize {
        match self {
            Stage::Rattling => 0,
            Stage::External => 1,
            Stage::Hydro => 2,
            Stage::Mpi => 3,
            Stage::Drift => 4,
            Stage::Emi => 5,
            Stage::Marking => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Rattling => "Rattling",
            Stage::External => "External",
            Stage::Hydro => "Hydro",
            Stage::Mpi => "MPI",
            Stage::Drift => "Drift",
            Stage::Emi => "EMI",
            Stage::Marking => "Marking",
        }
    }

    pub fn scrap_column(&self) -> &'static str {
        match self {
            Stage::Rattling => "Rattling Scrap",
            Stage::External => "External Scrap",
            Stage::Hydro => "Hydro Scrap",
            Stage::Mpi => "MPI Scrap",
            Stage::Drift => "Drift Scrap",
            Stage::Emi => "EMI Scrap",
            Stage::Marking => "Marking Scrap",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Scrap quantity per stage, indexed in cascade order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageScraps([u32; 7]);

impl StageScraps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stage: Stage) -> u32 {
        self.0[stage.index()]
    }

    pub fn set(&mut self, stage: Stage, scrap: u32) {
        self.0[stage.index()] = scrap;
    }

    pub fn with(mut self, stage: Stage, scrap: u32) -> Self {
        self.set(stage, scrap);
        self
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|s| u64::from(*s)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageAvailability {
    pub stage: Stage,
    pub available: u32,
    pub scrap: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub class_1: u32,
    pub class_2: u32,
    pub class_3: u32,
    pub repair: u32,
}

impl Classification {
    pub fn total(&self) -> u64 {
        u64::from(self.class_1)
            + u64::from(self.class_2)
            + u64::from(self.class_3)
            + u64::from(self.repair)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("{stage} scrap {scrap} exceeds the {available} pipes available at that stage")]
    ScrapExceedsAvailable {
        stage: Stage,
        scrap: u32,
        available: u32,
    },

    #[error(
        "classes ({classified}) + repair ({repair}) + scrap ({scrapped}) must equal the batch quantity {expected}"
    )]
    AccountingMismatch {
        expected: u32,
        classified: u64,
        repair: u32,
        scrapped: u64,
    },
}

pub fn cascade(total_qty: u32, scraps: &StageScraps) -> Vec<StageAvailability> {
    let mut available = total_qty;
    Stage::ORDER
        .iter()
        .map(|stage| {
            let scrap = scraps.get(*stage);
            let entry = StageAvailability {
                stage: *stage,
                available,
                scrap,
            };
            available = available.saturating_sub(scrap);
            entry
        })
        .collect()
}

pub fn available_at(stage: Stage, total_qty: u32, scraps: &StageScraps) -> u32 {
    Stage::ORDER[..stage.index()]
        .iter()
        .fold(total_qty, |available, earlier| {
            available.saturating_sub(scraps.get(*earlier))
        })
}

/// Checks one stage's scrap against the pool left by the other stages' current scraps.
pub fn validate_stage_scrap(
    stage: Stage,
    scrap: u32,
    total_qty: u32,
    scraps: &StageScraps,
) -> Result<(), QuantityError> {
    let available = available_at(stage, total_qty, scraps);
    if scrap > available {
        return Err(QuantityError::ScrapExceedsAvailable {
            stage,
            scrap,
            available,
        });
    }
    Ok(())
}

pub fn validate_cascade(total_qty: u32, scraps: &StageScraps) -> Result<(), QuantityError> {
    for entry in cascade(total_qty, scraps) {
        if entry.scrap > entry.available {
            return Err(QuantityError::ScrapExceedsAvailable {
                stage: entry.stage,
                scrap: entry.scrap,
                available: entry.available,
            });
        }
    }
    Ok(())
}

pub fn validate_accounting(
    total_qty: u32,
    classification: &Classification,
    scraps: &StageScraps,
) -> Result<(), QuantityError> {
    let scrapped = scraps.total();
    if classification.total() + scrapped != u64::from(total_qty) {
        return Err(QuantityError::AccountingMismatch {
            expected: total_qty,
            classified: classification.total() - u64::from(classification.repair),
            repair: classification.repair,
            scrapped,
        });
    }
    Ok(())
}
