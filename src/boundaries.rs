use anyhow::{Result, anyhow};

use crate::model::AffinityRecord;

/// Affinity range observed across a whole roster. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffinityBoundaries {
    pub min: f64,
    pub max: f64,
}

/// Which records take part in the roster-wide range. The aggregator itself
/// never filters; this is applied by the caller before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    #[default]
    AllRecords,
    ExcludeEmptyLibraries,
}

impl BoundaryPolicy {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(Self::AllRecords),
            "exclude-empty" | "exclude_empty" => Ok(Self::ExcludeEmptyLibraries),
            other => Err(anyhow!("unknown boundary policy {other}")),
        }
    }

    pub fn includes(self, record: &AffinityRecord) -> bool {
        match self {
            Self::AllRecords => true,
            Self::ExcludeEmptyLibraries => record.has_library(),
        }
    }
}

/// Single pass min/max over `affinity`. `None` when there are no records, so
/// callers cannot normalize against an undefined range.
pub fn compute_boundaries<'a, I>(records: I) -> Option<AffinityBoundaries>
where
    I: IntoIterator<Item = &'a AffinityRecord>,
{
    records.into_iter().fold(None, |acc, record| {
        let value = record.affinity;
        Some(match acc {
            None => AffinityBoundaries {
                min: value,
                max: value,
            },
            Some(b) => AffinityBoundaries {
                min: b.min.min(value),
                max: b.max.max(value),
            },
        })
    })
}

pub fn compute_boundaries_with_policy(
    records: &[AffinityRecord],
    policy: BoundaryPolicy,
) -> Option<AffinityBoundaries> {
    compute_boundaries(records.iter().filter(|r| policy.includes(r)))
}
