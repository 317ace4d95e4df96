//! Jury score criteria and per-submission aggregation.
//!
//! Each juror rates an artwork on four criteria, each an integer in
//! `MIN_CRITERION..=MAX_CRITERION`. The total is always recomputed from the
//! criteria and never accepted from the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_CRITERION: i32 = 1;
pub const MAX_CRITERION: i32 = 10;

/// The four rated criteria of a single jury score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Criteria {
    #[schema(example = 7)]
    pub creativity: i32,
    #[schema(example = 8)]
    pub technique: i32,
    #[schema(example = 6)]
    pub concept: i32,
    #[schema(example = 9)]
    pub presentation: i32,
}

/// A criterion value outside the accepted range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaError {
    pub criterion: &'static str,
    pub value: i32,
}

impl fmt::Display for CriteriaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must be between {MIN_CRITERION} and {MAX_CRITERION}, got {}",
            self.criterion, self.value
        )
    }
}

impl std::error::Error for CriteriaError {}

impl Criteria {
    fn named(&self) -> [(&'static str, i32); 4] {
        [
            ("creativity", self.creativity),
            ("technique", self.technique),
            ("concept", self.concept),
            ("presentation", self.presentation),
        ]
    }

    /// Reject the whole score if any criterion is out of range.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        match self
            .named()
            .into_iter()
            .find(|(_, v)| !(MIN_CRITERION..=MAX_CRITERION).contains(v))
        {
            Some((criterion, value)) => Err(CriteriaError { criterion, value }),
            None => Ok(()),
        }
    }

    /// Sum of the four criteria, in `4..=40` for valid criteria.
    pub fn total(&self) -> i32 {
        self.creativity + self.technique + self.concept + self.presentation
    }
}

/// Mean of every criterion and of the total across all scores of a submission.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ScoreSummary {
    /// Number of jurors who scored the submission.
    #[schema(example = 2)]
    pub count: u32,
    pub creativity: f64,
    pub technique: f64,
    pub concept: f64,
    pub presentation: f64,
    /// Mean total across jurors.
    #[schema(example = 36.0)]
    pub total: f64,
}

impl ScoreSummary {
    /// Aggregate a set of scores. Unscored submissions have no summary.
    pub fn from_scores<'a, I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Criteria>,
    {
        let mut count = 0u32;
        let mut sums = [0i64; 5];
        for c in scores {
            count += 1;
            sums[0] += i64::from(c.creativity);
            sums[1] += i64::from(c.technique);
            sums[2] += i64::from(c.concept);
            sums[3] += i64::from(c.presentation);
            sums[4] += i64::from(c.total());
        }
        if count == 0 {
            return None;
        }
        let mean = |sum: i64| sum as f64 / f64::from(count);
        Some(Self {
            count,
            creativity: mean(sums[0]),
            technique: mean(sums[1]),
            concept: mean(sums[2]),
            presentation: mean(sums[3]),
            total: mean(sums[4]),
        })
    }
}

/// Mean of the per-submission average totals, ignoring unscored submissions.
pub fn overall_average<'a, I>(summaries: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<&'a ScoreSummary>>,
{
    let totals: Vec<f64> = summaries.into_iter().flatten().map(|s| s.total).collect();
    if totals.is_empty() {
        None
    } else {
        Some(totals.iter().sum::<f64>() / totals.len() as f64)
    }
}
