//! Aggregation and reporting engine.
//!
//! Every figure is recomputed from the full submission collection on each
//! call; nothing is cached. The [`Aggregator`] borrows the collection and is
//! a pure function of it and of the selected [`MissingRatings`] policy.

pub mod demo;
pub mod insights;
pub mod render;

use serde::{Deserialize, Serialize};

use crate::survey::{ClimateItem, Sector, Skill, Submission, NEUTRAL_SCORE, SCALE_MAX, SCALE_MIN};

pub use insights::{recommendation_for, Insights, GENERIC_RECOMMENDATION};

/// How a skill that a submission did not rate (or rated with an unmapped
/// value) enters an average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRatings {
    /// Leave it out of both numerator and denominator.
    #[default]
    Exclude,
    /// Count it as the neutral score (3).
    Neutral,
}

/// Average of one skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAverage {
    /// The skill.
    pub skill: Skill,
    /// Mean score, 0 when no score contributed.
    pub average: f64,
    /// Number of scores that contributed.
    pub count: usize,
}

/// Submission count and average of one sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorSummary {
    /// The sector.
    pub sector: Sector,
    /// Number of submissions from the sector.
    pub count: usize,
    /// Mean of every skill score of those submissions, 0 when there are none.
    pub average: f64,
}

impl SectorSummary {
    /// The average formatted with one decimal, e.g. `"4.3"`.
    #[must_use]
    pub fn formatted_average(&self) -> String {
        format!("{:.1}", self.average)
    }
}

/// Counts of ratings per bucket of the 1-5 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Distribution(pub [usize; 5]);

impl Distribution {
    /// Count for one bucket; 0 for values outside 1-5.
    #[must_use]
    pub fn count(&self, bucket: u8) -> usize {
        if (SCALE_MIN..=SCALE_MAX).contains(&bucket) {
            self.0[usize::from(bucket - SCALE_MIN)]
        } else {
            0
        }
    }

    /// Number of counted ratings.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Summary statistics for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    /// Number of submissions.
    pub total_evaluations: usize,
    /// Mean of every skill score of every submission.
    pub overall_average: f64,
    /// Per-skill averages, in skill enumeration order.
    pub skill_averages: Vec<SkillAverage>,
    /// Per-sector summaries, ranked by average.
    pub sector_averages: Vec<SectorSummary>,
    /// Distribution of the overall-satisfaction climate item.
    pub satisfaction_distribution: Distribution,
    /// Derived highlights and recommendation.
    pub insights: Insights,
    /// Whether this is the placeholder report shown when there is no data.
    pub is_demo: bool,
}

/// Count scores per bucket of the 1-5 scale; values off the scale are skipped.
pub fn distribution(scores: impl IntoIterator<Item = u8>) -> Distribution {
    let mut counts = [0usize; 5];
    for score in scores
        .into_iter()
        .filter(|s| (SCALE_MIN..=SCALE_MAX).contains(s))
    {
        counts[usize::from(score - SCALE_MIN)] += 1;
    }
    Distribution(counts)
}

/// Sort descending by average. Stable: ties keep their input order.
pub fn rank_descending(skills: &[SkillAverage]) -> Vec<SkillAverage> {
    let mut ranked = skills.to_vec();
    ranked.sort_by(|a, b| b.average.total_cmp(&a.average));
    ranked
}

/// Sort ascending by average. Stable: ties keep their input order.
pub fn rank_ascending(skills: &[SkillAverage]) -> Vec<SkillAverage> {
    let mut ranked = skills.to_vec();
    ranked.sort_by(|a, b| a.average.total_cmp(&b.average));
    ranked
}

/// Sort sectors descending by average. Stable: ties keep their input order.
pub fn rank_sectors(sectors: &[SectorSummary]) -> Vec<SectorSummary> {
    let mut ranked = sectors.to_vec();
    ranked.sort_by(|a, b| b.average.total_cmp(&a.average));
    ranked
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Computes report figures over a borrowed submission collection.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    submissions: &'a [Submission],
    missing: MissingRatings,
}

impl<'a> Aggregator<'a> {
    /// Aggregate `submissions`, excluding missing ratings from averages.
    #[must_use]
    pub fn new(submissions: &'a [Submission]) -> Self {
        Self {
            submissions,
            missing: MissingRatings::Exclude,
        }
    }

    /// Select how missing ratings enter averages.
    #[must_use]
    pub fn with_missing_ratings(mut self, missing: MissingRatings) -> Self {
        self.missing = missing;
        self
    }

    /// The policy in effect.
    #[must_use]
    pub fn missing_ratings(&self) -> MissingRatings {
        self.missing
    }

    /// Number of submissions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.submissions.len()
    }

    fn score_of(&self, submission: &Submission, skill: Skill) -> Option<f64> {
        match (submission.skill_score(skill), self.missing) {
            (Some(score), _) => Some(f64::from(score)),
            (None, MissingRatings::Neutral) => Some(f64::from(NEUTRAL_SCORE)),
            (None, MissingRatings::Exclude) => None,
        }
    }

    fn skill_scores(&self, skill: Skill) -> Vec<f64> {
        self.submissions
            .iter()
            .filter_map(|s| self.score_of(s, skill))
            .collect()
    }

    fn all_scores<'s>(&self, submissions: impl Iterator<Item = &'s Submission>) -> Vec<f64> {
        submissions
            .flat_map(move |s| Skill::ALL.into_iter().filter_map(move |skill| self.score_of(s, skill)))
            .collect()
    }

    /// Mean score of one skill across submissions; 0 if no score contributes.
    #[must_use]
    pub fn average_for_skill(&self, skill: Skill) -> f64 {
        mean(&self.skill_scores(skill))
    }

    /// Average and contributing count of every skill, in enumeration order.
    #[must_use]
    pub fn skill_averages(&self) -> Vec<SkillAverage> {
        Skill::ALL
            .into_iter()
            .map(|skill| {
                let scores = self.skill_scores(skill);
                SkillAverage {
                    skill,
                    average: mean(&scores),
                    count: scores.len(),
                }
            })
            .collect()
    }

    /// Per-skill series for the dashboard chart.
    ///
    /// The chart always counts missing ratings as neutral so that every bar
    /// has a value, independent of the policy used for the summary figures.
    #[must_use]
    pub fn chart_series(&self) -> Vec<SkillAverage> {
        self.with_missing_ratings(MissingRatings::Neutral)
            .skill_averages()
    }

    /// Count and average of one sector.
    #[must_use]
    pub fn sector_summary(&self, sector: Sector) -> SectorSummary {
        let members = || self.submissions.iter().filter(move |s| s.sector == sector);
        SectorSummary {
            sector,
            count: members().count(),
            average: mean(&self.all_scores(members())),
        }
    }

    /// Average of one sector formatted with one decimal; `"0.0"` when the
    /// sector has no submissions.
    #[must_use]
    pub fn average_for_sector(&self, sector: Sector) -> String {
        self.sector_summary(sector).formatted_average()
    }

    /// Every sector, best average first; ties keep enumeration order.
    #[must_use]
    pub fn rank_sectors_by_average(&self) -> Vec<SectorSummary> {
        let summaries: Vec<SectorSummary> = Sector::ALL
            .into_iter()
            .map(|sector| self.sector_summary(sector))
            .collect();
        rank_sectors(&summaries)
    }

    /// The `n` best-rated skills. Skills nobody rated are left out.
    #[must_use]
    pub fn top_skills(&self, n: usize) -> Vec<SkillAverage> {
        rank_descending(&self.rated_skills()).into_iter().take(n).collect()
    }

    /// The `n` worst-rated skills. Skills nobody rated are left out.
    #[must_use]
    pub fn bottom_skills(&self, n: usize) -> Vec<SkillAverage> {
        rank_ascending(&self.rated_skills()).into_iter().take(n).collect()
    }

    fn rated_skills(&self) -> Vec<SkillAverage> {
        self.skill_averages()
            .into_iter()
            .filter(|s| s.count > 0)
            .collect()
    }

    /// Mean of every skill score of every submission.
    #[must_use]
    pub fn overall_average(&self) -> f64 {
        mean(&self.all_scores(self.submissions.iter()))
    }

    /// Distribution of one climate item across submissions.
    #[must_use]
    pub fn climate_distribution(&self, item: ClimateItem) -> Distribution {
        distribution(self.submissions.iter().filter_map(|s| s.climate_score(item)))
    }

    /// Highlights and recommendation, with `n` strengths and attention items.
    #[must_use]
    pub fn insights(&self, n: usize) -> Insights {
        Insights::derive(
            &self.rated_skills(),
            &self.rank_sectors_by_average(),
            n,
        )
    }

    /// Compute the report from the submissions as they are.
    ///
    /// An empty collection yields zeros everywhere.
    #[must_use]
    pub fn summarize(&self, top_n: usize) -> AggregateReport {
        AggregateReport {
            total_evaluations: self.total(),
            overall_average: self.overall_average(),
            skill_averages: self.skill_averages(),
            sector_averages: self.rank_sectors_by_average(),
            satisfaction_distribution: self.climate_distribution(ClimateItem::SatisfacaoGeral),
            insights: self.insights(top_n),
            is_demo: false,
        }
    }

    /// Compute the report, substituting the demo report when there are no
    /// submissions so the dashboard always has something to show.
    #[must_use]
    pub fn report(&self, top_n: usize) -> AggregateReport {
        if self.submissions.is_empty() {
            demo::fallback_report(top_n)
        } else {
            self.summarize(top_n)
        }
    }
}
