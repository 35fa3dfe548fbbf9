//! The placeholder report shown when no submission has been stored yet.
//!
//! These are fixed sentinel figures, not derived from any data. They keep the
//! dashboard renderable on a fresh install and are flagged with
//! [`AggregateReport::is_demo`].

use super::{rank_sectors, AggregateReport, Distribution, Insights, SectorSummary, SkillAverage};
use crate::survey::{Sector, Skill};

/// Number of evaluations the demo report claims.
pub const DEMO_TOTAL_EVALUATIONS: usize = 47;

/// Overall average of the demo report.
pub const DEMO_OVERALL_AVERAGE: f64 = 4.2;

/// Per-skill averages of the demo report, in enumeration order.
pub const DEMO_SKILL_AVERAGES: [(Skill, f64); 8] = [
    (Skill::ConhecimentoTecnico, 4.4),
    (Skill::Organizacao, 4.1),
    (Skill::Produtividade, 4.3),
    (Skill::QualidadeEntregas, 4.5),
    (Skill::Comunicacao, 3.9),
    (Skill::TrabalhoEquipe, 4.6),
    (Skill::Proatividade, 4.0),
    (Skill::GestaoTempo, 3.8),
];

/// Per-sector submission counts and averages of the demo report.
pub const DEMO_SECTORS: [(Sector, usize, f64); 6] = [
    (Sector::Contabil, 12, 4.3),
    (Sector::Fiscal, 9, 4.1),
    (Sector::Tributario, 8, 4.5),
    (Sector::DepartamentoPessoal, 7, 3.9),
    (Sector::Societario, 6, 4.2),
    (Sector::Administrativo, 5, 4.0),
];

/// Satisfaction distribution of the demo report, buckets 1 through 5.
pub const DEMO_SATISFACTION: [usize; 5] = [1, 3, 8, 20, 15];

/// Build the demo report. `top_n` bounds the insight lists.
#[must_use]
pub fn fallback_report(top_n: usize) -> AggregateReport {
    let skill_averages: Vec<SkillAverage> = DEMO_SKILL_AVERAGES
        .iter()
        .map(|&(skill, average)| SkillAverage {
            skill,
            average,
            count: DEMO_TOTAL_EVALUATIONS,
        })
        .collect();

    let sectors: Vec<SectorSummary> = DEMO_SECTORS
        .iter()
        .map(|&(sector, count, average)| SectorSummary {
            sector,
            count,
            average,
        })
        .collect();
    let sector_averages = rank_sectors(&sectors);

    AggregateReport {
        total_evaluations: DEMO_TOTAL_EVALUATIONS,
        overall_average: DEMO_OVERALL_AVERAGE,
        insights: Insights::derive(&skill_averages, &sector_averages, top_n),
        skill_averages,
        sector_averages,
        satisfaction_distribution: Distribution(DEMO_SATISFACTION),
        is_demo: true,
    }
}
