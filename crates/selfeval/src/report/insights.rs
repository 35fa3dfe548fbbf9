//! Dashboard insights: strengths, attention areas and a recommendation.

use serde::Serialize;

use super::{rank_ascending, rank_descending, SectorSummary, SkillAverage};
use crate::survey::Skill;

/// Recommendation used when the weakest skill has no specific entry.
pub const GENERIC_RECOMMENDATION: &str =
    "Manter o acompanhamento individual e revisar as metas de desenvolvimento no próximo ciclo.";

/// Specific recommendation for a weak skill, if one is defined.
#[must_use]
pub fn recommendation_for(skill: Skill) -> Option<&'static str> {
    match skill {
        Skill::ConhecimentoTecnico => Some(
            "Planejar treinamentos técnicos e atualizações sobre legislação para a equipe.",
        ),
        Skill::Organizacao => {
            Some("Padronizar rotinas e checklists de fechamento para reduzir retrabalho.")
        }
        Skill::Comunicacao => Some(
            "Realizar reuniões curtas de alinhamento semanais e definir canais oficiais de comunicação.",
        ),
        Skill::TrabalhoEquipe => {
            Some("Promover projetos entre setores e momentos de integração da equipe.")
        }
        Skill::Proatividade => Some(
            "Reconhecer iniciativas e abrir espaço para sugestões de melhoria nos processos.",
        ),
        Skill::GestaoTempo => Some(
            "Oferecer orientação sobre priorização e revisar a distribuição de prazos e demandas.",
        ),
        Skill::Produtividade | Skill::QualidadeEntregas => None,
    }
}

/// Highlights derived from the aggregate figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// Sector with the highest average among sectors with submissions.
    pub best_sector: Option<SectorSummary>,
    /// Highest-rated skill.
    pub strongest_skill: Option<SkillAverage>,
    /// Lowest-rated skill.
    pub weakest_skill: Option<SkillAverage>,
    /// Best-rated skills, best first.
    pub strengths: Vec<SkillAverage>,
    /// Worst-rated skills, worst first.
    pub attention: Vec<SkillAverage>,
    /// Action suggested for the weakest skill.
    pub recommendation: String,
}

impl Insights {
    /// Derive insights from rated skills (in enumeration order) and sectors
    /// (already ranked, best first). `n` bounds the strengths and attention
    /// lists.
    #[must_use]
    pub fn derive(skills: &[SkillAverage], ranked_sectors: &[SectorSummary], n: usize) -> Self {
        let descending = rank_descending(skills);
        let ascending = rank_ascending(skills);
        let weakest_skill = ascending.first().copied();

        let recommendation = weakest_skill
            .and_then(|weakest| recommendation_for(weakest.skill))
            .unwrap_or(GENERIC_RECOMMENDATION)
            .to_string();

        Self {
            best_sector: ranked_sectors.iter().find(|s| s.count > 0).copied(),
            strongest_skill: descending.first().copied(),
            weakest_skill,
            strengths: descending.into_iter().take(n).collect(),
            attention: ascending.into_iter().take(n).collect(),
            recommendation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::Sector;

    fn skill(skill: Skill, average: f64) -> SkillAverage {
        SkillAverage {
            skill,
            average,
            count: 1,
        }
    }

    fn sector(sector: Sector, count: usize, average: f64) -> SectorSummary {
        SectorSummary {
            sector,
            count,
            average,
        }
    }

    #[test]
    fn test_derive_picks_extremes() {
        let skills = vec![
            skill(Skill::ConhecimentoTecnico, 4.5),
            skill(Skill::Comunicacao, 3.1),
            skill(Skill::Proatividade, 4.0),
        ];
        let sectors = vec![sector(Sector::Fiscal, 2, 4.2), sector(Sector::Contabil, 1, 3.0)];

        let insights = Insights::derive(&skills, &sectors, 2);

        assert_eq!(insights.strongest_skill.unwrap().skill, Skill::ConhecimentoTecnico);
        assert_eq!(insights.weakest_skill.unwrap().skill, Skill::Comunicacao);
        assert_eq!(insights.best_sector.unwrap().sector, Sector::Fiscal);
        assert_eq!(insights.strengths.len(), 2);
        assert_eq!(insights.attention[0].skill, Skill::Comunicacao);
        assert_eq!(
            insights.recommendation,
            recommendation_for(Skill::Comunicacao).unwrap()
        );
    }

    #[test]
    fn test_best_sector_skips_empty_sectors() {
        let sectors = vec![sector(Sector::Fiscal, 0, 0.0), sector(Sector::Societario, 1, 0.0)];
        let insights = Insights::derive(&[], &sectors, 3);
        assert_eq!(insights.best_sector.unwrap().sector, Sector::Societario);
    }

    #[test]
    fn test_generic_recommendation_fallback() {
        let skills = vec![skill(Skill::Produtividade, 2.0), skill(Skill::Comunicacao, 4.0)];
        let insights = Insights::derive(&skills, &[], 3);
        assert_eq!(insights.recommendation, GENERIC_RECOMMENDATION);
    }

    #[test]
    fn test_no_data_yields_generic_recommendation() {
        let insights = Insights::derive(&[], &[], 3);
        assert!(insights.strongest_skill.is_none());
        assert!(insights.weakest_skill.is_none());
        assert!(insights.best_sector.is_none());
        assert_eq!(insights.recommendation, GENERIC_RECOMMENDATION);
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let skills = vec![
            skill(Skill::Organizacao, 3.0),
            skill(Skill::Comunicacao, 3.0),
            skill(Skill::GestaoTempo, 3.0),
        ];
        let insights = Insights::derive(&skills, &[], 3);
        assert_eq!(insights.strongest_skill.unwrap().skill, Skill::Organizacao);
        assert_eq!(insights.weakest_skill.unwrap().skill, Skill::Organizacao);
    }
}
