use selfeval::report::demo::{DEMO_OVERALL_AVERAGE, DEMO_TOTAL_EVALUATIONS};
use selfeval::storage::{AnnotationRepository, MemorySurveyStore, SqliteSurveyStore};
use selfeval::survey::{FieldId, RatingLevel};
use selfeval::wizard::Screen;
use selfeval::{
    seed, Advance, Aggregator, AnswerRecord, EntryPoint, MissingRatings, Sector, Skill,
    SubmissionRepository, Wizard,
};
use serde_json::json;

fn submit(store: &dyn SubmissionRepository, record: &AnswerRecord) -> Advance {
    let mut wizard = Wizard::new(EntryPoint::Welcome, store);
    wizard.fill(record);
    loop {
        match wizard.advance() {
            Advance::Moved { .. } => {}
            other => return other,
        }
    }
}

fn all_excellent_record(sector: Sector) -> AnswerRecord {
    let mut record = seed::sample_record(0);
    record.set(FieldId::Sector, sector.label());
    for skill in Skill::ALL {
        record.set(FieldId::Skill(skill), RatingLevel::Excelente.as_str());
    }
    record
}

#[test]
fn wizard_submission_feeds_the_report() {
    let store = MemorySurveyStore::in_memory();

    let outcome = submit(&store, &all_excellent_record(Sector::Tributario));
    assert!(matches!(outcome, Advance::Submitted { .. }));

    let submissions = store.load_all();
    let aggregator = Aggregator::new(&submissions);

    assert_eq!(aggregator.average_for_sector(Sector::Tributario), "5.0");
    assert_eq!(aggregator.rank_sectors_by_average()[0].sector, Sector::Tributario);
    for sector in Sector::ALL.into_iter().filter(|s| *s != Sector::Tributario) {
        assert_eq!(aggregator.average_for_sector(sector), "0.0");
    }

    let report = aggregator.report(3);
    assert!(!report.is_demo);
    assert_eq!(report.total_evaluations, 1);
    assert!((report.overall_average - 5.0).abs() < f64::EPSILON);
}

#[test]
fn empty_store_reports_demo_figures() {
    let store = MemorySurveyStore::in_memory();
    let submissions = store.load_all();
    let report = Aggregator::new(&submissions).report(3);

    assert!(report.is_demo);
    assert_eq!(report.total_evaluations, DEMO_TOTAL_EVALUATIONS);
    assert_eq!(report.total_evaluations, 47);
    assert!((report.overall_average - DEMO_OVERALL_AVERAGE).abs() < f64::EPSILON);
}

#[test]
fn skill_averages_stay_on_scale() {
    let submissions = seed::sample_submissions(12);
    let aggregator = Aggregator::new(&submissions);

    for skill in Skill::ALL {
        let average = aggregator.average_for_skill(skill);
        assert!((1.0..=5.0).contains(&average), "{skill}: {average}");
    }

    let none = Aggregator::new(&[]);
    for skill in Skill::ALL {
        assert_eq!(none.average_for_skill(skill), 0.0);
    }
}

#[test]
fn sector_ranking_is_a_stable_permutation() {
    let submissions = seed::sample_submissions(9);
    let ranked = Aggregator::new(&submissions).rank_sectors_by_average();

    let mut sectors: Vec<Sector> = ranked.iter().map(|s| s.sector).collect();
    sectors.sort();
    assert_eq!(sectors, Sector::ALL.to_vec());

    for pair in ranked.windows(2) {
        assert!(pair[0].average >= pair[1].average);
        if pair[0].average == pair[1].average {
            assert!(pair[0].sector < pair[1].sector);
        }
    }
}

#[test]
fn report_is_idempotent() {
    let submissions = seed::sample_submissions(7);
    let aggregator = Aggregator::new(&submissions).with_missing_ratings(MissingRatings::Neutral);
    assert_eq!(aggregator.report(3), aggregator.report(3));
    assert_eq!(aggregator.chart_series(), aggregator.chart_series());
}

#[test]
fn blocked_advance_reports_all_missing_fields() {
    let store = MemorySurveyStore::in_memory();
    let mut wizard = Wizard::new(EntryPoint::Welcome, &store);
    wizard.advance();
    wizard.advance();
    assert_eq!(wizard.screen(), Screen::Skills);

    wizard.set_field(FieldId::Name, "Ana");
    let Advance::Blocked { missing } = wizard.advance() else {
        panic!("expected a blocked advance");
    };
    assert_eq!(wizard.step(), 3);
    assert!(missing.iter().any(|f| f.key() == "setor"));
    assert!(!missing.contains(&FieldId::Name));
    assert_eq!(missing.len(), 16);
    assert!(store.load_all().is_empty());
}

#[test]
fn answers_from_json_complete_the_survey() {
    let mut answers = json!({
        "nome": "Bruno Lima",
        "setor": "fiscal",
        "reacao_pressao": ["Mantenho a calma e priorizo"],
        "feedback_gestao": "Boa comunicação",
        "nota_gestao": 4,
        "satisfacao_geral": 5,
        "relacionamento_equipe": 4,
        "reconhecimento": 3,
        "comunicacao_interna": 4,
        "ambiente_trabalho": 4
    });
    let map = answers.as_object_mut().unwrap();
    for key in [
        "pontos_fortes",
        "pontos_melhoria",
        "maior_conquista",
        "maior_desafio",
        "metas",
        "apoio_necessario",
    ] {
        map.insert(key.to_string(), json!("Texto"));
    }
    for skill in Skill::ALL {
        map.insert(skill.key().to_string(), json!("satisfatorio"));
    }

    let record = AnswerRecord::from_json(answers).unwrap();
    let store = MemorySurveyStore::in_memory();
    let Advance::Submitted { submission, .. } = submit(&store, &record) else {
        panic!("expected a submission");
    };

    assert_eq!(submission.sector, Sector::Fiscal);
    assert!((submission.overall_score - 4.0).abs() < f64::EPSILON);
    assert_eq!(submission.skill_score(Skill::Comunicacao), Some(4));
}

#[test]
fn sqlite_store_round_trip_with_fresh_ids() {
    let dir = std::env::temp_dir().join(format!("selfeval_flow_{}", std::process::id()));
    let path = dir.join("survey.db");

    let first_id;
    {
        let store = SqliteSurveyStore::open(&path).unwrap();
        let Advance::Submitted { submission, .. } = submit(&store, &seed::sample_record(1)) else {
            panic!("expected a submission");
        };
        first_id = submission.id.clone();
        assert!(matches!(
            submit(&store, &seed::sample_record(2)),
            Advance::Submitted { .. }
        ));
        store.annotate(&first_id, "Acompanhar metas", "admin").unwrap();
    }

    let reopened = SqliteSurveyStore::open(&path).unwrap();
    let loaded = reopened.load_all();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, first_id);
    assert_ne!(loaded[0].id, loaded[1].id);
    assert!(loaded.iter().all(|s| !s.id.is_empty()));
    assert_eq!(reopened.load_annotations()[&first_id].comment, "Acompanhar metas");

    assert_eq!(reopened.clear_all().unwrap(), 2);
    assert!(reopened.load_all().is_empty());
    assert_eq!(reopened.load_annotations().len(), 1);

    drop(reopened);
    let _ = std::fs::remove_dir_all(&dir);
}
