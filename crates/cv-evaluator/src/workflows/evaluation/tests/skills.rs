use super::common::*;

use crate::workflows::evaluation::domain::SkillCategory;
use crate::workflows::evaluation::skills::{
    extract_years, CatalogError, SkillCatalog, SkillExtractor, SkillMatcher,
};

#[test]
fn matcher_is_bidirectional_and_case_insensitive() {
    assert!(SkillMatcher::matches("React", &["react native"]));
    assert!(SkillMatcher::matches("react native", &["React"]));
    assert_eq!(
        SkillMatcher::find_match("AWS", &["python", "aws lambda"]),
        Some("aws lambda")
    );
    assert!(!SkillMatcher::matches("Kafka", &["python", "docker"]));
}

#[test]
fn blank_skills_never_match() {
    assert!(!SkillMatcher::matches("", &["python"]));
    assert!(!SkillMatcher::matches("  ", &["python"]));
    assert!(!SkillMatcher::matches("python", &[""]));
}

#[test]
fn extractor_groups_catalog_skills_by_category() {
    let extractor = SkillExtractor::new(catalog());
    let skills = extractor.extract(SENIOR_RESUME);

    let languages = skills.get(SkillCategory::Languages);
    assert!(languages.contains(&"python".to_string()));
    assert!(skills
        .get(SkillCategory::BackendFrameworks)
        .contains(&"django".to_string()));
    assert!(skills
        .get(SkillCategory::CloudDevops)
        .contains(&"kubernetes".to_string()));
    assert!(skills.soft_skills().contains(&"leadership".to_string()));
}

#[test]
fn extractor_is_deterministic() {
    let extractor = SkillExtractor::new(catalog());
    assert_eq!(extractor.extract(SENIOR_RESUME), extractor.extract(SENIOR_RESUME));
}

#[test]
fn years_are_read_from_english_and_spanish_phrasing() {
    assert_eq!(extract_years("8 years of experience with Rust"), 8);
    assert_eq!(extract_years("Over 3 years experience"), 3);
    assert_eq!(extract_years("Cuento con 5 años de experiencia"), 5);
    assert_eq!(extract_years("Experiencia: 4 anos"), 4);
    assert_eq!(extract_years("Experience: 10+ years"), 10);
    assert_eq!(extract_years("Recent graduate"), 0);
}

#[test]
fn catalog_loads_from_csv() {
    let csv = "category,skill\nlanguages, Elixir \ncloud-devops,Fly.io\nsoft skills,Negotiation\n";
    let catalog = SkillCatalog::from_csv_reader(csv.as_bytes()).expect("catalog parses");

    assert_eq!(catalog.skills(SkillCategory::Languages), ["elixir".to_string()]);
    assert_eq!(catalog.skills(SkillCategory::CloudDevops), ["fly.io".to_string()]);
    assert_eq!(catalog.skills(SkillCategory::SoftSkills), ["negotiation".to_string()]);
    assert_eq!(catalog.len(), 3);
}

#[test]
fn catalog_rejects_unknown_categories_with_row_number() {
    let csv = "category,skill\nlanguages,elixir\nhobbies,chess\n";
    let error = SkillCatalog::from_csv_reader(csv.as_bytes()).expect_err("unknown category");
    match error {
        CatalogError::UnknownCategory { row, category } => {
            assert_eq!(row, 3);
            assert_eq!(category, "hobbies");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn catalog_without_rows_is_rejected() {
    let error = SkillCatalog::from_csv_reader("category,skill\n".as_bytes()).expect_err("empty");
    assert!(matches!(error, CatalogError::Empty));
}

#[test]
fn injected_catalog_replaces_builtin_tables() {
    let catalog = SkillCatalog::new([(SkillCategory::Languages, vec!["cobol"])]);
    let extractor = SkillExtractor::new(std::sync::Arc::new(catalog));
    let skills = extractor.extract("COBOL and Python on the mainframe");

    assert_eq!(skills.flatten(), vec!["cobol".to_string()]);
}

#[test]
fn builtin_catalog_has_no_blank_or_merged_entries() {
    let catalog = SkillCatalog::builtin();
    let backend = catalog.skills(SkillCategory::BackendFrameworks);
    assert!(backend.contains(&"hapi".to_string()));
    assert!(backend.contains(&"fastify".to_string()));
    assert!(catalog
        .tables()
        .all(|(_, skills)| skills.iter().all(|skill| !skill.trim().is_empty())));
}

#[test]
fn category_lookup_uses_exact_then_substring_match() {
    let catalog = SkillCatalog::builtin();
    assert_eq!(catalog.category_of("Kubernetes"), SkillCategory::CloudDevops);
    assert_eq!(catalog.category_of("AWS Lambda"), SkillCategory::CloudDevops);
    assert_eq!(catalog.category_of("React Native"), SkillCategory::FrontendFrameworks);
    assert_eq!(catalog.category_of("Spark"), SkillCategory::Other);
    assert_eq!(catalog.category_of("cobol"), SkillCategory::Other);
    assert_eq!(catalog.category_of(""), SkillCategory::Other);
}

#[test]
fn short_catalog_entries_only_match_whole_tokens() {
    let extractor = SkillExtractor::new(catalog());

    let skills = extractor.extract("Python developer, 5 years of experience.");
    assert_eq!(skills.flatten(), vec!["python".to_string()]);

    let skills = extractor.extract("Statistics in R, services in Go, web apps with Django.");
    let languages = skills.get(SkillCategory::Languages);
    assert!(languages.contains(&"r".to_string()));
    assert!(languages.contains(&"go".to_string()));

    let skills = extractor.extract("JavaScript and ASP.NET, some C++ and C#.");
    assert!(!skills.get(SkillCategory::Languages).contains(&"java".to_string()));
    assert!(skills.get(SkillCategory::Languages).contains(&"c++".to_string()));
    assert!(skills.get(SkillCategory::Languages).contains(&"c#".to_string()));
    assert!(skills
        .get(SkillCategory::BackendFrameworks)
        .contains(&".net".to_string()));
}

#[test]
fn unmentioned_tools_are_reported_as_gaps() {
    use crate::workflows::evaluation::gaps::GapAnalyzer;

    let extractor = SkillExtractor::new(catalog());
    let skills = extractor.extract("Python developer, 5 years of experience.");
    let required: Vec<String> = ["Docker", "Terraform", "Spark", "Kafka"]
        .iter()
        .map(|skill| skill.to_string())
        .collect();

    let report = GapAnalyzer.analyze(&required, &[], &skills);

    assert!(report.matched.is_empty());
    assert_eq!(report.critical_gaps, required);
}
