use crate::infra::{
    evaluator_settings, language_model, parse_list, parse_method, parse_policy,
    parse_seniority_mode,
};
use clap::Args;
use cv_evaluator::config::AppConfig;
use cv_evaluator::error::AppError;
use cv_evaluator::workflows::evaluation::{
    EstimationMode, EvaluationMethod, EvaluationRequest, EvaluationResponse, EvaluationService,
    EvaluatorSettings, PenaltyPolicy, StageStatus, TraceRecord, WorkflowBlueprint,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Plain-text résumé to evaluate
    #[arg(long)]
    pub(crate) resume: PathBuf,
    /// Required skills, comma separated (e.g. "Python, AWS, Docker")
    #[arg(long)]
    pub(crate) stack: String,
    /// Requested seniority level (junior, semi-senior, senior, staff, principal)
    #[arg(long)]
    pub(crate) level: String,
    /// Minimum years of experience for the role
    #[arg(long, default_value_t = 0)]
    pub(crate) min_years: u32,
    /// Required soft skills, comma separated
    #[arg(long)]
    pub(crate) soft_skills: Option<String>,
    /// Include the per-stage trace in the output
    #[arg(long)]
    pub(crate) trace: bool,
    /// Override the configured evaluation method
    #[arg(long, value_parser = parse_method)]
    pub(crate) method: Option<EvaluationMethod>,
    /// Override the configured gap penalty policy
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<PenaltyPolicy>,
    /// Override the configured seniority estimation mode
    #[arg(long, value_parser = parse_seniority_mode)]
    pub(crate) seniority_mode: Option<EstimationMode>,
    /// Skill catalog CSV replacing the built-in tables
    #[arg(long)]
    pub(crate) skills_csv: Option<PathBuf>,
    /// Print the raw JSON response instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation method for the demo run (defaults to estructurado)
    #[arg(long, value_parser = parse_method)]
    pub(crate) method: Option<EvaluationMethod>,
    /// Print the per-stage trace for each opening
    #[arg(long)]
    pub(crate) trace: bool,
}

const SAMPLE_RESUME: &str = "\
Maria Lopez - Senior Backend Engineer
8 years of experience building payment platforms.
Tech Lead at Finpay: designed event-driven services in Python and FastAPI,
deployed on AWS with Docker and Kubernetes, PostgreSQL and Redis for storage.
Mentoring junior engineers, leadership of a team of five, agile delivery.
";

struct Opening {
    title: &'static str,
    stack: &'static [&'static str],
    level: &'static str,
    minimum_years: u32,
    soft_skills: &'static [&'static str],
}

const OPENINGS: [Opening; 2] = [
    Opening {
        title: "Senior backend engineer",
        stack: &["Python", "FastAPI", "AWS", "Docker"],
        level: "senior",
        minimum_years: 5,
        soft_skills: &["leadership", "mentoring"],
    },
    Opening {
        title: "Principal data engineer",
        stack: &["Scala", "Kafka", "Spark", "Airflow", "PostgreSQL"],
        level: "principal",
        minimum_years: 12,
        soft_skills: &["communication"],
    },
];

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?.evaluator;
    if let Some(method) = args.method {
        config.method = method;
    }
    if let Some(policy) = args.policy {
        config.penalty_policy = policy;
    }
    if let Some(mode) = args.seniority_mode {
        config.seniority_mode = mode;
    }
    if let Some(path) = args.skills_csv.clone() {
        config.skills_csv = Some(path);
    }

    let settings = evaluator_settings(&config)?;
    let service = EvaluationService::new(settings, language_model(&config));

    let resume_text = std::fs::read_to_string(&args.resume)?;
    let request = build_request(&args, resume_text);
    let response = service.evaluate(&request);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        render_response(&args.resume.display().to_string(), &response);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let method = args.method.unwrap_or_default();
    let service = EvaluationService::local(EvaluatorSettings::default().with_method(method));

    println!("CV evaluation demo ({})", method.label());
    render_blueprint(&service.blueprint());

    for opening in &OPENINGS {
        let request = EvaluationRequest {
            resume_text: SAMPLE_RESUME.to_string(),
            required_stack: opening.stack.iter().map(|s| s.to_string()).collect(),
            requested_level: opening.level.to_string(),
            minimum_years: opening.minimum_years,
            soft_skills: opening.soft_skills.iter().map(|s| s.to_string()).collect(),
            include_trace: Some(args.trace),
        };
        let response = service.evaluate(&request);
        println!();
        render_response(opening.title, &response);
    }
    Ok(())
}

fn build_request(args: &EvaluateArgs, resume_text: String) -> EvaluationRequest {
    EvaluationRequest {
        resume_text,
        required_stack: parse_list(&args.stack),
        requested_level: args.level.clone(),
        minimum_years: args.min_years,
        soft_skills: args
            .soft_skills
            .as_deref()
            .map(parse_list)
            .unwrap_or_default(),
        include_trace: Some(args.trace),
    }
}

fn render_blueprint(blueprint: &WorkflowBlueprint) {
    println!(
        "Workflow: {} (fallback {}, total timeout {}s)",
        blueprint.method(),
        blueprint.fallback(),
        blueprint.total_timeout_secs()
    );
    for step in blueprint.steps() {
        println!(
            "  {}. {:<20} {:>3}s  {}{}",
            step.order,
            step.role,
            step.timeout_secs,
            step.description,
            if step.uses_model { " [model]" } else { "" }
        );
    }
}

fn render_response(title: &str, response: &EvaluationResponse) {
    let result = response.result();
    println!("{title}");
    println!(
        "  Match: {:.1}% ({})",
        result.match_percentage,
        result
            .classification
            .map_or("unclassified", |classification| classification.label())
    );
    println!(
        "  Estimated seniority: {} (coherent: {})",
        result.estimated_seniority, result.coherent
    );
    println!("  Matched skills: {}", list_or_none(&result.matched_skills));
    println!("  Critical gaps: {}", list_or_none(&result.critical_gaps));
    println!("  Summary: {}", result.summary);

    if let EvaluationResponse::Complete(complete) = response {
        println!("  Trace:");
        for record in &complete.trace {
            println!("    {}", trace_line(record));
        }
    }
}

fn trace_line(record: &TraceRecord) -> String {
    let status = match record.status {
        StageStatus::Success => "ok",
        StageStatus::Error => "error",
    };
    match &record.error {
        Some(error) => format!(
            "{:<20} {:<5} {:>8.2} ms  {}",
            record.stage.label(), status, record.duration_ms, error
        ),
        None => format!(
            "{:<20} {:<5} {:>8.2} ms",
            record.stage.label(), status, record.duration_ms
        ),
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_evaluator::workflows::evaluation::StageName;
    use serde_json::json;

    fn evaluate_args() -> EvaluateArgs {
        EvaluateArgs {
            resume: PathBuf::from("cv.txt"),
            stack: "Python, AWS,, Docker".to_string(),
            level: "Senior".to_string(),
            min_years: 5,
            soft_skills: Some("leadership".to_string()),
            trace: true,
            method: None,
            policy: None,
            seniority_mode: None,
            skills_csv: None,
            json: false,
        }
    }

    #[test]
    fn evaluate_arguments_become_a_request() {
        let request = build_request(&evaluate_args(), "cv body".to_string());

        assert_eq!(request.required_stack, vec!["Python", "AWS", "Docker"]);
        assert_eq!(request.soft_skills, vec!["leadership"]);
        assert_eq!(request.minimum_years, 5);
        assert_eq!(request.include_trace, Some(true));
        assert_eq!(request.requirements().requested_level.label(), "senior");
    }

    #[test]
    fn every_advertised_level_is_recognized() {
        use cv_evaluator::workflows::evaluation::SeniorityLevel;

        for (raw, level) in [
            ("junior", SeniorityLevel::Junior),
            ("semi-senior", SeniorityLevel::SemiSenior),
            ("senior", SeniorityLevel::Senior),
            ("staff", SeniorityLevel::Staff),
            ("principal", SeniorityLevel::Principal),
        ] {
            let args = EvaluateArgs {
                level: raw.to_string(),
                ..evaluate_args()
            };
            let request = build_request(&args, String::new());
            assert_eq!(request.requirements().requested_level, level);
        }
    }

    #[test]
    fn sample_resume_fits_the_backend_opening() {
        let service = EvaluationService::local(EvaluatorSettings::default());
        let opening = &OPENINGS[0];
        let request = EvaluationRequest {
            resume_text: SAMPLE_RESUME.to_string(),
            required_stack: opening.stack.iter().map(|s| s.to_string()).collect(),
            requested_level: opening.level.to_string(),
            minimum_years: opening.minimum_years,
            soft_skills: Vec::new(),
            include_trace: None,
        };

        let result = service.evaluate(&request).result().clone();
        assert!(result.critical_gaps.is_empty());
        assert_eq!(result.matched_skills, request.required_stack);
        assert!(result.classification.is_some());
    }

    #[test]
    fn trace_lines_carry_the_error_message() {
        let record = TraceRecord {
            stage: StageName::SkillAnalyst,
            status: StageStatus::Error,
            duration_ms: 0.5,
            input: json!({}),
            output: json!({}),
            error: Some("résumé text is empty".to_string()),
        };

        let line = trace_line(&record);
        assert!(line.starts_with("skill_analyst"));
        assert!(line.contains("error"));
        assert!(line.ends_with("résumé text is empty"));
    }
}
