use serde::Serialize;

use super::domain::EvaluationMethod;
use super::stages::StageName;

/// One planned stage. Timeouts are advisory metadata; stages run synchronously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowStep {
    pub order: u8,
    pub stage: StageName,
    pub role: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub timeout_secs: u64,
    pub uses_model: bool,
}

/// Descriptive stage plan for an evaluation method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowBlueprint {
    method: EvaluationMethod,
    fallback: EvaluationMethod,
    steps: Vec<WorkflowStep>,
}

impl WorkflowBlueprint {
    pub fn for_method(method: EvaluationMethod) -> Self {
        let steps = match method {
            EvaluationMethod::CrewAi => crew_steps(),
            EvaluationMethod::Structured => standard_steps(false),
            EvaluationMethod::LangChain => standard_steps(true),
        };

        Self {
            method,
            fallback: EvaluationMethod::Structured,
            steps,
        }
    }

    pub fn method(&self) -> EvaluationMethod {
        self.method
    }

    pub fn fallback(&self) -> EvaluationMethod {
        self.fallback
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    /// Sum of the advisory per-stage timeouts.
    pub fn total_timeout_secs(&self) -> u64 {
        self.steps.iter().map(|step| step.timeout_secs).sum()
    }
}

fn standard_steps(uses_model: bool) -> Vec<WorkflowStep> {
    vec![
        WorkflowStep {
            order: 1,
            stage: StageName::SkillAnalyst,
            role: "skill analyst",
            description: "Extract technical and soft skills and years of experience from the résumé.",
            required: true,
            timeout_secs: 30,
            uses_model,
        },
        WorkflowStep {
            order: 2,
            stage: StageName::SeniorityEvaluator,
            role: "seniority evaluator",
            description: "Estimate the candidate's seniority and check it against the experience.",
            required: true,
            timeout_secs: 20,
            uses_model,
        },
        WorkflowStep {
            order: 3,
            stage: StageName::GapDetector,
            role: "gap detector",
            description: "Split the required stack into matched skills and critical gaps.",
            required: true,
            timeout_secs: 25,
            uses_model,
        },
        WorkflowStep {
            order: 4,
            stage: StageName::MatchCalculator,
            role: "match calculator",
            description: "Weigh technical and seniority fit, penalize gaps and classify the match.",
            required: true,
            timeout_secs: 15,
            uses_model,
        },
    ]
}

fn crew_steps() -> Vec<WorkflowStep> {
    vec![
        WorkflowStep {
            order: 1,
            stage: StageName::SkillAnalyst,
            role: "technical analyst",
            description: "Identify every skill the résumé mentions.",
            required: true,
            timeout_secs: 30,
            uses_model: true,
        },
        WorkflowStep {
            order: 2,
            stage: StageName::SeniorityEvaluator,
            role: "profile evaluator",
            description: "Estimate an appropriate seniority for the profile.",
            required: true,
            timeout_secs: 20,
            uses_model: true,
        },
        WorkflowStep {
            order: 3,
            stage: StageName::GapDetector,
            role: "gap analyst",
            description: "List the required skills the résumé is missing.",
            required: true,
            timeout_secs: 25,
            uses_model: true,
        },
        WorkflowStep {
            order: 4,
            stage: StageName::MatchCalculator,
            role: "local scorer",
            description: "Score the crew's findings with the local weighting rules.",
            required: true,
            timeout_secs: 15,
            uses_model: false,
        },
    ]
}
