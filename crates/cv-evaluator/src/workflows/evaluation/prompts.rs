// Résumé excerpts sent to the model are capped to keep prompts bounded.
const RESUME_EXCERPT_CHARS: usize = 2000;

fn excerpt(resume_text: &str) -> &str {
    match resume_text.char_indices().nth(RESUME_EXCERPT_CHARS) {
        Some((index, _)) => &resume_text[..index],
        None => resume_text,
    }
}

pub(crate) fn skill_analyst(resume_text: &str) -> String {
    format!(
        "You are an expert résumé analyst. Extract technical and soft skills.\n\
         Answer as {{\"skills_tecnicas\": [..], \"skills_blandas\": [..], \
         \"experiencia_anios\": number, \"nivel_autodetectado\": \"level\"}}.\n\n\
         Résumé:\n{resume_text}"
    )
}

pub(crate) fn seniority_evaluator(
    resume_text: &str,
    requested_level: &str,
    minimum_years: u32,
) -> String {
    format!(
        "You evaluate technical profiles. Levels: junior 0-2 years, semi-senior 2-4, \
         senior 4-7, staff 7-10, principal 10+.\n\
         Answer as {{\"seniority_estimado\": \"level\", \"experiencia_detectada\": number, \
         \"fundamento\": \"text\", \"coherente\": bool}}.\n\n\
         Résumé:\n{resume_text}\n\nRequested level: {requested_level}\n\
         Minimum experience: {minimum_years} years"
    )
}

pub(crate) fn gap_detector(resume_text: &str, required_stack: &[String]) -> String {
    format!(
        "You identify skills a résumé lacks relative to a job's stack.\n\
         Answer as {{\"brechas_criticas\": [..], \"brechas_deseables\": [..], \
         \"skills_coincidentes\": [..], \"evaluacion_global\": \"text\"}}.\n\n\
         Résumé:\n{}\n\nRequired stack: {}",
        excerpt(resume_text),
        required_stack.join(", ")
    )
}

pub(crate) fn match_calculator(
    matched_skills: &[String],
    required_stack: &[String],
    estimated_level: &str,
    requested_level: &str,
    critical_gaps: &[String],
) -> String {
    format!(
        "You compute candidate/job compatibility: technical match weighs 70%, \
         seniority match 30%, with a penalty for missing skills.\n\
         Answer as {{\"porcentaje_match\": number, \"match_tecnico\": number, \
         \"match_seniority\": number, \"clasificacion\": \
         \"excelente/bueno/regular/bajo/no_recomendado\", \"resumen\": \"text\"}}.\n\n\
         Candidate skills: {}\nRequired skills: {}\nEstimated level: {estimated_level}\n\
         Requested level: {requested_level}\nGaps: {}",
        matched_skills.join(", "),
        required_stack.join(", "),
        critical_gaps.join(", ")
    )
}

/// Role-play prompts for the crew backend: one specialist per analysis stage.
pub(crate) mod crew {
    use super::excerpt;

    pub(crate) fn technical_analyst(resume_text: &str) -> String {
        format!(
            "Role: technical analyst. Goal: identify every skill mentioned.\n\
             Report skills_tecnicas, skills_blandas and experiencia_anios as JSON.\n\n\
             Résumé: {}",
            excerpt(resume_text)
        )
    }

    pub(crate) fn profile_evaluator(resume_text: &str, requested_level: &str) -> String {
        format!(
            "Role: profile evaluator. Goal: estimate an appropriate seniority.\n\
             Requested level: {requested_level}\n\
             Report seniority_estimado, fundamento and coherente as JSON.\n\n\
             Résumé: {}",
            excerpt(resume_text)
        )
    }

    pub(crate) fn gap_analyst(resume_text: &str, required_stack: &[String]) -> String {
        format!(
            "Role: gap analyst. Goal: list the missing skills.\n\
             Given the required stack: {}\n\
             Report skills_coincidentes and brechas_criticas as JSON.\n\n\
             Résumé: {}",
            required_stack.join(", "),
            excerpt(resume_text)
        )
    }
}
