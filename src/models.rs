use chrono::{DateTime, Utc};
use lettre::Address;
use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryFilter, QuestionId};
use crate::error::{AppError, FieldErrors};

// Domains reserved for testing, never invited
const BLOCKED_DOMAINS: [(&str, &str); 2] = [
    ("@test.com", "Domínios de teste não são permitidos"),
    ("@example.com", "Domínios de exemplo não são permitidos"),
];

pub const MAX_SUGGESTION_CHARS: usize = 2000;

// Body of POST /api/register-email
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEmailRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub terms_accepted: bool,
}

impl RegisterEmailRequest {
    // Check every field, return the trimmed email when all pass
    pub fn validate(&self) -> Result<String, AppError> {
        let mut errors = FieldErrors::new();
        let email = self.email.trim();

        if email.is_empty() {
            errors
                .entry("email".to_string())
                .or_default()
                .push("O email é obrigatório".to_string());
        } else if email.parse::<Address>().is_err() {
            errors
                .entry("email".to_string())
                .or_default()
                .push("Por favor, insira um email válido".to_string());
        } else {
            let lowered = email.to_lowercase();
            for (suffix, message) in BLOCKED_DOMAINS {
                if lowered.ends_with(suffix) {
                    errors
                        .entry("email".to_string())
                        .or_default()
                        .push(message.to_string());
                }
            }
        }

        if !self.terms_accepted {
            errors
                .entry("termsAccepted".to_string())
                .or_default()
                .push("Você deve aceitar os termos de uso".to_string());
        }

        if errors.is_empty() {
            Ok(email.to_string())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

// Plain `{ "message": ... }` reply
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: &'static str,
}

// Query of the stats endpoints
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    #[serde(default)]
    pub tipo_usuario: CategoryFilter,
}

/// One filled-in survey. Ratings are whole stars; 0 is what the form sends
/// for an unanswered question.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    #[serde(default)]
    pub velocidade_carregamento: u8,
    #[serde(default)]
    pub facilidade_navegacao: u8,
    #[serde(default)]
    pub clareza_informacoes: u8,
    #[serde(default)]
    pub qualidade_conteudo: u8,
    #[serde(default)]
    pub atualizacao_dados: u8,
    #[serde(default)]
    pub design_visual: u8,
    #[serde(default)]
    pub experiencia_mobile: u8,
    #[serde(default)]
    pub satisfacao_geral: u8,
    #[serde(default)]
    pub probabilidade_recomendar: u8,
    #[serde(default)]
    pub funcionalidades_uteis: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugestoes: Option<String>,
}

impl SurveySubmission {
    // Ratings paired with their question, in catalog order
    pub fn ratings(&self) -> [(QuestionId, u8); 10] {
        [
            (QuestionId::VelocidadeCarregamento, self.velocidade_carregamento),
            (QuestionId::FacilidadeNavegacao, self.facilidade_navegacao),
            (QuestionId::ClarezaInformacoes, self.clareza_informacoes),
            (QuestionId::QualidadeConteudo, self.qualidade_conteudo),
            (QuestionId::AtualizacaoDados, self.atualizacao_dados),
            (QuestionId::DesignVisual, self.design_visual),
            (QuestionId::ExperienciaMobile, self.experiencia_mobile),
            (QuestionId::SatisfacaoGeral, self.satisfacao_geral),
            (QuestionId::ProbabilidadeRecomendar, self.probabilidade_recomendar),
            (QuestionId::FuncionalidadesUteis, self.funcionalidades_uteis),
        ]
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        for (question, stars) in self.ratings() {
            if !(1..=5).contains(&stars) {
                errors
                    .entry(question.id().to_string())
                    .or_default()
                    .push("Selecione uma avaliação de 1 a 5 estrelas".to_string());
            }
        }

        if let Some(text) = &self.sugestoes {
            if text.chars().count() > MAX_SUGGESTION_CHARS {
                errors
                    .entry("sugestoes".to_string())
                    .or_default()
                    .push(format!(
                        "A sugestão deve ter no máximo {} caracteres",
                        MAX_SUGGESTION_CHARS
                    ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecordedSubmission {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub submission: SurveySubmission,
}

// Reply to an accepted survey
#[derive(Serialize, Debug)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub message: &'static str,
    pub data: RecordedSubmission,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, terms: bool) -> RegisterEmailRequest {
        RegisterEmailRequest {
            email: email.to_string(),
            terms_accepted: terms,
        }
    }

    fn field_errors(err: AppError) -> FieldErrors {
        match err {
            AppError::Validation(fields) => fields,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn full_submission() -> SurveySubmission {
        SurveySubmission {
            velocidade_carregamento: 5,
            facilidade_navegacao: 4,
            clareza_informacoes: 4,
            qualidade_conteudo: 5,
            atualizacao_dados: 3,
            design_visual: 4,
            experiencia_mobile: 2,
            satisfacao_geral: 4,
            probabilidade_recomendar: 5,
            funcionalidades_uteis: 3,
            sugestoes: Some("Mais resultados de torneios".to_string()),
        }
    }

    #[test]
    fn test_valid_registration_is_trimmed() {
        let email = register("  atleta@boxeportugal.pt ", true).validate().unwrap();
        assert_eq!(email, "atleta@boxeportugal.pt");
    }

    #[test]
    fn test_registration_collects_all_errors() {
        let fields = field_errors(register("", false).validate().unwrap_err());
        assert_eq!(fields["email"], vec!["O email é obrigatório".to_string()]);
        assert_eq!(
            fields["termsAccepted"],
            vec!["Você deve aceitar os termos de uso".to_string()]
        );
    }

    #[test]
    fn test_registration_rejects_bad_syntax() {
        let fields = field_errors(register("sem-arroba", true).validate().unwrap_err());
        assert_eq!(
            fields["email"],
            vec!["Por favor, insira um email válido".to_string()]
        );
    }

    #[test]
    fn test_registration_rejects_reserved_domains() {
        let fields = field_errors(register("a@test.com", true).validate().unwrap_err());
        assert_eq!(
            fields["email"],
            vec!["Domínios de teste não são permitidos".to_string()]
        );

        let fields = field_errors(register("a@Example.com", true).validate().unwrap_err());
        assert_eq!(
            fields["email"],
            vec!["Domínios de exemplo não são permitidos".to_string()]
        );
    }

    #[test]
    fn test_registration_body_field_names() {
        let req: RegisterEmailRequest =
            serde_json::from_str(r#"{"email":"a@b.com","termsAccepted":true}"#).unwrap();
        assert!(req.terms_accepted);

        let req: RegisterEmailRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_empty());
        assert!(!req.terms_accepted);
    }

    #[test]
    fn test_full_submission_is_valid() {
        assert!(full_submission().validate().is_ok());
    }

    #[test]
    fn test_unanswered_and_out_of_range_ratings() {
        let mut submission = full_submission();
        submission.design_visual = 0;
        submission.satisfacao_geral = 6;

        let fields = field_errors(submission.validate().unwrap_err());
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("designVisual"));
        assert!(fields.contains_key("satisfacaoGeral"));
    }

    #[test]
    fn test_suggestion_length_limit() {
        let mut submission = full_submission();
        submission.sugestoes = Some("a".repeat(MAX_SUGGESTION_CHARS + 1));

        let fields = field_errors(submission.validate().unwrap_err());
        assert!(fields.contains_key("sugestoes"));
    }

    #[test]
    fn test_ratings_follow_catalog_order() {
        let ids: Vec<_> = full_submission().ratings().iter().map(|(q, _)| *q).collect();
        assert_eq!(ids, QuestionId::ALL.to_vec());
    }

    #[test]
    fn test_stats_query_defaults_to_todos() {
        let query: StatsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.tipo_usuario, CategoryFilter::Todos);
    }
}
