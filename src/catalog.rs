use serde::{Deserialize, Serialize};

// The ten survey questions, in the order they are asked and displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionId {
    VelocidadeCarregamento,
    FacilidadeNavegacao,
    ClarezaInformacoes,
    QualidadeConteudo,
    AtualizacaoDados,
    DesignVisual,
    ExperienciaMobile,
    SatisfacaoGeral,
    ProbabilidadeRecomendar,
    FuncionalidadesUteis,
}

impl QuestionId {
    pub const ALL: [QuestionId; 10] = [
        QuestionId::VelocidadeCarregamento,
        QuestionId::FacilidadeNavegacao,
        QuestionId::ClarezaInformacoes,
        QuestionId::QualidadeConteudo,
        QuestionId::AtualizacaoDados,
        QuestionId::DesignVisual,
        QuestionId::ExperienciaMobile,
        QuestionId::SatisfacaoGeral,
        QuestionId::ProbabilidadeRecomendar,
        QuestionId::FuncionalidadesUteis,
    ];

    // Wire identifier, same string serde uses
    pub fn id(&self) -> &'static str {
        match self {
            QuestionId::VelocidadeCarregamento => "velocidadeCarregamento",
            QuestionId::FacilidadeNavegacao => "facilidadeNavegacao",
            QuestionId::ClarezaInformacoes => "clarezaInformacoes",
            QuestionId::QualidadeConteudo => "qualidadeConteudo",
            QuestionId::AtualizacaoDados => "atualizacaoDados",
            QuestionId::DesignVisual => "designVisual",
            QuestionId::ExperienciaMobile => "experienciaMobile",
            QuestionId::SatisfacaoGeral => "satisfacaoGeral",
            QuestionId::ProbabilidadeRecomendar => "probabilidadeRecomendar",
            QuestionId::FuncionalidadesUteis => "funcionalidadesUteis",
        }
    }

    // Human-readable label shown next to charts
    pub fn label(&self) -> &'static str {
        match self {
            QuestionId::VelocidadeCarregamento => "Velocidade de carregamento do site",
            QuestionId::FacilidadeNavegacao => "Facilidade de navegação",
            QuestionId::ClarezaInformacoes => "Clareza das informações",
            QuestionId::QualidadeConteudo => "Qualidade do conteúdo",
            QuestionId::AtualizacaoDados => "Atualização dos dados",
            QuestionId::DesignVisual => "Design visual",
            QuestionId::ExperienciaMobile => "Experiência mobile",
            QuestionId::SatisfacaoGeral => "Satisfação geral",
            QuestionId::ProbabilidadeRecomendar => "Probabilidade de recomendar",
            QuestionId::FuncionalidadesUteis => "Funcionalidades úteis",
        }
    }
}

// One catalog row as served to presentation layers
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntry {
    pub id: QuestionId,
    pub label: &'static str,
}

pub fn catalog() -> Vec<CatalogEntry> {
    QuestionId::ALL
        .iter()
        .map(|q| CatalogEntry {
            id: *q,
            label: q.label(),
        })
        .collect()
}

// Who answered the survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondentCategory {
    Atleta,
    Clube,
    Arbitro,
}

impl RespondentCategory {
    pub const ALL: [RespondentCategory; 3] = [
        RespondentCategory::Atleta,
        RespondentCategory::Clube,
        RespondentCategory::Arbitro,
    ];
}

/// Category selector accepted by the stats endpoints. `Todos` means no
/// scoping and behaves exactly like an absent selector. Any other value
/// parses as `Unknown`, which selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    Atleta,
    Clube,
    Arbitro,
    #[default]
    Todos,
    #[serde(other)]
    Unknown,
}

/// What a selector resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Category(RespondentCategory),
    Unknown,
}

impl CategoryFilter {
    pub fn scope(&self) -> Scope {
        match self {
            CategoryFilter::Atleta => Scope::Category(RespondentCategory::Atleta),
            CategoryFilter::Clube => Scope::Category(RespondentCategory::Clube),
            CategoryFilter::Arbitro => Scope::Category(RespondentCategory::Arbitro),
            CategoryFilter::Todos => Scope::All,
            CategoryFilter::Unknown => Scope::Unknown,
        }
    }
}
