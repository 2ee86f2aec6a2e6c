//! Fleet entities
//!
//! Field names follow the Portuguese vocabulary of the yard operators. All
//! entities serialize as camelCase JSON, the shape used both on the wire and
//! in the local collections.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// New random id for records created on the device.
pub fn new_local_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Accepts ids sent either as JSON strings or numbers.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Reads RFC 3339 timestamps, or offset-less ones as UTC.
///
/// Anything else becomes `None`; the timestamps are display-only.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    Ok(NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive)))
}

/// Records stored in id-addressed local collections.
pub trait Identifiable {
    fn id(&self) -> &str;
}

// ============================================================================
// Moto
// ============================================================================

/// Availability of a motorcycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MotoStatus {
    #[default]
    Disponivel,
    Ocupada,
    Manutencao,
}

impl MotoStatus {
    pub const ALL: [MotoStatus; 3] = [Self::Disponivel, Self::Ocupada, Self::Manutencao];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disponivel => "disponivel",
            Self::Ocupada => "ocupada",
            Self::Manutencao => "manutencao",
        }
    }

    /// Label shown in status chips
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disponivel => "Disponível",
            Self::Ocupada => "Ocupada",
            Self::Manutencao => "Em manutenção",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for MotoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A motorcycle in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moto {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub placa: String,
    pub modelo: String,
    pub ano: i32,
    pub cor: String,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub filial_id: String,
    #[serde(default)]
    pub status: MotoStatus,
    /// Slot label, e.g. "C4"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaga: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condutor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Identifiable for Moto {
    fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Vaga
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VagaStatus {
    #[default]
    Livre,
    Ocupada,
}

impl VagaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Livre => "livre",
            Self::Ocupada => "ocupada",
        }
    }
}

/// A parking slot on the yard map.
///
/// `moto_id` is not checked against the motorcycle collection and may point
/// at a record that no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaga {
    pub id: String,
    /// Column letter plus row number, e.g. "A3"
    pub identificacao: String,
    pub status: VagaStatus,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moto_id: Option<String>,
}

impl Vaga {
    pub fn is_occupied(&self) -> bool {
        self.status == VagaStatus::Ocupada
    }
}

impl Identifiable for Vaga {
    fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Manutencao
// ============================================================================

/// Maintenance categories offered by the maintenance form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoManutencao {
    TrocaOleo,
    RevisaoGeral,
    Freios,
    Pneus,
    Corrente,
    Bateria,
    Eletrica,
    Suspensao,
    Motor,
    Embreagem,
    Outro,
}

impl TipoManutencao {
    pub const ALL: [TipoManutencao; 11] = [
        Self::TrocaOleo,
        Self::RevisaoGeral,
        Self::Freios,
        Self::Pneus,
        Self::Corrente,
        Self::Bateria,
        Self::Eletrica,
        Self::Suspensao,
        Self::Motor,
        Self::Embreagem,
        Self::Outro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrocaOleo => "troca_oleo",
            Self::RevisaoGeral => "revisao_geral",
            Self::Freios => "freios",
            Self::Pneus => "pneus",
            Self::Corrente => "corrente",
            Self::Bateria => "bateria",
            Self::Eletrica => "eletrica",
            Self::Suspensao => "suspensao",
            Self::Motor => "motor",
            Self::Embreagem => "embreagem",
            Self::Outro => "outro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TrocaOleo => "Troca de óleo",
            Self::RevisaoGeral => "Revisão geral",
            Self::Freios => "Freios",
            Self::Pneus => "Pneus",
            Self::Corrente => "Corrente",
            Self::Bateria => "Bateria",
            Self::Eletrica => "Elétrica",
            Self::Suspensao => "Suspensão",
            Self::Motor => "Motor",
            Self::Embreagem => "Embreagem",
            Self::Outro => "Outro",
        }
    }
}

/// A maintenance record kept only on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manutencao {
    pub id: String,
    pub moto_id: String,
    pub tipo: TipoManutencao,
    /// Free text used when `tipo` is `outro`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivo_outro: Option<String>,
    /// `DD/MM/YYYY`
    pub data: String,
    #[serde(default)]
    pub observacoes: String,
}

impl Manutencao {
    /// What was done, as listed in the maintenance history.
    pub fn descricao(&self) -> &str {
        match (&self.tipo, self.motivo_outro.as_deref()) {
            (TipoManutencao::Outro, Some(motivo)) if !motivo.trim().is_empty() => motivo,
            (tipo, _) => tipo.label(),
        }
    }
}

impl Identifiable for Manutencao {
    fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Filial
// ============================================================================

/// Street address of a branch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endereco {
    pub logradouro: String,
    pub numero: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    /// Two-letter state code
    pub estado: String,
    /// Eight digits, no separator
    pub cep: String,
}

impl Endereco {
    /// Single-line address, e.g. `Av. Paulista, 1000 - Bela Vista, São Paulo - SP, 01310-100`
    pub fn completo(&self) -> String {
        let mut line = format!("{}, {}", self.logradouro.trim(), self.numero.trim());
        if let Some(complemento) = self
            .complemento
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            line.push_str(&format!(" ({})", complemento));
        }
        line.push_str(&format!(
            " - {}, {} - {}, {}",
            self.bairro.trim(),
            self.cidade.trim(),
            self.estado.trim(),
            format_cep(&self.cep)
        ));
        line
    }
}

/// `01310100` -> `01310-100`; anything that is not 8 digits is returned as is.
pub fn format_cep(cep: &str) -> String {
    let digits: String = cep.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 8 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        cep.to_string()
    }
}

/// A branch, in display shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filial {
    pub id: String,
    pub nome: String,
    pub endereco: Endereco,
    pub endereco_completo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub ativo: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_criacao: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_atualizacao: Option<DateTime<Utc>>,
}

impl Filial {
    pub fn new(id: impl Into<String>, nome: impl Into<String>, endereco: Endereco) -> Self {
        let endereco_completo = endereco.completo();
        Self {
            id: id.into(),
            nome: nome.into(),
            endereco,
            endereco_completo,
            telefone: None,
            email: None,
            ativo: true,
            data_criacao: None,
            data_atualizacao: None,
        }
    }
}

impl Identifiable for Filial {
    fn id(&self) -> &str {
        &self.id
    }
}
