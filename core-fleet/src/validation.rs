//! Form validation
//!
//! Each form is normalized (trimmed, plate and state upper-cased, CEP reduced
//! to digits) before its rules run. A failed form yields a [`ValidationReport`]
//! with Portuguese messages keyed by field; nothing here panics.

use crate::error::{FleetError, Result};
use crate::models::{Endereco, Filial, Manutencao, Moto, MotoStatus, TipoManutencao};
use chrono::NaiveDate;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

pub const ANO_MIN: i32 = 1900;
pub const ANO_MAX: i32 = 2030;
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Field-level validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn messages_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fields in alphabetical order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// First message of the first failing field, for a single-line alert
    pub fn first_message(&self) -> Option<&str> {
        self.errors
            .values()
            .flat_map(|messages| messages.iter())
            .map(String::as_str)
            .next()
    }

    fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(FleetError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        let mut report = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                report.add(field, message);
            }
        }
        report
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_ano(ano: &str) -> std::result::Result<(), ValidationError> {
    match parse_ano(ano) {
        Some(_) => Ok(()),
        None => Err(validation_error(
            "ano",
            "O ano deve ser um número entre 1900 e 2030",
        )),
    }
}

/// Integer year within `[1900, 2030]`
pub fn parse_ano(ano: &str) -> Option<i32> {
    ano.trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (ANO_MIN..=ANO_MAX).contains(year))
}

fn validate_data(data: &str) -> std::result::Result<(), ValidationError> {
    NaiveDate::parse_from_str(data.trim(), DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| validation_error("data", "Informe a data no formato DD/MM/AAAA"))
}

/// Keeps only ASCII digits
pub fn normalize_cep(cep: &str) -> String {
    cep.chars().filter(char::is_ascii_digit).collect()
}

fn trimmed_option(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Moto form
// ============================================================================

/// Motorcycle registration/edit form.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct MotoForm {
    #[validate(length(equal = 7, message = "A placa deve ter exatamente 7 caracteres"))]
    pub placa: String,

    #[validate(length(min = 2, max = 50, message = "O modelo deve ter entre 2 e 50 caracteres"))]
    pub modelo: String,

    /// Raw text from the year input
    #[validate(custom = "validate_ano")]
    pub ano: String,

    #[validate(length(min = 3, max = 30, message = "A cor deve ter entre 3 e 30 caracteres"))]
    pub cor: String,

    #[validate(length(min = 1, message = "Selecione uma filial"))]
    pub filial_id: String,

    pub status: MotoStatus,
    pub vaga: Option<String>,
    pub condutor: Option<String>,
}

impl MotoForm {
    pub fn normalized(&self) -> Self {
        Self {
            placa: self.placa.trim().to_ascii_uppercase(),
            modelo: self.modelo.trim().to_string(),
            ano: self.ano.trim().to_string(),
            cor: self.cor.trim().to_string(),
            filial_id: self.filial_id.trim().to_string(),
            status: self.status,
            vaga: trimmed_option(self.vaga.clone()),
            condutor: trimmed_option(self.condutor.clone()),
        }
    }

    /// Normalizes and validates, returning every failing field.
    pub fn check(&self) -> Result<Self> {
        let form = self.normalized();
        let report = match form.validate() {
            Ok(()) => ValidationReport::new(),
            Err(errors) => errors.into(),
        };
        report.into_result()?;
        Ok(form)
    }

    /// Validated entity. `id` is empty for records the API will number.
    pub fn into_moto(self, id: impl Into<String>) -> Result<Moto> {
        let form = self.check()?;
        let ano = parse_ano(&form.ano).unwrap_or(ANO_MIN);

        Ok(Moto {
            id: id.into(),
            placa: form.placa,
            modelo: form.modelo,
            ano,
            cor: form.cor,
            filial_id: form.filial_id,
            status: form.status,
            vaga: form.vaga,
            condutor: form.condutor,
            latitude: None,
            longitude: None,
        })
    }
}

impl From<&Moto> for MotoForm {
    fn from(moto: &Moto) -> Self {
        Self {
            placa: moto.placa.clone(),
            modelo: moto.modelo.clone(),
            ano: moto.ano.to_string(),
            cor: moto.cor.clone(),
            filial_id: moto.filial_id.clone(),
            status: moto.status,
            vaga: moto.vaga.clone(),
            condutor: moto.condutor.clone(),
        }
    }
}

// ============================================================================
// Filial form
// ============================================================================

/// Branch registration/edit form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct FilialForm {
    #[validate(length(min = 3, max = 100, message = "O nome deve ter entre 3 e 100 caracteres"))]
    pub nome: String,

    #[validate(length(min = 1, message = "Informe o logradouro"))]
    pub logradouro: String,

    #[validate(length(min = 1, message = "Informe o número"))]
    pub numero: String,

    pub complemento: Option<String>,

    #[validate(length(min = 1, message = "Informe o bairro"))]
    pub bairro: String,

    #[validate(length(min = 2, message = "Informe a cidade"))]
    pub cidade: String,

    #[validate(length(equal = 2, message = "O estado deve ter exatamente 2 letras"))]
    pub estado: String,

    #[validate(length(equal = 8, message = "O CEP deve ter 8 dígitos"))]
    pub cep: String,

    pub telefone: Option<String>,

    #[validate(email(message = "Informe um e-mail válido"))]
    pub email: Option<String>,

    pub ativo: bool,
}

impl Default for FilialForm {
    fn default() -> Self {
        Self {
            nome: String::new(),
            logradouro: String::new(),
            numero: String::new(),
            complemento: None,
            bairro: String::new(),
            cidade: String::new(),
            estado: String::new(),
            cep: String::new(),
            telefone: None,
            email: None,
            ativo: true,
        }
    }
}

impl FilialForm {
    pub fn normalized(&self) -> Self {
        Self {
            nome: self.nome.trim().to_string(),
            logradouro: self.logradouro.trim().to_string(),
            numero: self.numero.trim().to_string(),
            complemento: trimmed_option(self.complemento.clone()),
            bairro: self.bairro.trim().to_string(),
            cidade: self.cidade.trim().to_string(),
            estado: self.estado.trim().to_ascii_uppercase(),
            cep: normalize_cep(&self.cep),
            telefone: trimmed_option(self.telefone.clone()),
            email: trimmed_option(self.email.clone()),
            ativo: self.ativo,
        }
    }

    pub fn check(&self) -> Result<Self> {
        let form = self.normalized();
        let report = match form.validate() {
            Ok(()) => ValidationReport::new(),
            Err(errors) => errors.into(),
        };
        report.into_result()?;
        Ok(form)
    }

    pub fn endereco(&self) -> Endereco {
        Endereco {
            logradouro: self.logradouro.clone(),
            numero: self.numero.clone(),
            complemento: self.complemento.clone(),
            bairro: self.bairro.clone(),
            cidade: self.cidade.clone(),
            estado: self.estado.clone(),
            cep: self.cep.clone(),
        }
    }

    pub fn into_filial(self, id: impl Into<String>) -> Result<Filial> {
        let form = self.check()?;
        let mut filial = Filial::new(id, form.nome.clone(), form.endereco());
        filial.telefone = form.telefone;
        filial.email = form.email;
        filial.ativo = form.ativo;
        Ok(filial)
    }
}

impl From<&Filial> for FilialForm {
    fn from(filial: &Filial) -> Self {
        let endereco = &filial.endereco;
        Self {
            nome: filial.nome.clone(),
            logradouro: endereco.logradouro.clone(),
            numero: endereco.numero.clone(),
            complemento: endereco.complemento.clone(),
            bairro: endereco.bairro.clone(),
            cidade: endereco.cidade.clone(),
            estado: endereco.estado.clone(),
            cep: endereco.cep.clone(),
            telefone: filial.telefone.clone(),
            email: filial.email.clone(),
            ativo: filial.ativo,
        }
    }
}

// ============================================================================
// Manutencao form
// ============================================================================

/// Maintenance record form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ManutencaoForm {
    #[validate(length(min = 1, message = "Selecione uma moto"))]
    pub moto_id: String,

    pub tipo: TipoManutencao,

    /// Required when `tipo` is `outro`
    pub motivo_outro: Option<String>,

    /// `DD/MM/YYYY`
    #[validate(custom = "validate_data")]
    pub data: String,

    #[validate(length(max = 500, message = "As observações devem ter no máximo 500 caracteres"))]
    pub observacoes: String,
}

impl ManutencaoForm {
    pub fn normalized(&self) -> Self {
        let motivo_outro = match self.tipo {
            TipoManutencao::Outro => trimmed_option(self.motivo_outro.clone()),
            _ => None,
        };

        Self {
            moto_id: self.moto_id.trim().to_string(),
            tipo: self.tipo,
            motivo_outro,
            data: self.data.trim().to_string(),
            observacoes: self.observacoes.trim().to_string(),
        }
    }

    pub fn check(&self) -> Result<Self> {
        let form = self.normalized();
        let mut report = match form.validate() {
            Ok(()) => ValidationReport::new(),
            Err(errors) => errors.into(),
        };

        if form.tipo == TipoManutencao::Outro && form.motivo_outro.is_none() {
            report.add("motivo_outro", "Descreva o motivo da manutenção");
        }

        report.into_result()?;
        Ok(form)
    }

    pub fn into_manutencao(self, id: impl Into<String>) -> Result<Manutencao> {
        let form = self.check()?;
        Ok(Manutencao {
            id: id.into(),
            moto_id: form.moto_id,
            tipo: form.tipo,
            motivo_outro: form.motivo_outro,
            data: form.data,
            observacoes: form.observacoes,
        })
    }
}
