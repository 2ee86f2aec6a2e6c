//! Wire shapes and their adapters
//!
//! Motorcycles travel in the same camelCase shape as [`Moto`], minus the id
//! on writes. Branches travel with flat address fields and are folded into
//! the display shape ([`Filial`] with `endereco_completo`) on the way in.

use chrono::{DateTime, Utc};
use core_fleet::models::{deserialize_id, deserialize_timestamp};
use core_fleet::{Endereco, Filial, Moto, MotoStatus};
use serde::{Deserialize, Serialize};

/// Body of `POST /Moto` and `PUT /Moto/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotoPayload {
    pub placa: String,
    pub modelo: String,
    pub ano: i32,
    pub cor: String,
    pub filial_id: String,
    pub status: MotoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaga: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condutor: Option<String>,
}

impl From<&Moto> for MotoPayload {
    fn from(moto: &Moto) -> Self {
        Self {
            placa: moto.placa.clone(),
            modelo: moto.modelo.clone(),
            ano: moto.ano,
            cor: moto.cor.clone(),
            filial_id: moto.filial_id.clone(),
            status: moto.status,
            vaga: moto.vaga.clone(),
            condutor: moto.condutor.clone(),
        }
    }
}

/// Branch as the API sends it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilialDto {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub nome: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub numero: String,
    #[serde(default)]
    pub complemento: Option<String>,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub cidade: String,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_ativo")]
    pub ativo: bool,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub data_criacao: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub data_atualizacao: Option<DateTime<Utc>>,
}

fn default_ativo() -> bool {
    true
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<FilialDto> for Filial {
    fn from(dto: FilialDto) -> Self {
        let endereco = Endereco {
            logradouro: dto.logradouro,
            numero: dto.numero,
            complemento: non_blank(dto.complemento),
            bairro: dto.bairro,
            cidade: dto.cidade,
            estado: dto.estado,
            cep: dto.cep,
        };
        let mut filial = Filial::new(dto.id, dto.nome, endereco);
        filial.telefone = non_blank(dto.telefone);
        filial.email = non_blank(dto.email);
        filial.ativo = dto.ativo;
        filial.data_criacao = dto.data_criacao;
        filial.data_atualizacao = dto.data_atualizacao;
        filial
    }
}

/// Body of `POST /v1/filial` and `PUT /v1/filial/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilialPayload {
    pub nome: String,
    pub logradouro: String,
    pub numero: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub ativo: bool,
}

impl From<&Filial> for FilialPayload {
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

/// Either a bare array or a page object wrapping one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Items(Vec<T>),
    Page {
        #[serde(alias = "data", alias = "content")]
        items: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Items(items) | Self::Page { items } => items,
        }
    }
}
