use chrono::Utc;
use serde::{Deserialize, Serialize};

// ============ Lookup API Models ============

/// Raw benefit record as returned by the IN100 balance lookup service.
///
/// Every field is optional: an absent field means "unknown", never an error.
/// A 204 response is modeled as `RawBenefitRecord::default()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBenefitRecord {
    /// Benefit number (NB) being queried.
    pub benefit_number: Option<String>,
    /// CPF of the benefit holder.
    pub document_number: Option<String>,
    /// Holder's full name.
    pub name: Option<String>,
    /// Federation state (UF).
    pub state: Option<String>,
    /// Alimony flag, `payer` when the holder pays alimony.
    pub alimony: Option<String>,
    /// Birth date as a compact `DDMMYYYY` digit string.
    pub birth_date: Option<String>,
    /// Coded block type (`not_blocked`, `blocked_*`, ...).
    pub block_type: Option<String>,
    /// Benefit grant date.
    pub grant_date: Option<String>,
    /// Benefit end date, when the benefit has a term.
    pub benefit_end_date: Option<String>,
    /// Coded credit type (`checking_account` or a card code).
    pub credit_type: Option<String>,
    /// Coded eligibility status (`elegible` / `inelegible`, upstream spelling).
    pub benefit_status: Option<String>,
    pub benefit_card_limit: Option<f64>,
    pub benefit_card_balance: Option<f64>,
    pub consigned_card_limit: Option<f64>,
    pub consigned_card_balance: Option<f64>,
    pub consigned_credit_balance: Option<f64>,
    pub max_total_balance: Option<f64>,
    pub used_total_balance: Option<f64>,
    pub available_total_balance: Option<f64>,
    pub number_of_portabilities: Option<u32>,
    pub number_of_active_reservations: Option<u32>,
    /// Name of the legal representative, when the holder has one.
    pub legal_representative_name: Option<String>,
    /// Account the benefit is disbursed to.
    pub disbursement_bank_account: Option<DisbursementBankAccount>,
    /// Timestamp the query was submitted upstream.
    pub query_date: Option<String>,
    /// Timestamp the upstream answer was produced.
    pub query_return_date: Option<String>,
    /// Upstream processing time, free-form.
    pub query_return_time: Option<String>,
}

/// Disbursement account sub-record of the raw payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DisbursementBankAccount {
    /// Numeric bank code as a string (e.g. "104").
    pub bank: Option<String>,
    pub branch: Option<String>,
    pub number: Option<String>,
    pub digit: Option<String>,
}

/// Bank registry payload: resolves a numeric bank code to its full name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankInfo {
    pub code: Option<i64>,
    pub full_name: Option<String>,
}

// ============ Normalized Record ============

/// Display-ready rendition of a [`RawBenefitRecord`].
///
/// Every field is a non-empty string (placeholder `"-"` for unknowns) except
/// `active_reservations`, which keeps the numeric count for the warning
/// threshold in the presentation layer. This is the long-lived artifact: it
/// is what gets displayed, copied and persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBenefitRecord {
    pub benefit_number: String,
    pub document_number: String,
    pub name: String,
    pub state: String,
    /// `SIM` / `NÃO`.
    pub alimony: String,
    /// `DD/MM/YYYY`.
    pub birth_date: String,
    /// Whole years, or `-` when the birth date is unusable.
    pub age: String,
    pub block_type: String,
    pub grant_date: String,
    pub benefit_end_date: String,
    pub credit_type: String,
    pub benefit_status: String,
    /// BRL-formatted amounts (`R$ 1.234,50`).
    pub benefit_card_limit: String,
    pub benefit_card_balance: String,
    pub consigned_card_limit: String,
    pub consigned_card_balance: String,
    pub consigned_credit_balance: String,
    pub max_total_balance: String,
    pub used_total_balance: String,
    pub available_total_balance: String,
    pub number_of_portabilities: String,
    /// Retained numerically for the reservation warning threshold.
    pub active_reservations: Option<u32>,
    pub legal_representative_name: String,
    /// Raw bank code until enrichment resolves `"{code} - {full name}"`.
    pub disbursement_bank: String,
    pub disbursement_branch: String,
    pub disbursement_account: String,
    pub disbursement_account_digit: String,
    pub query_date: String,
    pub query_return_date: String,
    pub query_return_time: String,
}

// ============ HTTP API Models ============

/// Request body for `POST /api/v1/queries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// CPF of the benefit holder.
    pub identity: String,
    /// Benefit number (NB).
    pub benefit_number: String,
    /// Upstream finder polling attempts. Defaults to 60.
    pub attempts: Option<u32>,
    /// Upstream lookback window in days. Defaults to 0.
    pub last_days: Option<u32>,
}

impl QueryRequest {
    pub fn attempts_or_default(&self) -> u32 {
        self.attempts.unwrap_or(60)
    }

    pub fn last_days_or_default(&self) -> u32 {
        self.last_days.unwrap_or(0)
    }
}

/// Response body for `POST /api/v1/queries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub record: NormalizedBenefitRecord,
    /// Ordered presentation rows; the same sequence backs the clipboard text.
    pub rows: Vec<crate::export::ExportRow>,
    /// Informational (non-error) notice, e.g. the 204 "found, no data" case.
    pub notice: Option<String>,
    /// True when a newer query took over the display slot while this one ran.
    pub superseded: bool,
}

// ============ Persistence Model ============

/// Denormalized row persisted to the hosted `consultas_inss` table.
///
/// Column names follow the existing table schema (Portuguese). Values come
/// from the normalized + enriched record, so the persisted copy matches what
/// the operator saw on screen. Upserts are keyed by
/// `(numero_beneficio, numero_documento)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultaRow {
    pub numero_beneficio: String,
    pub numero_documento: String,
    pub nome: String,
    pub estado: String,
    pub pensao: String,
    pub data_nascimento: String,
    pub tipo_bloqueio: String,
    pub data_concessao: String,
    pub tipo_credito: String,
    pub status_beneficio: String,
    pub data_fim_beneficio: String,
    pub limite_cartao_beneficio: String,
    pub saldo_cartao_beneficio: String,
    pub limite_cartao_consignado: String,
    pub saldo_cartao_consignado: String,
    pub saldo_credito_consignado: String,
    pub saldo_total_maximo: String,
    pub saldo_total_utilizado: String,
    pub saldo_total_disponivel: String,
    pub data_consulta: String,
    pub data_retorno_consulta: String,
    pub tempo_retorno_consulta: String,
    pub nome_representante_legal: String,
    pub banco_desembolso: String,
    pub agencia_desembolso: String,
    pub numero_conta_desembolso: String,
    pub digito_conta_desembolso: String,
    pub numero_portabilidades: String,
    pub ip_origem: String,
    pub data_hora_registro: String,
    pub nome_arquivo: String,
}

impl ConsultaRow {
    /// Builds the persistence row for a normalized record.
    pub fn from_normalized(record: &NormalizedBenefitRecord, origin_ip: &str) -> Self {
        Self {
            numero_beneficio: record.benefit_number.clone(),
            numero_documento: record.document_number.clone(),
            nome: record.name.clone(),
            estado: record.state.clone(),
            pensao: record.alimony.clone(),
            data_nascimento: record.birth_date.clone(),
            tipo_bloqueio: record.block_type.clone(),
            data_concessao: record.grant_date.clone(),
            tipo_credito: record.credit_type.clone(),
            status_beneficio: record.benefit_status.clone(),
            data_fim_beneficio: record.benefit_end_date.clone(),
            limite_cartao_beneficio: record.benefit_card_limit.clone(),
            saldo_cartao_beneficio: record.benefit_card_balance.clone(),
            limite_cartao_consignado: record.consigned_card_limit.clone(),
            saldo_cartao_consignado: record.consigned_card_balance.clone(),
            saldo_credito_consignado: record.consigned_credit_balance.clone(),
            saldo_total_maximo: record.max_total_balance.clone(),
            saldo_total_utilizado: record.used_total_balance.clone(),
            saldo_total_disponivel: record.available_total_balance.clone(),
            data_consulta: record.query_date.clone(),
            data_retorno_consulta: record.query_return_date.clone(),
            tempo_retorno_consulta: record.query_return_time.clone(),
            nome_representante_legal: record.legal_representative_name.clone(),
            banco_desembolso: record.disbursement_bank.clone(),
            agencia_desembolso: record.disbursement_branch.clone(),
            numero_conta_desembolso: record.disbursement_account.clone(),
            digito_conta_desembolso: record.disbursement_account_digit.clone(),
            numero_portabilidades: record.number_of_portabilities.clone(),
            ip_origem: origin_ip.to_string(),
            data_hora_registro: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            nome_arquivo: "consulta_pontual".to_string(),
        }
    }
}
