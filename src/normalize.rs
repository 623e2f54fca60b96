//! Record Normalizer: the single canonical raw → display mapping.
//!
//! The original front-end grew several drifted copies of this logic; this
//! module is the consolidated superset. [`normalize`] is pure and total: it
//! never fails, and every raw field maps to exactly one normalized field.

use crate::format::{calculate_age_at, format_currency, format_date, format_date_time, PLACEHOLDER};
use crate::models::{NormalizedBenefitRecord, RawBenefitRecord};
use crate::translate::{
    translate_alimony, translate_benefit_status, translate_block_type, translate_credit_type,
};
use chrono::{NaiveDate, Utc};

fn text(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn count(value: Option<u32>) -> String {
    value
        .map(|n| n.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Normalizes a raw benefit record into its display-ready form.
pub fn normalize(raw: &RawBenefitRecord) -> NormalizedBenefitRecord {
    normalize_at(raw, Utc::now().date_naive())
}

/// [`normalize`] with an injected "today" for the age computation.
pub fn normalize_at(raw: &RawBenefitRecord, today: NaiveDate) -> NormalizedBenefitRecord {
    let account = raw.disbursement_bank_account.as_ref();

    NormalizedBenefitRecord {
        benefit_number: text(raw.benefit_number.as_deref()),
        document_number: text(raw.document_number.as_deref()),
        name: text(raw.name.as_deref()),
        state: text(raw.state.as_deref()),
        alimony: translate_alimony(raw.alimony.as_deref()),
        birth_date: format_date(raw.birth_date.as_deref()),
        age: calculate_age_at(raw.birth_date.as_deref(), today),
        block_type: translate_block_type(raw.block_type.as_deref()),
        grant_date: format_date(raw.grant_date.as_deref()),
        benefit_end_date: format_date(raw.benefit_end_date.as_deref()),
        credit_type: translate_credit_type(raw.credit_type.as_deref()),
        benefit_status: translate_benefit_status(raw.benefit_status.as_deref()),
        benefit_card_limit: format_currency(raw.benefit_card_limit),
        benefit_card_balance: format_currency(raw.benefit_card_balance),
        consigned_card_limit: format_currency(raw.consigned_card_limit),
        consigned_card_balance: format_currency(raw.consigned_card_balance),
        consigned_credit_balance: format_currency(raw.consigned_credit_balance),
        max_total_balance: format_currency(raw.max_total_balance),
        used_total_balance: format_currency(raw.used_total_balance),
        available_total_balance: format_currency(raw.available_total_balance),
        number_of_portabilities: count(raw.number_of_portabilities),
        active_reservations: raw.number_of_active_reservations,
        legal_representative_name: text(raw.legal_representative_name.as_deref()),
        disbursement_bank: text(account.and_then(|a| a.bank.as_deref())),
        disbursement_branch: text(account.and_then(|a| a.branch.as_deref())),
        disbursement_account: text(account.and_then(|a| a.number.as_deref())),
        disbursement_account_digit: text(account.and_then(|a| a.digit.as_deref())),
        query_date: format_date_time(raw.query_date.as_deref()),
        query_return_date: format_date_time(raw.query_return_date.as_deref()),
        query_return_time: text(raw.query_return_time.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisbursementBankAccount;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn sample_raw() -> RawBenefitRecord {
        RawBenefitRecord {
            benefit_number: Some("1989097003".into()),
            document_number: Some("8674607845".into()),
            name: Some("Maria da Silva".into()),
            state: Some("SP".into()),
            alimony: Some("payer".into()),
            birth_date: Some("15031990".into()),
            block_type: Some("not_blocked".into()),
            grant_date: Some("05012010".into()),
            benefit_end_date: None,
            credit_type: Some("checking_account".into()),
            benefit_status: Some("elegible".into()),
            benefit_card_balance: Some(1234.5),
            consigned_card_balance: Some(0.0),
            consigned_credit_balance: Some(987.65),
            number_of_portabilities: Some(2),
            number_of_active_reservations: Some(3),
            legal_representative_name: None,
            disbursement_bank_account: Some(DisbursementBankAccount {
                bank: Some("104".into()),
                branch: Some("1234".into()),
                number: Some("567890".into()),
                digit: Some("1".into()),
            }),
            query_date: Some("2025-05-30T12:00:00Z".into()),
            ..Default::default()
        }
    }

    #[test]
    fn normalizes_full_record() {
        let record = normalize_at(&sample_raw(), today());
        assert_eq!(record.benefit_number, "1989097003");
        assert_eq!(record.alimony, "SIM");
        assert_eq!(record.birth_date, "15/03/1990");
        assert_eq!(record.age, "35");
        assert_eq!(record.block_type, "Nenhum");
        assert_eq!(record.grant_date, "05/01/2010");
        assert_eq!(record.benefit_end_date, "-");
        assert_eq!(record.credit_type, "Conta Corrente");
        assert_eq!(record.benefit_status, "Elegível");
        assert_eq!(record.benefit_card_balance, "R$ 1.234,50");
        // Zero balance is not the same as unknown
        assert_eq!(record.consigned_card_balance, "R$ 0,00");
        assert_eq!(record.active_reservations, Some(3));
        assert_eq!(record.disbursement_bank, "104");
        assert_eq!(record.query_date, "30/05/2025 12:00:00");
    }

    #[test]
    fn empty_record_normalizes_to_placeholders_and_fallbacks() {
        let record = normalize_at(&RawBenefitRecord::default(), today());
        assert_eq!(record.benefit_number, "-");
        assert_eq!(record.name, "-");
        assert_eq!(record.birth_date, "-");
        assert_eq!(record.age, "-");
        assert_eq!(record.benefit_card_balance, "-");
        assert_eq!(record.number_of_portabilities, "-");
        assert_eq!(record.disbursement_bank, "-");
        assert_eq!(record.active_reservations, None);
        // Enum fallbacks are labels, not placeholders
        assert_eq!(record.alimony, "NÃO");
        assert_eq!(record.benefit_status, "Bloqueado");
        assert_eq!(record.credit_type, "-");
    }

    #[test]
    fn normalization_is_idempotent_over_the_same_source() {
        let raw = sample_raw();
        assert_eq!(normalize_at(&raw, today()), normalize_at(&raw, today()));
    }

    #[test]
    fn whitespace_only_text_becomes_placeholder() {
        let raw = RawBenefitRecord {
            name: Some("   ".into()),
            state: Some("".into()),
            ..Default::default()
        };
        let record = normalize_at(&raw, today());
        assert_eq!(record.name, "-");
        assert_eq!(record.state, "-");
    }
}
