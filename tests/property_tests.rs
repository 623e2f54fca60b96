/// Property-based tests using proptest
/// Tests invariants of normalization: totality, idempotence and the
/// placeholder policy.
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_in100_api::format::{calculate_age_at, format_currency, format_date};
use rust_in100_api::models::{DisbursementBankAccount, RawBenefitRecord};
use rust_in100_api::normalize::normalize_at;
use rust_in100_api::translate::{
    translate_alimony, translate_benefit_status, translate_block_type, translate_credit_type,
};

fn opt_text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("\\PC{0,24}")
}

fn opt_money() -> impl Strategy<Value = Option<f64>> {
    proptest::option::of(-1e9..1e9f64)
}

fn opt_count() -> impl Strategy<Value = Option<u32>> {
    proptest::option::of(0u32..100)
}

prop_compose! {
    fn raw_record_strategy()(
        identity in (
            opt_text(), opt_text(), opt_text(), opt_text(), opt_text(), opt_text(),
        ),
        codes in (
            opt_text(), opt_text(), opt_text(), opt_text(), opt_text(),
        ),
        money in (
            opt_money(), opt_money(), opt_money(), opt_money(),
            opt_money(), opt_money(), opt_money(), opt_money(),
        ),
        counts in (opt_count(), opt_count()),
        account in proptest::option::of((opt_text(), opt_text(), opt_text(), opt_text())),
        meta in (opt_text(), opt_text(), opt_text(), opt_text()),
    ) -> RawBenefitRecord {
        let (benefit_number, document_number, name, state, alimony, birth_date) = identity;
        let (block_type, grant_date, benefit_end_date, credit_type, benefit_status) = codes;
        let (benefit_card_limit, benefit_card_balance, consigned_card_limit, consigned_card_balance,
             consigned_credit_balance, max_total_balance, used_total_balance, available_total_balance) = money;
        let (number_of_portabilities, number_of_active_reservations) = counts;
        let (query_date, query_return_date, query_return_time, legal_representative_name) = meta;

        RawBenefitRecord {
            benefit_number,
            document_number,
            name,
            state,
            alimony,
            birth_date,
            block_type,
            grant_date,
            benefit_end_date,
            credit_type,
            benefit_status,
            benefit_card_limit,
            benefit_card_balance,
            consigned_card_limit,
            consigned_card_balance,
            consigned_credit_balance,
            max_total_balance,
            used_total_balance,
            available_total_balance,
            number_of_portabilities,
            number_of_active_reservations,
            legal_representative_name,
            disbursement_bank_account: account.map(|(bank, branch, number, digit)| {
                DisbursementBankAccount { bank, branch, number, digit }
            }),
            query_date,
            query_return_date,
            query_return_time,
        }
    }
}

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

proptest! {
    // Normalization is total: no input panics, and no field is ever empty,
    // so the UI never renders undefined/null/"".
    #[test]
    fn normalize_is_total_and_never_yields_empty_fields(raw in raw_record_strategy()) {
        let record = normalize_at(&raw, fixed_today());
        let fields = [
            &record.benefit_number, &record.document_number, &record.name,
            &record.state, &record.alimony, &record.birth_date, &record.age,
            &record.block_type, &record.grant_date, &record.benefit_end_date,
            &record.credit_type, &record.benefit_status,
            &record.benefit_card_limit, &record.benefit_card_balance,
            &record.consigned_card_limit, &record.consigned_card_balance,
            &record.consigned_credit_balance, &record.max_total_balance,
            &record.used_total_balance, &record.available_total_balance,
            &record.number_of_portabilities, &record.legal_representative_name,
            &record.disbursement_bank, &record.disbursement_branch,
            &record.disbursement_account, &record.disbursement_account_digit,
            &record.query_date, &record.query_return_date, &record.query_return_time,
        ];
        for field in fields {
            prop_assert!(!field.is_empty(), "normalized field may never be empty");
        }
    }

    #[test]
    fn normalize_is_idempotent_on_the_same_source(raw in raw_record_strategy()) {
        let first = normalize_at(&raw, fixed_today());
        let second = normalize_at(&raw, fixed_today());
        prop_assert_eq!(first, second);
    }

    // Absent numeric fields must be visually distinct from zero balances.
    #[test]
    fn absent_money_is_placeholder_not_zero(raw in raw_record_strategy()) {
        let record = normalize_at(&raw, fixed_today());
        if raw.benefit_card_balance.is_none() {
            prop_assert_eq!(record.benefit_card_balance.as_str(), "-");
        } else {
            let unsigned = record
                .benefit_card_balance
                .strip_prefix('-')
                .unwrap_or(&record.benefit_card_balance);
            prop_assert!(unsigned.starts_with("R$ "));
        }
    }
}

proptest! {
    #[test]
    fn formatters_never_panic(input in proptest::option::of("\\PC{0,32}")) {
        let _ = format_date(input.as_deref());
        let _ = calculate_age_at(input.as_deref(), fixed_today());
        let _ = translate_block_type(input.as_deref());
        let _ = translate_credit_type(input.as_deref());
        let _ = translate_benefit_status(input.as_deref());
        let _ = translate_alimony(input.as_deref());
    }

    // The 8-digit path slices positionally, always DD/MM/YYYY.
    #[test]
    fn eight_digit_dates_slice_positionally(raw in "[0-9]{8}") {
        let formatted = format_date(Some(&raw));
        prop_assert_eq!(formatted.len(), 10);
        prop_assert_eq!(&formatted[0..2], &raw[0..2]);
        prop_assert_eq!(&formatted[3..5], &raw[2..4]);
        prop_assert_eq!(&formatted[6..10], &raw[4..8]);
    }

    #[test]
    fn currency_is_well_formed_brl(value in -1e12..1e12f64) {
        let formatted = format_currency(Some(value));
        // Sign precedes the currency symbol, pt-BR style
        let unsigned = formatted.strip_prefix('-').unwrap_or(&formatted);
        prop_assert!(unsigned.starts_with("R$ "));
        // Two decimals after the comma
        let decimals = formatted.rsplit(',').next().unwrap();
        prop_assert_eq!(decimals.len(), 2);
        prop_assert!(decimals.bytes().all(|b| b.is_ascii_digit()));
        // Thousands groups between separators are exactly three digits
        let integer_part = unsigned
            .trim_start_matches("R$ ")
            .rsplit_once(',')
            .unwrap()
            .0
            .to_string();
        let groups: Vec<&str> = integer_part.split('.').collect();
        for (i, group) in groups.iter().enumerate() {
            if i == 0 {
                prop_assert!(group.len() >= 1 && group.len() <= 3);
            } else {
                prop_assert_eq!(group.len(), 3);
            }
        }
    }

    // Age is either the placeholder or a plausible whole-year count.
    #[test]
    fn age_of_valid_dates_is_bounded(day in 1u32..=28, month in 1u32..=12, year in 1900i32..=2025) {
        let raw = format!("{:02}{:02}{:04}", day, month, year);
        let age = calculate_age_at(Some(&raw), fixed_today());
        let parsed: i64 = age.parse().expect("valid 8-digit dates always yield an age");
        prop_assert!((-1..=125).contains(&parsed));
    }
}
