//! Presentation adapter: one ordered row sequence for both the on-screen
//! table and the clipboard export.
//!
//! Display/export parity is the contract here: whatever renderer consumes
//! these rows sees the same labels, the same order and the same values.

use crate::format::PLACEHOLDER;
use crate::models::NormalizedBenefitRecord;
use serde::{Deserialize, Serialize};

/// Active-reservation count at which the row is flagged for attention.
/// IN100 caps consignable reservations at nine.
pub const RESERVATION_WARN_THRESHOLD: u32 = 9;

/// Visual treatment hint for a presentation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStyle {
    Normal,
    Warning,
}

/// One `(label, value)` pair of the presentation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub label: String,
    pub value: String,
    pub style: RowStyle,
}

impl ExportRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            style: RowStyle::Normal,
        }
    }

    fn styled(label: &str, value: impl Into<String>, style: RowStyle) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            style,
        }
    }
}

fn blocked_style(value: &str) -> RowStyle {
    if value == "Bloqueado" {
        RowStyle::Warning
    } else {
        RowStyle::Normal
    }
}

/// Produces the fixed, ordered presentation sequence for a normalized record.
///
/// Identity fields first, then dates, then financial fields, then
/// representative/bank/portability fields, matching the original table
/// layout operators are used to.
pub fn presentation_rows(record: &NormalizedBenefitRecord) -> Vec<ExportRow> {
    let reservations = match record.active_reservations {
        Some(n) => n.to_string(),
        None => PLACEHOLDER.to_string(),
    };
    let reservation_style = match record.active_reservations {
        Some(n) if n >= RESERVATION_WARN_THRESHOLD => RowStyle::Warning,
        _ => RowStyle::Normal,
    };

    vec![
        ExportRow::new("Benefício", &record.benefit_number),
        ExportRow::new("CPF", &record.document_number),
        ExportRow::new("Nome", &record.name),
        ExportRow::new("Estado", &record.state),
        ExportRow::new("Pensão", &record.alimony),
        ExportRow::new("Data de Nascimento", &record.birth_date),
        ExportRow::new("Idade", &record.age),
        ExportRow::styled(
            "Tipo de Bloqueio",
            &record.block_type,
            blocked_style(&record.block_type),
        ),
        ExportRow::new("Data de Concessão", &record.grant_date),
        ExportRow::new("Data de Término do Benefício", &record.benefit_end_date),
        ExportRow::new("Tipo de Crédito", &record.credit_type),
        ExportRow::new("Margem Cartão", &record.consigned_card_balance),
        ExportRow::new("Cartão Benefício", &record.benefit_card_balance),
        ExportRow::new("Margem Disponível", &record.consigned_credit_balance),
        ExportRow::styled(
            "Status do Benefício",
            &record.benefit_status,
            blocked_style(&record.benefit_status),
        ),
        ExportRow::new(
            "Nome do Representante Legal",
            &record.legal_representative_name,
        ),
        ExportRow::new("Banco de Desembolso", &record.disbursement_bank),
        ExportRow::new("Agência de Desembolso", &record.disbursement_branch),
        ExportRow::new(
            "Número da Conta de Desembolso",
            &record.disbursement_account,
        ),
        ExportRow::new(
            "Dígito da Conta de Desembolso",
            &record.disbursement_account_digit,
        ),
        ExportRow::styled("Quantidade de Empréstimos", reservations, reservation_style),
    ]
}

/// Serializes presentation rows as clipboard text: `*label*: value`, one
/// field per line.
pub fn clipboard_text(rows: &[ExportRow]) -> String {
    rows.iter()
        .map(|row| format!("*{}*: {}", row.label, row.value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawBenefitRecord;
    use crate::normalize::normalize;

    fn blocked_record() -> NormalizedBenefitRecord {
        let mut record = normalize(&RawBenefitRecord::default());
        record.block_type = "Bloqueado".to_string();
        record.active_reservations = Some(9);
        record
    }

    #[test]
    fn row_order_is_fixed() {
        let rows = presentation_rows(&normalize(&RawBenefitRecord::default()));
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Benefício",
                "CPF",
                "Nome",
                "Estado",
                "Pensão",
                "Data de Nascimento",
                "Idade",
                "Tipo de Bloqueio",
                "Data de Concessão",
                "Data de Término do Benefício",
                "Tipo de Crédito",
                "Margem Cartão",
                "Cartão Benefício",
                "Margem Disponível",
                "Status do Benefício",
                "Nome do Representante Legal",
                "Banco de Desembolso",
                "Agência de Desembolso",
                "Número da Conta de Desembolso",
                "Dígito da Conta de Desembolso",
                "Quantidade de Empréstimos",
            ]
        );
    }

    #[test]
    fn clipboard_text_mirrors_rows() {
        let record = normalize(&RawBenefitRecord::default());
        let rows = presentation_rows(&record);
        let text = clipboard_text(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), rows.len());
        for (line, row) in lines.iter().zip(&rows) {
            assert_eq!(*line, format!("*{}*: {}", row.label, row.value));
        }
    }

    #[test]
    fn blocked_and_reservation_rows_get_warning_style() {
        let rows = presentation_rows(&blocked_record());
        let by_label = |label: &str| rows.iter().find(|r| r.label == label).unwrap();
        assert_eq!(by_label("Tipo de Bloqueio").style, RowStyle::Warning);
        // Empty record's status falls back to Bloqueado
        assert_eq!(by_label("Status do Benefício").style, RowStyle::Warning);
        assert_eq!(by_label("Quantidade de Empréstimos").style, RowStyle::Warning);
        assert_eq!(by_label("CPF").style, RowStyle::Normal);
    }

    #[test]
    fn reservations_below_threshold_are_normal() {
        let mut record = normalize(&RawBenefitRecord::default());
        record.active_reservations = Some(3);
        let rows = presentation_rows(&record);
        let row = rows
            .iter()
            .find(|r| r.label == "Quantidade de Empréstimos")
            .unwrap();
        assert_eq!(row.value, "3");
        assert_eq!(row.style, RowStyle::Normal);
    }
}
