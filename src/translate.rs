//! Translation of the lookup API's coded enums into display labels.
//!
//! The upstream service encodes business states as free-form strings with no
//! contractual casing, so every translator trims and lowercases before
//! matching. Each table has an explicit fallback; the fallbacks differ on
//! purpose (an unknown benefit status means "blocked", an unknown block type
//! is worth showing verbatim).

use crate::format::PLACEHOLDER;

/// Translates the `blockType` code.
///
/// `not_blocked` → `Nenhum`; anything containing `blocked` → `Bloqueado`;
/// other non-empty values pass through verbatim; absent → `-`.
pub fn translate_block_type(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return PLACEHOLDER.to_string();
    };
    let code = raw.trim().to_lowercase();
    if code.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if code == "not_blocked" {
        return "Nenhum".to_string();
    }
    if code.contains("blocked") {
        return "Bloqueado".to_string();
    }
    raw.to_string()
}

/// Translates the `creditType` code.
///
/// `checking_account` → `Conta Corrente`; any other present value is assumed
/// to be a magnetic card; true absence yields the placeholder.
pub fn translate_credit_type(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return PLACEHOLDER.to_string();
    };
    let code = raw.trim().to_lowercase();
    if code.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if code == "checking_account" {
        "Conta Corrente".to_string()
    } else {
        "Cartão Magnético".to_string()
    }
}

/// Translates the `benefitStatus` code.
///
/// `elegible` → `Elegível`, `inelegible` → `Inelegível`; any other value,
/// including absence, is treated as blocked. The upstream misspellings are
/// the actual wire codes.
pub fn translate_benefit_status(raw: Option<&str>) -> String {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("elegible") => "Elegível".to_string(),
        Some("inelegible") => "Inelegível".to_string(),
        _ => "Bloqueado".to_string(),
    }
}

/// Translates the alimony flag: `payer` → `SIM`, anything else → `NÃO`.
pub fn translate_alimony(raw: Option<&str>) -> String {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("payer") => "SIM".to_string(),
        _ => "NÃO".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_type_matching_is_defensive() {
        assert_eq!(translate_block_type(Some("not_blocked")), "Nenhum");
        assert_eq!(translate_block_type(Some("NOT_BLOCKED ")), "Nenhum");
        assert_eq!(translate_block_type(Some("hard_blocked")), "Bloqueado");
        assert_eq!(translate_block_type(Some(" Blocked_By_Judge ")), "Bloqueado");
    }

    #[test]
    fn unknown_block_type_passes_through() {
        assert_eq!(translate_block_type(Some("under_review")), "under_review");
        assert_eq!(translate_block_type(Some("")), "-");
        assert_eq!(translate_block_type(Some("   ")), "-");
        assert_eq!(translate_block_type(None), "-");
    }

    #[test]
    fn credit_type_defaults_to_magnetic_card_when_present() {
        assert_eq!(translate_credit_type(Some("checking_account")), "Conta Corrente");
        assert_eq!(translate_credit_type(Some("CHECKING_ACCOUNT ")), "Conta Corrente");
        assert_eq!(translate_credit_type(Some("magnetic_card")), "Cartão Magnético");
        assert_eq!(translate_credit_type(Some("whatever")), "Cartão Magnético");
    }

    #[test]
    fn credit_type_absence_is_placeholder() {
        assert_eq!(translate_credit_type(None), "-");
        assert_eq!(translate_credit_type(Some("")), "-");
    }

    #[test]
    fn benefit_status_fallback_is_blocked() {
        assert_eq!(translate_benefit_status(Some("elegible")), "Elegível");
        assert_eq!(translate_benefit_status(Some(" ELEGIBLE ")), "Elegível");
        assert_eq!(translate_benefit_status(Some("inelegible")), "Inelegível");
        assert_eq!(translate_benefit_status(Some("anything")), "Bloqueado");
        assert_eq!(translate_benefit_status(None), "Bloqueado");
    }

    #[test]
    fn alimony_flag() {
        assert_eq!(translate_alimony(Some("payer")), "SIM");
        assert_eq!(translate_alimony(Some("PAYER ")), "SIM");
        assert_eq!(translate_alimony(Some("none")), "NÃO");
        assert_eq!(translate_alimony(None), "NÃO");
    }
}
