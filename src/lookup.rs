//! Query orchestration: authentication, lookup, normalization, bank
//! enrichment and persistence dispatch, driven as an explicit state machine.
//!
//! Overlapping queries are resolved with a generation counter: every
//! invocation takes a fresh generation, and only the newest generation may
//! write the shared display slot. A superseded invocation still answers its
//! own caller, flagged as such, but never clobbers a newer result.

use crate::errors::AppError;
use crate::export::presentation_rows;
use crate::handlers::AppState;
use crate::models::{ConsultaRow, NormalizedBenefitRecord, QueryRequest, QueryResponse, RawBenefitRecord};
use crate::normalize::normalize;
use crate::services::LookupOutcome;
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Notice surfaced when the lookup answers 204: the benefit exists but the
/// upstream returned no data.
pub const EMPTY_RESULT_NOTICE: &str = "Consulta encontrada, porém sem dados retornados";

/// Phases of the query workflow. `Failed` is terminal for a given query;
/// a new submission starts over from `Authenticating`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPhase {
    #[default]
    Idle,
    Authenticating,
    Querying,
    Enriching,
    Persisting,
    Done,
    Failed,
}

/// The single "current displayed record" slot.
///
/// Exactly one writer at a time: only the newest query generation touches
/// this. `loading` is the explicit re-expression of the original UI's
/// loading overlay.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub record: Option<NormalizedBenefitRecord>,
    pub notice: Option<String>,
    pub loading: bool,
    pub phase: QueryPhase,
}

/// Advances the display slot to `phase` unless this generation has been
/// superseded.
///
/// The generation comparison happens while holding the write lock, so a
/// stale generation can never slip a write in between check and commit.
async fn set_phase(state: &AppState, generation: u64, phase: QueryPhase) {
    let mut display = state.display.write().await;
    if state.generation.load(Ordering::SeqCst) != generation {
        return;
    }
    display.phase = phase;
    display.loading = !matches!(phase, QueryPhase::Done | QueryPhase::Failed);
    tracing::debug!("Query phase → {:?}", phase);
}

/// Marks the query failed and clears the displayed record, unless superseded.
///
/// Only for lookup failures (not-found, service unavailable): the record on
/// screen described a benefit the user has navigated away from.
async fn fail_and_clear(state: &AppState, generation: u64) {
    let mut display = state.display.write().await;
    if state.generation.load(Ordering::SeqCst) != generation {
        return;
    }
    display.record = None;
    display.notice = None;
    display.loading = false;
    display.phase = QueryPhase::Failed;
}

/// Resolves the bank display string for a normalized record's bank code.
///
/// Lookups are cached per code; enrichment failure degrades to the raw code.
async fn enrich_bank(state: &AppState, record: &mut NormalizedBenefitRecord) {
    let code = record.disbursement_bank.clone();
    if code == crate::format::PLACEHOLDER {
        return;
    }

    let info = match state.bank_cache.get(&code).await {
        Some(cached) => cached,
        None => {
            let fetched = state.bank_registry.fetch_bank(&code).await;
            state.bank_cache.insert(code.clone(), fetched.clone()).await;
            fetched
        }
    };

    match info.and_then(|i| i.full_name) {
        Some(full_name) => {
            record.disbursement_bank = format!("{} - {}", code, full_name);
        }
        None => {
            tracing::warn!("Bank enrichment unavailable for code {}, keeping raw code", code);
        }
    }
}

/// Runs the full query workflow:
/// `Authenticating → Querying → Enriching → Persisting → Done`.
///
/// Errors returned here are exactly the user-visible taxonomy
/// (`AuthUnavailable`, `NotFound`, `ServiceUnavailable`); enrichment and
/// persistence failures degrade without aborting.
pub async fn run_query(
    state: Arc<AppState>,
    request: QueryRequest,
) -> Result<QueryResponse, AppError> {
    let generation = state.generation.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::info!(
        "Starting query workflow (generation {}) for benefit {}",
        generation,
        request.benefit_number
    );

    // Authenticating: hard precondition, the query is never sent without a
    // token in the credentials variant.
    set_phase(&state, generation, QueryPhase::Authenticating).await;
    let token = if state.benefit_api.requires_sign_in() {
        match state.benefit_api.sign_in().await {
            Ok(token) => Some(token),
            Err(e) => {
                // The lookup was never sent, so whatever record is on screen
                // is still valid; only the phase flips.
                set_phase(&state, generation, QueryPhase::Failed).await;
                return Err(e);
            }
        }
    } else {
        None
    };

    // Querying
    set_phase(&state, generation, QueryPhase::Querying).await;
    let outcome = match state
        .benefit_api
        .query_balances(&request, token.as_deref())
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            fail_and_clear(&state, generation).await;
            return Err(e);
        }
    };

    let (raw, notice) = match outcome {
        LookupOutcome::Record(record) => (*record, None),
        LookupOutcome::Empty => (
            RawBenefitRecord::default(),
            Some(EMPTY_RESULT_NOTICE.to_string()),
        ),
    };

    let mut record = normalize(&raw);

    // Enriching: non-blocking, failure keeps the raw bank code.
    set_phase(&state, generation, QueryPhase::Enriching).await;
    enrich_bank(&state, &mut record).await;

    // Persisting: fire-and-forget from the caller's perspective.
    set_phase(&state, generation, QueryPhase::Persisting).await;
    let row = ConsultaRow::from_normalized(&record, &state.origin_ip);
    if let Err(e) = state.persistence.upsert(&row).await {
        tracing::warn!("Persistence failed (result still displayed): {}", e);
    }

    // Done: commit to the display slot only if still the newest query. The
    // generation check holds the write lock so the decision and the write
    // are one atomic step.
    let superseded = {
        let mut display = state.display.write().await;
        if state.generation.load(Ordering::SeqCst) == generation {
            display.record = Some(record.clone());
            display.notice = notice.clone();
            display.loading = false;
            display.phase = QueryPhase::Done;
            false
        } else {
            true
        }
    };
    if superseded {
        tracing::info!(
            "Query generation {} superseded, not updating display",
            generation
        );
    }

    let rows = presentation_rows(&record);
    Ok(QueryResponse {
        record,
        rows,
        notice,
        superseded,
    })
}
