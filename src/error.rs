use thiserror::Error;

/// Crate-wide result alias.
pub type EconifyResult<T> = Result<T, EconifyError>;

/// Top-level error type for the normalization engine.
///
/// Mirrors the subsystem split of the pipeline itself: each variant wraps a
/// subsystem-specific error enum so callers can match on the stage that
/// failed without needing to know its internal variants.
#[derive(Debug, Error)]
pub enum EconifyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Fx(#[from] FxError),

    #[error(transparent)]
    Adjust(#[from] AdjustError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// Errors raised while validating raw input before parsing.
///
/// Fail-fast per spec §7 item (1): these terminate the pipeline.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no observations supplied")]
    NoData,

    #[error("observation {index} is missing required field '{field}'")]
    MissingField { index: usize, field: String },

    #[error("observation {index} has a non-numeric value")]
    NonNumericValue { index: usize },

    #[error("schema validation failed: {0}")]
    Schema(String),
}

/// Errors from domain classification.
///
/// Per spec §7 item (2), classification ambiguity is never fatal on its
/// own; this variant exists for malformed classifier configuration (e.g. a
/// malformed exemption rule), not for ambiguous items.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("invalid unit override rule: {0}")]
    InvalidUnitOverride(String),

    #[error("invalid exemption rule: {0}")]
    InvalidExemption(String),
}

/// Errors from the auto-target selector.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid indicator key field: {0}")]
    InvalidIndicatorKey(String),

    #[error("minMajorityShare out of range (0.0..=1.0): {0}")]
    InvalidMajorityShare(f64),
}

/// Errors from the domain-routed normalizer.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unsupported bucket for monetary normalization: {0}")]
    UnsupportedBucket(String),

    #[error("division by zero while computing {0} factor")]
    DivisionByZero(&'static str),
}

/// Errors from FX table acquisition.
///
/// Per spec §7 item (3), acquisition failure is recoverable: the
/// orchestrator catches this and falls back, emitting a warning rather
/// than propagating it.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("live FX provider failed: {0}")]
    LiveProviderFailed(String),

    #[error("no FX table available (neither live nor fallback configured)")]
    NoTableAvailable,

    #[error("FX table is missing a rate for currency '{0}'")]
    MissingRate(String),
}

/// Errors from inflation/seasonal adjustment.
///
/// Per spec §7 item (5), these are always downgraded to warnings by the
/// orchestrator; the type exists so adjuster implementations have
/// something concrete to return.
#[derive(Debug, Error)]
pub enum AdjustError {
    #[error("inflation adjustment failed: {0}")]
    Inflation(String),

    #[error("seasonal adjustment failed: {0}")]
    Seasonal(String),
}

/// Errors from the orchestrator state machine itself.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("pipeline timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("pipeline aborted by caller")]
    Aborted,

    #[error("pipeline aborted during quality review")]
    QualityReviewAborted,

    #[error("invalid transition from state '{from}' on event '{event}'")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },
}
