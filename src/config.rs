//! Pipeline configuration (spec §6 "Configuration (enumerated)").

use std::time::Duration;

use std::sync::Arc;

use crate::adjust::{InflationAdjuster, SeasonalAdjuster};
use crate::classify::{ExemptionRule, UnitOverrideRule};
use crate::fx::{FxCache, FxProvider};
use crate::orchestrator::QualityReviewEvent;
use crate::quality::{QualityScore, ScaleOutlierOptions};
use crate::target::CurrencyTieBreak;
use crate::types::{FxTable, Magnitude, TimeScale};

/// Which dimensions the auto-target selector resolves for a given run
/// (spec §4.3 "a dimension set (subset of {currency, magnitude, time})").
#[derive(Debug, Clone, Copy)]
pub struct AutoTargetDimensions {
    pub currency: bool,
    pub magnitude: bool,
    pub time: bool,
}

impl Default for AutoTargetDimensions {
    fn default() -> Self {
        AutoTargetDimensions {
            currency: true,
            magnitude: true,
            time: true,
        }
    }
}

pub const DEFAULT_PIPELINE_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_FX_CACHE_TTL: Duration = Duration::from_secs(300);

/// Every configuration knob named in spec §6, gathered into one struct with
/// a `Default` impl and fluent builder (`ProcessOptionsBuilder`), following
/// the teacher's `with_*`-returning-`Self` builder convention.
///
/// Not `Serialize`/`Deserialize`: the `on_progress`/`on_warning`/`on_error`
/// callback fields are `Box<dyn Fn>` and cannot derive serde impls. Every
/// other field is plain data; callers needing a serializable configuration
/// surface should serialize the data fields directly rather than this
/// struct as a whole (noted in `DESIGN.md`).
pub struct ProcessOptions {
    pub min_quality_score: f64,
    pub target_currency: Option<String>,
    pub target_magnitude: Option<Magnitude>,
    pub target_time_scale: Option<TimeScale>,
    pub infer_units: bool,
    pub adjust_inflation: bool,
    pub remove_seasonality: bool,
    pub use_live_fx: bool,
    pub fx_fallback: Option<FxTable>,
    pub validate_schema: bool,
    pub required_fields: Vec<String>,
    pub exclude_index_values: bool,
    pub include_wage_metadata: bool,
    pub explain: bool,

    pub auto_target_by_indicator: bool,
    pub auto_target_dimensions: AutoTargetDimensions,
    pub min_majority_share: f64,
    pub indicator_key_field: String,
    pub currency_tie_break: CurrencyTieBreak,
    pub allow_list: Option<Vec<String>>,
    pub deny_list: Option<Vec<String>>,

    pub exemptions: Vec<ExemptionRule>,
    pub unit_overrides: Vec<UnitOverrideRule>,

    pub detect_scale_outliers: bool,
    pub scale_outlier_options: ScaleOutlierOptions,

    /// The injectable live-FX collaborator (spec §1, §4.10). `None` means
    /// only `fx_fallback` is ever consulted, regardless of `use_live_fx`.
    pub fx_provider: Option<Arc<dyn FxProvider>>,

    /// The in-process `(base, as-of-bucket)` TTL cache live resolutions go
    /// through (spec §5). Defaults to a private per-`ProcessOptions`
    /// cache; pass the same `Arc<FxCache>` to multiple option sets via
    /// `with_fx_cache` so concurrent pipelines share one fetch.
    pub fx_cache: Arc<FxCache>,

    /// Opaque CPI-lookup collaborator (spec §4.14). Defaults to a no-op
    /// passthrough at call time when `adjust_inflation` is set and this
    /// is `None`.
    pub inflation_adjuster: Option<Arc<dyn InflationAdjuster>>,
    /// Opaque seasonal-decomposition collaborator (spec §4.14). Defaults
    /// to a no-op passthrough at call time when `remove_seasonality` is
    /// set and this is `None`.
    pub seasonal_adjuster: Option<Arc<dyn SeasonalAdjuster>>,

    /// Decides the outcome of `qualityReview` (spec §4.11) for
    /// `process_economic_data`. Ignored by `process_economic_data_auto`,
    /// which always resolves to `Continue`. Defaults to `Abort` when
    /// unset, the conservative choice for a library that cannot itself
    /// prompt a human for CONTINUE/ABORT/FIX (see `DESIGN.md`).
    pub quality_review_policy: Option<Box<dyn Fn(&QualityScore) -> QualityReviewEvent + Send + Sync>>,

    pub on_progress: Option<Box<dyn Fn(&str, i32) + Send + Sync>>,
    pub on_warning: Option<Box<dyn Fn(&str) + Send + Sync>>,
    pub on_error: Option<Box<dyn Fn(&crate::error::EconifyError) + Send + Sync>>,

    pub pipeline_timeout: Duration,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            min_quality_score: 70.0,
            target_currency: None,
            target_magnitude: None,
            target_time_scale: None,
            infer_units: false,
            adjust_inflation: false,
            remove_seasonality: false,
            use_live_fx: false,
            fx_fallback: None,
            validate_schema: false,
            required_fields: Vec::new(),
            exclude_index_values: false,
            include_wage_metadata: false,
            explain: true,

            auto_target_by_indicator: false,
            auto_target_dimensions: AutoTargetDimensions::default(),
            min_majority_share: 0.5,
            indicator_key_field: "name".to_string(),
            currency_tie_break: CurrencyTieBreak::PreferTargetCurrency,
            allow_list: None,
            deny_list: None,

            exemptions: Vec::new(),
            unit_overrides: Vec::new(),

            detect_scale_outliers: false,
            scale_outlier_options: ScaleOutlierOptions::default(),

            fx_provider: None,
            fx_cache: Arc::new(FxCache::new(DEFAULT_FX_CACHE_TTL)),
            inflation_adjuster: None,
            seasonal_adjuster: None,
            quality_review_policy: None,

            on_progress: None,
            on_warning: None,
            on_error: None,

            pipeline_timeout: DEFAULT_PIPELINE_TIMEOUT,
        }
    }
}

/// Fluent builder for [`ProcessOptions`], in the spirit of the teacher's
/// `with_*`-returning-`Self` bot/env builders.
#[derive(Default)]
pub struct ProcessOptionsBuilder {
    options: ProcessOptions,
}

impl ProcessOptionsBuilder {
    pub fn new() -> Self {
        ProcessOptionsBuilder::default()
    }

    pub fn with_min_quality_score(mut self, score: f64) -> Self {
        self.options.min_quality_score = score;
        self
    }

    pub fn with_target_currency(mut self, currency: impl Into<String>) -> Self {
        self.options.target_currency = Some(currency.into());
        self
    }

    pub fn with_target_magnitude(mut self, magnitude: Magnitude) -> Self {
        self.options.target_magnitude = Some(magnitude);
        self
    }

    pub fn with_target_time_scale(mut self, time_scale: TimeScale) -> Self {
        self.options.target_time_scale = Some(time_scale);
        self
    }

    pub fn with_use_live_fx(mut self, use_live: bool) -> Self {
        self.options.use_live_fx = use_live;
        self
    }

    pub fn with_fx_fallback(mut self, table: FxTable) -> Self {
        self.options.fx_fallback = Some(table);
        self
    }

    pub fn with_auto_target_by_indicator(mut self, enabled: bool) -> Self {
        self.options.auto_target_by_indicator = enabled;
        self
    }

    pub fn with_min_majority_share(mut self, share: f64) -> Self {
        self.options.min_majority_share = share;
        self
    }

    pub fn with_allow_list(mut self, keys: Vec<String>) -> Self {
        self.options.allow_list = Some(keys);
        self
    }

    pub fn with_deny_list(mut self, keys: Vec<String>) -> Self {
        self.options.deny_list = Some(keys);
        self
    }

    pub fn with_exemptions(mut self, exemptions: Vec<ExemptionRule>) -> Self {
        self.options.exemptions = exemptions;
        self
    }

    pub fn with_unit_overrides(mut self, overrides: Vec<UnitOverrideRule>) -> Self {
        self.options.unit_overrides = overrides;
        self
    }

    pub fn with_detect_scale_outliers(mut self, enabled: bool) -> Self {
        self.options.detect_scale_outliers = enabled;
        self
    }

    pub fn with_scale_outlier_options(mut self, options: ScaleOutlierOptions) -> Self {
        self.options.scale_outlier_options = options;
        self
    }

    pub fn with_exclude_index_values(mut self, enabled: bool) -> Self {
        self.options.exclude_index_values = enabled;
        self
    }

    pub fn with_explain(mut self, enabled: bool) -> Self {
        self.options.explain = enabled;
        self
    }

    pub fn with_fx_provider(mut self, provider: Arc<dyn FxProvider>) -> Self {
        self.options.fx_provider = Some(provider);
        self
    }

    pub fn with_fx_cache(mut self, cache: Arc<FxCache>) -> Self {
        self.options.fx_cache = cache;
        self
    }

    pub fn with_inflation_adjuster(mut self, adjuster: Arc<dyn InflationAdjuster>) -> Self {
        self.options.inflation_adjuster = Some(adjuster);
        self
    }

    pub fn with_seasonal_adjuster(mut self, adjuster: Arc<dyn SeasonalAdjuster>) -> Self {
        self.options.seasonal_adjuster = Some(adjuster);
        self
    }

    pub fn with_quality_review_policy(
        mut self,
        policy: impl Fn(&QualityScore) -> QualityReviewEvent + Send + Sync + 'static,
    ) -> Self {
        self.options.quality_review_policy = Some(Box::new(policy));
        self
    }

    pub fn with_pipeline_timeout(mut self, timeout: Duration) -> Self {
        self.options.pipeline_timeout = timeout;
        self
    }

    pub fn with_on_progress(mut self, callback: impl Fn(&str, i32) + Send + Sync + 'static) -> Self {
        self.options.on_progress = Some(Box::new(callback));
        self
    }

    pub fn with_on_warning(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.options.on_warning = Some(Box::new(callback));
        self
    }

    pub fn with_on_error(mut self, callback: impl Fn(&crate::error::EconifyError) + Send + Sync + 'static) -> Self {
        self.options.on_error = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> ProcessOptions {
        self.options
    }
}
