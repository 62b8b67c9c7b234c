use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The domain bucket an observation is routed into by the classifier
/// (spec §3 Bucket, §4.2).
///
/// Each variant maps to exactly one normalizer in [`crate::normalize`]
/// except [`BucketKind::Exempt`], which bypasses normalization entirely.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum BucketKind {
    MonetaryFlow,
    MonetaryStock,
    Wages,
    Counts,
    Percentages,
    Indices,
    Energy,
    Commodities,
    Agriculture,
    Metals,
    Crypto,
    Ratios,
    Exempt,
    Unknown,
}

impl BucketKind {
    /// Passthrough domains are never value-normalized (spec §4.8, Glossary).
    pub fn is_passthrough(self) -> bool {
        matches!(
            self,
            BucketKind::Percentages
                | BucketKind::Indices
                | BucketKind::Energy
                | BucketKind::Commodities
                | BucketKind::Agriculture
                | BucketKind::Metals
                | BucketKind::Crypto
                | BucketKind::Ratios
        )
    }

    /// The `explain.domain` tag emitted for this bucket.
    pub fn domain_tag(self) -> &'static str {
        match self {
            BucketKind::MonetaryFlow => "monetary-flow",
            BucketKind::MonetaryStock => "monetary-stock",
            BucketKind::Wages => "wages",
            BucketKind::Counts => "count",
            BucketKind::Percentages => "percentage",
            BucketKind::Indices => "index",
            BucketKind::Energy => "energy",
            BucketKind::Commodities => "commodity",
            BucketKind::Agriculture => "agriculture",
            BucketKind::Metals => "metals",
            BucketKind::Crypto => "crypto",
            BucketKind::Ratios => "ratio",
            BucketKind::Exempt => "exempt",
            BucketKind::Unknown => "unknown",
        }
    }
}

/// An ordered (key, observations) pairing, keyed by [`BucketKind`].
///
/// `observations` holds indices into the original input slice rather than
/// owned data, so bucket membership can be computed without cloning and
/// reassembly can restore input order (spec §5, §9).
#[derive(Debug, Clone)]
pub struct Bucket {
    pub kind: BucketKind,
    pub indices: Vec<usize>,
}

impl Bucket {
    pub fn new(kind: BucketKind) -> Self {
        Bucket {
            kind,
            indices: Vec::new(),
        }
    }
}
