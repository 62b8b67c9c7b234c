//! Name/unit keyword tables used by [`crate::classify::classifier`].
//!
//! Kept as flat `&[&str]` tables rather than `match`/`if` chains so a
//! domain pack can extend a single list without touching classification
//! control flow (REDESIGN FLAGS "pattern tables, not code paths").

/// Indicator-name keywords that refine a monetary-flow item into the
/// wages bucket (spec §4.2, §4.6).
pub static WAGE_NAME_KEYWORDS: &[&str] = &[
    "wage",
    "wages",
    "salary",
    "salaries",
    "earnings",
    "compensation",
    "minimum wage",
];

/// Indicator-name keywords that mark a currency-bearing, no-time item as
/// a stock/level rather than a flow (spec §4.2).
pub static STOCK_NAME_KEYWORDS: &[&str] = &[
    "reserves",
    "debt",
    "outstanding",
    "balance",
    "gdp",
    "market cap",
    "money supply",
];

/// Indicator-name keywords that mark an item as a monetary flow even
/// without an explicit time unit token (spec §4.2).
pub static FLOW_NAME_KEYWORDS: &[&str] = &[
    "export",
    "exports",
    "import",
    "imports",
    "revenue",
    "investment",
    "production",
    "sales",
];

/// Unit-text keywords for the commodities bucket (spec §4.2).
pub static COMMODITY_UNIT_KEYWORDS: &[&str] = &["barrel", "barrels", "bbl", "crude", "wti", "brent"];

/// Unit-text keywords for the agriculture bucket (spec §4.2).
pub static AGRICULTURE_UNIT_KEYWORDS: &[&str] = &["bushel", "bushels"];

/// Indicator-name keywords that put a tonnes/tons unit into the
/// agriculture bucket rather than metals or generic physical/commodity.
pub static AGRICULTURE_NAME_KEYWORDS: &[&str] = &[
    "wheat", "corn", "maize", "soybean", "soybeans", "coffee", "cotton", "sugar", "cocoa", "rice",
    "barley", "livestock", "cattle", "poultry", "crop", "crops", "grain", "grains",
];

/// Indicator-name keywords that put a tonnes/oz unit into the metals
/// bucket (spec §4.2: "copper tonnes, silver oz, steel tonnes").
pub static METALS_NAME_KEYWORDS: &[&str] = &[
    "copper", "silver", "steel", "gold", "aluminum", "aluminium", "zinc", "nickel", "iron ore",
    "tin", "lead", "platinum", "palladium",
];

/// Currency/name keywords for the crypto bucket (spec §4.2: "BTC, ETH,
/// wei, SOL").
pub static CRYPTO_KEYWORDS: &[&str] = &[
    "btc", "eth", "wei", "sol", "bitcoin", "ethereum", "solana", "crypto", "cryptocurrency",
    "usdt", "usdc", "bnb", "xrp", "ada", "doge", "dot", "matic", "ltc",
];

/// Unit/name keywords for the generic counts bucket (spec §4.2: "units,
/// registrations, persons, dwellings, per-thousand/per-million-people").
pub static COUNT_KEYWORDS: &[&str] = &[
    "unit",
    "units",
    "registration",
    "registrations",
    "dwelling",
    "dwellings",
    "permit",
    "permits",
    "vehicle",
    "vehicles",
    "arrival",
    "arrivals",
    "tourist",
    "tourists",
];

/// Case-insensitive substring match of any keyword in `keywords` against
/// `haystack`.
pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}
