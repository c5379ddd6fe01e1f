//! Column names and display labels of the World Happiness Report dataset.
//!
//! Nothing in the algorithms depends on these; they only seed the default
//! configuration so a dashboard over that dataset works out of the box.

/// Overall happiness score (the usual correlation target).
pub const HAPPINESS_SCORE: &str = "happiness_score";
/// GDP per capita contribution.
pub const ECONOMY: &str = "economy_gdp_per_capita";
/// Social support contribution.
pub const SOCIAL_SUPPORT: &str = "social_support";
/// Healthy life expectancy contribution.
pub const HEALTH: &str = "healthy_life_expectancy";
/// Freedom to make life choices contribution.
pub const FREEDOM: &str = "freedom_to_make_life_choices";
/// Generosity contribution.
pub const GENEROSITY: &str = "generosity";
/// Perceived corruption. Higher raw values mean more corruption is perceived.
pub const CORRUPTION: &str = "perceptions_of_corruption";

/// The six explanatory factors, in dashboard order.
pub const FACTORS: [&str; 6] = [ECONOMY, SOCIAL_SUPPORT, HEALTH, FREEDOM, GENEROSITY, CORRUPTION];

/// Features used for association mining: the factors plus the score itself.
pub const MINING_FEATURES: [&str; 7] = [
    ECONOMY,
    SOCIAL_SUPPORT,
    HEALTH,
    FREEDOM,
    GENEROSITY,
    CORRUPTION,
    HAPPINESS_SCORE,
];

/// Short human labels used in cluster names.
pub const LABELS: [(&str, &str); 6] = [
    (ECONOMY, "Economy"),
    (SOCIAL_SUPPORT, "Social Support"),
    (HEALTH, "Health"),
    (FREEDOM, "Freedom"),
    (GENEROSITY, "Generosity"),
    (CORRUPTION, "Corruption"),
];
