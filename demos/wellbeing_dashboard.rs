use glean::summary::{
    group_averages, label_trend, latest_partition, partition_averages, rank, select_partition, RankOrder,
};
use glean::wellbeing::{FACTORS, HAPPINESS_SCORE, MINING_FEATURES};
use glean::Engine;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Everything the dashboard shows, computed from a handful of rows.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let rows = vec![
        json!({"country_name": "Finland", "year": 2021, "region": "Western Europe", "happiness_score": 7.84, "economy_gdp_per_capita": 1.89, "social_support": 1.26, "healthy_life_expectancy": 0.78, "freedom_to_make_life_choices": 0.70, "generosity": 0.12, "perceptions_of_corruption": 0.48}),
        json!({"country_name": "Denmark", "region": "Western Europe", "year": 2021, "happiness_score": 7.62, "economy_gdp_per_capita": 1.95, "social_support": 1.24, "healthy_life_expectancy": 0.78, "freedom_to_make_life_choices": 0.69, "generosity": 0.20, "perceptions_of_corruption": 0.49}),
        json!({"country_name": "Costa Rica", "region": "Latin America and Caribbean", "year": 2021, "happiness_score": 7.07, "economy_gdp_per_capita": 1.38, "social_support": 1.13, "healthy_life_expectancy": 0.70, "freedom_to_make_life_choices": 0.64, "generosity": 0.08, "perceptions_of_corruption": 0.10}),
        json!({"country_name": "Brazil", "region": "Latin America and Caribbean", "year": 2021, "happiness_score": 6.33, "economy_gdp_per_capita": 1.32, "social_support": 1.05, "healthy_life_expectancy": 0.61, "freedom_to_make_life_choices": 0.53, "generosity": 0.10, "perceptions_of_corruption": 0.08}),
        json!({"country_name": "India", "region": "South Asia", "year": 2021, "happiness_score": 3.82, "economy_gdp_per_capita": 1.10, "social_support": 0.47, "healthy_life_expectancy": 0.41, "freedom_to_make_life_choices": 0.60, "generosity": 0.20, "perceptions_of_corruption": 0.09}),
        json!({"country_name": "Rwanda", "region": "Sub-Saharan Africa", "year": 2021, "happiness_score": 3.42, "economy_gdp_per_capita": 0.79, "social_support": 0.55, "healthy_life_expectancy": 0.46, "freedom_to_make_life_choices": 0.63, "generosity": 0.19, "perceptions_of_corruption": 0.48}),
        json!({"country_name": "Zimbabwe", "region": "Sub-Saharan Africa", "year": 2021, "happiness_score": 3.15, "economy_gdp_per_capita": 0.95, "social_support": 0.85, "healthy_life_expectancy": 0.29, "freedom_to_make_life_choices": 0.45, "generosity": 0.07, "perceptions_of_corruption": 0.05}),
        json!({"country_name": "Afghanistan", "year": 2021, "happiness_score": 2.52, "economy_gdp_per_capita": 0.37, "social_support": 0.0, "healthy_life_expectancy": 0.13, "freedom_to_make_life_choices": 0.0, "generosity": 0.12, "perceptions_of_corruption": 0.01}),
        json!({"country_name": "Finland", "year": 2020, "happiness_score": 7.81, "economy_gdp_per_capita": 1.29, "social_support": 1.50, "healthy_life_expectancy": 0.96, "freedom_to_make_life_choices": 0.66, "generosity": 0.16, "perceptions_of_corruption": 0.48}),
        json!({"country_name": "Afghanistan", "year": 2020, "region": "South Asia", "happiness_score": 2.57, "economy_gdp_per_capita": 0.30, "social_support": 0.36, "healthy_life_expectancy": null, "freedom_to_make_life_choices": 0.0, "generosity": 0.14, "perceptions_of_corruption": 0.0}),
    ];

    let engine = Engine::default();
    let records = engine.ingest(&rows)?;
    let year = latest_partition(&records).ok_or("no partitioned records")?;
    let current = select_partition(&records, year);
    println!("year={year} countries={}", current.len());

    let rules = engine.mine_associations(&current, &MINING_FEATURES, None, None)?;
    println!("\nassociation rules ({} transactions)", rules.num_transactions);
    for rule in rules.rules.iter().take(8) {
        println!(
            "  {:?} => {:?}  support={} confidence={} lift={}",
            rule.antecedent, rule.consequent, rule.support, rule.confidence, rule.lift
        );
    }

    let mut rng = StdRng::seed_from_u64(2021);
    let clusters = engine.run_kmeans(&current, &FACTORS, 3, None, &mut rng)?;
    println!(
        "\nclusters (iterations={} converged={} silhouette={})",
        clusters.iterations, clusters.converged, clusters.silhouette
    );
    for cluster in &clusters.clusters {
        println!("  [{}] {} ({}): {:?}", cluster.id, cluster.name, cluster.size, cluster.members);
    }

    let correlations = engine.live_correlations(&current, HAPPINESS_SCORE, &FACTORS)?;
    println!("\ncorrelations with {HAPPINESS_SCORE}");
    for c in &correlations.correlations {
        println!(
            "  {:<30} r={:>6} support={} coverage={} {:?}",
            c.factor_a, c.coefficient, c.support, c.coverage, c.significance
        );
    }

    println!("\nscore distribution");
    for band in engine.score_distribution(&current, HAPPINESS_SCORE)? {
        println!("  {:<28} {}", band.name, band.count);
    }

    println!("\nyearly averages");
    for summary in partition_averages(&records, &[HAPPINESS_SCORE])? {
        println!("  {:?}: {:?}", summary.partition, summary.averages);
    }

    println!("\nregional averages");
    for region in group_averages(&records, year, HAPPINESS_SCORE)? {
        println!("  {:<28} {:.3} ({} countries)", region.group, region.average, region.count);
    }

    println!("\nFinland over time");
    for point in label_trend(&records, "Finland", HAPPINESS_SCORE) {
        println!("  {} {}", point.partition, point.value);
    }

    println!("\ntop and bottom");
    for r in rank(&current, HAPPINESS_SCORE, 3, RankOrder::Top) {
        println!("  + {} {}", r.label, r.value);
    }
    for r in rank(&current, HAPPINESS_SCORE, 3, RankOrder::Bottom) {
        println!("  - {} {}", r.label, r.value);
    }

    println!("\n{}", serde_json::to_string_pretty(&clusters.clusters[0])?);
    Ok(())
}
