use areal::{BoundingBox, Config, Store};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see detailed logs)
    env_logger::init();

    println!("=== Areal - Getting Started ===\n");

    // A small data root with two datasets: postal areas and districts
    let dir = tempfile::tempdir()?;
    write_fixture(dir.path())?;
    let store = Store::open(Config::default().with_data_root(dir.path()))?;
    println!("✓ Opened store over {}\n", dir.path().display());

    // === DATASET CATALOG ===
    println!("1. Dataset Catalog");
    println!("------------------");

    for summary in store.list_datasets() {
        println!(
            "   {} ({:?}) backed by {}",
            summary.name, summary.kind, summary.path
        );
    }
    println!();

    // === WINDOW QUERIES ===
    println!("2. Window Queries");
    println!("-----------------");

    // Viewport over Berlin (west, south, east, north)
    let berlin = BoundingBox::new(13.0, 52.3, 13.8, 52.8);
    let visible = store.window_query("plz", &berlin, None)?;
    println!("   {} postal areas visible over Berlin", visible.len());

    // The same window again is answered from the result cache
    store.window_query("plz", &berlin, None)?;
    println!("   Repeated query served from cache\n");

    // === CONTAINMENT FILTER ===
    println!("3. Containment Filter");
    println!("---------------------");

    let filtered = store.window_query("plz", &berlin, Some("wahlkreise"))?;
    println!(
        "   {} of {} areas intersect an electoral district",
        filtered.len(),
        visible.len()
    );
    println!();

    // === CROSS-DATASET MAPPING ===
    println!("4. Cross-Dataset Mapping");
    println!("------------------------");

    let report = store.full_mapping("plz", "wahlkreise")?;
    for pair in &report.pairs {
        println!("   PLZ {} -> Wahlkreis {}", pair.source_id, pair.target_id);
    }
    println!();

    // === STATISTICS ===
    println!("5. Store Statistics");
    println!("-------------------");

    let stats = store.stats();
    println!("   Window queries: {}", stats.window_queries);
    println!("   Cache hits:     {}", stats.cache_hits);
    println!("   Datasets:       {}", stats.datasets_loaded);
    println!("   Indexes built:  {}\n", stats.indexes_built);

    println!("=== Getting Started Complete! ===");
    println!("\nKey Features Demonstrated:");
    println!("  • Manifest-driven dataset catalog");
    println!("  • Lazy loading with spatial indexing");
    println!("  • Quantized, cached window queries");
    println!("  • Containment filtering across datasets");
    println!("  • First-match cross-dataset mapping");

    Ok(())
}

fn write_fixture(dir: &std::path::Path) -> std::io::Result<()> {
    let manifest = json!({
        "entries": [
            {
                "name": "plz",
                "path": "plz.geojson",
                "kind": "polygon",
                "label": "Postleitzahlgebiete",
                "id_property": "plz"
            },
            {
                "name": "wahlkreise",
                "path": "wahlkreise.geojson",
                "kind": "polygon",
                "id_property": "WKR_NR"
            }
        ]
    });
    std::fs::write(dir.join("datasets.json"), manifest.to_string())?;

    let rect = |west: f64, south: f64, east: f64, north: f64, props: serde_json::Value| {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [west, south], [east, south], [east, north], [west, north], [west, south]
                ]]
            },
            "properties": props
        })
    };

    let plz = json!({
        "type": "FeatureCollection",
        "features": [
            rect(13.35, 52.50, 13.43, 52.55, json!({ "plz": "10115" })),
            rect(13.40, 52.46, 13.50, 52.52, json!({ "plz": "10245" })),
            rect(11.54, 48.12, 11.60, 48.16, json!({ "plz": "80331" })),
        ]
    });
    std::fs::write(dir.join("plz.geojson"), plz.to_string())?;

    let wahlkreise = json!({
        "type": "FeatureCollection",
        "features": [
            rect(13.30, 52.48, 13.46, 52.58, json!({ "WKR_NR": 75 })),
            rect(13.44, 52.44, 13.60, 52.54, json!({ "WKR_NR": 76 })),
        ]
    });
    std::fs::write(dir.join("wahlkreise.geojson"), wahlkreise.to_string())
}
