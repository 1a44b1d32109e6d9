//! Command implementations

use civiclayer::analysis::AnalysisLayerManager;
use civiclayer::config::Settings;
use civiclayer::geo::LatLng;
use civiclayer::layer::{Layer, LayerId, LayerKind, LayerRegistry, LoadState, ToggleOutcome};
use tracing::info;

use crate::error::CliError;
use crate::manifest::{default_manifest, ANALYSIS_LAYER_ID};

/// How many table rows `show` prints before truncating.
const SHOW_ROW_LIMIT: usize = 10;

fn build_registry(settings: &Settings) -> Result<LayerRegistry, CliError> {
    let manifest = default_manifest(&settings.data_dir);
    Ok(LayerRegistry::from_manifest(manifest, settings)?)
}

fn kind_label(kind: LayerKind) -> &'static str {
    match kind {
        LayerKind::Point => "point",
        LayerKind::Polygon => "polygon",
        LayerKind::Analysis => "analysis",
    }
}

fn state_label(layer: &Layer) -> &'static str {
    match layer.load_state {
        LoadState::NotLoaded => "not loaded",
        LoadState::Loading => "loading",
        LoadState::Loaded => "loaded",
        LoadState::Failed => "failed",
    }
}

/// Enables one layer, translating failure outcomes into CLI errors.
async fn enable_layer(registry: &mut LayerRegistry, id: &LayerId) -> Result<(), CliError> {
    match registry.set_visibility(id, true).await {
        ToggleOutcome::NotFound => Err(CliError::UnknownLayer(id.to_string())),
        ToggleOutcome::LoadFailed { reason } => Err(CliError::LoadFailed {
            layer: id.to_string(),
            reason,
        }),
        _ => Ok(()),
    }
}

/// `layers`: print the manifest with per-layer state.
pub fn run_layers(settings: &Settings) -> Result<(), CliError> {
    let registry = build_registry(settings)?;

    for group in registry.groups() {
        println!("{}", group.name);
        for layer in &group.layers {
            println!(
                "  {:<36} {:<9} {:<8} {}",
                layer.id,
                kind_label(layer.kind),
                if layer.visible { "visible" } else { "hidden" },
                state_label(layer),
            );
        }
    }
    Ok(())
}

/// `show <layer-id>`: load one layer and print its summary.
pub async fn run_show(settings: &Settings, layer_id: &str) -> Result<(), CliError> {
    let mut registry = build_registry(settings)?;
    let id = LayerId::new(layer_id);

    enable_layer(&mut registry, &id).await?;

    // enable_layer verified the id exists
    let Some(layer) = registry.find_layer(&id) else {
        return Err(CliError::UnknownLayer(layer_id.to_string()));
    };

    println!("{} ({})", layer.name, layer.id);
    if let Some(summary) = &layer.summary {
        println!("  features:    {}", summary.total_count);
        println!("  description: {}", summary.description);
    }
    if let Some(legend) = &layer.legend {
        println!(
            "  {}: min {:.0}, max {:.0}, mean {:.1} ({} values)",
            legend.field, legend.min, legend.max, legend.mean, legend.sample_count
        );
    }

    for row in layer.table.iter().take(SHOW_ROW_LIMIT) {
        let name = row.get("name").and_then(|v| v.as_str()).unwrap_or("-");
        println!("  - {}", name);
    }
    if layer.table.len() > SHOW_ROW_LIMIT {
        println!("  ... and {} more", layer.table.len() - SHOW_ROW_LIMIT);
    }
    Ok(())
}

/// `probe`: enable layers, drop an analysis point, print the report.
pub async fn run_probe(
    settings: &Settings,
    lat: f64,
    lng: f64,
    radius_m: f64,
    enable: &[String],
) -> Result<(), CliError> {
    let center =
        LatLng::validated(lat, lng).map_err(|e| CliError::InvalidCoordinates(e.to_string()))?;

    let mut registry = build_registry(settings)?;
    for layer_id in enable {
        enable_layer(&mut registry, &LayerId::new(layer_id.as_str())).await?;
    }

    info!(%center, radius_m, enabled = enable.len(), "Running analysis probe");

    let mut manager = AnalysisLayerManager::new(LayerId::new(ANALYSIS_LAYER_ID));
    let report = manager
        .add_point_with_radius(&mut registry, center.lat, center.lng, radius_m)
        .ok_or(CliError::NoAnalysisLayer)?;

    println!(
        "Analysis point {} at {} ({:.0} m radius)",
        report.point_id, center, radius_m
    );
    println!();

    if report.matches.is_empty() {
        println!("No facilities within range.");
    } else {
        println!("Within range by layer:");
        for (layer_name, count) in &report.layer_counts {
            println!("  {:<44} {}", layer_name, count);
        }
        println!();
        println!("{:<8} {:<44} {}", "dist(m)", "name", "layer");
        for m in &report.matches {
            println!("{:<8} {:<44} {}", m.distance_m, m.name, m.layer_name);
        }
    }

    if let Some(layer) = registry.find_layer(&LayerId::new(ANALYSIS_LAYER_ID)) {
        if let Some(summary) = &layer.summary {
            println!();
            println!(
                "Analysis layer: {} points, ~{:.2} km2 covered",
                summary.total_count,
                summary.coverage_km2.unwrap_or(0.0)
            );
        }
    }

    Ok(())
}
