//! Default layer manifest
//!
//! The Taipei long-term-care dataset catalog: facility point layers from
//! WKT CSV exports, statistical polygon layers from GeoJSON, and the
//! analysis layer. Dataset files are resolved under the configured data
//! directory (`csv/` and `geojson/` subdirectories).

use civiclayer::layer::{LayerDescriptor, LayerManifest};
use civiclayer::loader::{CsvPointLoader, GeoJsonLoader};
use std::path::Path;
use std::sync::Arc;

/// Id of the analysis layer in the default manifest.
pub const ANALYSIS_LAYER_ID: &str = "analysis";

fn csv_layer(data_dir: &Path, id: &str, name: &str, file: &str) -> LayerDescriptor {
    LayerDescriptor::point(id, name).with_loader(Arc::new(CsvPointLoader::new(
        data_dir.join("csv").join(file),
    )))
}

fn geojson_point_layer(data_dir: &Path, id: &str, name: &str, file: &str) -> LayerDescriptor {
    LayerDescriptor::point(id, name).with_loader(Arc::new(GeoJsonLoader::new(
        data_dir.join("geojson").join(file),
    )))
}

fn stat_layer(data_dir: &Path, id: &str, name: &str, file: &str, field: &str) -> LayerDescriptor {
    LayerDescriptor::polygon(id, name)
        .with_stat_field(field)
        .with_loader(Arc::new(
            GeoJsonLoader::new(data_dir.join("geojson").join(file)).with_stat_field(field),
        ))
}

/// Builds the default manifest against the given data directory.
pub fn default_manifest(data_dir: &Path) -> LayerManifest {
    LayerManifest::new()
        .with_group(
            "analysis",
            vec![LayerDescriptor::analysis(ANALYSIS_LAYER_ID, "Analysis layer")],
        )
        .with_group(
            "elderly-welfare",
            vec![
                csv_layer(
                    data_dir,
                    "public-elderly-welfare-institutions",
                    "Publicly-operated elderly welfare institutions",
                    "public-elderly-welfare-institutions.csv",
                ),
                csv_layer(
                    data_dir,
                    "elderly-welfare-institutions",
                    "Elderly welfare institutions",
                    "elderly-welfare-institutions.csv",
                ),
                csv_layer(
                    data_dir,
                    "nursing-homes",
                    "Registered nursing homes",
                    "nursing-homes.csv",
                ),
            ],
        )
        .with_group(
            "community-care",
            vec![
                csv_layer(
                    data_dir,
                    "community-care-centers",
                    "Community care centers",
                    "community-care-centers.csv",
                ),
                csv_layer(
                    data_dir,
                    "c-level-care-units",
                    "Community care system C-level units",
                    "c-level-care-units.csv",
                ),
                csv_layer(
                    data_dir,
                    "respite-care-c-plus-units",
                    "Community respite care units (C+)",
                    "respite-care-c-plus-units.csv",
                ),
                csv_layer(
                    data_dir,
                    "integrated-service-centers",
                    "Integrated service centers (A-level)",
                    "integrated-service-centers.csv",
                ),
            ],
        )
        .with_group(
            "residential-care",
            vec![csv_layer(
                data_dir,
                "residential-long-term-care",
                "Residential long-term care institutions",
                "residential-long-term-care.csv",
            )],
        )
        .with_group(
            "respite-services",
            vec![
                csv_layer(
                    data_dir,
                    "community-respite-units",
                    "Community respite and short-stay units",
                    "community-respite-units.csv",
                ),
                csv_layer(
                    data_dir,
                    "residential-respite-units",
                    "Residential respite and short-stay units",
                    "residential-respite-units.csv",
                ),
                csv_layer(
                    data_dir,
                    "home-respite-units",
                    "Home respite and short-stay units",
                    "home-respite-units.csv",
                ),
            ],
        )
        .with_group(
            "infrastructure",
            vec![
                csv_layer(data_dir, "hospitals", "Hospitals", "hospitals.csv")
                    .with_color("lime"),
                csv_layer(data_dir, "clinics", "Clinics", "clinics.csv").with_color("lime"),
                csv_layer(
                    data_dir,
                    "nhi-pharmacies",
                    "NHI-contracted pharmacies",
                    "nhi-pharmacies.csv",
                )
                .with_color("green"),
                csv_layer(
                    data_dir,
                    "convenience-stores",
                    "Convenience stores",
                    "convenience-stores.csv",
                )
                .with_color("cyan"),
                geojson_point_layer(
                    data_dir,
                    "mrt-stations",
                    "MRT stations",
                    "mrt-stations.geojson",
                )
                .with_color("blue"),
                geojson_point_layer(data_dir, "bus-stops", "Bus stops", "bus-stops.geojson")
                    .with_color("blue"),
            ],
        )
        .with_group(
            "statistics",
            vec![
                stat_layer(
                    data_dir,
                    "population-under-15",
                    "Population aged 0-14",
                    "population-by-age.geojson",
                    "A0A14_CNT",
                )
                .with_color("deeppurple"),
                stat_layer(
                    data_dir,
                    "population-15-to-64",
                    "Population aged 15-64",
                    "population-by-age.geojson",
                    "A15A64_CNT",
                )
                .with_color("deeppurple"),
                stat_layer(
                    data_dir,
                    "population-over-65",
                    "Population aged 65 and over",
                    "population-by-age.geojson",
                    "A65UP_CNT",
                )
                .with_color("deeppurple"),
                stat_layer(
                    data_dir,
                    "income-median",
                    "Comprehensive income tax - median",
                    "village-income.geojson",
                    "median",
                ),
                stat_layer(
                    data_dir,
                    "income-mean",
                    "Comprehensive income tax - mean",
                    "village-income.geojson",
                    "mean",
                ),
            ],
        )
        .with_group(
            "boundaries",
            vec![LayerDescriptor::polygon("district-boundaries", "District boundaries")
                .with_color("brown")
                .with_loader(Arc::new(GeoJsonLoader::new(
                    data_dir.join("geojson").join("district-boundaries.geojson"),
                )))],
        )
}
