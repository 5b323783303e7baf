//! Shared test fixtures: a handful of Alabama counties with made-up values

use tempfile::TempDir;

use crate::config::Config;
use crate::data::{
    CountyTable, Dataset, DatasetCatalog, GeoBoundary, InsightBook, LoadedData, TableLayout,
};

pub const SPENDING: &str = "Instruction Spending Per Student, 2018";
pub const DIABETES: &str = "Diabetes Percentage, 2019";
pub const DRINKING: &str = "Heavy Drinking Percentage, 2012";
pub const LIFE: &str = "Life expectancy, 2014";

/// Boundaries for 01001, 01003 and 01005 (the last with a numeric id)
pub const SAMPLE_GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "id": "01001", "properties": {"NAME": "Autauga"},
         "geometry": {"type": "Polygon", "coordinates": [[[-86.5, 32.4], [-86.4, 32.4], [-86.4, 32.5], [-86.5, 32.4]]]}},
        {"type": "Feature", "id": "01003", "properties": {"NAME": "Baldwin"},
         "geometry": {"type": "Polygon", "coordinates": [[[-87.5, 30.4], [-87.4, 30.4], [-87.4, 30.5], [-87.5, 30.4]]]}},
        {"type": "Feature", "id": 1005, "properties": {"NAME": "Barbour"},
         "geometry": {"type": "Polygon", "coordinates": [[[-85.5, 31.4], [-85.4, 31.4], [-85.4, 31.5], [-85.5, 31.4]]]}}
    ]
}"#;

/// 01007 exceeds the scatter cap; 01009 has no boundary polygon
pub const EXPENDITURE_CSV: &str = "FIPS,PlaceName,\"Instruction Spending Per Student, 2018\"
01001,\"Autauga County, Alabama\",9000
01003,\"Baldwin County, Alabama\",11000
01005,\"Barbour County, Alabama\",13000
01007,\"Bibb County, Alabama\",16000
01009,\"Blount County, Alabama\",12000
";

/// 01011 has no spending record
pub const DIABETES_CSV: &str = "FIPS,PlaceName,\"Diabetes Percentage, 2019\"
01001,\"Autauga County, Alabama\",8.5
01003,\"Baldwin County, Alabama\",10.0
01005,\"Barbour County, Alabama\",12.5
01009,\"Blount County, Alabama\",9.0
01011,\"Bullock County, Alabama\",11.0
";

pub const ALCOHOL_CSV: &str = "FIPS,PlaceName,\"Heavy Drinking Percentage, 2012\"
01001,\"Autauga County, Alabama\",15.0
01003,\"Baldwin County, Alabama\",17.5
01005,\"Barbour County, Alabama\",16.0
01009,\"Blount County, Alabama\",18.0
";

pub const EXPECTANCY_CSV: &str = "FIPS,PlaceName,\"Life expectancy, 2014\"
01001,\"Autauga County, Alabama\",76.5
01003,\"Baldwin County, Alabama\",78.0
01005,\"Barbour County, Alabama\",75.0
";

pub const INSIGHTS_TXT: &str = "Diabetes falls as spending rises.\n\nNEWTOPIC\n\n\
Drinking shows no clear pattern.\n\nNEWTOPIC\n\n\
Life expectancy rises with spending.\n";

fn table(csv: &str, name: &str) -> CountyTable {
    CountyTable::from_reader(csv.as_bytes(), name, &TableLayout::default()).unwrap()
}

/// The default four-dataset catalog, built in memory
pub fn sample_catalog() -> DatasetCatalog {
    let config = Config::default();
    let csvs = [EXPENDITURE_CSV, DIABETES_CSV, ALCOHOL_CSV, EXPECTANCY_CSV];
    let datasets = config
        .datasets
        .iter()
        .zip(csvs)
        .map(|(entry, csv)| Dataset::new(entry.meta(), table(csv, &entry.name)).unwrap())
        .collect();
    DatasetCatalog::new(datasets).unwrap()
}

pub fn sample_geo() -> GeoBoundary {
    GeoBoundary::from_geojson_str(SAMPLE_GEOJSON, "sample").unwrap()
}

pub fn sample_loaded() -> LoadedData {
    let catalog = sample_catalog();
    let insights = InsightBook::parse(INSIGHTS_TXT, &catalog.comparison_names()).unwrap();
    LoadedData {
        catalog,
        geo: sample_geo(),
        insights,
    }
}

/// Write the fixture files to a temp dir and point a default config at them
pub fn write_data_dir() -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        ("expenditure.csv", EXPENDITURE_CSV),
        ("diabetes.csv", DIABETES_CSV),
        ("alcohol.csv", ALCOHOL_CSV),
        ("expectancy.csv", EXPECTANCY_CSV),
        ("data_insights.txt", INSIGHTS_TXT),
        ("counties.json", SAMPLE_GEOJSON),
    ];
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    let mut config = Config::default();
    config.data.dir = dir.path().to_path_buf();
    config.data.insights_file = dir.path().join("data_insights.txt");
    config.data.geojson_path = Some(dir.path().join("counties.json"));

    (dir, config)
}
