//! Staged long-format statistics.
//!
//! A staging directory holds one CSV per statistic, each with a header row:
//!
//! | File | Columns |
//! |------|---------|
//! | `manure_shares.csv` | `region,animal,management,year,value` |
//! | `animal_population.csv` | `region,category,year,value` |
//! | `harvested_areas.csv` | `region,category,year,value` |
//! | `partial_harvests.csv` | `region,category,year,value` |
//! | `national_harvests.csv` | `region,category,year,value` |
//! | `regions.csv` | `code` |
//!
//! Empty value cells are unreported and skipped. Optional files (partial
//! harvests) may be absent.

use anyhow::{Context, Result};
use biogas_core::{
    Management, ManagementShares, NutsHierarchy, RegionCode, RegionalStatistic, StatisticsBundle,
};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

pub const MANURE_SHARES_FILE: &str = "manure_shares.csv";
pub const ANIMAL_POPULATION_FILE: &str = "animal_population.csv";
pub const HARVESTED_AREAS_FILE: &str = "harvested_areas.csv";
pub const PARTIAL_HARVESTS_FILE: &str = "partial_harvests.csv";
pub const NATIONAL_HARVESTS_FILE: &str = "national_harvests.csv";
pub const REGIONS_FILE: &str = "regions.csv";

#[derive(Debug, Deserialize)]
struct StatisticRecord {
    region: String,
    category: String,
    year: i32,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ShareRecord {
    region: String,
    animal: String,
    management: String,
    year: i32,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RegionRecord {
    code: String,
}

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening statistics CSV: {}", path.display()))
}

/// Read a `region,category,year,value` file.
pub fn read_statistic(path: &Path) -> Result<RegionalStatistic> {
    let mut rdr = reader(path)?;
    let mut stat = RegionalStatistic::new();
    let mut skipped = 0usize;
    for result in rdr.deserialize() {
        let record: StatisticRecord =
            result.with_context(|| format!("parsing record in {}", path.display()))?;
        match record.value {
            Some(value) => stat.insert(
                (RegionCode::from(record.region), record.category),
                record.year,
                value,
            ),
            None => skipped += 1,
        }
    }
    debug!(
        path = %path.display(),
        keys = stat.len(),
        skipped,
        "loaded regional statistic"
    );
    Ok(stat)
}

/// Read a `region,animal,management,year,value` file of share fractions.
pub fn read_shares(path: &Path) -> Result<ManagementShares> {
    let mut rdr = reader(path)?;
    let mut shares = ManagementShares::new();
    for result in rdr.deserialize() {
        let record: ShareRecord =
            result.with_context(|| format!("parsing record in {}", path.display()))?;
        let management: Management = record
            .management
            .parse()
            .with_context(|| format!("management column of {}", path.display()))?;
        if let Some(value) = record.value {
            shares.insert(
                (RegionCode::from(record.region), record.animal, management),
                record.year,
                value,
            );
        }
    }
    Ok(shares)
}

/// Read the `code` list of NUTS regions.
pub fn read_regions(path: &Path) -> Result<NutsHierarchy> {
    let mut rdr = reader(path)?;
    let mut codes = Vec::new();
    for result in rdr.deserialize() {
        let record: RegionRecord =
            result.with_context(|| format!("parsing record in {}", path.display()))?;
        codes.push(record.code);
    }
    Ok(NutsHierarchy::from_codes(codes))
}

/// Write shares in the same long format [`read_shares`] reads.
pub fn write_shares_csv(shares: &ManagementShares, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;
    wtr.write_record(["region", "animal", "management", "year", "value"])
        .context("writing CSV header")?;
    for ((region, animal, management), year, value) in shares.cells() {
        let year = year.to_string();
        let value = value.to_string();
        wtr.write_record([
            region.as_str(),
            animal.as_str(),
            management.as_str(),
            year.as_str(),
            value.as_str(),
        ])
        .context("writing CSV record")?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

fn read_optional_statistic(path: &Path) -> Result<RegionalStatistic> {
    if path.exists() {
        read_statistic(path)
    } else {
        debug!(path = %path.display(), "optional statistic absent");
        Ok(RegionalStatistic::new())
    }
}

/// Load every staged statistic of one run.
pub fn load_statistics_dir(dir: &Path) -> Result<StatisticsBundle> {
    let bundle = StatisticsBundle {
        manure_shares: read_shares(&dir.join(MANURE_SHARES_FILE))?,
        animal_population: read_statistic(&dir.join(ANIMAL_POPULATION_FILE))?,
        harvested_areas: read_statistic(&dir.join(HARVESTED_AREAS_FILE))?,
        partial_harvests: read_optional_statistic(&dir.join(PARTIAL_HARVESTS_FILE))?,
        national_harvests: read_statistic(&dir.join(NATIONAL_HARVESTS_FILE))?,
        hierarchy: read_regions(&dir.join(REGIONS_FILE))?,
    };
    info!(
        dir = %dir.display(),
        regions = bundle.hierarchy.len(),
        "loaded staged statistics"
    );
    Ok(bundle)
}
