//! Substrate aggregation and full pipeline tests

use biogas_algo::{substrate_inventory, substrates, ExcretionTable, ResidueTable};
use biogas_core::{
    lookup, Basis, Density, Management, NutsHierarchy, ParameterSet, RegionCode,
    StatisticsBundle, Substrate, SubstrateKey,
};

fn manure(table: &mut ExcretionTable, region: &str, density: Density, cells: [f64; 3]) {
    let region = RegionCode::from(region);
    for (management, value) in Management::ALL.into_iter().zip(cells) {
        table.insert(region.clone(), (density, management), value);
    }
}

fn crop_residues(table: &mut ResidueTable, region: &str, straw: f64) {
    let region = RegionCode::from(region);
    table.insert(region.clone(), Substrate::Straw, straw);
    table.insert(region.clone(), Substrate::Stover, 1.0);
    table.insert(region.clone(), Substrate::SunflowerStalks, 0.0);
    table.insert(region, Substrate::BeetTops, 2.0);
}

/// `A` is short of bedding straw, `D` needs none, `B` has no residues and
/// `C` lacks a livestock family.
fn fixture() -> (ExcretionTable, ResidueTable) {
    let mut excretion = ExcretionTable::new();
    // [liquid, solid, unavailable]
    manure(&mut excretion, "SE11", Density::Cattle, [5.0, 10.0, 3.0]);
    manure(&mut excretion, "SE11", Density::Pigs, [4.0, 0.0, 0.0]);
    manure(&mut excretion, "SE11", Density::Chickens, [0.0, 2.0, 1.0]);

    manure(&mut excretion, "SE12", Density::Cattle, [1.0, 1.0, 0.0]);
    manure(&mut excretion, "SE12", Density::Pigs, [1.0, 1.0, 0.0]);
    manure(&mut excretion, "SE12", Density::Chickens, [1.0, 1.0, 0.0]);

    manure(&mut excretion, "SE21", Density::Cattle, [1.0, 1.0, 0.0]);
    manure(&mut excretion, "SE21", Density::Pigs, [1.0, 1.0, 0.0]);

    manure(&mut excretion, "SE22", Density::Cattle, [7.0, 0.0, 2.0]);
    manure(&mut excretion, "SE22", Density::Pigs, [3.0, 0.0, 0.0]);
    manure(&mut excretion, "SE22", Density::Chickens, [0.0, 6.0, 0.0]);

    let mut residues = ResidueTable::new();
    crop_residues(&mut residues, "SE11", 4.0);
    crop_residues(&mut residues, "SE21", 4.0);
    crop_residues(&mut residues, "SE22", 5.0);
    crop_residues(&mut residues, "SE99", 5.0);
    (excretion, residues)
}

fn key(density: Density, substrate: Substrate) -> SubstrateKey {
    SubstrateKey::new(density, substrate)
}

#[test]
fn bedding_shortfall_moves_solid_manure_to_liquid() {
    let (excretion, residues) = fixture();
    let params = ParameterSet::default();
    let inventory = substrates(&excretion, &residues, &params, Basis::VolatileSolids).unwrap();
    let se11 = RegionCode::from("SE11");

    // Demand 10 (cattle) against 4 straw: 40% covered.
    let solid = inventory.get(&se11, &key(Density::Cattle, Substrate::Solid)).unwrap();
    let liquid = inventory.get(&se11, &key(Density::Cattle, Substrate::Liquid)).unwrap();
    assert!((solid - 4.0).abs() < 1e-12);
    assert!((liquid - 11.0).abs() < 1e-12);
    assert!((solid + liquid - 15.0).abs() < 1e-12);

    // Straw left after bedding is zero; other residues scale by the removal rate.
    let straw = inventory.get(&se11, &key(Density::Cropland, Substrate::Straw)).unwrap();
    assert_eq!(straw, 0.0);
    let beet = inventory.get(&se11, &key(Density::Cropland, Substrate::BeetTops)).unwrap();
    assert!((beet - 2.0 * params.removal_rate).abs() < 1e-12);
}

#[test]
fn zero_bedding_demand_keeps_straw() {
    let (excretion, residues) = fixture();
    let params = ParameterSet::default();
    let inventory = substrates(&excretion, &residues, &params, Basis::VolatileSolids).unwrap();
    let se22 = RegionCode::from("SE22");

    let straw = inventory.get(&se22, &key(Density::Cropland, Substrate::Straw)).unwrap();
    assert!((straw - 5.0 * params.removal_rate).abs() < 1e-12);
    // Chickens bed nothing, so their solid manure stays solid.
    assert_eq!(inventory.get(&se22, &key(Density::Chickens, Substrate::Solid)), Some(6.0));
}

#[test]
fn incomplete_regions_are_dropped_entirely() {
    let (excretion, residues) = fixture();
    let params = ParameterSet::default();
    let inventory = substrates(&excretion, &residues, &params, Basis::VolatileSolids).unwrap();

    let regions: Vec<&str> = inventory.regions().map(|r| r.as_str()).collect();
    assert_eq!(regions, vec!["SE11", "SE22"]);

    let index = params.index();
    for (_, row) in inventory.table.rows() {
        assert_eq!(row.len(), index.len());
        assert!(row.keys().all(|k| index.position(k).is_some()));
        assert!(row.values().all(|v| *v >= 0.0 && v.is_finite()));
    }
}

#[test]
fn dry_matter_basis_divides_by_volatile_solids() {
    let (excretion, residues) = fixture();
    let params = ParameterSet::default();
    let vs = substrates(&excretion, &residues, &params, Basis::VolatileSolids).unwrap();
    let dm = substrates(&excretion, &residues, &params, Basis::DryMatter).unwrap();
    assert_eq!(dm.basis, Basis::DryMatter);

    for (region, key, value) in vs.table.cells() {
        let fraction = lookup(&params.vs_fracs, key).unwrap();
        let converted = dm.get(region, key).unwrap();
        assert!((converted - value / fraction).abs() < 1e-9);
    }
}

/// Every survey code of the default taxonomy, so strict aggregation succeeds.
fn statistics(params: &ParameterSet) -> StatisticsBundle {
    let taxonomy = &params.taxonomy;
    let regions = ["SE", "SE1", "SE11", "SE12"];
    let mut stats = StatisticsBundle {
        hierarchy: NutsHierarchy::from_codes(regions),
        ..StatisticsBundle::default()
    };

    for (i, region) in regions.iter().enumerate() {
        let scale = if i == 0 { 10.0 } else { 1.0 + i as f64 };
        for code in taxonomy.population_codes.values().flatten() {
            for year in &taxonomy.stat_years {
                stats.animal_population.insert(
                    (RegionCode::from(*region), code.clone()),
                    *year,
                    100.0 * scale,
                );
            }
        }
        for code in taxonomy.area_codes.values().flatten() {
            stats
                .harvested_areas
                .insert((RegionCode::from(*region), code.clone()), 2010, 50.0 * scale);
        }
    }

    for codes in taxonomy.national_harvest_codes.values() {
        stats
            .national_harvests
            .insert((RegionCode::from("SE"), codes[0].clone()), 2010, 20.0);
    }
    for livestock in taxonomy.excretion_classes.values().flatten() {
        for (management, share) in [
            (Management::Liquid, 0.5),
            (Management::Solid, 0.3),
            (Management::Unavailable, 0.2),
        ] {
            stats.manure_shares.insert(
                (RegionCode::from("SE"), livestock.clone(), management),
                2010,
                share,
            );
        }
    }
    stats
}

#[test]
fn pipeline_is_deterministic_and_complete() {
    let params = ParameterSet::default();
    let stats = statistics(&params);

    let first = substrate_inventory(&stats, &params, Basis::VolatileSolids).unwrap();
    let second = substrate_inventory(&stats, &params, Basis::VolatileSolids).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);

    for (_, row) in first.table.rows() {
        assert_eq!(row.len(), params.index().len());
        assert!(row.values().all(|v| *v >= 0.0));
    }
}
