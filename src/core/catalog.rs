//! Checklist and PMI reference data.
//!
//! The taxonomy is static: it is written once by the reference-data
//! migration and read back through the item store afterwards.

use crate::db::pool::DbPool;
use crate::db::store::{self, Entity};
use crate::errors::AppResult;
use crate::models::area::{InspectionArea, InspectionItem, area_pk};
use crate::models::pmi::{PmiCategory, PmiItem, category_pk};
use rusqlite::Connection;

const AREAS: &[&str] = &[
    "Site and Building Exterior",
    "Kitchen",
    "Bathroom",
    "Living Room/Dining Room",
    "Bedrooms",
    "HVAC/Utilities",
    "Safety/Fire Protection",
    "Misc/Other",
];

/// (area index, item id, description)
const ITEMS: &[(usize, &str, &str)] = &[
    (0, "SB001", "Walks, steps, drives - cracks, breaks, trip hazards"),
    (0, "SB002", "Parking/carport - structural defects, damage"),
    (0, "SB003", "Fence/retaining wall - structural defects"),
    (0, "SB004", "Building exterior - foundation cracks, structure issues"),
    (0, "SB005", "Roof - leaks, damage, missing shingles"),
    (0, "SB006", "Gutters/downspouts - damage, clogs, detachment"),
    (0, "SB007", "Windows/screens - broken, damage, missing"),
    (0, "SB008", "Doors/locks - damage, inoperable, missing"),
    (0, "SB009", "Paint/siding - peeling, damage, deterioration"),
    (1, "K001", "Kitchen sink - leaks, damage"),
    (1, "K002", "Kitchen countertop - cracks, damage"),
    (1, "K003", "Kitchen cabinets - damage, missing, inoperable"),
    (1, "K004", "Kitchen stove - inoperable, gas leaks"),
    (1, "K005", "Kitchen refrigerator - inoperable, damage"),
    (1, "K006", "Kitchen floor - damage, tripping hazard"),
    (1, "K007", "Kitchen walls/ceiling - damage, water stains"),
    (1, "K008", "Kitchen electrical - missing covers, exposed wires"),
    (2, "B001", "Bathroom sink - leaks, damage"),
    (2, "B002", "Bathroom toilet - leaks, inoperable, damage"),
    (2, "B003", "Bathroom tub/shower - leaks, damage, missing fixtures"),
    (2, "B004", "Bathroom floor - damage, water damage"),
    (2, "B005", "Bathroom walls/ceiling - damage, water stains, mold"),
    (2, "B006", "Bathroom exhaust fan - inoperable, missing"),
    (2, "B007", "Bathroom electrical - missing covers, GFI issues"),
    (2, "B008", "Bathroom cabinets/vanity - damage, missing"),
    (3, "LR001", "Living room floor - damage, tripping hazard"),
    (3, "LR002", "Living room walls/ceiling - damage, holes, cracks"),
    (3, "LR003", "Living room windows - damage, inoperable"),
    (3, "LR004", "Living room electrical - missing covers, outlets inoperable"),
    (3, "LR005", "Living room doors - damage, inoperable locks"),
    (4, "BR001", "Bedroom floor - damage, tripping hazard"),
    (4, "BR002", "Bedroom walls/ceiling - damage, holes, cracks"),
    (4, "BR003", "Bedroom windows - damage, inoperable"),
    (4, "BR004", "Bedroom closet - damage, missing doors"),
    (4, "BR005", "Bedroom electrical - missing covers, outlets inoperable"),
    (4, "BR006", "Bedroom doors - damage, inoperable locks"),
    (5, "HV001", "Heating system - inoperable, unsafe"),
    (5, "HV002", "Air conditioning - inoperable"),
    (5, "HV003", "Hot water heater - inoperable, leaks"),
    (5, "HV004", "Thermostat - inoperable, missing"),
    (5, "HV005", "Ventilation - inadequate, inoperable"),
    (5, "HV006", "Electrical panel - hazards, improper wiring"),
    (5, "HV007", "Plumbing - leaks, water pressure issues"),
    (6, "SF001", "Smoke detectors - missing, inoperable, expired"),
    (6, "SF002", "Carbon monoxide detectors - missing, inoperable, expired"),
    (6, "SF003", "Fire extinguisher - missing, expired"),
    (6, "SF004", "Emergency exits - blocked, inoperable"),
    (6, "SF005", "Railings/guards - missing, damaged, unsafe"),
    (7, "M001", "Pest infestation - evidence of rodents, insects"),
    (7, "M002", "Mold/mildew - visible growth, moisture issues"),
    (7, "M003", "Lead paint hazards - peeling paint (pre-1978 homes)"),
    (7, "M004", "Trip hazards - loose carpet, uneven floors"),
    (7, "M005", "Storage/clutter - excessive, blocking access"),
    (7, "M006", "Other deficiencies - specify in notes"),
];

const PMI_CATEGORIES: &[(&str, &str)] = &[
    ("CAT001", "HVAC"),
    ("CAT002", "Hot Water Tank"),
    ("CAT003", "Plumbing"),
    ("CAT004", "Electrical"),
    ("CAT005", "Appliances"),
    ("CAT006", "Safety Systems"),
    ("CAT007", "Windows and Doors"),
    ("CAT008", "General Interior"),
];

/// Four tasks per category, in category order.
const PMI_ITEMS: &[&str] = &[
    "Replace or clean air filter",
    "Check thermostat operation",
    "Inspect ductwork for leaks",
    "Clean condenser coils",
    "Drain sediment from tank",
    "Check temperature setting (120°F)",
    "Inspect for leaks",
    "Test pressure relief valve",
    "Check all faucets for leaks",
    "Inspect under sinks for leaks",
    "Test toilet flush mechanism",
    "Check water pressure",
    "Test GFCI outlets",
    "Check circuit breaker panel",
    "Inspect visible wiring",
    "Test smoke detectors",
    "Clean refrigerator coils",
    "Check stove burners/elements",
    "Clean range hood filter",
    "Test dishwasher operation",
    "Test smoke detectors (all locations)",
    "Test carbon monoxide detectors",
    "Check fire extinguisher (if provided)",
    "Inspect emergency exits",
    "Check window locks",
    "Inspect window screens",
    "Test door locks",
    "Check weatherstripping",
    "Check caulking around tubs/showers",
    "Inspect for water stains on ceilings",
    "Check flooring for damage",
    "Test all light fixtures",
];

const PMI_ITEMS_PER_CATEGORY: usize = 4;

fn put_if_missing<E: Entity>(conn: &Connection, entity: &E) -> AppResult<bool> {
    if store::get_item(conn, &entity.key())?.is_some() {
        return Ok(false);
    }
    store::put(conn, entity)?;
    Ok(true)
}

/// Write the reference taxonomy. Existing records are left alone, so the
/// call can be repeated safely.
pub fn seed(conn: &Connection) -> AppResult<()> {
    let mut written = 0;

    for (i, name) in AREAS.iter().enumerate() {
        let area = InspectionArea {
            area_name: name.to_string(),
            sort_order: i as u32 + 1,
            is_active: true,
        };
        written += put_if_missing(conn, &area)? as usize;
    }

    let mut sort_in_area = vec![0u32; AREAS.len()];
    for (area_idx, item_id, description) in ITEMS {
        sort_in_area[*area_idx] += 1;
        let item = InspectionItem {
            item_id: item_id.to_string(),
            area_name: AREAS[*area_idx].to_string(),
            description: description.to_string(),
            sort_order: sort_in_area[*area_idx],
            is_active: true,
        };
        written += put_if_missing(conn, &item)? as usize;
    }

    for (i, (id, name)) in PMI_CATEGORIES.iter().enumerate() {
        let cat = PmiCategory {
            category_id: id.to_string(),
            name: name.to_string(),
            sort_order: i as u32 + 1,
            is_active: true,
        };
        written += put_if_missing(conn, &cat)? as usize;
    }

    for (i, description) in PMI_ITEMS.iter().enumerate() {
        let (category_id, _) = PMI_CATEGORIES[i / PMI_ITEMS_PER_CATEGORY];
        let item = PmiItem {
            item_id: format!("PMI{:03}", i + 1),
            category_id: category_id.to_string(),
            description: description.to_string(),
            sort_order: (i % PMI_ITEMS_PER_CATEGORY) as u32 + 1,
            is_active: true,
        };
        written += put_if_missing(conn, &item)? as usize;
    }

    tracing::debug!(written, "reference data seeded");
    Ok(())
}

pub struct CatalogLogic;

impl CatalogLogic {
    /// Active areas in checklist order.
    pub fn areas(pool: &DbPool) -> AppResult<Vec<InspectionArea>> {
        let mut areas: Vec<InspectionArea> = store::scan_as(&pool.conn)?;
        areas.retain(|a| a.is_active);
        areas.sort_by_key(|a| a.sort_order);
        Ok(areas)
    }

    /// Active items of one area. An unknown area has no items.
    pub fn items(pool: &DbPool, area_name: &str) -> AppResult<Vec<InspectionItem>> {
        let mut items: Vec<InspectionItem> =
            store::query_as(&pool.conn, &area_pk(area_name), "ITEM#")?;
        items.retain(|i| i.is_active);
        items.sort_by_key(|i| i.sort_order);
        Ok(items)
    }

    /// Every active item of every active area, in checklist order.
    pub fn checklist(pool: &DbPool) -> AppResult<Vec<InspectionItem>> {
        let mut out = Vec::new();
        for area in Self::areas(pool)? {
            out.extend(Self::items(pool, &area.area_name)?);
        }
        Ok(out)
    }

    pub fn find_item(pool: &DbPool, item_id: &str) -> AppResult<Option<InspectionItem>> {
        let items: Vec<InspectionItem> = store::scan_as(&pool.conn)?;
        Ok(items.into_iter().find(|i| i.item_id == item_id))
    }

    pub fn pmi_categories(pool: &DbPool) -> AppResult<Vec<PmiCategory>> {
        let mut cats: Vec<PmiCategory> = store::scan_as(&pool.conn)?;
        cats.retain(|c| c.is_active);
        cats.sort_by_key(|c| c.sort_order);
        Ok(cats)
    }

    pub fn pmi_items(pool: &DbPool, category_id: &str) -> AppResult<Vec<PmiItem>> {
        let mut items: Vec<PmiItem> =
            store::query_as(&pool.conn, &category_pk(category_id), "ITEM#")?;
        items.retain(|i| i.is_active);
        items.sort_by_key(|i| i.sort_order);
        Ok(items)
    }

    pub fn find_pmi_item(pool: &DbPool, item_id: &str) -> AppResult<Option<PmiItem>> {
        let items: Vec<PmiItem> = store::scan_as(&pool.conn)?;
        Ok(items.into_iter().find(|i| i.item_id == item_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_data_counts() {
        let pool = DbPool::open_in_memory().unwrap();
        assert_eq!(CatalogLogic::areas(&pool).unwrap().len(), 8);
        assert_eq!(CatalogLogic::checklist(&pool).unwrap().len(), 54);
        assert_eq!(CatalogLogic::pmi_categories(&pool).unwrap().len(), 8);

        let hvac = CatalogLogic::pmi_items(&pool, "CAT001").unwrap();
        let ids: Vec<_> = hvac.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["PMI001", "PMI002", "PMI003", "PMI004"]);
    }

    #[test]
    fn items_follow_sort_order() {
        let pool = DbPool::open_in_memory().unwrap();
        let kitchen = CatalogLogic::items(&pool, "Kitchen").unwrap();
        assert_eq!(kitchen.len(), 8);
        assert_eq!(kitchen[0].item_id, "K001");
        assert_eq!(kitchen[7].item_id, "K008");
        assert!(CatalogLogic::items(&pool, "Garage").unwrap().is_empty());
    }

    #[test]
    fn seeding_twice_is_harmless() {
        let pool = DbPool::open_in_memory().unwrap();
        seed(&pool.conn).unwrap();
        assert_eq!(store::count(&pool.conn, "InspectionItem").unwrap(), 54);
        assert_eq!(store::count(&pool.conn, "PMIItem").unwrap(), 32);
    }

    #[test]
    fn find_item_searches_all_areas() {
        let pool = DbPool::open_in_memory().unwrap();
        let item = CatalogLogic::find_item(&pool, "SF002").unwrap().unwrap();
        assert_eq!(item.area_name, "Safety/Fire Protection");
        assert!(CatalogLogic::find_item(&pool, "ZZ999").unwrap().is_none());
    }
}
