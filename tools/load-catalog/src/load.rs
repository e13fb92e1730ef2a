use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, TransactionTrait, sea_query::OnConflict,
};

use foodgram_api_schema::{ingredient_units, ingredients, measurement_units, tags};

use crate::parse::{IngredientRow, TagRow};

/// Rows per INSERT statement; keeps bind parameters well under the
/// PostgreSQL limit.
const CHUNK: usize = 1000;

/// Rows actually inserted by one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub units: u64,
    pub ingredients: u64,
    pub ingredient_units: u64,
}

/// Distinct names, sorted.
fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// `(ingredient, unit)` name pairs, deduplicated.
fn distinct_pairs(rows: &[IngredientRow]) -> Vec<(&str, &str)> {
    rows.iter()
        .map(|row| (row.name.as_str(), row.measurement_unit.as_str()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Insert everything in one transaction. Existing names and pairs are left
/// untouched.
pub async fn load_ingredients(db: &DatabaseConnection, rows: &[IngredientRow]) -> Result<LoadReport> {
    if rows.is_empty() {
        return Ok(LoadReport::default());
    }
    let rows = rows.to_vec();
    db.transaction::<_, LoadReport, DbErr>(|txn| {
        Box::pin(async move { load_in(txn, &rows).await })
    })
    .await
    .context("load ingredients")
}

async fn load_in<C: ConnectionTrait>(db: &C, rows: &[IngredientRow]) -> Result<LoadReport, DbErr> {
    let mut report = LoadReport::default();

    let unit_names = distinct(rows.iter().map(|r| r.measurement_unit.as_str()));
    for chunk in unit_names.chunks(CHUNK) {
        report.units += measurement_units::Entity::insert_many(chunk.iter().map(|name| {
            measurement_units::ActiveModel {
                name: Set(name.clone()),
                ..Default::default()
            }
        }))
        .on_conflict(
            OnConflict::column(measurement_units::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    }

    let ingredient_names = distinct(rows.iter().map(|r| r.name.as_str()));
    for chunk in ingredient_names.chunks(CHUNK) {
        report.ingredients += ingredients::Entity::insert_many(chunk.iter().map(|name| {
            ingredients::ActiveModel {
                name: Set(name.clone()),
                ..Default::default()
            }
        }))
        .on_conflict(
            OnConflict::column(ingredients::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    }

    let mut unit_ids = HashMap::new();
    for chunk in unit_names.chunks(CHUNK) {
        for unit in measurement_units::Entity::find()
            .filter(measurement_units::Column::Name.is_in(chunk.iter().cloned()))
            .all(db)
            .await?
        {
            unit_ids.insert(unit.name, unit.id);
        }
    }
    let mut ingredient_ids = HashMap::new();
    for chunk in ingredient_names.chunks(CHUNK) {
        for ingredient in ingredients::Entity::find()
            .filter(ingredients::Column::Name.is_in(chunk.iter().cloned()))
            .all(db)
            .await?
        {
            ingredient_ids.insert(ingredient.name, ingredient.id);
        }
    }

    let pairs: Vec<ingredient_units::ActiveModel> = distinct_pairs(rows)
        .into_iter()
        .filter_map(|(name, unit)| {
            Some(ingredient_units::ActiveModel {
                ingredient_id: Set(*ingredient_ids.get(name)?),
                measurement_unit_id: Set(*unit_ids.get(unit)?),
                ..Default::default()
            })
        })
        .collect();
    for chunk in pairs.chunks(CHUNK) {
        report.ingredient_units += ingredient_units::Entity::insert_many(chunk.to_vec())
            .on_conflict(
                OnConflict::columns([
                    ingredient_units::Column::IngredientId,
                    ingredient_units::Column::MeasurementUnitId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    tracing::debug!(?report, "ingredient load finished");
    Ok(report)
}

/// Insert tags in one statement. A row clashing with an existing name, slug
/// or colour is skipped. Returns the number inserted.
pub async fn load_tags(db: &DatabaseConnection, rows: &[TagRow]) -> Result<u64> {
    if rows.is_empty() {
        return Ok(0);
    }
    let inserted = tags::Entity::insert_many(rows.iter().map(|row| tags::ActiveModel {
        name: Set(row.name.clone()),
        slug: Set(row.slug.clone()),
        color: Set(row.color.clone()),
        ..Default::default()
    }))
    .on_conflict(OnConflict::new().do_nothing().to_owned())
    .exec_without_returning(db)
    .await
    .context("load tags")?;
    tracing::debug!(rows = rows.len(), inserted, "tag load finished");
    Ok(inserted)
}
