use std::io::Read;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, Trim};

use foodgram_domain::recipe::{MAX_TAG_NAME_LEN, validate_color, validate_slug};

/// One `name,measurement_unit` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRow {
    pub name: String,
    pub measurement_unit: String,
}

/// One `name,slug,color` line. `color` is upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRow {
    pub name: String,
    pub slug: String,
    pub color: String,
}

/// Non-blank records paired with their 1-based file line.
fn records(reader: impl Read, has_headers: bool) -> Result<Vec<(usize, StringRecord)>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 1 + usize::from(has_headers);
        let record = record.with_context(|| format!("line {line}: malformed CSV"))?;
        if !record.iter().all(str::is_empty) {
            records.push((line, record));
        }
    }
    Ok(records)
}

/// Read every ingredient row. Blank lines are skipped; a row without both
/// columns is an error naming its line.
pub fn read_ingredient_rows(reader: impl Read, has_headers: bool) -> Result<Vec<IngredientRow>> {
    records(reader, has_headers)?
        .into_iter()
        .map(|(line, record)| match (record.get(0), record.get(1)) {
            (Some(name), Some(unit)) if !name.is_empty() && !unit.is_empty() => Ok(IngredientRow {
                name: name.to_owned(),
                measurement_unit: unit.to_owned(),
            }),
            _ => bail!("line {line}: expected `name,measurement_unit`"),
        })
        .collect()
}

/// Read every tag row, rejecting the first one with an invalid slug or colour.
pub fn read_tag_rows(reader: impl Read, has_headers: bool) -> Result<Vec<TagRow>> {
    records(reader, has_headers)?
        .into_iter()
        .map(|(line, record)| {
            let (Some(name), Some(slug), Some(color)) = (record.get(0), record.get(1), record.get(2))
            else {
                bail!("line {line}: expected `name,slug,color`");
            };
            if name.is_empty() || name.chars().count() > MAX_TAG_NAME_LEN {
                bail!("line {line}: tag name must be 1 to {MAX_TAG_NAME_LEN} characters");
            }
            if !validate_slug(slug) {
                bail!("line {line}: invalid slug {slug:?}");
            }
            if !validate_color(color) {
                bail!("line {line}: colour {color:?} is not #RRGGBB");
            }
            Ok(TagRow {
                name: name.to_owned(),
                slug: slug.to_owned(),
                color: color.to_ascii_uppercase(),
            })
        })
        .collect()
}
