//! Recipe and tag rules that hold regardless of storage.

/// Minimum cooking time in minutes.
pub const MIN_COOKING_TIME: i32 = 1;

/// Minimum amount of an ingredient on a recipe.
pub const MIN_AMOUNT: i32 = 1;

pub const MAX_RECIPE_NAME_LEN: usize = 200;

pub const MAX_TAG_NAME_LEN: usize = 256;

pub const MAX_TAG_SLUG_LEN: usize = 50;

/// Image formats accepted for recipe pictures, as (MIME subtype, file extension).
const IMAGE_FORMATS: &[(&str, &str)] = &[
    ("png", "png"),
    ("jpeg", "jpg"),
    ("jpg", "jpg"),
    ("gif", "gif"),
    ("webp", "webp"),
];

/// Errors from [`parse_image_data_url`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageDataError {
    #[error("expected a data:image/...;base64, URL")]
    NotDataUrl,
    #[error("unsupported image type")]
    UnsupportedType,
    #[error("empty image payload")]
    Empty,
}

/// A `data:` URL split into file extension and base64 payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData<'a> {
    pub extension: &'static str,
    pub base64: &'a str,
}

/// Split `data:image/<type>;base64,<payload>` into extension + payload.
pub fn parse_image_data_url(value: &str) -> Result<ImageData<'_>, ImageDataError> {
    let rest = value
        .strip_prefix("data:image/")
        .ok_or(ImageDataError::NotDataUrl)?;
    let (subtype, payload) = rest
        .split_once(";base64,")
        .ok_or(ImageDataError::NotDataUrl)?;
    let extension = IMAGE_FORMATS
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(subtype))
        .map(|(_, ext)| *ext)
        .ok_or(ImageDataError::UnsupportedType)?;
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(ImageDataError::Empty);
    }
    Ok(ImageData {
        extension,
        base64: payload,
    })
}

/// `true` for `#RRGGBB` hex colors.
pub fn validate_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// `true` for slugs of ASCII letters, digits, hyphens and underscores.
pub fn validate_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_TAG_SLUG_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// The first id that repeats an earlier one, scanning in input order.
pub fn first_duplicate<T: PartialEq + Copy>(ids: &[T]) -> Option<T> {
    ids.iter()
        .enumerate()
        .find(|&(i, id)| ids[..i].contains(id))
        .map(|(_, id)| *id)
}
