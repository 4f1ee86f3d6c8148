pub mod company;
pub mod competitor;
pub mod plan;
pub mod product;
pub mod seo;

/// Decodes a free-text JSON column, treating malformed or empty content as the default value.
pub fn decode_json_column<T>(raw: Option<&str>) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}
