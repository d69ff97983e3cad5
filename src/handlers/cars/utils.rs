use uuid::Uuid;

use crate::error::ApiError;

/// Parse the `{id}` path segment. Anything that is not a UUID cannot name a
/// car, so it is reported the same way as an id with no row.
pub fn parse_car_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_uuids_only() {
        let id = Uuid::new_v4();
        assert_eq!(parse_car_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_car_id("42"), Err(ApiError::NotFound)));
        assert!(matches!(parse_car_id("validate"), Err(ApiError::NotFound)));
    }
}
