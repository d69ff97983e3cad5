use crate::database::record::CarInput;

/// First required-field violation found on a car payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Body required")]
    BodyRequired,
    #[error("Manufacture required")]
    ManufactureRequired,
    #[error("Year required")]
    YearRequired,
    #[error("Model required")]
    ModelRequired,
    #[error("Color required")]
    ColorRequired,
}

/// Check that a payload is present and its four text fields are non-blank.
///
/// Fields are checked in a fixed order (manufacture, year, model, color) and
/// only the first failure is reported. `year` is not checked for being
/// numeric and `isClassic` is not checked at all.
pub fn validate(input: Option<&CarInput>) -> Result<(), ValidationError> {
    let input = input.ok_or(ValidationError::BodyRequired)?;

    let checks = [
        (&input.manufacture, ValidationError::ManufactureRequired),
        (&input.year, ValidationError::YearRequired),
        (&input.model, ValidationError::ModelRequired),
        (&input.color, ValidationError::ColorRequired),
    ];

    for (value, error) in checks {
        if is_blank(value.as_deref()) {
            return Err(error);
        }
    }

    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CarInput {
        CarInput {
            id: None,
            manufacture: Some("Ford".into()),
            year: Some("1967".into()),
            model: Some("Mustang".into()),
            color: Some("Red".into()),
            is_classic: false,
        }
    }

    #[test]
    fn accepts_complete_payload() {
        assert_eq!(validate(Some(&complete())), Ok(()));
    }

    #[test]
    fn missing_body_is_reported_first() {
        assert_eq!(validate(None), Err(ValidationError::BodyRequired));
        assert_eq!(ValidationError::BodyRequired.to_string(), "Body required");
    }

    #[test]
    fn blank_and_whitespace_fields_fail() {
        let mut input = complete();
        input.manufacture = Some(String::new());
        assert_eq!(validate(Some(&input)), Err(ValidationError::ManufactureRequired));

        input.manufacture = Some(" \t\n".into());
        assert_eq!(validate(Some(&input)), Err(ValidationError::ManufactureRequired));
        assert_eq!(
            ValidationError::ManufactureRequired.to_string(),
            "Manufacture required"
        );
    }

    #[test]
    fn reports_first_failure_in_fixed_order() {
        let mut input = CarInput::default();
        assert_eq!(validate(Some(&input)), Err(ValidationError::ManufactureRequired));

        input.manufacture = Some("Ford".into());
        assert_eq!(validate(Some(&input)), Err(ValidationError::YearRequired));

        input.year = Some("1967".into());
        assert_eq!(validate(Some(&input)), Err(ValidationError::ModelRequired));

        input.model = Some("Mustang".into());
        assert_eq!(validate(Some(&input)), Err(ValidationError::ColorRequired));

        input.color = Some("Red".into());
        assert_eq!(validate(Some(&input)), Ok(()));
    }

    #[test]
    fn year_is_not_checked_for_digits() {
        let mut input = complete();
        input.year = Some("nineteen sixty-seven".into());
        assert_eq!(validate(Some(&input)), Ok(()));
    }
}
