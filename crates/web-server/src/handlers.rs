use crate::error::AppError;

pub mod journal;
pub mod plants;

/// Parses a path segment as a database id. Ids are generated by `SERIAL`
/// columns, so anything that is not a positive integer is a bad request.
pub(crate) fn parse_id(field: &'static str, raw: &str) -> Result<i32, AppError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::bad_request(field, format!("invalid {field}: {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("id", "42").unwrap(), 42);
        for raw in ["0", "-3", "abc", "", "1.5"] {
            match parse_id("id", raw) {
                Err(AppError::BadRequest { field, .. }) => assert_eq!(field, "id"),
                other => panic!("{raw:?} parsed as {other:?}"),
            }
        }
    }
}
