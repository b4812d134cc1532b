use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Gave up connecting to PostgreSQL after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Referential integrity violation: {0}")]
    ForeignKeyViolation(String),

    #[error("The poll has no votes to tally")]
    DivisionByZero,

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_exhausted_names_the_budget() {
        let err = DbError::RetriesExhausted { attempts: 5 };
        assert_eq!(
            err.to_string(),
            "Gave up connecting to PostgreSQL after 5 attempts"
        );
    }
}
