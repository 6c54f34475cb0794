use thiserror::Error;

/// Everything that can go wrong between picking a photo and showing a recipe.
#[derive(Error, Debug)]
pub enum FoodeeError {
    #[error("no image file selected")]
    NoFileSelected,

    #[error("nothing was detected in the image")]
    NoObjectDetected,

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("recipe store error: {0}")]
    Repository(String),
}

impl From<rusqlite::Error> for FoodeeError {
    fn from(err: rusqlite::Error) -> Self {
        FoodeeError::Repository(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FoodeeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_errors_become_repository_errors() {
        let err: FoodeeError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, FoodeeError::Repository(_)));
    }

    #[test]
    fn test_display_includes_detail() {
        let err = FoodeeError::Inference("bad tensor".to_string());
        assert_eq!(err.to_string(), "inference failed: bad tensor");
    }
}
