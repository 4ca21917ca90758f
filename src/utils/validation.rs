use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(EtlError::ValidationError {
            message: format!("{} cannot be empty", field_name),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::ValidationError {
            message: format!("{} contains null bytes: {:?}", field_name, path),
        });
    }

    Ok(())
}

pub fn validate_optional_path(field_name: &str, path: Option<&str>) -> Result<()> {
    match path {
        Some(p) => validate_path(field_name, p),
        None => Ok(()),
    }
}
