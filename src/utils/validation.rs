use crate::utils::error::{RegistrarError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(RegistrarError::invalid_argument(
            field_name,
            path,
            "Path cannot be empty",
        ));
    }

    if path.contains('\0') {
        return Err(RegistrarError::invalid_argument(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_positive_number<T>(field_name: &str, value: T, min_value: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min_value {
        return Err(RegistrarError::invalid_argument(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistrarError::invalid_argument(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// 學生姓名：名與姓皆不可為空白
pub fn validate_student_name(first_name: &str, last_name: &str) -> Result<()> {
    validate_non_empty_string("first_name", first_name)?;
    validate_non_empty_string("last_name", last_name)
}

/// 課程識別：系所不可為空白，課號至少為 1
pub fn validate_subject_id(department: &str, course_number: u32) -> Result<()> {
    validate_non_empty_string("department", department)?;
    validate_positive_number("course_number", course_number, 1)
}
