//! Contact payload validation. Collects every violation before rejecting.

use crate::error::{AppError, FieldViolation};
use crate::model::{ContactPatch, NewContact};
use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL: &str = "email";
pub const FAVORITE_COLOR: &str = "favoriteColor";
pub const BIRTHDAY: &str = "birthday";

const RECOGNIZED: [&str; 5] = [FIRST_NAME, LAST_NAME, EMAIL, FAVORITE_COLOR, BIRTHDAY];

const EMAIL_MESSAGE: &str = "Valid email is required";
const COLOR_TYPE_MESSAGE: &str = "Favorite color must be text";
const COLOR_BLANK_MESSAGE: &str = "Favorite color cannot be empty";
const BIRTHDAY_MESSAGE: &str = "Birthday must be a valid date (YYYY-MM-DD)";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("email pattern compiles")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"));

pub struct ContactValidator;

impl ContactValidator {
    /// Create: names and email required, optional fields checked when present.
    pub fn validate_create(body: &Map<String, Value>) -> Result<NewContact, AppError> {
        let mut errors = Vec::new();
        let first_name = check(&mut errors, FIRST_NAME, "First name is required", required(name(body.get(FIRST_NAME))));
        let last_name = check(&mut errors, LAST_NAME, "Last name is required", required(name(body.get(LAST_NAME))));
        let email = check(&mut errors, EMAIL, EMAIL_MESSAGE, required(email(body.get(EMAIL))));
        // Blank colors are dropped on create; only update rejects them.
        let favorite_color = check(&mut errors, FAVORITE_COLOR, COLOR_TYPE_MESSAGE, optional_text(body.get(FAVORITE_COLOR)));
        let birthday = check(&mut errors, BIRTHDAY, BIRTHDAY_MESSAGE, birthday(body.get(BIRTHDAY)));

        match (first_name, last_name, email) {
            (Some(first_name), Some(last_name), Some(email)) if errors.is_empty() => Ok(NewContact {
                first_name,
                last_name,
                email,
                favorite_color,
                birthday,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }

    /// Update: every field optional, but at least one recognized field must be supplied.
    pub fn validate_update(body: &Map<String, Value>) -> Result<ContactPatch, AppError> {
        let supplied = RECOGNIZED
            .iter()
            .filter(|k| body.get(**k).is_some_and(|v| !v.is_null()))
            .count();
        if supplied == 0 {
            return Err(AppError::Validation(vec![FieldViolation::new(
                "body",
                "At least one field must be provided for update",
            )]));
        }

        let mut errors = Vec::new();
        let patch = ContactPatch {
            first_name: check(&mut errors, FIRST_NAME, "First name cannot be empty", name(body.get(FIRST_NAME))),
            last_name: check(&mut errors, LAST_NAME, "Last name cannot be empty", name(body.get(LAST_NAME))),
            email: check(&mut errors, EMAIL, EMAIL_MESSAGE, email(body.get(EMAIL))),
            favorite_color: color_patch(&mut errors, body.get(FAVORITE_COLOR)),
            birthday: check(&mut errors, BIRTHDAY, BIRTHDAY_MESSAGE, birthday(body.get(BIRTHDAY))),
        };
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(patch)
    }
}

/// Request bodies must be JSON objects.
pub fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(body_violation()),
    }
}

pub fn body_violation() -> AppError {
    AppError::Validation(vec![FieldViolation::new("body", "Request body must be a JSON object")])
}

/// `Ok(None)` = not supplied, `Err(())` = supplied but invalid.
type FieldResult<T> = Result<Option<T>, ()>;

fn check<T>(
    errors: &mut Vec<FieldViolation>,
    field: &str,
    message: &str,
    result: FieldResult<T>,
) -> Option<T> {
    match result {
        Ok(v) => v,
        Err(()) => {
            errors.push(FieldViolation::new(field, message));
            None
        }
    }
}

fn required<T>(result: FieldResult<T>) -> FieldResult<T> {
    match result {
        Ok(None) => Err(()),
        other => other,
    }
}

fn text(v: Option<&Value>) -> FieldResult<&str> {
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim())),
        Some(_) => Err(()),
    }
}

fn non_empty(v: Option<&Value>) -> FieldResult<String> {
    match text(v)? {
        Some("") => Err(()),
        other => Ok(other.map(str::to_string)),
    }
}

fn name(v: Option<&Value>) -> FieldResult<String> {
    non_empty(v)
}

fn optional_text(v: Option<&Value>) -> FieldResult<String> {
    Ok(text(v)?.filter(|s| !s.is_empty()).map(str::to_string))
}

fn color_patch(errors: &mut Vec<FieldViolation>, v: Option<&Value>) -> Option<String> {
    match text(v) {
        Err(()) => check(errors, FAVORITE_COLOR, COLOR_TYPE_MESSAGE, Err(())),
        Ok(Some("")) => check(errors, FAVORITE_COLOR, COLOR_BLANK_MESSAGE, Err(())),
        Ok(other) => other.map(str::to_string),
    }
}

fn email(v: Option<&Value>) -> FieldResult<String> {
    let Some(s) = text(v)? else {
        return Ok(None);
    };
    if is_email(s) {
        Ok(Some(s.to_lowercase()))
    } else {
        Err(())
    }
}

fn birthday(v: Option<&Value>) -> FieldResult<NaiveDate> {
    let Some(s) = text(v)? else {
        return Ok(None);
    };
    if !DATE_RE.is_match(s) {
        return Err(());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Some).map_err(|_| ())
}

pub fn is_email(s: &str) -> bool {
    if s.len() > 254 || !EMAIL_RE.is_match(s) {
        return false;
    }
    let Some((local, _)) = s.rsplit_once('@') else {
        return false;
    };
    local.len() <= 64 && !local.starts_with('.') && !local.ends_with('.') && !local.contains("..")
}
