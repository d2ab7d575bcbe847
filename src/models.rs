//! Domain models that mirror the `employees` table. These stay plain data
//! holders so the store can focus on SQL and the UI on presentation.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef};

#[derive(Debug, Clone, PartialEq)]
/// One row of the `employees` table.
pub struct Employee {
    /// Primary key assigned by SQLite on insert. Update and remove flows send
    /// it back to the store; it is never edited.
    pub id: i64,
    pub name: String,
    pub title: String,
    pub salary: Salary,
}

#[derive(Debug, Clone, PartialEq)]
/// Editable attributes of an employee, used for inserts and updates.
pub struct EmployeeDraft {
    pub name: String,
    pub title: String,
    pub salary: Salary,
}

impl EmployeeDraft {
    /// Build a draft from raw form text. The salary is parsed leniently, see
    /// [`Salary::parse`].
    pub fn from_input(name: &str, title: &str, salary: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            salary: Salary::parse(salary),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Value stored in the `salary` column.
///
/// The column has REAL affinity, so numeric input lands as a float. Anything
/// else (an empty field passed through by an update, free text) is kept as
/// text exactly like SQLite would store it.
pub enum Salary {
    Amount(f64),
    Text(String),
}

impl Salary {
    /// Interpret user input. Finite numbers become [`Salary::Amount`], every
    /// other string is preserved verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => Salary::Amount(amount),
            _ => Salary::Text(raw.to_string()),
        }
    }

    /// Text to put back into an input field. Unlike [`fmt::Display`], amounts
    /// keep their full precision so re-submitting the form stores the same
    /// value.
    pub fn to_input(&self) -> String {
        match self {
            Salary::Amount(amount) => amount.to_string(),
            Salary::Text(text) => text.clone(),
        }
    }

    /// Numeric value, if the cell holds one.
    pub fn amount(&self) -> Option<f64> {
        match self {
            Salary::Amount(amount) => Some(*amount),
            Salary::Text(_) => None,
        }
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Salary::Amount(amount) => write!(f, "{amount:.2}"),
            Salary::Text(text) => f.write_str(text),
        }
    }
}

impl From<&Salary> for Value {
    fn from(salary: &Salary) -> Self {
        match salary {
            Salary::Amount(amount) => Value::Real(*amount),
            Salary::Text(text) => Value::Text(text.clone()),
        }
    }
}

impl FromSql for Salary {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Real(amount) => Ok(Salary::Amount(amount)),
            ValueRef::Integer(amount) => Ok(Salary::Amount(amount as f64)),
            ValueRef::Text(_) => value.as_str().map(|text| Salary::Text(text.to_string())),
            ValueRef::Null => Ok(Salary::Text(String::new())),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_input_becomes_amount() {
        assert_eq!(Salary::parse("1000"), Salary::Amount(1000.0));
        assert_eq!(Salary::parse(" 1234.5 "), Salary::Amount(1234.5));
    }

    #[test]
    fn non_numeric_input_is_kept_verbatim() {
        assert_eq!(Salary::parse(""), Salary::Text(String::new()));
        assert_eq!(Salary::parse("a lot"), Salary::Text("a lot".into()));
        assert_eq!(Salary::parse("NaN"), Salary::Text("NaN".into()));
        assert_eq!(Salary::parse("inf"), Salary::Text("inf".into()));
    }

    #[test]
    fn amounts_render_with_two_decimals() {
        assert_eq!(Salary::Amount(1000.0).to_string(), "1000.00");
        assert_eq!(Salary::Amount(12.5).to_string(), "12.50");
        assert_eq!(Salary::Text("tbd".into()).to_string(), "tbd");
    }

    #[test]
    fn input_text_keeps_full_precision() {
        assert_eq!(Salary::Amount(1000.125).to_input(), "1000.125");
        assert_eq!(Salary::Amount(1200.0).to_input(), "1200");
        assert_eq!(Salary::parse(&Salary::Amount(0.1).to_input()), Salary::Amount(0.1));
        assert_eq!(Salary::Text("tbd".into()).to_input(), "tbd");
    }
}
