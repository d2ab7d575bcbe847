use rusqlite::types::Value;

use crate::models::EmployeeDraft;

const SELECT_COLUMNS: &str = "SELECT id, name, title, salary FROM employees";

/// The closed set of statements the application issues. Each variant knows
/// its SQL text and how to lay out its positional parameters, so callers
/// never assemble SQL by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert(EmployeeDraft),
    Update { id: i64, draft: EmployeeDraft },
    Delete { id: i64 },
    SelectAll,
    /// `LIKE '%term%'` on the name column. The term is not escaped, so `%`
    /// and `_` keep their wildcard meaning.
    SearchByName { term: String },
}

impl Statement {
    pub fn sql(&self) -> String {
        match self {
            Statement::Insert(_) => {
                "INSERT INTO employees (name, title, salary) VALUES (?1, ?2, ?3)".to_string()
            }
            Statement::Update { .. } => {
                "UPDATE employees SET name = ?1, title = ?2, salary = ?3 WHERE id = ?4".to_string()
            }
            Statement::Delete { .. } => "DELETE FROM employees WHERE id = ?1".to_string(),
            Statement::SelectAll => format!("{SELECT_COLUMNS} ORDER BY id"),
            Statement::SearchByName { .. } => {
                format!("{SELECT_COLUMNS} WHERE name LIKE ?1 ORDER BY id")
            }
        }
    }

    /// Positional parameters in `?N` order.
    pub fn params(&self) -> Vec<Value> {
        match self {
            Statement::Insert(draft) => draft_values(draft),
            Statement::Update { id, draft } => {
                let mut values = draft_values(draft);
                values.push(Value::Integer(*id));
                values
            }
            Statement::Delete { id } => vec![Value::Integer(*id)],
            Statement::SelectAll => Vec::new(),
            Statement::SearchByName { term } => vec![Value::Text(format!("%{term}%"))],
        }
    }

    /// Whether the statement yields rows rather than modifying the table.
    pub fn is_query(&self) -> bool {
        matches!(self, Statement::SelectAll | Statement::SearchByName { .. })
    }

    /// Short name used in log events and error context.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Insert(_) => "insert",
            Statement::Update { .. } => "update",
            Statement::Delete { .. } => "delete",
            Statement::SelectAll => "select_all",
            Statement::SearchByName { .. } => "search",
        }
    }
}

fn draft_values(draft: &EmployeeDraft) -> Vec<Value> {
    vec![
        Value::Text(draft.name.clone()),
        Value::Text(draft.title.clone()),
        Value::from(&draft.salary),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_binds_id_last() {
        let statement = Statement::Update {
            id: 3,
            draft: EmployeeDraft::from_input("Ana", "Clerk", "1000"),
        };
        assert_eq!(
            statement.params(),
            vec![
                Value::Text("Ana".into()),
                Value::Text("Clerk".into()),
                Value::Real(1000.0),
                Value::Integer(3),
            ]
        );
        assert!(statement.sql().ends_with("WHERE id = ?4"));
    }

    #[test]
    fn search_wraps_term_in_wildcards() {
        let statement = Statement::SearchByName { term: "an".into() };
        assert_eq!(statement.params(), vec![Value::Text("%an%".into())]);
        assert!(statement.is_query());
        assert!(statement.sql().contains("name LIKE ?1"));
    }

    #[test]
    fn empty_salary_is_bound_as_text() {
        let statement = Statement::Insert(EmployeeDraft::from_input("Ana", "Clerk", ""));
        assert_eq!(statement.params()[2], Value::Text(String::new()));
        assert!(!statement.is_query());
    }
}
