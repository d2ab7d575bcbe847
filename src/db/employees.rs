use anyhow::{anyhow, Context, Result};
use log::{debug, error};
use rusqlite::{params_from_iter, Row};

use super::{EmployeeStore, Statement};
use crate::models::Employee;

impl EmployeeStore {
    /// Execute one statement and commit it immediately (SQLite autocommit).
    ///
    /// Queries return their rows ordered by id, possibly none. Mutations
    /// return an empty vector; an update or delete that matches no row is
    /// reported as an error so the caller can tell the user.
    pub fn run(&self, statement: &Statement) -> Result<Vec<Employee>> {
        let result = if statement.is_query() {
            self.query(statement)
        } else {
            self.execute(statement).map(|_| Vec::new())
        };

        if let Err(err) = &result {
            error!(
                "event=db_run module=db status=error kind={} error={:#}",
                statement.kind(),
                err
            );
        }
        result
    }

    /// Every employee, ordered by id.
    pub fn fetch_all(&self) -> Result<Vec<Employee>> {
        self.run(&Statement::SelectAll)
    }

    /// Employees whose name matches `LIKE '%term%'`.
    pub fn search_by_name(&self, term: &str) -> Result<Vec<Employee>> {
        self.run(&Statement::SearchByName {
            term: term.to_string(),
        })
    }

    fn query(&self, statement: &Statement) -> Result<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&statement.sql())
            .with_context(|| format!("failed to prepare {} query", statement.kind()))?;

        let employees = stmt
            .query_map(params_from_iter(statement.params()), employee_from_row)
            .context("failed to load employees")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect employees")?;

        debug!(
            "event=db_run module=db status=ok kind={} rows={}",
            statement.kind(),
            employees.len()
        );
        Ok(employees)
    }

    fn execute(&self, statement: &Statement) -> Result<usize> {
        let affected = self
            .conn
            .execute(&statement.sql(), params_from_iter(statement.params()))
            .with_context(|| format!("failed to {} employee", statement.kind()))?;

        match statement {
            Statement::Insert(_) => {
                debug!(
                    "event=db_run module=db status=ok kind=insert id={}",
                    self.conn.last_insert_rowid()
                );
            }
            Statement::Update { id, .. } | Statement::Delete { id } if affected == 0 => {
                return Err(anyhow!("Employee {id} not found."));
            }
            _ => {
                debug!(
                    "event=db_run module=db status=ok kind={} rows={}",
                    statement.kind(),
                    affected
                );
            }
        }
        Ok(affected)
    }
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        salary: row.get(3)?,
    })
}
