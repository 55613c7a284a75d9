//! Filter → SQL
//!
//! Compiles a domain `Filter` into a WHERE/ORDER BY suffix with bound
//! parameters. Column names are checked against a per-table whitelist and
//! always quoted, since `order` is a keyword.

use rusqlite::types::Value;

use crate::domain::{Condition, DomainError, DomainResult, FieldValue, Filter};

pub(super) struct SqlFilter {
    pub clause: String,
    pub params: Vec<Value>,
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(b) => Value::Integer(*b as i64),
        FieldValue::Int(i) => Value::Integer(*i),
        FieldValue::Text(s) => Value::Text(s.clone()),
    }
}

fn checked<'a>(column: &'a str, columns: &[&str]) -> DomainResult<&'a str> {
    if columns.contains(&column) {
        Ok(column)
    } else {
        Err(DomainError::InvalidInput(format!("Unknown column: {}", column)))
    }
}

pub(super) fn compile(filter: &Filter, columns: &[&str]) -> DomainResult<SqlFilter> {
    let mut predicates = Vec::new();
    let mut params = Vec::new();

    for condition in &filter.conditions {
        let column = checked(condition.column(), columns)?;
        match condition {
            Condition::Eq(_, FieldValue::Null) => {
                predicates.push(format!("\"{}\" IS NULL", column));
            }
            Condition::Eq(_, value) => {
                params.push(to_sql_value(value));
                predicates.push(format!("\"{}\" = ?{}", column, params.len()));
            }
            Condition::In(_, values) if values.is_empty() => {
                predicates.push("0 = 1".to_string());
            }
            Condition::In(_, values) => {
                let mut slots = Vec::with_capacity(values.len());
                for value in values {
                    params.push(to_sql_value(value));
                    slots.push(format!("?{}", params.len()));
                }
                predicates.push(format!("\"{}\" IN ({})", column, slots.join(", ")));
            }
        }
    }

    let mut clause = String::new();
    if !predicates.is_empty() {
        clause.push_str(" WHERE ");
        clause.push_str(&predicates.join(" AND "));
    }
    if let Some(order) = filter.order_by {
        let column = checked(order.column, columns)?;
        let direction = if order.descending { "DESC" } else { "ASC" };
        clause.push_str(&format!(" ORDER BY \"{}\" {}, \"id\" ASC", column, direction));
    }

    Ok(SqlFilter { clause, params })
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[&str] = &["id", "list_id", "order"];

    #[test]
    fn test_compile_eq_in_and_order() {
        let filter = Filter::all()
            .eq("list_id", 3u32)
            .is_in("id", [1u32, 2])
            .order_by("order");
        let sql = compile(&filter, COLUMNS).unwrap();
        assert_eq!(
            sql.clause,
            " WHERE \"list_id\" = ?1 AND \"id\" IN (?2, ?3) ORDER BY \"order\" ASC, \"id\" ASC"
        );
        assert_eq!(sql.params.len(), 3);
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let filter = Filter::all().is_in("id", Vec::<u32>::new());
        let sql = compile(&filter, COLUMNS).unwrap();
        assert_eq!(sql.clause, " WHERE 0 = 1");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn test_rejects_unknown_column() {
        let filter = Filter::all().eq("title; DROP TABLE cards", 1u32);
        assert!(matches!(compile(&filter, COLUMNS), Err(DomainError::InvalidInput(_))));
    }
}
