use chrono::NaiveDate;
use sqlx::{Executor, MySql};

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    Date(NaiveDate),
    Null,
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::String)
    }
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug, PartialEq)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
///
/// Column names come from the caller's fixed list, never from request
/// input. Returns `None` when there is nothing to set.
pub fn build_update_sql(
    table: &str,
    assignments: Vec<(&'static str, SqlValue)>,
    id_column: &str,
    id_value: u64,
) -> Option<SqlUpdate> {
    if assignments.is_empty() {
        return None;
    }

    let set_clause = assignments
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values: Vec<SqlValue> = assignments.into_iter().map(|(_, v)| v).collect();
    values.push(SqlValue::U64(id_value));

    Some(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update<'e, E>(executor: E, update: SqlUpdate) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(executor).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_set_clause_in_assignment_order() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let update = build_update_sql(
            "profiles",
            vec![
                ("name", SqlValue::String("Ada".into())),
                ("date_of_joining", SqlValue::Date(date)),
            ],
            "id",
            4,
        )
        .unwrap();

        assert_eq!(
            update.sql,
            "UPDATE profiles SET name = ?, date_of_joining = ? WHERE id = ?"
        );
        assert_eq!(
            update.values,
            vec![
                SqlValue::String("Ada".into()),
                SqlValue::Date(date),
                SqlValue::U64(4)
            ]
        );
    }

    #[test]
    fn empty_assignment_list_builds_nothing() {
        assert!(build_update_sql("profiles", Vec::new(), "id", 1).is_none());
    }

    #[test]
    fn missing_optional_text_binds_null() {
        assert_eq!(SqlValue::from(None), SqlValue::Null);
    }
}
