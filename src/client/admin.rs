//! Dataset administration through the extension's management functions

use serde::{Deserialize, Serialize};

use crate::observability::Logger;

use super::dataset::DatasetClient;
use super::errors::{ClientError, ClientResult};

const LIST_DATASETS_SQL: &str =
    "SELECT id, dataset_name, current_pos FROM pgl.pgl_qdataset_status ORDER BY id";
const CREATE_DATASET_SQL: &str = "SELECT pgl_qdataset_create($1)";
const DELETE_DATASET_SQL: &str = "SELECT pgl_qdataset_delete($1)";
const INSERT_QUERY_SQL: &str = "SELECT pgl_qdataset_insert($1, $2)";
const IMPORT_QUERIES_SQL: &str = "SELECT pgl_qdataset_import($1, $2)";

/// One row of `pgl.pgl_qdataset_status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStatus {
    pub id: i64,
    pub name: String,
    /// Server-tracked position used by `offset = -1`
    pub current_pos: i64,
}

impl DatasetClient {
    /// List all datasets with their server-tracked positions
    pub fn list_datasets(&self) -> ClientResult<Vec<DatasetStatus>> {
        let mut client = self.connect()?;
        let rows = client
            .query(LIST_DATASETS_SQL, &[])
            .map_err(ClientError::Query)?;

        rows.iter()
            .map(|row| -> ClientResult<DatasetStatus> {
                Ok(DatasetStatus {
                    id: row.try_get("id").map_err(ClientError::Query)?,
                    name: row.try_get("dataset_name").map_err(ClientError::Query)?,
                    current_pos: row.try_get("current_pos").map_err(ClientError::Query)?,
                })
            })
            .collect()
    }

    /// Create an empty dataset positioned at 0
    pub fn create_dataset(&self, name: &str) -> ClientResult<()> {
        self.execute(CREATE_DATASET_SQL, &[&name])?;
        Logger::info("DATASET_CREATED", &[("dataset", name)]);
        Ok(())
    }

    /// Drop a dataset and its status row
    pub fn delete_dataset(&self, name: &str) -> ClientResult<()> {
        self.execute(DELETE_DATASET_SQL, &[&name])?;
        Logger::info("DATASET_DELETED", &[("dataset", name)]);
        Ok(())
    }

    /// Append one SQL query to a dataset
    pub fn insert_query(&self, name: &str, query: &str) -> ClientResult<()> {
        self.execute(INSERT_QUERY_SQL, &[&name, &query])?;
        Logger::info("DATASET_QUERY_INSERTED", &[("dataset", name)]);
        Ok(())
    }

    /// Import `;`-separated queries from a file on the database server
    pub fn import_queries(&self, name: &str, server_path: &str) -> ClientResult<()> {
        self.execute(IMPORT_QUERIES_SQL, &[&name, &server_path])?;
        Logger::info(
            "DATASET_QUERIES_IMPORTED",
            &[("dataset", name), ("path", server_path)],
        );
        Ok(())
    }

    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn postgres::types::ToSql + Sync)],
    ) -> ClientResult<u64> {
        let mut client = self.connect()?;
        client.execute(sql, params).map_err(ClientError::Query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_management_calls_bind_positionally() {
        for sql in [CREATE_DATASET_SQL, DELETE_DATASET_SQL] {
            assert!(sql.ends_with("($1)"));
        }
        for sql in [INSERT_QUERY_SQL, IMPORT_QUERIES_SQL] {
            assert!(sql.ends_with("($1, $2)"));
        }
    }

    #[test]
    fn test_status_serializes_for_output() {
        let status = DatasetStatus {
            id: 1,
            name: "tpch".to_string(),
            current_pos: 20,
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["name"], "tpch");
        assert_eq!(value["current_pos"], 20);
    }
}
