// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! The table layout shared by index, question and session records.

use crate::configs::*;
use crate::error::{MockExamError, Result};

/// DynamoDB table configuration.
///
/// Index, question and session records all live in one table and are told
/// apart by their composite key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// The name of the table. It is bound by the deployment and never
    /// hard-coded.
    pub table_name:      String,
    /// The partition key attribute: the category for index and question
    /// records, the caller identity for session records.
    pub partition_key:   String,
    /// The sort key attribute.
    pub sort_key:        String,
    /// The sort key of the index record of every category.
    pub index_sort_key:  String,
    /// The attribute of the index record listing the question sort keys.
    pub index_attribute: String,
    /// Request strongly consistent reads.
    pub consistent_read: bool,
}

impl TableConfig {
    /// Creates a table configuration with the default layout.
    ///
    /// # Arguments
    /// * `table_name` - The name of the table.
    pub fn new(table_name: &str) -> Self {
        TableConfig {
            table_name:      table_name.to_owned(),
            partition_key:   MOCKEXAM_PARTITION_KEY.clone(),
            sort_key:        MOCKEXAM_SORT_KEY.clone(),
            index_sort_key:  MOCKEXAM_INDEX_SORT_KEY.clone(),
            index_attribute: MOCKEXAM_INDEX_ATTRIBUTE.clone(),
            consistent_read: *MOCKEXAM_CONSISTENT_READ,
        }
    }

    /// Reads the table name from the environment variable named by
    /// `dynamodb.table_name_env`.
    pub fn from_env() -> Result<Self> {
        let name = std::env::var(&*MOCKEXAM_TABLE_NAME_ENV).map_err(|_| {
            MockExamError::Config(format!(
                "environment variable {} is not set",
                *MOCKEXAM_TABLE_NAME_ENV
            ))
        })?;
        if name.trim().is_empty() {
            return Err(MockExamError::Config(format!(
                "environment variable {} is empty",
                *MOCKEXAM_TABLE_NAME_ENV
            )));
        }
        Ok(TableConfig::new(name.trim()))
    }
}
