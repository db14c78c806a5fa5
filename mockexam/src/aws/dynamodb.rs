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

//! This crate contains all wrapped functions of the AWS DynamoDB service.

use crate::configs::*;
use crate::error::{MockExamError, Result};
use crate::store::{Record, RecordKey, RecordStore};
use async_trait::async_trait;
use log::debug;
use rusoto_dynamodb::{DynamoDb, DynamoDbClient, GetItemInput, PutItemInput};

/// A [`RecordStore`] backed by a DynamoDB table.
pub struct DynamoDbStore {
    /// The client shared by all invocations in the execution environment.
    client: &'static DynamoDbClient,
    /// The table layout.
    table:  TableConfig,
}

impl DynamoDbStore {
    /// Creates a store over the process-wide client.
    ///
    /// # Arguments
    /// * `table` - The table to read from and write to.
    pub fn new(table: TableConfig) -> Self {
        Self::with_client(&*MOCKEXAM_DYNAMODB_CLIENT, table)
    }

    /// Creates a store over the given client.
    pub fn with_client(client: &'static DynamoDbClient, table: TableConfig) -> Self {
        DynamoDbStore { client, table }
    }

    /// Builds the point-read request for `key`.
    pub fn get_item_input(&self, key: &RecordKey) -> GetItemInput {
        GetItemInput {
            table_name: self.table.table_name.clone(),
            key: key.to_record(&self.table),
            consistent_read: Some(self.table.consistent_read),
            ..Default::default()
        }
    }

    /// Builds the unconditional write request for `record`.
    pub fn put_item_input(&self, record: Record) -> Result<PutItemInput> {
        if RecordKey::from_record(&record, &self.table).is_none() {
            return Err(MockExamError::Internal(format!(
                "record must carry string attributes {} and {}",
                self.table.partition_key, self.table.sort_key
            )));
        }
        Ok(PutItemInput {
            table_name: self.table.table_name.clone(),
            item: record,
            ..Default::default()
        })
    }
}

#[async_trait]
impl RecordStore for DynamoDbStore {
    fn table(&self) -> &TableConfig {
        &self.table
    }

    async fn get(&self, key: &RecordKey) -> Result<Option<Record>> {
        debug!(
            "GetItem {} ({}, {})",
            self.table.table_name, key.partition, key.sort
        );
        let output = self.client.get_item(self.get_item_input(key)).await?;
        Ok(output.item)
    }

    async fn put(&self, record: Record) -> Result<()> {
        let request = self.put_item_input(record)?;
        debug!("PutItem {}", request.table_name);
        self.client.put_item(request).await?;
        Ok(())
    }
}
