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

//! The storage seam of the service.
//!
//! Every component reads and writes DynamoDB items through [`RecordStore`],
//! so question content is copied attribute for attribute and never passes
//! through JSON on its way into a session. The DynamoDB implementation lives
//! in [`crate::aws::dynamodb`], an in-memory one in [`crate::test_util`].

use crate::configs::TableConfig;
use crate::error::Result;
use async_trait::async_trait;
use rusoto_dynamodb::AttributeValue;
use std::collections::HashMap;

/// A stored item, attribute name to attribute value.
pub type Record = HashMap<String, AttributeValue>;

/// Builds a string attribute value.
pub fn string_attribute(s: impl Into<String>) -> AttributeValue {
    AttributeValue {
        s: Some(s.into()),
        ..Default::default()
    }
}

/// The composite primary key of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    /// The partition key value.
    pub partition: String,
    /// The sort key value.
    pub sort:      String,
}

impl RecordKey {
    /// Creates a new key.
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        RecordKey {
            partition: partition.into(),
            sort:      sort.into(),
        }
    }

    /// Renders the key as the attributes of a record.
    pub fn to_record(&self, table: &TableConfig) -> Record {
        let mut record = Record::new();
        record.insert(
            table.partition_key.clone(),
            string_attribute(self.partition.as_str()),
        );
        record.insert(table.sort_key.clone(), string_attribute(self.sort.as_str()));
        record
    }

    /// Reads the key back from the attributes of a record. Returns `None`
    /// if either key attribute is missing or is not a string.
    pub fn from_record(record: &Record, table: &TableConfig) -> Option<Self> {
        let partition = record.get(&table.partition_key)?.s.as_deref()?;
        let sort = record.get(&table.sort_key)?.s.as_deref()?;
        Some(RecordKey::new(partition, sort))
    }
}

/// A key-value table addressed by [`RecordKey`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The layout of the table behind the store.
    fn table(&self) -> &TableConfig;

    /// Point-reads the record stored at `key`.
    async fn get(&self, key: &RecordKey) -> Result<Option<Record>>;

    /// Writes `record` unconditionally, replacing any record with the same
    /// key. The record must carry both key attributes.
    async fn put(&self, record: Record) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_attributes() {
        let table = TableConfig::new("Records");
        let key = RecordKey::new("reading", "q1");

        let record = key.to_record(&table);
        assert_eq!(2, record.len());
        assert_eq!(Some("reading"), record["PK"].s.as_deref());
        assert_eq!(Some("q1"), record["SK"].s.as_deref());
        assert_eq!(Some(key), RecordKey::from_record(&record, &table));

        let mut record = record;
        record.insert(
            "SK".to_owned(),
            AttributeValue {
                n: Some("1".to_owned()),
                ..Default::default()
            },
        );
        assert_eq!(None, RecordKey::from_record(&record, &table));
    }
}
