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

//! Common unit test utility methods

use crate::configs::TableConfig;
use crate::error::{MockExamError, Result};
use crate::store::{string_attribute, Record, RecordKey, RecordStore};
use crate::transmute::{json_to_record, record_to_json};
use async_trait::async_trait;
use aws_lambda_events::event::apigw::ApiGatewayProxyRequest;
use rusoto_dynamodb::AttributeValue;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// An in-memory [`RecordStore`] that counts the operations it serves.
///
/// Seeding the store through [`MemoryStore::insert`] and friends is not
/// counted; only calls made through the [`RecordStore`] trait are.
pub struct MemoryStore {
    table:       TableConfig,
    records:     Mutex<BTreeMap<RecordKey, Record>>,
    gets:        AtomicUsize,
    puts:        AtomicUsize,
    fail_reads:  AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store with the default table layout.
    pub fn new() -> Self {
        Self::with_table(TableConfig::new("Records"))
    }

    /// Creates an empty store with the given table layout.
    pub fn with_table(table: TableConfig) -> Self {
        MemoryStore {
            table,
            records: Mutex::new(BTreeMap::new()),
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Seeds a record given as JSON. The record must carry both key
    /// attributes.
    pub fn insert(&self, record: Value) {
        self.insert_record(json_record(record));
    }

    /// Seeds a DynamoDB item as is.
    pub fn insert_record(&self, record: Record) {
        let key = RecordKey::from_record(&record, &self.table).expect("record without key");
        self.records.lock().unwrap().insert(key, record);
    }

    /// Seeds the index record of `partition` as a list of strings.
    pub fn insert_index(&self, partition: &str, ids: &[&str]) {
        let key = RecordKey::new(partition, &self.table.index_sort_key);
        let mut record = key.to_record(&self.table);
        let ids = AttributeValue {
            l: Some(ids.iter().map(|id| string_attribute(*id)).collect()),
            ..Default::default()
        };
        record.insert(self.table.index_attribute.clone(), ids);
        self.insert_record(record);
    }

    /// Seeds a question record of `partition` with the given JSON content.
    pub fn insert_question(&self, partition: &str, id: &str, content: Value) {
        self.insert_question_record(partition, id, json_record(content));
    }

    /// Seeds a question record of `partition` with the given item content.
    pub fn insert_question_record(&self, partition: &str, id: &str, content: Record) {
        let mut record = content;
        record.extend(RecordKey::new(partition, id).to_record(&self.table));
        self.insert_record(record);
    }

    /// Returns the record stored at `key`, bypassing the counters.
    pub fn record(&self, key: &RecordKey) -> Option<Record> {
        self.records.lock().unwrap().get(key).cloned()
    }

    /// Returns every record of `partition`, ordered by sort key.
    pub fn partition(&self, partition: &str) -> Vec<Record> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k.partition == partition)
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Returns a copy of every stored record.
    pub fn snapshot(&self) -> BTreeMap<RecordKey, Record> {
        self.records.lock().unwrap().clone()
    }

    /// The number of records in the store.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Returns true if the store holds no record.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of point reads served.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// The number of writes served.
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Makes every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn table(&self) -> &TableConfig {
        &self.table
    }

    async fn get(&self, key: &RecordKey) -> Result<Option<Record>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(MockExamError::Storage(
                "ProvisionedThroughputExceededException".to_owned(),
            ));
        }
        Ok(self.record(key))
    }

    async fn put(&self, record: Record) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MockExamError::Storage(
                "InternalServerError".to_owned(),
            ));
        }
        let key = RecordKey::from_record(&record, &self.table)
            .ok_or_else(|| MockExamError::Storage("missing key attributes".to_owned()))?;
        self.records.lock().unwrap().insert(key, record);
        Ok(())
    }
}

/// Converts a JSON object into a DynamoDB item.
pub fn json_record(value: Value) -> Record {
    match value {
        Value::Object(m) => json_to_record(m).unwrap(),
        other => panic!("record must be a JSON object, got {}", other),
    }
}

/// Converts a DynamoDB item into JSON for comparisons.
pub fn record_json(record: Record) -> Value {
    Value::Object(record_to_json(record).unwrap())
}

/// The authorizer context an IAM authorizer attaches for a Cognito identity.
pub fn iam_authorizer(identity_id: &str) -> Value {
    json!({
        "iam": {
            "accessKey": "ASIAXMPLACCESSKEY",
            "accountId": "123456789012",
            "callerId": "AROAXMPLCALLER:CognitoIdentityCredentials",
            "cognitoIdentity": {
                "amr": ["authenticated"],
                "identityId": identity_id,
                "identityPoolId": "us-east-2:3f0d9a62-xmpl-4c5e-9b55-0e4b2a6c5a55"
            },
            "principalOrgId": null,
            "userArn": "arn:aws:sts::123456789012:assumed-role/AuthRole/CognitoIdentityCredentials",
            "userId": "AROAXMPLCALLER:CognitoIdentityCredentials"
        }
    })
}

/// Generates an API Gateway proxy request for `POST /test/{questionType}`.
///
/// # Arguments
///
/// * `question_type`: the path parameter, or `None` to drop the path
///   parameters altogether.
/// * `authorizer`: the authorizer context attached to the request.
pub fn apigw_proxy_request(
    question_type: Option<&str>,
    authorizer: Value,
) -> ApiGatewayProxyRequest {
    let mut event: Value =
        serde_json::from_str(include_str!("tests/apigw_proxy_request.json")).unwrap();
    event["pathParameters"] = match question_type {
        Some(t) => {
            event["path"] = json!(format!("/test/{}", t));
            json!({ "questionType": t })
        }
        None => Value::Null,
    };
    event["requestContext"]["authorizer"] = authorizer;
    serde_json::from_value(event).unwrap()
}
