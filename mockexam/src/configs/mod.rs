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

//! This module provides various default configurations for the mock-test
//! service.

pub mod dynamodb;
pub use dynamodb::TableConfig;

pub use crate::config::MOCKEXAM_CONF;
use lazy_static::lazy_static;
use rusoto_core::Region;
use rusoto_dynamodb::DynamoDbClient;

lazy_static! {
    /// The environment variable that carries the table name.
    pub static ref MOCKEXAM_TABLE_NAME_ENV: String = MOCKEXAM_CONF["dynamodb"]["table_name_env"].to_string();
    /// The partition key attribute of the table.
    pub static ref MOCKEXAM_PARTITION_KEY: String = MOCKEXAM_CONF["dynamodb"]["partition_key"].to_string();
    /// The sort key attribute of the table.
    pub static ref MOCKEXAM_SORT_KEY: String = MOCKEXAM_CONF["dynamodb"]["sort_key"].to_string();
    /// The sort key of the record listing the questions of a category.
    pub static ref MOCKEXAM_INDEX_SORT_KEY: String = MOCKEXAM_CONF["dynamodb"]["index_sort_key"].to_string();
    /// The attribute of the index record holding the question sort keys.
    pub static ref MOCKEXAM_INDEX_ATTRIBUTE: String = MOCKEXAM_CONF["dynamodb"]["index_attribute"].to_string();
    /// Whether point reads are strongly consistent.
    pub static ref MOCKEXAM_CONSISTENT_READ: bool = MOCKEXAM_CONF["dynamodb"]["consistent_read"].parse::<bool>().unwrap();

    /// Dotted path of the caller identity inside the authorizer context.
    pub static ref MOCKEXAM_IDENTITY_CLAIM: String = MOCKEXAM_CONF["auth"]["identity_claim"].to_string();
    /// Partitions drawn from, in merge order, for a full test.
    pub static ref MOCKEXAM_FULL_TEST_SECTIONS: Vec<String> = MOCKEXAM_CONF["test"]["full_test_sections"]
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect();
    /// The path parameter carrying the requested question type.
    pub static ref MOCKEXAM_PATH_PARAMETER: String = MOCKEXAM_CONF["lambda"]["path_parameter"].to_string();

    /// DynamoDB Client shared by every invocation of the function.
    pub static ref MOCKEXAM_DYNAMODB_CLIENT: DynamoDbClient = DynamoDbClient::new(Region::default());
}
