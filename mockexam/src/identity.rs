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

//! The identity of the caller, as established by the API Gateway authorizer.

use crate::error::{MockExamError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// An opaque, already authenticated caller identity. It is the partition
/// key of the caller's session records and is used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Wraps an identity.
    pub fn new(id: impl Into<String>) -> Self {
        CallerIdentity(id.into())
    }

    /// Extracts the identity from the authorizer context.
    ///
    /// The string found at the dotted `claim` path wins. Lambda authorizers
    /// that only report a `principalId` are supported as a fallback.
    ///
    /// # Arguments
    /// * `authorizer` - The `requestContext.authorizer` map of the request.
    /// * `claim` - A dotted path such as `iam.cognitoIdentity.identityId`.
    pub fn from_authorizer(authorizer: &HashMap<String, Value>, claim: &str) -> Result<Self> {
        let mut path = claim.split('.').filter(|s| !s.is_empty());
        let claimed = path
            .next()
            .and_then(|head| authorizer.get(head))
            .and_then(|root| path.try_fold(root, |value, segment| value.get(segment)));

        [claimed, authorizer.get("principalId")]
            .iter()
            .flatten()
            .filter_map(|v| v.as_str())
            .find(|id| !id.is_empty())
            .map(CallerIdentity::new)
            .ok_or(MockExamError::MissingCallerIdentity)
    }

    /// The identity as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
