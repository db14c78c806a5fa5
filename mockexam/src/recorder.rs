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

//! Appends served questions to the caller's session history.

use crate::error::Result;
use crate::identity::CallerIdentity;
use crate::store::{Record, RecordKey, RecordStore};
use chrono::Utc;
use log::debug;
use uuid::Uuid;

/// Generates a fresh session sort key.
///
/// The key is the zero-padded UTC timestamp in milliseconds followed by a
/// random v4 UUID, so keys sort by creation time and stay unique when the
/// same caller writes twice within a millisecond.
pub fn session_sort_key() -> String {
    format!("{:013}#{}", Utc::now().timestamp_millis(), Uuid::new_v4())
}

/// Writes session records through a [`RecordStore`].
pub struct SessionRecorder<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> SessionRecorder<'a, S> {
    /// Creates a recorder writing to `store`.
    pub fn new(store: &'a S) -> Self {
        SessionRecorder { store }
    }

    /// Appends a session record holding a shallow copy of `content` under
    /// the caller's partition and returns its key.
    ///
    /// The write is unconditional. The key attributes are set after the
    /// content is copied, so question content can never redirect the write.
    pub async fn record(&self, caller: &CallerIdentity, content: &Record) -> Result<RecordKey> {
        let table = self.store.table();
        let key = RecordKey::new(caller.as_str(), session_sort_key());

        let mut entry = content.clone();
        entry.extend(key.to_record(table));
        self.store.put(entry).await?;

        debug!("Recorded session {} for {}", key.sort, key.partition);
        Ok(key)
    }
}
