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

#![warn(missing_docs, clippy::needless_borrow)]
// Clippy lints, some should be disabled incrementally
#![allow(clippy::new_without_default, clippy::upper_case_acronyms)]

//! `mockexam` draws a random question for a mock-test category from a
//! DynamoDB table and appends it to the caller's session history.
//!
//! The crate is consumed by the `start_test` cloud function, but every
//! component works against the [`RecordStore`](crate::store::RecordStore)
//! seam so it can run without AWS.

pub mod api;
pub mod aws;
pub mod category;
pub mod config;
pub mod configs;
pub mod error;
pub mod fetcher;
pub mod identity;
pub mod prelude;
pub mod recorder;
pub mod store;
pub mod test_util;
pub mod transmute;
