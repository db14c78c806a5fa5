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

//! The main entry point for the `start_test` lambda function.

use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::{service_fn, LambdaEvent};
use log::info;
use mockexam::prelude::*;

#[cfg(feature = "snmalloc")]
#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

async fn handle<S: RecordStore + ?Sized>(
    store: &S,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse> {
    info!(
        "Request {}: {:?}",
        event.context.request_id, event.payload.path
    );
    Ok(start_test(store, &event.payload).await)
}

#[tokio::main]
async fn main() -> std::result::Result<(), lambda_runtime::Error> {
    env_logger::init();

    // Refuse to start without a table rather than failing every invocation.
    let table = TableConfig::from_env()?;
    info!("Serving questions from table {}", table.table_name);

    // One store per execution environment, shared by all invocations.
    let store = DynamoDbStore::new(table);
    let store = &store;
    lambda_runtime::run(service_fn(move |event| async move {
        handle(store, event).await
    }))
    .await?;
    Ok(())
}
