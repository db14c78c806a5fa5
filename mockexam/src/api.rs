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

//! The `POST /test/{questionType}` endpoint.
//!
//! The handler validates the requested category, draws the questions,
//! records them in the caller's session history and answers with the
//! question content. A bad category is the only failure the caller can
//! tell apart; every other failure is logged in detail and answered with
//! the same generic server error.

use crate::category::Category;
use crate::configs::*;
use crate::error::{MockExamError, Result};
use crate::fetcher::{merge, QuestionFetcher};
use crate::identity::CallerIdentity;
use crate::recorder::SessionRecorder;
use crate::store::RecordStore;
use crate::transmute::record_to_json;
use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::HeaderMap;
use log::{debug, error, info, warn};
use serde_json::{json, Value};
use std::collections::HashMap;

/// The message answered when the category is not recognized.
pub const INVALID_CATEGORY_MESSAGE: &str = "Invalid question type";
/// The message answered on any other failure.
pub const GENERIC_ERROR_MESSAGE: &str = "some error happened";

/// Starts a test for the caller of `request`.
///
/// # Arguments
/// * `store` - The table holding the question bank and the sessions.
/// * `request` - The API Gateway proxy request. The category comes from the
///   `questionType` path parameter and the caller from the authorizer
///   context.
///
/// # Returns
/// * `200` with the question content on success.
/// * `400` with `{"message":"Invalid question type"}` if the category is not
///   recognized. The store is not touched.
/// * `500` with `{"message":"some error happened"}` otherwise.
pub async fn start_test<S: RecordStore + ?Sized>(
    store: &S,
    request: &ApiGatewayProxyRequest,
) -> ApiGatewayProxyResponse {
    let requested = request.path_parameters.get(&*MOCKEXAM_PATH_PARAMETER);
    let result = match requested
        .ok_or_else(|| MockExamError::InvalidCategory(String::new()))
        .and_then(|name| name.parse::<Category>())
    {
        Ok(category) => serve(store, category, &request.request_context.authorizer).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(body) => json_response(200, body),
        Err(e) if e.is_client_error() => {
            warn!("{}", e);
            message(400, INVALID_CATEGORY_MESSAGE)
        }
        Err(e) => {
            error!(
                "Failed to start a {} test: {}",
                requested.map(String::as_str).unwrap_or_default(),
                e
            );
            message(500, GENERIC_ERROR_MESSAGE)
        }
    }
}

/// Draws and records the questions, returning the response body.
///
/// The body is rendered before the session is written, so content that
/// cannot be answered is never recorded.
async fn serve<S: RecordStore + ?Sized>(
    store: &S,
    category: Category,
    authorizer: &HashMap<String, Value>,
) -> Result<String> {
    let caller = CallerIdentity::from_authorizer(authorizer, &MOCKEXAM_IDENTITY_CLAIM)?;
    debug!("Starting a {} test for {}", category, caller);

    let questions = QuestionFetcher::new(store).fetch_questions(category).await?;
    let drawn = questions
        .iter()
        .map(|q| format!("{}/{}", q.section, q.id))
        .collect::<Vec<_>>();
    let content = merge(questions);
    let body = serde_json::to_string(&Value::Object(record_to_json(content.clone())?))?;

    let session = SessionRecorder::new(store).record(&caller, &content).await?;
    info!(
        "Served {} test [{}] to {} in session {}",
        category,
        drawn.join(", "),
        caller,
        session.sort
    );
    Ok(body)
}

/// Builds a response carrying `{"message": ...}`.
pub fn message(status_code: i64, message: &str) -> ApiGatewayProxyResponse {
    json_response(status_code, json!({ "message": message }).to_string())
}

/// Builds a response with a rendered JSON body.
pub fn json_response(status_code: i64, body: String) -> ApiGatewayProxyResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    ApiGatewayProxyResponse {
        status_code,
        headers,
        multi_value_headers: HeaderMap::new(),
        body: Some(Body::Text(body)),
        is_base64_encoded: Some(false),
    }
}
