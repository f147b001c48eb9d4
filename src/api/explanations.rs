// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::api::decode_payload;
use crate::app_state::AppState;
use crate::store::StoreError;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTagsPayload {
    #[serde(default)]
    pub tags_chatgpt: String,
    #[serde(default)]
    pub tags_bard: String,
}

/// `GET /api/explanations` — the full table, one object per record.
pub async fn list(state: web::Data<AppState>) -> HttpResponse {
    match state.store.read() {
        Ok(table) => HttpResponse::Ok().json(&table.records),
        Err(err) => {
            log::error!("Explanations load failed: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": format!("Failed to load data: {}", err)
            }))
        }
    }
}

/// `POST /api/explanations/{id}` — replace both tag fields of one record.
pub async fn update(
    path: web::Path<String>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    let id: i64 = match path.into_inner().parse() {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Invalid row id" }));
        }
    };

    let payload: UpdateTagsPayload = decode_payload(&body);
    match state
        .store
        .update_tags(id, &payload.tags_chatgpt, &payload.tags_bard)
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err @ StoreError::RecordNotFound(_)) => {
            HttpResponse::NotFound().json(json!({ "error": err.to_string() }))
        }
        Err(err) => {
            log::error!("Tag update for record {} failed: {}", id, err);
            HttpResponse::InternalServerError().json(json!({
                "error": format!("Failed to update row: {}", err)
            }))
        }
    }
}
