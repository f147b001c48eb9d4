// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Global tag operations: each handler composes one pure transform from
//! `crate::tags` with a single load-modify-save cycle on the store.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::api::decode_payload;
use crate::app_state::AppState;
use crate::tags;

#[derive(Debug, Default, Deserialize)]
pub struct TagPayload {
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenamePayload {
    #[serde(default)]
    pub old_tag: String,
    #[serde(default)]
    pub new_tag: String,
}

/// `POST /api/tags/remove` — drop a tag from both columns of every record.
pub async fn remove(body: web::Bytes, state: web::Data<AppState>) -> HttpResponse {
    let payload: TagPayload = decode_payload(&body);
    let tag = payload.tag.trim().to_string();
    if tag.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Missing tag" }));
    }

    match state.store.mutate(|table| Ok(tags::remove_tag(table, &tag))) {
        Ok(removed) => {
            log::info!("Removed tag '{}' from {} rows", tag, removed);
            HttpResponse::Ok().json(json!({ "removed_rows": removed }))
        }
        Err(err) => {
            log::error!("Tag removal failed: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": format!("Failed to remove tag: {}", err)
            }))
        }
    }
}

/// `POST /api/tags/rename` — rename a tag across both columns of every
/// record.
pub async fn rename(body: web::Bytes, state: web::Data<AppState>) -> HttpResponse {
    let payload: RenamePayload = decode_payload(&body);
    let old_tag = payload.old_tag.trim().to_string();
    let new_tag = payload.new_tag.trim().to_string();
    if old_tag.is_empty() || new_tag.is_empty() {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Both old_tag and new_tag are required" }));
    }

    match state
        .store
        .mutate(|table| Ok(tags::rename_tag(table, &old_tag, &new_tag)))
    {
        Ok(updated) => {
            log::info!("Renamed tag '{}' to '{}' on {} rows", old_tag, new_tag, updated);
            HttpResponse::Ok().json(json!({ "updated_rows": updated }))
        }
        Err(err) => {
            log::error!("Tag rename failed: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": format!("Failed to rename tag: {}", err)
            }))
        }
    }
}

/// `POST /api/tags/add_missing_explanations` — tag every record whose
/// explanation is blank. The tag falls back to a fixed phrase when the
/// client sends none.
pub async fn add_missing_explanations(
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    let payload: TagPayload = decode_payload(&body);
    let trimmed = payload.tag.trim();
    let tag = if trimmed.is_empty() {
        tags::MISSING_EXPLANATION_TAG.to_string()
    } else {
        trimmed.to_string()
    };

    match state
        .store
        .mutate(|table| Ok(tags::add_tag_if_missing_explanation(table, &tag)))
    {
        Ok(updated) => {
            log::info!("Tagged {} rows with missing explanations as '{}'", updated, tag);
            HttpResponse::Ok().json(json!({ "updated_rows": updated }))
        }
        Err(err) => {
            log::error!("Missing-explanation tagging failed: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": format!("Failed to apply missing-explanation tag: {}", err)
            }))
        }
    }
}
