// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;
use serde::de::DeserializeOwned;

pub mod explanations;
pub mod tags;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/explanations", web::get().to(explanations::list))
            .route("/explanations/{id}", web::post().to(explanations::update))
            .route("/tags/remove", web::post().to(tags::remove))
            .route("/tags/rename", web::post().to(tags::rename))
            .route(
                "/tags/add_missing_explanations",
                web::post().to(tags::add_missing_explanations),
            ),
    );
}

/// Decodes a JSON request body, treating malformed JSON as an empty
/// payload so the per-field checks in the handlers produce the documented
/// 400s instead of a transport-level error.
pub(crate) fn decode_payload<T>(body: &web::Bytes) -> T
where
    T: DeserializeOwned + Default,
{
    serde_json::from_slice(body).unwrap_or_default()
}
