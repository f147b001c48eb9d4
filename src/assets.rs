// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_files::Files;
use actix_web::web;
use std::path::Path;

pub const INDEX_FILE: &str = "tagger.html";

/// Serves the browser-side tagging UI from the configured asset root.
/// Boundary-only: nothing here touches the table or the tag algebra.
pub fn configure(cfg: &mut web::ServiceConfig, asset_root: &Path) {
    cfg.service(Files::new("/", asset_root).index_file(INDEX_FILE));
}
