// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::path::PathBuf;

use crate::store::ExplanationStore;

/// Shared application state injected into handlers via `web::Data`. The
/// store holds no table data between requests; the CSV file is the single
/// source of truth.
pub struct AppState {
    pub store: ExplanationStore,
}

impl AppState {
    pub fn new(csv_path: PathBuf) -> Self {
        Self {
            store: ExplanationStore::new(csv_path),
        }
    }
}
