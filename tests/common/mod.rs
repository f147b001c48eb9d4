// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::App;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::web;
use std::fs;
use std::path::PathBuf;
use tagserve::api;
use tagserve::app_state::AppState;
use tagserve::headers;
use tempfile::TempDir;

/// §8 fixture table: row 1 has a blank explanation, row 2 does not.
pub const DEFAULT_CSV: &str = "\
ID,Rating,Prompt Category,Prompt,ChatGPT,Bard,Explanation,Tags - ChatGPT,Tags - Bard
1,5,math,What is 2+2?,Four,4,,good,
2,3,logic,Why?,Because,Reasons,x,\"Good, bad\",hmm
3,1,trivia,Who?,Nobody,Someone,fine,,
";

pub struct TestHarness {
    pub dir: TempDir,
    pub csv_path: PathBuf,
    pub state: web::Data<AppState>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_csv(DEFAULT_CSV)
    }

    pub fn with_csv(csv: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix("tagserve-api-test")
            .tempdir()
            .expect("temp dir");
        let csv_path = dir.path().join("explanations.csv");
        fs::write(&csv_path, csv).expect("seed csv");
        let state = web::Data::new(AppState::new(csv_path.clone()));
        Self {
            dir,
            csv_path,
            state,
        }
    }

    /// Harness whose backing file does not exist, for storage-failure
    /// paths.
    pub fn without_csv() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("tagserve-api-test")
            .tempdir()
            .expect("temp dir");
        let csv_path = dir.path().join("missing.csv");
        let state = web::Data::new(AppState::new(csv_path.clone()));
        Self {
            dir,
            csv_path,
            state,
        }
    }

    pub fn csv_contents(&self) -> String {
        fs::read_to_string(&self.csv_path).expect("read csv")
    }
}

pub fn build_test_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(headers::Cors)
        .configure(api::configure)
}
