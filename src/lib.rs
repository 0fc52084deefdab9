// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod advisor;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod db;
pub mod gemini;
pub mod ledger;
pub mod models;
pub mod portfolio;
pub mod quote;
pub mod report;
pub mod utils;
