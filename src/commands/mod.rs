// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod advice;
pub mod auth;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod stocks;
pub mod transactions;
