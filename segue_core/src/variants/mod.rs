// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made transition variants besides [`HeroTransition`](crate::hero::HeroTransition).

pub mod fade;
pub mod matched;
pub mod sheet;
