// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod engine;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod markup;
pub mod metadata;
pub mod normalizer;
pub mod prompts;
pub mod structured;
pub mod validator;
