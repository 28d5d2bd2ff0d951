// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub const ANSI_COLOR_RED: &str = "\x1b[31m";
pub const ANSI_COLOR_RESET: &str = "\x1b[0m";
