// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use tapp::errors::TappError;

fn main() -> Result<(), TappError> {
    tapp::run()
}
