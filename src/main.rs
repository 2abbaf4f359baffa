// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Bikestem: a bicycle stem and fit calculator

fn main() -> anyhow::Result<()> {
    bikestem::run(std::env::args().skip(1))
}
