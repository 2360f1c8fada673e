// SPDX-License-Identifier: MIT

pub mod check;
pub mod runner;
