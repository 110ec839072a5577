//! Shared pieces of the `ddfcreate` command-line tool.

pub mod logging;
