// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn sniffs_dialect_from_scheme() {
    assert_eq!(Dialect::from_url("postgres://u@h/db").unwrap(), Dialect::Postgres);
    assert_eq!(Dialect::from_url("mysql://u@h/db").unwrap(), Dialect::MySql);
    assert_eq!(Dialect::from_url("sqlite://file.db").unwrap(), Dialect::Sqlite);
    assert!(Dialect::from_url("redis://h").is_err());
}

#[test]
fn postgres_placeholders_are_numbered() {
    assert_eq!(Dialect::Postgres.placeholders(3), "$1, $2, $3");
    assert_eq!(Dialect::Sqlite.placeholders(3), "?, ?, ?");
}

#[test]
fn mysql_spells_null_safe_equality_with_the_spaceship_operator() {
    assert_eq!(Dialect::MySql.null_safe_eq("sub_name", "?"), "sub_name <=> ?");
    assert_eq!(Dialect::Postgres.null_safe_eq("sub_name", "$1"), "sub_name IS NOT DISTINCT FROM $1");
    assert_eq!(Dialect::Sqlite.null_safe_eq("sub_name", "?"), "sub_name IS NOT DISTINCT FROM ?");
}

#[test]
fn only_postgres_and_sqlite_support_returning() {
    assert!(Dialect::Postgres.supports_returning());
    assert!(Dialect::Sqlite.supports_returning());
    assert!(!Dialect::MySql.supports_returning());
}
