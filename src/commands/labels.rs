// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::labels::{ExpenseCategory, IncomeSource};
use crate::utils::{
    custom_categories, custom_sources, pretty_table, register_category, register_source,
};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

/// `category ...` subcommands.
pub fn handle_categories(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let cat = ExpenseCategory::from(name);
            if !cat.is_custom() {
                return Err(anyhow!("'{}' is already a default category", name));
            }
            if register_category(conn, &cat)? {
                println!("Added category '{}'", name);
            } else {
                println!("Category '{}' already exists", name);
            }
        }
        Some(("list", _)) => {
            let defaults = ExpenseCategory::DEFAULTS.iter().map(|c| c.to_string());
            print_labels("Category", defaults, custom_categories(conn)?);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            remove(conn, "custom_categories", name)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

/// `source ...` subcommands.
pub fn handle_sources(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let src = IncomeSource::from(name);
            if !src.is_custom() {
                return Err(anyhow!("'{}' is already a default income source", name));
            }
            if register_source(conn, &src)? {
                println!("Added income source '{}'", name);
            } else {
                println!("Income source '{}' already exists", name);
            }
        }
        Some(("list", _)) => {
            let defaults = IncomeSource::DEFAULTS.iter().map(|s| s.to_string());
            print_labels("Source", defaults, custom_sources(conn)?);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            remove(conn, "custom_income_sources", name)?;
            println!("Removed income source '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn print_labels(header: &str, defaults: impl Iterator<Item = String>, custom: Vec<String>) {
    let mut data: Vec<Vec<String>> = defaults.map(|d| vec![d, "default".into()]).collect();
    data.extend(custom.into_iter().map(|c| vec![c, "custom".into()]));
    println!("{}", pretty_table(&[header, "Kind"], data));
}

// Existing transactions keep their label; only the remembered choice goes away.
fn remove(conn: &Connection, table: &str, name: &str) -> Result<()> {
    let n = conn.execute(&format!("DELETE FROM {} WHERE name=?1", table), params![name])?;
    if n == 0 {
        return Err(anyhow!("No custom label '{}'", name));
    }
    Ok(())
}
