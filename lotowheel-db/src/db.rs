use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, LotteryKind};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    lottery     TEXT NOT NULL,
    contest     INTEGER NOT NULL,
    date        TEXT NOT NULL,
    numbers     TEXT NOT NULL,
    is_special  INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (lottery, contest)
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotowheel.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Cannot open database {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Migration failed")?;
    Ok(())
}

fn encode_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_numbers(raw: &str) -> rusqlite::Result<Vec<u32>> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim().parse::<u32>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
            })
        })
        .collect()
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (lottery, contest, date, numbers, is_special)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            draw.lottery.slug(),
            draw.contest,
            draw.date,
            encode_numbers(&draw.numbers),
            draw.is_special,
        ],
    ).context("Insert failed")?;
    Ok(changed > 0)
}

/// Most recent draw first.
pub fn fetch_last_draws(conn: &Connection, lottery: LotteryKind, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT contest, date, numbers, is_special
         FROM draws WHERE lottery = ?1 ORDER BY date DESC, contest DESC LIMIT ?2"
    )?;
    let draws = stmt.query_map(rusqlite::params![lottery.slug(), limit], |row| {
        let raw: String = row.get(2)?;
        Ok(Draw {
            lottery,
            contest: row.get(0)?,
            date: row.get(1)?,
            numbers: decode_numbers(&raw)?,
            is_special: row.get(3)?,
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection, lottery: LotteryKind) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE lottery = ?1",
        [lottery.slug()],
        |row| row.get(0),
    )?;
    Ok(count)
}
